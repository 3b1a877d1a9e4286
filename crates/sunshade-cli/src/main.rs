//! Sunshade CLI: fill and send report forms from the command line.
//!
//! Reads storage and notification settings from the environment (see `.env`).
//! Results are printed as JSON on stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sunshade_cli::{init_tracing, load_definition, parse_field, resolve_sender};
use sunshade_core::constants::DEFAULT_MAX_ATTACHMENTS;
use sunshade_core::{Config, ErrorMetadata, StaticSession};
use sunshade_forms::{builtin_forms, FormController, UploadEvent};
use sunshade_notify::NotificationDispatcher;
use sunshade_storage::{create_storage, AttachmentStoreClient};

#[derive(Parser)]
#[command(name = "sunshade", about = "Report forms CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in report forms
    Forms,
    /// Upload one attachment and print its public URL
    Upload {
        /// Path to the file to upload
        file: PathBuf,
    },
    /// Fill in a form, upload its attachments and send the report
    Submit {
        /// Built-in form id (order, checkup, damage, delivery)
        #[arg(long)]
        form: Option<String>,
        /// JSON form definition, used instead of a built-in form
        #[arg(long)]
        definition: Option<PathBuf>,
        /// Field value as Label=Value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Image to attach (repeatable, uploaded in the given order)
        #[arg(long = "attach")]
        attachments: Vec<String>,
        /// Sender name; defaults to SENDER_NAME
        #[arg(long)]
        sender: Option<String>,
    },
}

#[derive(Serialize)]
struct SubmitOutcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    uploads: Option<sunshade_core::UploadBatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<sunshade_forms::SubmissionReceipt>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn submit(
    config: &Config,
    form: Option<String>,
    definition: Option<PathBuf>,
    fields: Vec<(String, String)>,
    attachments: Vec<String>,
    sender: Option<String>,
) -> anyhow::Result<SubmitOutcome> {
    let definition = load_definition(
        form.as_deref(),
        definition.as_deref(),
        config.max_attachments(),
    )?;
    let sender = resolve_sender(sender, config)?;
    let dispatcher = NotificationDispatcher::from_config(config)?;

    let mut controller = FormController::new(
        definition,
        Arc::new(StaticSession::new(sender)),
        Arc::new(dispatcher),
    );

    if !attachments.is_empty() {
        let storage = create_storage(config)
            .await
            .context("Failed to initialize attachment storage")?;
        let client = AttachmentStoreClient::from_config(storage, config);
        let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
        controller = controller
            .with_attachment_uploader(Arc::new(client))
            .with_upload_events(events_tx);

        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                if let UploadEvent::Finished(entry) = event {
                    tracing::info!(
                        local_uri = %entry.local_uri(),
                        status = ?entry.status(),
                        "Attachment settled"
                    );
                }
            }
        });
    }

    for (label, value) in fields {
        if let Err(e) = controller.set_field(&label, value).await {
            return Ok(SubmitOutcome {
                success: false,
                error_code: Some(e.error_code()),
                message: e.client_message(),
                uploads: None,
                receipt: None,
            });
        }
    }

    let uploads = if attachments.is_empty() {
        None
    } else {
        match controller.add_attachments(attachments).await {
            Ok(result) => Some(result),
            Err(e) => {
                return Ok(SubmitOutcome {
                    success: false,
                    error_code: Some(e.error_code()),
                    message: e.client_message(),
                    uploads: None,
                    receipt: None,
                })
            }
        }
    };

    Ok(match controller.submit().await {
        Ok(receipt) => SubmitOutcome {
            success: true,
            error_code: None,
            message: receipt.message.clone(),
            uploads,
            receipt: Some(receipt),
        },
        Err(e) => SubmitOutcome {
            success: false,
            error_code: Some(e.error_code()),
            message: e.client_message(),
            uploads,
            receipt: None,
        },
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Forms => {
            let max_attachments = match Config::from_env() {
                Ok(config) => config.max_attachments(),
                Err(e) => {
                    tracing::debug!(error = %e, "No usable configuration, using default attachment cap");
                    DEFAULT_MAX_ATTACHMENTS
                }
            };
            print_json(&builtin_forms(max_attachments))?;
        }
        Commands::Upload { file } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let storage = create_storage(&config)
                .await
                .context("Failed to initialize attachment storage")?;
            let client = AttachmentStoreClient::from_config(storage, &config);
            let url = client.upload(&file.to_string_lossy()).await?;
            print_json(&serde_json::json!({ "url": url }))?;
        }
        Commands::Submit {
            form,
            definition,
            fields,
            attachments,
            sender,
        } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let outcome = submit(&config, form, definition, fields, attachments, sender).await?;
            let success = outcome.success;
            print_json(&outcome)?;
            if !success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

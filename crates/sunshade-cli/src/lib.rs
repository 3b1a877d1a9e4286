//! Helpers shared by the `sunshade` binary.

use std::path::Path;

use anyhow::Context;
use sunshade_core::{Config, FormDefinition};
use sunshade_forms::find_builtin;

/// Parse a `Label=Value` argument. Only the first `=` separates; the value
/// may be empty or contain further `=` signs.
pub fn parse_field(arg: &str) -> Result<(String, String), String> {
    let (label, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected Label=Value, got '{}'", arg))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("missing field label in '{}'", arg));
    }
    Ok((label.to_string(), value.to_string()))
}

/// Resolve the form to fill: a JSON definition file wins over a built-in id.
pub fn load_definition(
    form: Option<&str>,
    definition: Option<&Path>,
    max_attachments: usize,
) -> anyhow::Result<FormDefinition> {
    match (definition, form) {
        (Some(path), _) => FormDefinition::from_json_file(path),
        (None, Some(id)) => find_builtin(id, max_attachments)
            .with_context(|| format!("Unknown form '{}'. Run `sunshade forms` to list them", id)),
        (None, None) => Err(anyhow::anyhow!("Pass --form <id> or --definition <file>")),
    }
}

/// Name used as the report's sender: the `--sender` flag, else `SENDER_NAME`.
pub fn resolve_sender(flag: Option<String>, config: &Config) -> anyhow::Result<String> {
    flag.or_else(|| config.sender_name().map(String::from))
        .filter(|name| !name.trim().is_empty())
        .context("No sender name. Pass --sender or set SENDER_NAME")
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

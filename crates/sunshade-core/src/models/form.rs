//! Declarative form definitions
//!
//! A form is a list of labelled text fields, the subset that must be filled in,
//! the category label used for the notification and an optional attachment
//! section. Everything that differs between report screens lives here.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_ATTACHMENTS;

/// One text field of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Message shown when a required field is left empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_message: Option<String>,
}

impl FieldDefinition {
    pub fn required(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: true,
            missing_message: None,
        }
    }

    pub fn optional(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            missing_message: None,
        }
    }

    pub fn with_missing_message(mut self, message: impl Into<String>) -> Self {
        self.missing_message = Some(message.into());
        self
    }

    pub fn missing_message(&self) -> String {
        self.missing_message
            .clone()
            .unwrap_or_else(|| format!("Please fill in \"{}\".", self.label))
    }
}

/// Attachment section of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPolicy {
    #[serde(default = "default_max_attachments")]
    pub max_attachments: usize,
}

fn default_max_attachments() -> usize {
    DEFAULT_MAX_ATTACHMENTS
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_attachments: DEFAULT_MAX_ATTACHMENTS,
        }
    }
}

/// A complete report form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Stable identifier, e.g. "damage".
    pub id: String,
    /// Category label sent as the notification `type`.
    pub category: String,
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<AttachmentPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

impl FormDefinition {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            fields: Vec::new(),
            attachments: None,
            success_message: None,
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_attachments(mut self, policy: AttachmentPolicy) -> Self {
        self.attachments = Some(policy);
        self
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn has_attachments(&self) -> bool {
        self.attachments.is_some()
    }

    /// Attachment cap, or zero when the form takes no attachments.
    pub fn attachment_cap(&self) -> usize {
        self.attachments.map(|p| p.max_attachments).unwrap_or(0)
    }

    pub fn find_field(&self, label: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.label.as_str())
    }

    /// Check the definition itself: non-empty id and category, unique
    /// non-empty labels, and a positive attachment cap.
    pub fn check(&self) -> Result<(), anyhow::Error> {
        if self.id.trim().is_empty() {
            return Err(anyhow::anyhow!("Form id must not be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Form '{}' must have a category label",
                self.id
            ));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.label.trim().is_empty() {
                return Err(anyhow::anyhow!("Form '{}' has an unlabelled field", self.id));
            }
            if !seen.insert(field.label.as_str()) {
                return Err(anyhow::anyhow!(
                    "Form '{}' declares field '{}' twice",
                    self.id,
                    field.label
                ));
            }
        }
        if let Some(policy) = self.attachments {
            if policy.max_attachments == 0 {
                return Err(anyhow::anyhow!(
                    "Form '{}' has an attachment section with a cap of 0",
                    self.id
                ));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, anyhow::Error> {
        let definition: FormDefinition =
            serde_json::from_str(json).context("Failed to parse form definition")?;
        definition.check()?;
        Ok(definition)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read form definition {}", path.display()))?;
        Self::from_json_str(&json)
    }
}

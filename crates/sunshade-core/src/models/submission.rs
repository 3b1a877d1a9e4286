use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Field values in declared order (label → value).
///
/// Serialized as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(Vec<(String, String)>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty values for each label, in the given order.
    pub fn blank<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            labels
                .into_iter()
                .map(|label| (label.to_string(), String::new()))
                .collect(),
        )
    }

    /// Set a value, appending the label if it is not present yet.
    pub fn set(&mut self, label: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((label.to_string(), value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reset every value to the empty string, keeping labels and order.
    pub fn clear_values(&mut self) {
        for (_, value) in &mut self.0 {
            value.clear();
        }
    }
}

impl Serialize for FieldValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Payload posted to the notification endpoint.
///
/// Built fresh for each submit attempt and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubmissionRequest {
    #[serde(rename = "senderName")]
    sender_name: String,
    #[serde(rename = "type")]
    category: String,
    #[serde(rename = "data")]
    fields: FieldValues,
    #[serde(rename = "imageUrls")]
    attachment_urls: Vec<String>,
}

impl SubmissionRequest {
    pub fn new(
        sender_name: impl Into<String>,
        category: impl Into<String>,
        fields: FieldValues,
        attachment_urls: Vec<String>,
    ) -> Self {
        Self {
            sender_name: sender_name.into(),
            category: category.into(),
            fields,
            attachment_urls,
        }
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    /// Report category label (the email subject's prefix).
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn fields(&self) -> &FieldValues {
        &self.fields
    }

    pub fn attachment_urls(&self) -> &[String] {
        &self.attachment_urls
    }
}

/// Outcome of a dispatch as seen by the form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub error_message: Option<String>,
}

impl SubmissionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
        }
    }
}

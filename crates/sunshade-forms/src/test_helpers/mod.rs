//! Test helpers for form unit tests
//!
//! Mock uploader and dispatcher so controller tests run without storage or
//! network access.

pub mod mock_dispatcher;
pub mod mock_uploader;

pub use mock_dispatcher::MockDispatcher;
pub use mock_uploader::MockUploader;

use sunshade_core::{AttachmentPolicy, FieldDefinition, FormDefinition};

/// Damage report with two required fields, one optional field and images.
pub fn damage_form() -> FormDefinition {
    FormDefinition::new("damage", "Damage report")
        .field(FieldDefinition::required("Customer"))
        .field(FieldDefinition::required("Damage"))
        .field(FieldDefinition::optional("Notes"))
        .with_attachments(AttachmentPolicy::default())
}

/// Form without an attachment section.
pub fn delivery_form() -> FormDefinition {
    FormDefinition::new("delivery", "Delivery note")
        .field(FieldDefinition::required("Driver"))
        .field(FieldDefinition::optional("Remarks"))
}

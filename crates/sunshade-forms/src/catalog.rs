//! Built-in report forms
//!
//! The four report families used in the field. Anything else can be loaded
//! with [`FormDefinition::from_json_file`].

use sunshade_core::{AttachmentPolicy, FieldDefinition, FormDefinition};

fn images(max_attachments: usize) -> AttachmentPolicy {
    AttachmentPolicy { max_attachments }
}

fn order_form() -> FormDefinition {
    FormDefinition::new("order", "Order")
        .field(FieldDefinition::required("Customer name"))
        .field(FieldDefinition::required("Phone"))
        .field(
            FieldDefinition::required("Installation address")
                .with_missing_message("Please enter the installation address."),
        )
        .field(FieldDefinition::required("Product"))
        .field(FieldDefinition::required("Width (cm)"))
        .field(FieldDefinition::required("Projection (cm)"))
        .field(FieldDefinition::optional("Fabric colour"))
        .field(FieldDefinition::optional("Motor / control"))
        .field(FieldDefinition::optional("Notes"))
        .with_success_message("Your order has been sent.")
}

fn checkup_form(max_attachments: usize) -> FormDefinition {
    FormDefinition::new("checkup", "Checkup")
        .field(FieldDefinition::required("Customer name"))
        .field(FieldDefinition::required("Address"))
        .field(FieldDefinition::required("Date of visit"))
        .field(FieldDefinition::optional("Product"))
        .field(FieldDefinition::optional("Findings"))
        .field(FieldDefinition::optional("Recommended work"))
        .with_attachments(images(max_attachments))
        .with_success_message("Your checkup report has been sent.")
}

fn damage_form(max_attachments: usize) -> FormDefinition {
    FormDefinition::new("damage", "Damage report")
        .field(FieldDefinition::required("Customer name"))
        .field(FieldDefinition::required("Phone"))
        .field(FieldDefinition::required("Address"))
        .field(FieldDefinition::optional("Product"))
        .field(
            FieldDefinition::required("Damage description")
                .with_missing_message("Please describe the damage."),
        )
        .with_attachments(images(max_attachments))
        .with_success_message("Your damage report has been sent.")
}

fn delivery_form(max_attachments: usize) -> FormDefinition {
    FormDefinition::new("delivery", "Delivery")
        .field(FieldDefinition::required("Customer name"))
        .field(FieldDefinition::required("Delivery address"))
        .field(FieldDefinition::required("Delivery date"))
        .field(FieldDefinition::optional("Items delivered"))
        .field(FieldDefinition::optional("Remarks"))
        .with_attachments(images(max_attachments))
        .with_success_message("Your delivery note has been sent.")
}

/// All built-in forms, with image sections capped at `max_attachments`.
pub fn builtin_forms(max_attachments: usize) -> Vec<FormDefinition> {
    vec![
        order_form(),
        checkup_form(max_attachments),
        damage_form(max_attachments),
        delivery_form(max_attachments),
    ]
}

/// Built-in form with the given id.
pub fn find_builtin(id: &str, max_attachments: usize) -> Option<FormDefinition> {
    builtin_forms(max_attachments)
        .into_iter()
        .find(|form| form.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunshade_core::constants::DEFAULT_MAX_ATTACHMENTS;

    #[test]
    fn builtin_forms_are_well_formed() {
        for form in builtin_forms(DEFAULT_MAX_ATTACHMENTS) {
            form.check().unwrap();
            assert!(form.fields.iter().any(|f| f.required), "{}", form.id);
        }
    }

    #[test]
    fn finds_by_id_with_configured_cap() {
        let damage = find_builtin("damage", 3).unwrap();
        assert_eq!(damage.category, "Damage report");
        assert_eq!(damage.attachment_cap(), 3);

        let order = find_builtin("order", 3).unwrap();
        assert!(!order.has_attachments());

        assert!(find_builtin("warranty", 3).is_none());
    }
}

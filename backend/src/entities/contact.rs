// src/entities/contact.rs

use crate::db::models::Contact;

use super::{Access, Entity, FieldSpec, FieldValue, FormData, InputKind, ValidationErrors, Writable};

/// Validated contact, ready for INSERT/UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub rating: String,
}

impl Writable for ContactRecord {
    fn into_values(self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name),
            FieldValue::Text(self.email),
            FieldValue::Text(self.phone),
            FieldValue::Text(self.rating),
        ]
    }
}

/// Only `name` is checked; the other fields are stored as submitted.
pub fn validate_contact(form: &FormData) -> Result<ContactRecord, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = form.get("name");
    if name.is_empty() {
        errors.push("Name is required.");
    }

    errors.into_result(|| ContactRecord {
        name: name.to_string(),
        email: form.get("email").to_string(),
        phone: form.get("phone").to_string(),
        rating: form.get("rating").to_string(),
    })
}

pub struct ContactEntity;

impl Entity for ContactEntity {
    type Row = Contact;
    type Record = ContactRecord;

    const LABEL: &'static str = "Contact";
    const PLURAL: &'static str = "Contacts";
    const TABLE: &'static str = "contact";
    const PATH: &'static str = "/contact";
    const COLUMNS: &'static str = "id, name, email, phone, rating, created";
    // `created` has one-second resolution; id breaks the tie.
    const ORDER_BY: &'static str = "created DESC, id DESC";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", InputKind::Text).required(),
        FieldSpec::new("email", "Email", InputKind::Email),
        FieldSpec::new("phone", "Phone", InputKind::Tel),
        FieldSpec::new("rating", "Rating", InputKind::Text),
    ];
    const ACCESS: Access = Access::Public;

    const NEW_LINK: &'static str = "New Contact";
    const EMPTY_TEXT: &'static str = "No contacts found.";

    fn validate(form: &FormData) -> Result<ContactRecord, ValidationErrors> {
        validate_contact(form)
    }

    fn id(row: &Contact) -> i64 {
        row.id
    }

    fn cell(row: &Contact, field: &str) -> String {
        match field {
            "name" => row.name.clone(),
            "email" => row.email.clone(),
            "phone" => row.phone.clone(),
            "rating" => row.rating.clone(),
            "created" => row.created.format("%Y-%m-%d %H:%M:%S").to_string(),
            _ => String::new(),
        }
    }

    fn extra_columns() -> &'static [(&'static str, &'static str)] {
        &[("created", "Created")]
    }
}

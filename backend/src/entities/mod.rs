// src/entities/mod.rs
//
// Entity descriptors for the generic CRUD component.
//
// Each record type (contact, lead) describes its table, its writable
// fields, how raw form input is validated, and who may mutate it. The
// store (`db::store`), the handlers (`routes::crud`) and the views are
// written once against `Entity` and instantiated per type.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

pub mod contact;
pub mod lead;

pub use contact::ContactEntity;
pub use lead::LeadEntity;

/// Who may use an entity's create/update/delete routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    LoginRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Date,
    /// Free text input with a decimal keyboard hint. Parsing is the validator's job.
    Decimal,
}

impl InputKind {
    pub fn html_type(self) -> &'static str {
        match self {
            InputKind::Text | InputKind::Decimal => "text",
            InputKind::Email => "email",
            InputKind::Tel => "tel",
            InputKind::Date => "date",
        }
    }
}

/// One writable column, as it appears in forms and listings.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, input: InputKind) -> Self {
        Self {
            name,
            label,
            input,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A validated value ready to bind into an INSERT/UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    OptText(Option<String>),
    OptReal(Option<f64>),
}

/// Raw submitted form: field name -> raw string. Missing fields read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Ordered, de-duplicated validation messages.
///
/// `Display` joins them with a single space, which is the exact text the
/// forms show (e.g. "Invalid amount. Invalid probability.").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.0.contains(&message) {
            self.0.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when nothing was pushed, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// A typed record produced by a validator.
pub trait Writable: Send {
    /// Values in the same order as `Entity::FIELDS`.
    fn into_values(self) -> Vec<FieldValue>;
}

/// Descriptor for one CRUD-managed table.
pub trait Entity: Send + Sync + 'static {
    type Row: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static;
    type Record: Writable;

    /// Singular display name, also used in 404 messages.
    const LABEL: &'static str;
    const PLURAL: &'static str;
    const TABLE: &'static str;
    /// URL prefix, e.g. `/contact`. The collection view is `{PATH}/`.
    const PATH: &'static str;
    /// Columns selected for listing and lookup.
    const COLUMNS: &'static str;
    const ORDER_BY: &'static str;
    /// Writable columns, in form and bind order.
    const FIELDS: &'static [FieldSpec];
    const ACCESS: Access;

    const NEW_LINK: &'static str;
    const EMPTY_TEXT: &'static str;

    fn validate(form: &FormData) -> Result<Self::Record, ValidationErrors>;

    fn id(row: &Self::Row) -> i64;

    /// Display text for one cell of the collection table.
    fn cell(row: &Self::Row, field: &str) -> String;

    /// Extra read-only columns shown after `FIELDS` in listings.
    fn extra_columns() -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Raw form values for an edit form, taken from a stored row.
    fn form_from_row(row: &Self::Row) -> FormData {
        Self::FIELDS
            .iter()
            .map(|field| (field.name, Self::cell(row, field.name)))
            .collect()
    }

    /// Values to re-show after a failed update: whatever was submitted for a
    /// field, falling back to the stored value for fields left blank.
    fn merge_submitted(existing: &Self::Row, submitted: &FormData) -> FormData {
        let mut merged = Self::form_from_row(existing);
        for field in Self::FIELDS {
            let value = submitted.get(field.name);
            if !value.is_empty() {
                merged.set(field.name, value);
            }
        }
        merged
    }

    fn collection_path() -> String {
        format!("{}/", Self::PATH)
    }
}

/// Render a float the way the original pages did (Python `repr`):
/// integral values keep one decimal place (`1000.0`), others use the
/// shortest form that round-trips (`1000.5`, `0.75`), and magnitudes
/// outside `1e-4..1e16` switch to exponent form (`1e+16`, `1.5e-05`).
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:e}", value);
    if let Some((mantissa, exp)) = scientific.split_once('e') {
        if let Ok(exp) = exp.parse::<i32>() {
            if !(-4..16).contains(&exp) {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exp.abs());
            }
        }
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

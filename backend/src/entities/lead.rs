// src/entities/lead.rs

use crate::db::models::Lead;

use super::{
    format_float, Access, Entity, FieldSpec, FieldValue, FormData, InputKind, ValidationErrors,
    Writable,
};

/// Validated lead. Blank optional inputs are `None`, never "".
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub amount: Option<f64>,
    pub probability: Option<f64>,
}

impl Writable for LeadRecord {
    fn into_values(self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.title),
            FieldValue::OptText(self.start_date),
            FieldValue::OptText(self.end_date),
            FieldValue::OptReal(self.amount),
            FieldValue::OptReal(self.probability),
        ]
    }
}

fn optional_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Blank -> `Ok(None)`. Anything else must parse as a finite float.
fn optional_float(raw: &str) -> Result<Option<f64>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(()),
    }
}

/// Messages come out in field order: title, amount, probability.
pub fn validate_lead(form: &FormData) -> Result<LeadRecord, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = form.get("title");
    if title.is_empty() {
        errors.push("Title is required.");
    }

    let amount = optional_float(form.get("amount")).unwrap_or_else(|()| {
        errors.push("Invalid amount.");
        None
    });

    let probability = optional_float(form.get("probability")).unwrap_or_else(|()| {
        errors.push("Invalid probability.");
        None
    });

    errors.into_result(|| LeadRecord {
        title: title.to_string(),
        start_date: optional_text(form.get("start_date")),
        end_date: optional_text(form.get("end_date")),
        amount,
        probability,
    })
}

pub struct LeadEntity;

impl Entity for LeadEntity {
    type Row = Lead;
    type Record = LeadRecord;

    const LABEL: &'static str = "Lead";
    const PLURAL: &'static str = "Leads";
    const TABLE: &'static str = "lead";
    const PATH: &'static str = "/lead";
    const COLUMNS: &'static str = "id, title, start_date, end_date, amount, probability";
    const ORDER_BY: &'static str = "id DESC";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "Title", InputKind::Text).required(),
        FieldSpec::new("start_date", "Start Date", InputKind::Date),
        FieldSpec::new("end_date", "End Date", InputKind::Date),
        FieldSpec::new("amount", "Amount", InputKind::Decimal),
        FieldSpec::new("probability", "Probability", InputKind::Decimal),
    ];
    const ACCESS: Access = Access::LoginRequired;

    const NEW_LINK: &'static str = "Add Lead";
    const EMPTY_TEXT: &'static str = "No leads found.";

    fn validate(form: &FormData) -> Result<LeadRecord, ValidationErrors> {
        validate_lead(form)
    }

    fn id(row: &Lead) -> i64 {
        row.id
    }

    fn cell(row: &Lead, field: &str) -> String {
        match field {
            "title" => row.title.clone(),
            "start_date" => row.start_date.clone().unwrap_or_default(),
            "end_date" => row.end_date.clone().unwrap_or_default(),
            "amount" => row.amount.map(format_float).unwrap_or_default(),
            "probability" => row.probability.map(format_float).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().copied().collect()
    }

    fn lead_form(amount: &str, probability: &str) -> FormData {
        form(&[
            ("title", "Validation Test"),
            ("start_date", "2024-05-01"),
            ("end_date", "2024-05-31"),
            ("amount", amount),
            ("probability", probability),
        ])
    }

    #[test]
    fn test_valid_lead() {
        let record = validate_lead(&lead_form("100.50", "0.5")).unwrap();

        assert_eq!(record.title, "Validation Test");
        assert_eq!(record.start_date.as_deref(), Some("2024-05-01"));
        assert_eq!(record.amount, Some(100.5));
        assert_eq!(record.probability, Some(0.5));
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let record = validate_lead(&form(&[
            ("title", "Blank"),
            ("start_date", ""),
            ("end_date", ""),
            ("amount", ""),
            ("probability", ""),
        ]))
        .unwrap();

        assert_eq!(record.start_date, None);
        assert_eq!(record.end_date, None);
        assert_eq!(record.amount, None);
        assert_eq!(record.probability, None);
    }

    #[test]
    fn test_missing_optionals_become_none() {
        let record = validate_lead(&form(&[("title", "Only Title")])).unwrap();
        assert_eq!(record.amount, None);
        assert_eq!(record.end_date, None);
    }

    #[test]
    fn test_numeric_error_messages() {
        let cases = [
            ("abc", "0.5", "Invalid amount."),
            ("100", "xyz", "Invalid probability."),
            ("abc", "xyz", "Invalid amount. Invalid probability."),
        ];

        for (amount, probability, expected) in cases {
            let err = validate_lead(&lead_form(amount, probability)).unwrap_err();
            assert_eq!(err.to_string(), expected, "amount={amount} probability={probability}");
        }
    }

    #[test]
    fn test_title_error_comes_first() {
        let err = validate_lead(&form(&[("title", ""), ("amount", "lots")])).unwrap_err();
        assert_eq!(err.to_string(), "Title is required. Invalid amount.");
    }

    #[test]
    fn test_float_parsing_edges() {
        assert_eq!(optional_float(" 1000.50 "), Ok(Some(1000.5)));
        assert_eq!(optional_float("1e3"), Ok(Some(1000.0)));
        assert_eq!(optional_float("   "), Err(()));
        assert_eq!(optional_float("inf"), Err(()));
        assert_eq!(optional_float("NaN"), Err(()));
    }

    #[test]
    fn test_cells_render_like_the_listing() {
        let row = Lead {
            id: 1,
            title: "E2E Test Lead".into(),
            start_date: Some("2024-01-01".into()),
            end_date: None,
            amount: Some(1000.5),
            probability: Some(1.0),
        };

        assert_eq!(LeadEntity::cell(&row, "amount"), "1000.5");
        assert_eq!(LeadEntity::cell(&row, "probability"), "1.0");
        assert_eq!(LeadEntity::cell(&row, "end_date"), "");
    }

    #[test]
    fn test_failed_update_keeps_stored_values_for_blank_fields() {
        let existing = Lead {
            id: 3,
            title: "Stored".into(),
            start_date: Some("2024-01-10".into()),
            end_date: Some("2024-01-20".into()),
            amount: Some(500.0),
            probability: Some(0.25),
        };
        let submitted = form(&[("title", ""), ("amount", "bogus")]);

        let merged = LeadEntity::merge_submitted(&existing, &submitted);

        assert_eq!(merged.get("title"), "Stored");
        assert_eq!(merged.get("amount"), "bogus");
        assert_eq!(merged.get("probability"), "0.25");
    }
}

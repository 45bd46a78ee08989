use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]{1,100}$").unwrap());
static NATIONAL_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13}$").unwrap());
static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6,20}$").unwrap());
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d{1,2})?$").unwrap());
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());
static SWIFT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{8}([A-Z0-9]{3})?$").unwrap());
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").unwrap());
static EMPLOYEE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^EMP\d{6}$").unwrap());

const PROVIDERS: &[&str] = &["SWIFT"];
const PASSWORD_MIN_LEN: usize = 10;
const NOTES_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    PersonName,
    NationalId,
    AccountNumber,
    Password,
    Amount,
    CurrencyCode,
    SwiftCode,
    StaffUsername,
    EmployeeId,
    Provider,
    Notes,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

/// Checks every field against its whitelist pattern. Either the whole
/// mapping normalizes or the whole call fails with the full violation list.
pub fn validate_fields(
    fields: &[(&str, FieldKind, &str)],
) -> Result<HashMap<String, String>, Vec<FieldViolation>> {
    let mut normalized = HashMap::new();
    let mut violations = Vec::new();

    for (name, kind, raw) in fields {
        match check_field(*kind, raw) {
            Ok(value) => {
                normalized.insert((*name).to_string(), value);
            }
            Err(reason) => violations.push(FieldViolation {
                field: (*name).to_string(),
                reason,
            }),
        }
    }

    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(violations)
    }
}

fn check_field(kind: FieldKind, raw: &str) -> Result<String, String> {
    // Passwords are taken verbatim; everything else is trimmed first.
    if kind == FieldKind::Password {
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(format!("must be at least {PASSWORD_MIN_LEN} characters"));
        }
        return Ok(raw.to_string());
    }

    let value = raw.trim();
    let ok = match kind {
        FieldKind::PersonName => NAME_RE.is_match(value),
        FieldKind::NationalId => NATIONAL_ID_RE.is_match(value),
        FieldKind::AccountNumber => ACCOUNT_RE.is_match(value),
        FieldKind::Amount => AMOUNT_RE.is_match(value),
        FieldKind::CurrencyCode => CURRENCY_RE.is_match(value),
        FieldKind::SwiftCode => SWIFT_RE.is_match(value),
        FieldKind::StaffUsername => USERNAME_RE.is_match(value),
        FieldKind::EmployeeId => EMPLOYEE_ID_RE.is_match(value),
        FieldKind::Provider => PROVIDERS.contains(&value),
        FieldKind::Notes => value.chars().count() <= NOTES_MAX_LEN,
        FieldKind::Password => unreachable!(),
    };

    if ok {
        Ok(value.to_string())
    } else {
        Err(reason_for(kind))
    }
}

fn reason_for(kind: FieldKind) -> String {
    match kind {
        FieldKind::PersonName => "letters and whitespace only, 1-100 characters",
        FieldKind::NationalId => "must be exactly 13 digits",
        FieldKind::AccountNumber => "must be 6-20 digits",
        FieldKind::Amount => "must be a non-negative amount with at most 2 decimal places",
        FieldKind::CurrencyCode => "must be a 3-letter uppercase currency code",
        FieldKind::SwiftCode => "must be 8 or 11 uppercase alphanumeric characters",
        FieldKind::StaffUsername => "alphanumeric and underscore only, 3-20 characters",
        FieldKind::EmployeeId => "must be EMP followed by 6 digits",
        FieldKind::Provider => "unsupported settlement provider",
        FieldKind::Notes => "must be at most 500 characters",
        FieldKind::Password => "must be at least 10 characters",
    }
    .to_string()
}

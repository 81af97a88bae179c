//! Team-scoped "thing" records and their input forms

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::repository::{FieldValue, OrderTerm, Record};

/// Maximum length of [`Thing::name`], in characters
pub const NAME_MAX_CHARS: usize = 200;

/// Maximum length of [`Thing::notes`] and [`Thing::more_notes`], in characters
pub const NOTES_MAX_CHARS: usize = 4096;

/// Maximum length of [`Thing::email`], in characters
pub const EMAIL_MAX_CHARS: usize = 254;

/// Format of [`Thing::birthdate`] in forms and JSON
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Value of [`Thing::locked1`] on every new record
pub const LOCKED1_DEFAULT: &str = "You cannot set this";

/// Value of [`Thing::locked2`] on every new record
pub const LOCKED2_DEFAULT: &str = "You cannot set this either";

/// Ordering applied when a listing asks for none, and used to break ties
pub const DEFAULT_ORDERING: &[OrderTerm] = &[OrderTerm::ascending("name")];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email regex is valid")
});

/// A record owned by one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thing {
    pub id: i64,
    /// Slug of the owning team
    pub team: String,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    /// Empty when not given
    pub email: String,
    pub extra: bool,
    pub number: i64,
    pub notes: String,
    pub more_notes: String,
    /// Set by the store on create; forms and the API never change it
    pub locked1: String,
    pub locked2: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thing {
    /// Path of the detail page
    #[must_use]
    pub fn absolute_url(&self) -> String {
        format!("/teams/{}/things/{}", self.team, self.id)
    }
}

impl std::fmt::Display for Thing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl Record for Thing {
    fn scope(&self) -> &str {
        &self.team
    }

    fn record_id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Integer(self.id)),
            "name" => Some(FieldValue::Text(&self.name)),
            "email" => Some(FieldValue::Text(&self.email)),
            "number" => Some(FieldValue::Integer(self.number)),
            "notes" => Some(FieldValue::Text(&self.notes)),
            _ => None,
        }
    }
}

/// Validated editable fields of a [`Thing`]
///
/// Used for both create and update; the store fills in id, team, the locked
/// fields and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingInput {
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub email: String,
    pub extra: bool,
    pub number: i64,
    pub notes: String,
    pub more_notes: String,
}

impl ThingInput {
    /// A named input with every other field at its default
    #[must_use]
    pub fn new(name: impl Into<String>, number: i64) -> Self {
        Self {
            name: name.into(),
            birthdate: None,
            email: String::new(),
            extra: true,
            number,
            notes: String::new(),
            more_notes: String::new(),
        }
    }
}

/// Field name to error messages, in field order
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// Raw HTML form submission; every field arrives as text
///
/// `extra` is a checkbox: browsers leave it out entirely when unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThingForm {
    pub name: String,
    pub birthdate: String,
    pub email: String,
    pub extra: Option<String>,
    pub number: String,
    pub notes: String,
    pub more_notes: String,
}

impl ThingForm {
    /// Values an empty create form starts from
    #[must_use]
    pub fn initial() -> Self {
        Self {
            extra: Some("on".to_string()),
            ..Self::default()
        }
    }

    /// Prefill the form from an existing record
    #[must_use]
    pub fn from_thing(thing: &Thing) -> Self {
        Self {
            name: thing.name.clone(),
            birthdate: thing
                .birthdate
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            email: thing.email.clone(),
            extra: thing.extra.then(|| "on".to_string()),
            number: thing.number.to_string(),
            notes: thing.notes.clone(),
            more_notes: thing.more_notes.clone(),
        }
    }

    #[must_use]
    pub fn extra_checked(&self) -> bool {
        self.extra.is_some()
    }

    /// Validate and convert into [`ThingInput`]
    ///
    /// Text fields are trimmed. An empty number means the default, 0.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its messages.
    pub fn validate(&self) -> Result<ThingInput, FieldErrors> {
        let mut errors = FieldErrors::new();

        let number_text = self.number.trim();
        let number = if number_text.is_empty() {
            0
        } else {
            number_text.parse::<i64>().unwrap_or_else(|_| {
                push_error(&mut errors, "number", "Enter a whole number.");
                0
            })
        };

        let input = check_fields(
            ThingInput {
                name: self.name.trim().to_string(),
                birthdate: None,
                email: self.email.trim().to_string(),
                extra: self.extra_checked(),
                number,
                notes: self.notes.trim().to_string(),
                more_notes: self.more_notes.trim().to_string(),
            },
            &self.birthdate,
            &mut errors,
        );

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors)
        }
    }
}

/// JSON request body for the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThingPayload {
    pub name: String,
    /// `YYYY-MM-DD`; checked with the other fields so a bad date is a
    /// field error rather than a rejected body
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_extra")]
    pub extra: bool,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub more_notes: String,
}

fn default_extra() -> bool {
    true
}

impl ThingPayload {
    /// # Errors
    ///
    /// Returns every failing field with its messages.
    pub fn validate(self) -> Result<ThingInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let input = check_fields(
            ThingInput {
                name: self.name.trim().to_string(),
                birthdate: None,
                email: self.email.trim().to_string(),
                extra: self.extra,
                number: self.number,
                notes: self.notes.trim().to_string(),
                more_notes: self.more_notes.trim().to_string(),
            },
            self.birthdate.as_deref().unwrap_or_default(),
            &mut errors,
        );

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors)
        }
    }
}

/// API representation of a [`Thing`]; the locked fields are read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingData {
    pub id: i64,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub email: String,
    pub extra: bool,
    pub number: i64,
    pub notes: String,
    pub more_notes: String,
    pub locked1: String,
    pub locked2: String,
}

impl From<Thing> for ThingData {
    fn from(thing: Thing) -> Self {
        Self {
            id: thing.id,
            name: thing.name,
            birthdate: thing.birthdate,
            email: thing.email,
            extra: thing.extra,
            number: thing.number,
            notes: thing.notes,
            more_notes: thing.more_notes,
            locked1: thing.locked1,
            locked2: thing.locked2,
        }
    }
}

/// Check the trimmed text fields of `input` and parse `birthdate` into it
fn check_fields(mut input: ThingInput, birthdate: &str, errors: &mut FieldErrors) -> ThingInput {
    if input.name.is_empty() {
        push_error(errors, "name", "This field is required.");
    } else {
        check_length(&input.name, NAME_MAX_CHARS, "name", errors);
    }

    let birthdate = birthdate.trim();
    if !birthdate.is_empty() {
        match NaiveDate::parse_from_str(birthdate, DATE_FORMAT) {
            Ok(date) => input.birthdate = Some(date),
            Err(_) => push_error(errors, "birthdate", "Enter a valid date."),
        }
    }

    if !input.email.is_empty() {
        if input.email.chars().count() > EMAIL_MAX_CHARS {
            check_length(&input.email, EMAIL_MAX_CHARS, "email", errors);
        } else if !EMAIL_REGEX.is_match(&input.email) {
            push_error(errors, "email", "Enter a valid email address.");
        }
    }

    check_length(&input.notes, NOTES_MAX_CHARS, "notes", errors);
    check_length(&input.more_notes, NOTES_MAX_CHARS, "more_notes", errors);
    input
}

fn check_length(value: &str, max: usize, field: &'static str, errors: &mut FieldErrors) {
    if value.chars().count() > max {
        push_error(
            errors,
            field,
            format!("Ensure this value has at most {max} characters."),
        );
    }
}

fn push_error(errors: &mut FieldErrors, field: &'static str, message: impl Into<String>) {
    errors.entry(field).or_default().push(message.into());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, number: &str, notes: &str) -> ThingForm {
        ThingForm {
            name: name.to_string(),
            number: number.to_string(),
            notes: notes.to_string(),
            ..ThingForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let input = form("  Widget ", "7", "").validate().unwrap();
        assert_eq!(input.name, "Widget");
        assert_eq!(input.number, 7);
        assert!(input.notes.is_empty());
        assert!(input.birthdate.is_none());
        assert!(!input.extra);
    }

    #[test]
    fn test_empty_number_defaults_to_zero() {
        assert_eq!(form("Widget", "", "").validate().unwrap().number, 0);
    }

    #[test]
    fn test_name_required() {
        let errors = form("   ", "1", "").validate().unwrap_err();
        assert_eq!(errors["name"], vec!["This field is required.".to_string()]);
    }

    #[test]
    fn test_name_too_long() {
        let errors = form(&"x".repeat(201), "1", "").validate().unwrap_err();
        assert!(errors["name"][0].contains("200"));
        assert!(form(&"x".repeat(200), "1", "").validate().is_ok());
    }

    #[test]
    fn test_number_must_be_integer() {
        let errors = form("Widget", "1.5", "").validate().unwrap_err();
        assert!(errors.contains_key("number"));
        assert!(!errors.contains_key("name"));
    }

    #[test]
    fn test_notes_limit() {
        let errors = form("Widget", "1", &"n".repeat(4097)).validate().unwrap_err();
        assert!(errors.contains_key("notes"));

        let more = ThingForm {
            more_notes: "n".repeat(4097),
            ..form("Widget", "1", "")
        };
        assert!(more.validate().unwrap_err().contains_key("more_notes"));
    }

    #[test]
    fn test_all_errors_reported() {
        let errors = form("", "abc", &"n".repeat(5000)).validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_birthdate() {
        let ok = ThingForm {
            birthdate: " 1990-04-01 ".to_string(),
            ..form("Widget", "1", "")
        };
        assert_eq!(
            ok.validate().unwrap().birthdate,
            NaiveDate::from_ymd_opt(1990, 4, 1)
        );

        for bad in ["01/04/1990", "1990-02-30", "soon"] {
            let form = ThingForm {
                birthdate: bad.to_string(),
                ..form("Widget", "1", "")
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(errors["birthdate"], vec!["Enter a valid date.".to_string()], "{bad}");
        }
    }

    #[test]
    fn test_email() {
        for good in ["", "a@example.com", "first.last+tag@mail.example.org"] {
            let form = ThingForm {
                email: good.to_string(),
                ..form("Widget", "1", "")
            };
            assert!(form.validate().is_ok(), "{good}");
        }

        for bad in ["nobody", "a@b", "a b@example.com", "a@@example.com", "a@example."] {
            let form = ThingForm {
                email: bad.to_string(),
                ..form("Widget", "1", "")
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(errors["email"], vec!["Enter a valid email address.".to_string()], "{bad}");
        }

        let long = ThingForm {
            email: format!("{}@example.com", "a".repeat(250)),
            ..form("Widget", "1", "")
        };
        assert!(long.validate().unwrap_err()["email"][0].contains("254"));
    }

    #[test]
    fn test_extra_checkbox() {
        let checked = ThingForm {
            extra: Some("on".to_string()),
            ..form("Widget", "1", "")
        };
        assert!(checked.validate().unwrap().extra);
        assert!(ThingForm::initial().extra_checked());
        assert!(!ThingForm::default().extra_checked());
    }

    #[test]
    fn test_form_from_thing_round_trips() {
        let now = Utc::now();
        let thing = Thing {
            id: 1,
            team: "acme".to_string(),
            name: "Widget".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2001, 12, 31),
            email: "w@example.com".to_string(),
            extra: false,
            number: 4,
            notes: "a".to_string(),
            more_notes: "b".to_string(),
            locked1: LOCKED1_DEFAULT.to_string(),
            locked2: LOCKED2_DEFAULT.to_string(),
            created_at: now,
            updated_at: now,
        };
        let form = ThingForm::from_thing(&thing);
        assert_eq!(form.birthdate, "2001-12-31");
        assert!(!form.extra_checked());

        let input = form.validate().unwrap();
        assert_eq!(input.birthdate, thing.birthdate);
        assert_eq!(input.email, thing.email);
        assert_eq!(input.more_notes, "b");
    }

    #[test]
    fn test_payload_defaults() {
        let payload: ThingPayload = serde_json::from_str(r#"{"name":"Gizmo"}"#).unwrap();
        let input = payload.validate().unwrap();
        assert_eq!(input, ThingInput::new("Gizmo", 0));
        assert!(input.extra);
    }

    #[test]
    fn test_payload_field_errors() {
        let payload: ThingPayload = serde_json::from_str(
            r#"{"name":"Gizmo","birthdate":"31/12/2001","email":"nope"}"#,
        )
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.contains_key("birthdate"));
        assert!(errors.contains_key("email"));
        assert!(!errors.contains_key("name"));
    }

    #[test]
    fn test_record_fields() {
        let now = Utc::now();
        let thing = Thing {
            id: 3,
            team: "acme".to_string(),
            name: "Widget".to_string(),
            birthdate: None,
            email: "w@example.com".to_string(),
            extra: true,
            number: 9,
            notes: String::new(),
            more_notes: String::new(),
            locked1: LOCKED1_DEFAULT.to_string(),
            locked2: LOCKED2_DEFAULT.to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(thing.field("name"), Some(FieldValue::Text("Widget")));
        assert_eq!(thing.field("email"), Some(FieldValue::Text("w@example.com")));
        assert_eq!(thing.field("number"), Some(FieldValue::Integer(9)));
        assert_eq!(thing.field("team"), None);
        assert_eq!(thing.absolute_url(), "/teams/acme/things/3");
        assert_eq!(thing.to_string(), "Widget");

        let data = serde_json::to_value(ThingData::from(thing)).unwrap();
        assert_eq!(data["locked2"], LOCKED2_DEFAULT);
        assert_eq!(data["birthdate"], serde_json::Value::Null);
    }
}

// ── Form validation ──
//
// Field-level checks run before any network call. Each validator returns a
// field -> message map; an empty map means the input is valid.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::command::{ShelterDraft, TaskDraft};
use crate::model::{Shelter, ShelterType, Task};

/// Field name -> message.
pub type FieldErrors = BTreeMap<&'static str, String>;

static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{5}(-\d{4})?$").expect("ZIP regex is valid")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?([0-9]{3})\)?[-. ]?([0-9]{3})[-. ]?([0-9]{4})$")
        .expect("phone regex is valid")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email regex is valid")
});

const REQUIRED: &str = "This field is required";

fn min_len(errors: &mut FieldErrors, field: &'static str, value: &str, min: usize, message: &str) {
    if value.trim().chars().count() < min {
        errors.insert(field, message.to_owned());
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

pub fn is_valid_zip(value: &str) -> bool {
    ZIP_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Parse a non-negative bed count, recording a message on failure.
fn bed_count(errors: &mut FieldErrors, field: &'static str, raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, REQUIRED.into());
        return None;
    }
    match raw.parse::<i64>() {
        Ok(n) if n < 0 => {
            errors.insert(field, "Must be positive".into());
            None
        }
        Ok(n) => Some(n),
        Err(_) => {
            errors.insert(field, "Must be a number".into());
            None
        }
    }
}

/// Accepts `2025-04-12T09:30`, `2025-04-12T09:30:00`, or a space separator.
pub fn parse_datetime_input(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// ── Shelter form ───────────────────────────────────────────────────

/// Raw shelter form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShelterForm {
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub latitude: String,
    pub longitude: String,
    pub total_capacity: String,
    pub current_availability: String,
    pub shelter_type: String,
    pub phone: String,
    pub email: String,
    pub operating_organization: String,
    pub description: String,
    pub allows_pets: bool,
    pub allows_partner: bool,
    pub is_active: bool,
}

impl ShelterForm {
    pub fn validate(&self) -> FieldErrors {
        match self.to_draft() {
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors,
        }
    }

    /// Validate and convert into a typed draft.
    pub fn to_draft(&self) -> Result<ShelterDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        min_len(&mut errors, "name", &self.name, 2, "Name must be at least 2 characters");
        min_len(
            &mut errors,
            "addressLine1",
            &self.address_line1,
            5,
            "Address must be at least 5 characters",
        );
        min_len(&mut errors, "city", &self.city, 2, "City must be at least 2 characters");
        if self.state.trim().is_empty() {
            errors.insert("state", REQUIRED.into());
        }
        if !is_valid_zip(self.zip.trim()) {
            errors.insert("zipCode", "Invalid ZIP code format".into());
        }

        let capacity = bed_count(&mut errors, "totalCapacity", &self.total_capacity);
        let availability = bed_count(&mut errors, "currentAvailability", &self.current_availability);
        if let (Some(cap), Some(avail)) = (capacity, availability) {
            if avail > cap {
                errors.insert("currentAvailability", "Cannot exceed total capacity".into());
            }
        }

        let shelter_type = match optional(&self.shelter_type) {
            None => None,
            Some(raw) => {
                let parsed = ShelterType::from_str(&raw.replace([' ', '-'], "_")).ok();
                if parsed.is_none() {
                    errors.insert("shelterType", "Unknown shelter type".into());
                }
                parsed
            }
        };

        let mut coordinate = |field: &'static str, raw: &str| match optional(raw) {
            None => 0.0,
            Some(v) => v.parse::<f64>().unwrap_or_else(|_| {
                errors.insert(field, "Must be a number".into());
                0.0
            }),
        };
        let latitude = coordinate("latitude", &self.latitude);
        let longitude = coordinate("longitude", &self.longitude);

        let phone = optional(&self.phone);
        if phone.as_deref().is_some_and(|p| !is_valid_phone(p)) {
            errors.insert("phone", "Invalid phone number format".into());
        }
        let email = optional(&self.email);
        if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            errors.insert("email", "Invalid email format".into());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ShelterDraft {
            name: self.name.trim().to_owned(),
            address_line1: self.address_line1.trim().to_owned(),
            address_line2: optional(&self.address_line2),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            zip: self.zip.trim().to_owned(),
            latitude,
            longitude,
            total_capacity: capacity.unwrap_or_default(),
            current_availability: availability.unwrap_or_default(),
            shelter_type,
            phone,
            email,
            operating_organization: optional(&self.operating_organization),
            description: optional(&self.description),
            allows_pets: self.allows_pets,
            allows_partner: self.allows_partner,
            is_active: self.is_active,
        })
    }
}

/// Prefill an edit form from a stored shelter.
impl From<&Shelter> for ShelterForm {
    fn from(s: &Shelter) -> Self {
        Self {
            name: s.name.clone(),
            address_line1: s.address.line1.clone(),
            address_line2: s.address.line2.clone().unwrap_or_default(),
            city: s.address.city.clone(),
            state: s.address.state.clone(),
            zip: s.address.zip.clone(),
            latitude: s.latitude.to_string(),
            longitude: s.longitude.to_string(),
            total_capacity: s.total_capacity.to_string(),
            current_availability: s.current_availability.to_string(),
            shelter_type: s.shelter_type.map(|t| t.as_wire().to_owned()).unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
            operating_organization: s.operating_organization.clone().unwrap_or_default(),
            description: s.description.clone().unwrap_or_default(),
            allows_pets: s.allows_pets,
            allows_partner: s.allows_partner,
            is_active: s.active,
        }
    }
}

// ── Task form ──────────────────────────────────────────────────────

/// Raw task form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub scheduled_at: String,
    pub estimated_duration: String,
    pub compensation_details: String,
    pub contact_name: String,
    pub contact_phone: String,
}

impl TaskForm {
    pub fn validate(&self) -> FieldErrors {
        match self.to_draft() {
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors,
        }
    }

    pub fn to_draft(&self) -> Result<TaskDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        min_len(&mut errors, "title", &self.title, 2, "Title must be at least 2 characters");
        min_len(
            &mut errors,
            "description",
            &self.description,
            10,
            "Description must be at least 10 characters",
        );
        min_len(&mut errors, "location", &self.location, 2, "Location must be at least 2 characters");
        min_len(
            &mut errors,
            "estimatedDuration",
            &self.estimated_duration,
            2,
            "Please specify duration",
        );
        min_len(
            &mut errors,
            "compensationDetails",
            &self.compensation_details,
            2,
            "Please specify compensation details",
        );
        min_len(
            &mut errors,
            "taskContactName",
            &self.contact_name,
            2,
            "Contact name must be at least 2 characters",
        );

        let scheduled_at = match optional(&self.scheduled_at) {
            None => None,
            Some(raw) => {
                let parsed = parse_datetime_input(&raw);
                if parsed.is_none() {
                    errors.insert("taskDateTime", "Invalid date/time format".into());
                }
                parsed
            }
        };

        let contact_phone = optional(&self.contact_phone);
        if contact_phone.as_deref().is_some_and(|p| !is_valid_phone(p)) {
            errors.insert("taskContactPhone", "Invalid phone number format".into());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(TaskDraft {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            location: self.location.trim().to_owned(),
            scheduled_at,
            estimated_duration: self.estimated_duration.trim().to_owned(),
            compensation_details: self.compensation_details.trim().to_owned(),
            contact_name: self.contact_name.trim().to_owned(),
            contact_phone,
        })
    }
}

/// Prefill an edit form from a stored task.
impl From<&Task> for TaskForm {
    fn from(t: &Task) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone().unwrap_or_default(),
            location: t.location.clone().unwrap_or_default(),
            scheduled_at: t
                .scheduled_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            estimated_duration: t.estimated_duration.clone().unwrap_or_default(),
            compensation_details: t.compensation_details.clone().unwrap_or_default(),
            contact_name: t.contact_name.clone().unwrap_or_default(),
            contact_phone: t.contact_phone.clone().unwrap_or_default(),
        }
    }
}

/// Render a field-error map as one line per field.
pub fn describe(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shelter_form() -> ShelterForm {
        ShelterForm {
            name: "Casa A".into(),
            address_line1: "123 San Fernando Rd".into(),
            city: "San Jose".into(),
            state: "CA".into(),
            zip: "95112".into(),
            total_capacity: "10".into(),
            current_availability: "1".into(),
            shelter_type: "tiny home".into(),
            is_active: true,
            ..ShelterForm::default()
        }
    }

    #[test]
    fn zip_phone_and_email_patterns() {
        assert!(is_valid_zip("95112"));
        assert!(is_valid_zip("95112-1234"));
        assert!(!is_valid_zip("9511"));
        assert!(is_valid_phone("(408) 555-1234"));
        assert!(is_valid_phone("408.555.1234"));
        assert!(!is_valid_phone("555-1234"));
        assert!(is_valid_email("Case.Worker@Example.org"));
        assert!(!is_valid_email("caseworker@example"));
    }

    #[test]
    fn valid_shelter_form_builds_draft() {
        let draft = shelter_form().to_draft().unwrap();
        assert_eq!(draft.shelter_type, Some(ShelterType::TinyHome));
        assert_eq!(draft.total_capacity, 10);
        assert_eq!(draft.phone, None);
    }

    #[test]
    fn availability_cannot_exceed_capacity() {
        let form = ShelterForm {
            current_availability: "11".into(),
            ..shelter_form()
        };
        let errors = form.validate();
        assert_eq!(
            errors.get("currentAvailability").map(String::as_str),
            Some("Cannot exceed total capacity")
        );
    }

    #[test]
    fn bed_counts_must_be_present_numeric_and_non_negative() {
        let form = ShelterForm {
            total_capacity: String::new(),
            current_availability: "-1".into(),
            ..shelter_form()
        };
        let errors = form.validate();
        assert_eq!(errors["totalCapacity"], REQUIRED);
        assert_eq!(errors["currentAvailability"], "Must be positive");

        let form = ShelterForm {
            total_capacity: "ten".into(),
            ..shelter_form()
        };
        assert_eq!(form.validate()["totalCapacity"], "Must be a number");
    }

    #[test]
    fn short_fields_are_reported_together() {
        let form = ShelterForm {
            name: "A".into(),
            address_line1: "1 A".into(),
            city: " ".into(),
            zip: "abc".into(),
            phone: "12".into(),
            email: "nope".into(),
            ..shelter_form()
        };
        let errors = form.validate();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            vec!["addressLine1", "city", "email", "name", "phone", "zipCode"]
        );
    }

    #[test]
    fn task_form_rules() {
        let form = TaskForm {
            title: "Sort donations".into(),
            description: "Help sort the weekend clothing drive".into(),
            location: "Hope Village".into(),
            scheduled_at: "2025-05-01T09:00".into(),
            estimated_duration: "3 hours".into(),
            compensation_details: "$60".into(),
            contact_name: "Ana".into(),
            contact_phone: String::new(),
        };
        let draft = form.to_draft().unwrap();
        assert!(draft.scheduled_at.is_some());

        let bad = TaskForm {
            description: "short".into(),
            scheduled_at: "soon".into(),
            contact_phone: "12".into(),
            ..form
        };
        let errors = bad.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["description"], "Description must be at least 10 characters");
        assert_eq!(errors["taskDateTime"], "Invalid date/time format");
    }

    #[test]
    fn edit_form_prefilled_from_shelter_is_valid() {
        let draft = shelter_form().to_draft().unwrap();
        let shelter = Shelter {
            id: crate::model::RecordId::Numeric(1),
            name: draft.name.clone(),
            address: crate::model::Address {
                line1: draft.address_line1.clone(),
                line2: None,
                city: draft.city.clone(),
                state: draft.state.clone(),
                zip: draft.zip.clone(),
            },
            latitude: 37.33,
            longitude: -121.89,
            total_capacity: 10,
            current_availability: 1,
            shelter_type: Some(ShelterType::TinyHome),
            allows_pets: false,
            allows_partner: true,
            active: true,
            phone: None,
            email: None,
            operating_organization: None,
            description: None,
            last_updated: None,
        };

        let form = ShelterForm::from(&shelter);
        assert_eq!(form.shelter_type, "TINY_HOME");
        let reparsed = form.to_draft().unwrap();
        assert!((reparsed.latitude - 37.33).abs() < 1e-9);
        assert!(reparsed.allows_partner);
        assert_eq!(reparsed.current_availability, 1);
    }
}

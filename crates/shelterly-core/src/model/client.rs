// ── Client domain types ──

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::record_id::RecordId;

/// Placement status of a service recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum ClientStatus {
    #[default]
    SeekingPlacement,
    Sheltered,
    Inactive,
    PermanentlyHoused,
    Unknown,
}

impl ClientStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::SeekingPlacement => "Seeking placement",
            Self::Sheltered => "Sheltered",
            Self::Inactive => "Inactive",
            Self::PermanentlyHoused => "Permanently housed",
            Self::Unknown => "Unknown",
        }
    }
}

/// A registered service recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: RecordId,
    /// The backend does not echo names back; only set when known locally.
    pub name: Option<String>,
    pub pseudonym: Option<String>,
    pub status: ClientStatus,
    pub current_shelter_id: Option<RecordId>,
    pub current_shelter_name: Option<String>,
    pub registration_date: Option<NaiveDateTime>,
    pub last_activity_date: Option<NaiveDateTime>,
    pub caseworker_notes: Option<String>,
}

impl Client {
    /// Best available label: name, then pseudonym, then `Client #<id>`.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.pseudonym.as_deref())
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| format!("Client #{}", self.id), ToOwned::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: Option<&str>, pseudonym: Option<&str>) -> Client {
        Client {
            id: RecordId::Numeric(42),
            name: name.map(Into::into),
            pseudonym: pseudonym.map(Into::into),
            status: ClientStatus::default(),
            current_shelter_id: None,
            current_shelter_name: None,
            registration_date: None,
            last_activity_date: None,
            caseworker_notes: None,
        }
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(client(Some("J. Doe"), None).display_name(), "J. Doe");
        assert_eq!(client(None, Some("Blue Jay")).display_name(), "Blue Jay");
        assert_eq!(client(None, None).display_name(), "Client #42");
    }
}

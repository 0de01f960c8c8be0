// ── Shelter domain types ──

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::record_id::RecordId;

/// Availability below this share of capacity is flagged (cosmetic only).
pub const LOW_AVAILABILITY_PERCENT: i64 = 25;

/// Shelter category, a fixed enumeration owned by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ShelterType {
    Congregate,
    TinyHome,
    SafeParking,
    MotelConversion,
    NavigationCenter,
    Other,
}

impl ShelterType {
    /// Wire value (e.g. `"TINY_HOME"`).
    pub fn as_wire(self) -> &'static str {
        self.into()
    }

    /// Human label (e.g. `"Tiny Home"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Congregate => "Congregate",
            Self::TinyHome => "Tiny Home",
            Self::SafeParking => "Safe Parking",
            Self::MotelConversion => "Motel Conversion",
            Self::NavigationCenter => "Navigation Center",
            Self::Other => "Other",
        }
    }
}

/// Postal address of a shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    /// One-line rendering: `"123 Main St, San Jose, CA 95112"`.
    pub fn one_line(&self) -> String {
        let mut out = self.line1.clone();
        if let Some(ref l2) = self.line2 {
            if !l2.is_empty() {
                out.push_str(", ");
                out.push_str(l2);
            }
        }
        format!("{out}, {}, {} {}", self.city, self.state, self.zip)
    }
}

/// The canonical Shelter type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    pub id: RecordId,
    pub name: String,
    pub address: Address,
    /// Carried for map collaborators; not rendered by this console.
    pub latitude: f64,
    pub longitude: f64,
    pub total_capacity: i64,
    pub current_availability: i64,
    pub shelter_type: Option<ShelterType>,
    pub allows_pets: bool,
    pub allows_partner: bool,
    pub active: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub operating_organization: Option<String>,
    pub description: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
}

impl Shelter {
    /// Whether `0 <= availability <= capacity` holds.
    pub fn availability_consistent(&self) -> bool {
        self.total_capacity >= 0
            && self.current_availability >= 0
            && self.current_availability <= self.total_capacity
    }

    /// At least one bed free.
    pub fn has_availability(&self) -> bool {
        self.current_availability > 0
    }

    /// Availability strictly below [`LOW_AVAILABILITY_PERCENT`] of capacity.
    ///
    /// Widened to i128 so out-of-contract counts cannot overflow.
    pub fn is_low_availability(&self) -> bool {
        i128::from(self.current_availability) * 100
            < i128::from(self.total_capacity) * i128::from(LOW_AVAILABILITY_PERCENT)
    }

    /// Share of beds in use, 0.0..=1.0 (None when capacity is not positive).
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn occupancy_rate(&self) -> Option<f64> {
        (self.total_capacity > 0).then(|| {
            let used = self
                .total_capacity
                .saturating_sub(self.current_availability)
                .clamp(0, self.total_capacity);
            used as f64 / self.total_capacity as f64
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::EnumIter;
use uuid::Uuid;

use crate::shared::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Key used in the `openingHours` object
    pub fn key(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

/// Open/close times for a single day, kept as free-form strings ("09:00")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

impl OpeningHours {
    pub fn day(&self, day: Weekday) -> Option<&DayHours> {
        match day {
            Weekday::Monday => self.monday.as_ref(),
            Weekday::Tuesday => self.tuesday.as_ref(),
            Weekday::Wednesday => self.wednesday.as_ref(),
            Weekday::Thursday => self.thursday.as_ref(),
            Weekday::Friday => self.friday.as_ref(),
            Weekday::Saturday => self.saturday.as_ref(),
            Weekday::Sunday => self.sunday.as_ref(),
        }
    }

    pub fn set_day(&mut self, day: Weekday, hours: Option<DayHours>) {
        let slot = match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        };
        *slot = hours;
    }
}

/// The client-writable part of a café, as accepted by schema validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub menu: Vec<String>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
}

/// Stored café record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeModel {
    pub id: String, // UUID v4 as string
    #[serde(flatten)]
    pub details: CafeDetails,
    pub created_by: String, // Owner's user ID
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CafeModel {
    /// Creates a new café owned by `created_by` with generated ID and timestamps
    pub fn new(details: CafeDetails, created_by: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            details,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Writable fields as a JSON object, the base a partial update is merged onto
    pub fn to_document(&self) -> Map<String, Value> {
        match serde_json::to_value(&self.details) {
            Ok(Value::Object(document)) => document,
            _ => Map::new(),
        }
    }

    /// Replaces the writable fields and bumps `updated_at`
    pub fn apply(&mut self, details: CafeDetails) {
        self.details = details;
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }
}

/// Parses a path identifier into its canonical form
pub fn parse_id(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidId)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    pub fn sample_details() -> CafeDetails {
        let mut opening_hours = OpeningHours::default();
        opening_hours.set_day(
            Weekday::Monday,
            Some(DayHours {
                open: Some("09:00".to_string()),
                close: Some("18:00".to_string()),
            }),
        );

        CafeDetails {
            name: "Test Cafe".to_string(),
            description: None,
            latitude: 40.7484,
            longitude: -73.9857,
            address: "123 Test St".to_string(),
            phone: "1234567890".to_string(),
            menu: vec!["Coffee".to_string(), "Tea".to_string()],
            opening_hours,
        }
    }

    #[test]
    fn test_new_cafe_model() {
        let cafe = CafeModel::new(sample_details(), "owner-1".to_string());

        assert!(Uuid::parse_str(&cafe.id).is_ok());
        assert_eq!(cafe.created_at, cafe.updated_at);
        assert!(cafe.is_owned_by("owner-1"));
        assert!(!cafe.is_owned_by("owner-2"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let cafe = CafeModel::new(sample_details(), "owner-1".to_string());
        let json = serde_json::to_value(&cafe).unwrap();

        assert_eq!(json["createdBy"], "owner-1");
        assert_eq!(json["openingHours"]["monday"]["open"], "09:00");
        assert!(json["openingHours"].get("tuesday").is_none());
        assert!(json.get("description").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_document_holds_only_writable_fields() {
        let cafe = CafeModel::new(sample_details(), "owner-1".to_string());
        let document = cafe.to_document();

        assert_eq!(document["name"], "Test Cafe");
        assert!(document.get("id").is_none());
        assert!(document.get("createdBy").is_none());
    }

    #[test]
    fn test_apply_bumps_updated_at() {
        let mut cafe = CafeModel::new(sample_details(), "owner-1".to_string());
        let created_at = cafe.created_at;

        let mut details = sample_details();
        details.name = "Renamed".to_string();
        cafe.apply(details);

        assert_eq!(cafe.details.name, "Renamed");
        assert_eq!(cafe.created_at, created_at);
        assert!(cafe.updated_at >= created_at);
    }

    #[test]
    fn test_weekday_keys_cover_the_week() {
        let keys: Vec<&str> = Weekday::iter().map(|day| day.key()).collect();
        assert_eq!(keys.len(), 7);
        assert_eq!(keys.first(), Some(&"monday"));
        assert_eq!(keys.last(), Some(&"sunday"));
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(parse_id(&id).unwrap(), id);
        assert!(matches!(
            parse_id("notavalidobjectid"),
            Err(AppError::InvalidId)
        ));
    }
}

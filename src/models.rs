use crate::catalog::Catalogs;
use crate::form::FormState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A mood score on the 1..=5 scale. The only way to build one is through
/// `TryFrom<u8>` or `clamped`, so out-of-range values never reach an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const NEUTRAL: Rating = Rating(3);

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingOutOfRange(pub u8);

impl fmt::Display for RatingOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rating {} is outside {}..={}",
            self.0,
            Rating::MIN,
            Rating::MAX
        )
    }
}

impl std::error::Error for RatingOutOfRange {}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub rating: Rating,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub places: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Activity,
    Place,
    Event,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 3] = [Self::Activity, Self::Place, Self::Event];

    /// Key the catalog is persisted under.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Activity => "activities",
            Self::Place => "places",
            Self::Event => "events",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Activity => "Activities",
            Self::Place => "Places",
            Self::Event => "Events",
        }
    }

    /// Accepts both the singular form and the storage key.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "activity" | "activities" => Some(Self::Activity),
            "place" | "places" => Some(Self::Place),
            "event" | "events" => Some(Self::Event),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Place => "place",
            Self::Event => "event",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodCategory {
    Low,
    Neutral,
    High,
}

impl MoodCategory {
    pub const ALL: [MoodCategory; 3] = [Self::Low, Self::Neutral, Self::High];

    pub fn from_rating(rating: Rating) -> Self {
        match rating.value() {
            0..=2 => Self::Low,
            3 => Self::Neutral,
            _ => Self::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Neutral => "Neutral",
            Self::High => "High",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#ef4444",
            Self::Neutral => "#f59e0b",
            Self::High => "#10b981",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl BarSeries {
    /// Zero marks an empty bucket, so any non-zero value means there is
    /// something to draw.
    pub fn has_data(&self) -> bool {
        self.values.iter().any(|value| *value > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: MoodCategory,
    pub label: &'static str,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub period: Period,
    pub bar: BarSeries,
    pub categories: Vec<CategoryCount>,
    pub has_bar_data: bool,
    pub has_category_data: bool,
    pub recent: Vec<MoodEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ChartsQuery {
    pub period: Option<Period>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub tab: Option<String>,
    pub period: Option<Period>,
    pub saved: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct AddLabelRequest {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub entry_count: usize,
    pub catalogs: Catalogs,
    pub form: FormState,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub entry: MoodEntry,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct RatingForm {
    pub rating: i64,
}

#[derive(Debug, Deserialize)]
pub struct DateForm {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesForm {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct LabelForm {
    pub kind: String,
    #[serde(default)]
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_rejects_out_of_range_values() {
        assert!(Rating::try_from(0).is_err());
        assert!(Rating::try_from(6).is_err());
        assert_eq!(Rating::try_from(5).unwrap().value(), 5);
    }

    #[test]
    fn rating_clamps_into_scale() {
        assert_eq!(Rating::clamped(-4).value(), 1);
        assert_eq!(Rating::clamped(42).value(), 5);
        assert_eq!(Rating::clamped(2).value(), 2);
    }

    #[test]
    fn rating_deserialization_enforces_range() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }

    #[test]
    fn every_rating_maps_to_exactly_one_category() {
        let categories: Vec<_> = Rating::all().map(MoodCategory::from_rating).collect();
        assert_eq!(
            categories,
            vec![
                MoodCategory::Low,
                MoodCategory::Low,
                MoodCategory::Neutral,
                MoodCategory::High,
                MoodCategory::High,
            ]
        );
    }

    #[test]
    fn catalog_kind_parses_singular_and_plural() {
        assert_eq!(CatalogKind::parse("place"), Some(CatalogKind::Place));
        assert_eq!(CatalogKind::parse("events"), Some(CatalogKind::Event));
        assert_eq!(CatalogKind::parse("mood"), None);
    }

    #[test]
    fn entry_reads_iso_timestamps_with_millis() {
        let raw = r#"{"id":"1714557600000","date":"2024-05-01T10:00:00.000Z","rating":4,
            "activities":["Read"],"places":[],"events":[],"notes":""}"#;
        let entry: MoodEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.rating.value(), 4);
        assert_eq!(entry.date.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }
}

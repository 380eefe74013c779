//! Photo-documented progress entries.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{PrivacySettings, VerificationData};
use crate::error::TrackerError;

/// A 1-5 star self-assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Renders as filled then empty stars, e.g. `★★★☆☆`.
    #[must_use]
    pub fn stars(self) -> String {
        let filled = usize::from(self.0);
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

impl TryFrom<u8> for Rating {
    type Error = TrackerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TrackerError::InvalidRating(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Severity of a reported complication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplicationSeverity {
    #[default]
    None,
    Mild,
    Moderate,
    Severe,
}

impl ComplicationSeverity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl std::str::FromStr for ComplicationSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// A complication observed at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complication {
    pub severity: ComplicationSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub reported_to_provider: bool,
}

/// Aftercare adherence log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterCareLog {
    pub followed_instructions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities_avoided: Vec<String>,
}

/// One photo observation tied to a procedure.
///
/// Built only by [`crate::pipeline::EntryAssembler`], which derives `verified`
/// and `days_since_procedure`. Immutable afterwards. Loading recomputes
/// `verified` from the stored capture method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredEntry")]
pub struct ProgressEntry {
    id: Uuid,
    procedure_id: Uuid,
    /// Data URL of the unmodified capture.
    photo_original: String,
    /// Data URL of the redacted capture.
    photo_protected: String,
    privacy_settings: PrivacySettings,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    /// Frozen at save time.
    days_since_procedure: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<Rating>,
    verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verification: Option<VerificationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    after_care: Option<AfterCareLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    complication: Option<Complication>,
}

/// Persisted shape of an entry. A stored `verified` flag is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: Uuid,
    procedure_id: Uuid,
    photo_original: String,
    photo_protected: String,
    privacy_settings: PrivacySettings,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    days_since_procedure: i64,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    rating: Option<Rating>,
    #[serde(default)]
    verification: Option<VerificationData>,
    #[serde(default)]
    after_care: Option<AfterCareLog>,
    #[serde(default)]
    complication: Option<Complication>,
}

impl From<StoredEntry> for ProgressEntry {
    fn from(stored: StoredEntry) -> Self {
        let verified = stored
            .verification
            .as_ref()
            .is_some_and(|v| v.capture_method.is_verified());
        Self {
            id: stored.id,
            procedure_id: stored.procedure_id,
            photo_original: stored.photo_original,
            photo_protected: stored.photo_protected,
            privacy_settings: stored.privacy_settings,
            timestamp: stored.timestamp,
            days_since_procedure: stored.days_since_procedure,
            notes: stored.notes,
            rating: stored.rating,
            verified,
            verification: stored.verification,
            after_care: stored.after_care,
            complication: stored.complication,
        }
    }
}

/// Field values for a new entry, in the order the assembler consumes them.
pub(crate) struct EntryParts {
    pub procedure_id: Uuid,
    pub photo_original: String,
    pub photo_protected: String,
    pub privacy_settings: PrivacySettings,
    pub timestamp: OffsetDateTime,
    pub days_since_procedure: i64,
    pub notes: Option<String>,
    pub rating: Option<Rating>,
    pub verification: VerificationData,
    pub after_care: Option<AfterCareLog>,
    pub complication: Option<Complication>,
}

impl ProgressEntry {
    pub(crate) fn from_parts(parts: EntryParts) -> Self {
        let verified = parts.verification.capture_method.is_verified();
        Self {
            id: Uuid::new_v4(),
            procedure_id: parts.procedure_id,
            photo_original: parts.photo_original,
            photo_protected: parts.photo_protected,
            privacy_settings: parts.privacy_settings,
            timestamp: parts.timestamp,
            days_since_procedure: parts.days_since_procedure,
            notes: parts.notes,
            rating: parts.rating,
            verified,
            verification: Some(parts.verification),
            after_care: parts.after_care,
            complication: parts.complication,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn procedure_id(&self) -> Uuid {
        self.procedure_id
    }

    #[must_use]
    pub fn photo_original(&self) -> &str {
        &self.photo_original
    }

    #[must_use]
    pub fn photo_protected(&self) -> &str {
        &self.photo_protected
    }

    #[must_use]
    pub const fn privacy_settings(&self) -> &PrivacySettings {
        &self.privacy_settings
    }

    #[must_use]
    pub const fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    #[must_use]
    pub const fn days_since_procedure(&self) -> i64 {
        self.days_since_procedure
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub const fn rating(&self) -> Option<Rating> {
        self.rating
    }

    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verified
    }

    #[must_use]
    pub const fn verification(&self) -> Option<&VerificationData> {
        self.verification.as_ref()
    }

    #[must_use]
    pub const fn after_care(&self) -> Option<&AfterCareLog> {
        self.after_care.as_ref()
    }

    #[must_use]
    pub const fn complication(&self) -> Option<&Complication> {
        self.complication.as_ref()
    }
}

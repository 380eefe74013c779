//! Builds immutable progress entries from a finished capture.

use time::{Date, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    AfterCareLog, Complication, ComplicationSeverity, EntryParts, PrivacySettings, Procedure,
    ProgressEntry, Rating, VerificationData,
};
use crate::error::{Result, TrackerError};

const SECONDS_PER_DAY: i64 = 86_400;

/// User-entered metadata collected while detailing a capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDetails {
    pub notes: Option<String>,
    /// 1-5, or `0` / `None` for no rating.
    pub rating: Option<u8>,
    pub after_care: Option<AfterCareLog>,
    pub complication_severity: ComplicationSeverity,
    pub complication_description: Option<String>,
    pub complication_reported: bool,
}

impl EntryDetails {
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub const fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_after_care(mut self, after_care: AfterCareLog) -> Self {
        self.after_care = Some(after_care);
        self
    }

    #[must_use]
    pub fn with_complication(
        mut self,
        severity: ComplicationSeverity,
        description: Option<String>,
    ) -> Self {
        self.complication_severity = severity;
        self.complication_description = description;
        self
    }

    fn rating(&self) -> Result<Option<Rating>> {
        match self.rating {
            None | Some(0) => Ok(None),
            Some(value) => Rating::try_from(value).map(Some),
        }
    }

    fn complication(&self) -> Option<Complication> {
        (self.complication_severity != ComplicationSeverity::None).then(|| Complication {
            severity: self.complication_severity,
            description: non_blank(self.complication_description.as_deref()),
            reported_to_provider: self.complication_reported,
        })
    }
}

/// Everything the assembler needs to emit one entry.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub procedure_id: Uuid,
    /// Data URL of the unmodified capture.
    pub photo_original: String,
    /// Data URL of the redacted capture.
    pub photo_protected: String,
    pub privacy_settings: PrivacySettings,
    pub verification: VerificationData,
    pub details: EntryDetails,
}

/// Whole days from `date_performed` (UTC midnight) to `captured_at`, floored.
#[must_use]
pub fn days_since(date_performed: Date, captured_at: OffsetDateTime) -> i64 {
    let performed = date_performed.midnight().assume_utc();
    (captured_at - performed)
        .whole_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Turns drafts into entries, resolving the owning procedure.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntryAssembler;

impl EntryAssembler {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates an entry captured at `captured_at`.
    ///
    /// `verified` is derived from the verification record's capture method and
    /// `days_since_procedure` is frozen from `captured_at`.
    ///
    /// # Errors
    ///
    /// - `TrackerError::ProcedureNotFound` if `draft.procedure_id` is unknown;
    ///   nothing is constructed in that case.
    /// - `TrackerError::InvalidRating` if the rating is outside 1-5.
    pub fn create(
        &self,
        procedures: &[Procedure],
        draft: EntryDraft,
        captured_at: OffsetDateTime,
    ) -> Result<ProgressEntry> {
        let procedure = procedures
            .iter()
            .find(|p| p.id == draft.procedure_id)
            .ok_or(TrackerError::ProcedureNotFound(draft.procedure_id))?;

        let rating = draft.details.rating()?;
        let complication = draft.details.complication();
        let days = days_since(procedure.date_performed, captured_at);
        debug!(
            "Assembling entry for {} (day {days}, {:?})",
            procedure.display_name(),
            draft.verification.capture_method
        );

        Ok(ProgressEntry::from_parts(EntryParts {
            procedure_id: procedure.id,
            photo_original: draft.photo_original,
            photo_protected: draft.photo_protected,
            privacy_settings: draft.privacy_settings,
            timestamp: captured_at,
            days_since_procedure: days,
            notes: non_blank(draft.details.notes.as_deref()),
            rating,
            verification: draft.verification,
            after_care: draft.details.after_care,
            complication,
        }))
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{BlurSettings, CaptureMethod, ProcedureType};
    use time::macros::{date, datetime};

    fn procedure() -> Procedure {
        Procedure::new(
            ProcedureType::Laser,
            date!(2024 - 01 - 01),
            datetime!(2024-01-01 9:00 UTC),
        )
    }

    fn draft(procedure_id: Uuid, method: CaptureMethod) -> EntryDraft {
        EntryDraft {
            procedure_id,
            photo_original: "data:image/png;base64,b3JpZ2luYWw=".into(),
            photo_protected: "data:image/png;base64,cHJvdGVjdGVk".into(),
            privacy_settings: PrivacySettings::resolved(BlurSettings::default(), None),
            verification: VerificationData {
                hash: "ab".repeat(32),
                capture_method: method,
                device_info: None,
                timestamp: datetime!(2024-01-11 0:00 UTC),
                timezone: "UTC".into(),
            },
            details: EntryDetails::default(),
        }
    }

    #[test]
    fn test_days_since_ten_days() {
        let p = procedure();
        let entry = EntryAssembler::new()
            .create(
                std::slice::from_ref(&p),
                draft(p.id, CaptureMethod::InApp),
                datetime!(2024-01-11 0:00 UTC),
            )
            .unwrap();
        assert_eq!(entry.days_since_procedure(), 10);
        assert!(entry.verified());
    }

    #[test]
    fn test_days_since_floors() {
        let d = date!(2024 - 01 - 01);
        assert_eq!(days_since(d, datetime!(2024-01-01 23:59 UTC)), 0);
        assert_eq!(days_since(d, datetime!(2023-12-31 12:00 UTC)), -1);
        assert_eq!(days_since(d, datetime!(2024-01-02 0:00 +09:00)), 0);
    }

    #[test]
    fn test_upload_is_never_verified() {
        let p = procedure();
        let entry = EntryAssembler::new()
            .create(
                std::slice::from_ref(&p),
                draft(p.id, CaptureMethod::UploadTest),
                datetime!(2024-01-05 0:00 UTC),
            )
            .unwrap();
        assert!(!entry.verified());
    }

    #[test]
    fn test_unknown_procedure_rejected() {
        let p = procedure();
        let missing = Uuid::new_v4();
        let err = EntryAssembler::new()
            .create(
                &[p],
                draft(missing, CaptureMethod::InApp),
                datetime!(2024-01-05 0:00 UTC),
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::ProcedureNotFound(id) if id == missing));
    }

    #[test]
    fn test_rating_and_complication_normalization() {
        let p = procedure();
        let mut d = draft(p.id, CaptureMethod::InApp);
        d.details = EntryDetails::default()
            .with_rating(0)
            .with_notes("   ")
            .with_complication(ComplicationSeverity::None, Some("ignored".into()));
        let entry = EntryAssembler::new()
            .create(
                std::slice::from_ref(&p),
                d,
                datetime!(2024-01-05 0:00 UTC),
            )
            .unwrap();
        assert!(entry.rating().is_none());
        assert!(entry.notes().is_none());
        assert!(entry.complication().is_none());
    }

    #[test]
    fn test_complication_recorded() {
        let p = procedure();
        let mut d = draft(p.id, CaptureMethod::InApp);
        d.details = EntryDetails::default()
            .with_rating(4)
            .with_complication(ComplicationSeverity::Mild, Some("redness".into()));
        let entry = EntryAssembler::new()
            .create(
                std::slice::from_ref(&p),
                d,
                datetime!(2024-01-05 0:00 UTC),
            )
            .unwrap();
        assert_eq!(entry.rating().unwrap().get(), 4);
        let c = entry.complication().unwrap();
        assert_eq!(c.severity, ComplicationSeverity::Mild);
        assert_eq!(c.description.as_deref(), Some("redness"));
        assert!(!c.reported_to_provider);
    }

    #[test]
    fn test_invalid_rating_rejected() {
        let p = procedure();
        let mut d = draft(p.id, CaptureMethod::InApp);
        d.details = EntryDetails::default().with_rating(9);
        let err = EntryAssembler::new()
            .create(&[p], d, datetime!(2024-01-05 0:00 UTC))
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidRating(9)));
    }
}

//! Serializable views of stored records without image payloads.

use glowtrack_core::domain::{CaptureMethod, ComplicationSeverity, PrivacyMode};
use glowtrack_core::pipeline::ProcedureTimeline;
use glowtrack_core::{Procedure, ProgressEntry};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// One progress entry as printed by `capture` and `timeline`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary<'a> {
    pub id: Uuid,
    pub procedure_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub days_since_procedure: i64,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_method: Option<CaptureMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<&'a str>,
    pub privacy_mode: PrivacyMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_care_followed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complication: Option<ComplicationSeverity>,
}

impl<'a> From<&'a ProgressEntry> for EntrySummary<'a> {
    fn from(entry: &'a ProgressEntry) -> Self {
        let verification = entry.verification();
        Self {
            id: entry.id(),
            procedure_id: entry.procedure_id(),
            timestamp: entry.timestamp(),
            days_since_procedure: entry.days_since_procedure(),
            verified: entry.verified(),
            capture_method: verification.map(|v| v.capture_method),
            hash: verification.map(|v| v.hash.as_str()),
            privacy_mode: entry.privacy_settings().mode,
            rating: entry.rating().map(u8::from),
            notes: entry.notes(),
            after_care_followed: entry.after_care().map(|a| a.followed_instructions),
            complication: entry.complication().map(|c| c.severity),
        }
    }
}

/// A procedure with its entries, newest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary<'a> {
    pub procedure: &'a Procedure,
    pub display_name: &'a str,
    pub entry_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_entry_id: Option<Uuid>,
    pub entries: Vec<EntrySummary<'a>>,
}

impl<'a> From<&ProcedureTimeline<'a>> for TimelineSummary<'a> {
    fn from(timeline: &ProcedureTimeline<'a>) -> Self {
        let procedure = timeline.procedure();
        Self {
            procedure,
            display_name: procedure.display_name(),
            entry_count: timeline.len(),
            latest_entry_id: timeline.latest().map(ProgressEntry::id),
            entries: timeline
                .newest_first()
                .into_iter()
                .map(EntrySummary::from)
                .collect(),
        }
    }
}

//! Per-procedure timelines reconstructed from the flat entry collection.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::domain::{Procedure, ProgressEntry};

/// One procedure and the entries that belong to it.
#[derive(Debug, Clone)]
pub struct ProcedureTimeline<'a> {
    procedure: &'a Procedure,
    /// Insertion order, as persisted.
    entries: Vec<&'a ProgressEntry>,
}

impl<'a> ProcedureTimeline<'a> {
    #[must_use]
    pub const fn procedure(&self) -> &'a Procedure {
        self.procedure
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent first, for display. Equal timestamps keep insertion order.
    #[must_use]
    pub fn newest_first(&self) -> Vec<&'a ProgressEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        sorted
    }

    /// Oldest first, for export. Equal timestamps keep insertion order.
    #[must_use]
    pub fn oldest_first(&self) -> Vec<&'a ProgressEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by_key(|e| e.timestamp());
        sorted
    }

    /// The entry with the latest timestamp.
    #[must_use]
    pub fn latest(&self) -> Option<&'a ProgressEntry> {
        self.newest_first().into_iter().next()
    }
}

/// Groups `entries` under their owning procedures, in procedure order.
///
/// Every procedure is listed, including those without entries. Entries whose
/// procedure id matches nothing are dropped.
#[must_use]
pub fn reconstruct_timeline<'a>(
    procedures: &'a [Procedure],
    entries: &'a [ProgressEntry],
) -> Vec<ProcedureTimeline<'a>> {
    let mut grouped: HashMap<Uuid, Vec<&'a ProgressEntry>> = HashMap::new();
    for entry in entries {
        grouped.entry(entry.procedure_id()).or_default().push(entry);
    }

    let timelines: Vec<_> = procedures
        .iter()
        .map(|procedure| ProcedureTimeline {
            procedure,
            entries: grouped.remove(&procedure.id).unwrap_or_default(),
        })
        .collect();

    let orphaned: usize = grouped.values().map(Vec::len).sum();
    if orphaned > 0 {
        debug!("Skipped {orphaned} entries with no matching procedure");
    }

    timelines
}

/// Finds the timeline for a single procedure.
#[must_use]
pub fn timeline_for<'a>(
    procedure: &'a Procedure,
    entries: &'a [ProgressEntry],
) -> ProcedureTimeline<'a> {
    ProcedureTimeline {
        procedure,
        entries: entries
            .iter()
            .filter(|e| e.procedure_id() == procedure.id)
            .collect(),
    }
}

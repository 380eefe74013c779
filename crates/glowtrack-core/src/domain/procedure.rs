//! User-declared treatment procedures.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Kind of treatment performed.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcedureType {
    /// Neurotoxin injectables.
    Botox,
    Laser,
    ChemicalPeel,
    Microneedling,
    Filler,
    /// Platelet-rich plasma (blood-derived) treatments.
    Prp,
    /// Hydrating facial.
    Hydrafacial,
    /// Anything else; described by `Procedure::custom_type`.
    Other,
}

impl ProcedureType {
    /// All procedure types in display order.
    pub const ALL: [Self; 8] = [
        Self::Botox,
        Self::Laser,
        Self::ChemicalPeel,
        Self::Microneedling,
        Self::Filler,
        Self::Prp,
        Self::Hydrafacial,
        Self::Other,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Botox => "Botox / Dysport",
            Self::Laser => "Laser Treatment",
            Self::ChemicalPeel => "Chemical Peel",
            Self::Microneedling => "Microneedling",
            Self::Filler => "Dermal Filler",
            Self::Prp => "PRP / Vampire Facial",
            Self::Hydrafacial => "HydraFacial",
            Self::Other => "Other",
        }
    }

    /// Identifier used in persisted records and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Botox => "botox",
            Self::Laser => "laser",
            Self::ChemicalPeel => "chemical-peel",
            Self::Microneedling => "microneedling",
            Self::Filler => "filler",
            Self::Prp => "prp",
            Self::Hydrafacial => "hydrafacial",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for ProcedureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown procedure type '{s}'"))
    }
}

/// A treatment event. Created once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub procedure_type: ProcedureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
    /// Calendar date the treatment was performed.
    #[serde(with = "iso_date")]
    pub date_performed: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Procedure {
    /// Creates a procedure with a fresh id.
    #[must_use]
    pub fn new(procedure_type: ProcedureType, date_performed: Date, created_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            procedure_type,
            custom_type: None,
            date_performed,
            provider: None,
            clinic: None,
            notes: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_custom_type(mut self, custom_type: impl Into<String>) -> Self {
        self.custom_type = Some(custom_type.into());
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn with_clinic(mut self, clinic: impl Into<String>) -> Self {
        self.clinic = Some(clinic.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Custom type when given, otherwise the type label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.custom_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.procedure_type.label())
    }
}

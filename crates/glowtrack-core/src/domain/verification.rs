//! Capture verification records.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// How a photo entered the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMethod {
    /// Captured live through the in-app camera. The only verified method.
    InApp,
    /// Uploaded from a file for testing. Never verified.
    UploadTest,
}

impl CaptureMethod {
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::InApp)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InApp => "Verified In-App Capture",
            Self::UploadTest => "Test Upload (Not Verified)",
        }
    }
}

/// Content hash plus capture metadata, computed once at capture time.
///
/// The hash proves the original bytes are unchanged since it was computed.
/// It is not a signature and says nothing about provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationData {
    /// Lowercase hex SHA-256 of the original image bytes.
    pub hash: String,
    pub capture_method: CaptureMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// IANA timezone name at capture time.
    pub timezone: String,
}

impl VerificationData {
    /// Renders the plain-text verification certificate.
    #[must_use]
    pub fn certificate(&self) -> String {
        let timestamp = self
            .timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.timestamp.to_string());
        format!(
            "Verification Certificate\n\
             ========================\n\
             Hash (SHA-256): {}\n\
             Capture Method: {}\n\
             Timestamp: {}\n\
             Timezone: {}\n\
             Device: {}",
            self.hash,
            self.capture_method.label(),
            timestamp,
            self.timezone,
            self.device_info.as_deref().unwrap_or("Unknown"),
        )
    }
}

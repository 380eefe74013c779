//! Privacy redaction settings.

use serde::{Deserialize, Serialize};

use super::FaceLandmarks;
use crate::error::{Result, TrackerError};

/// Lowest accepted blur strength.
pub const MIN_BLUR_STRENGTH: u8 = 5;
/// Highest accepted blur strength.
pub const MAX_BLUR_STRENGTH: u8 = 50;
/// Strength used when none is chosen.
pub const DEFAULT_BLUR_STRENGTH: u8 = 20;

/// How the redaction geometry was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrivacyMode {
    /// Regions derived from located face landmarks.
    AutoBlur,
    /// No face located; the fixed fallback region was used.
    Manual,
    /// No region enabled.
    None,
}

/// Region toggles and the shared strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlurSettings {
    pub blur_eyes: bool,
    pub blur_hair: bool,
    pub blur_background: bool,
    /// Percentage applied to every enabled region.
    pub blur_strength: u8,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            blur_eyes: true,
            blur_hair: true,
            blur_background: true,
            blur_strength: DEFAULT_BLUR_STRENGTH,
        }
    }
}

impl BlurSettings {
    /// Settings with every region disabled.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            blur_eyes: false,
            blur_hair: false,
            blur_background: false,
            blur_strength: DEFAULT_BLUR_STRENGTH,
        }
    }

    /// Returns true if at least one region is enabled.
    #[must_use]
    pub const fn any_region(&self) -> bool {
        self.blur_eyes || self.blur_hair || self.blur_background
    }

    /// Checks the strength is within `MIN_BLUR_STRENGTH..=MAX_BLUR_STRENGTH`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidBlurStrength` when out of range.
    pub fn validate(&self) -> Result<()> {
        if (MIN_BLUR_STRENGTH..=MAX_BLUR_STRENGTH).contains(&self.blur_strength) {
            Ok(())
        } else {
            Err(TrackerError::InvalidBlurStrength {
                value: self.blur_strength,
                min: MIN_BLUR_STRENGTH,
                max: MAX_BLUR_STRENGTH,
            })
        }
    }

    /// Gaussian sigma in pixels. Strength maps one-to-one onto pixels.
    #[must_use]
    pub fn sigma(&self) -> f32 {
        f32::from(self.blur_strength)
    }
}

/// Settings used to produce a protected image, stored with the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub mode: PrivacyMode,
    pub blur: BlurSettings,
    /// Landmarks the region geometry was computed from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_landmarks: Option<FaceLandmarks>,
}

impl PrivacySettings {
    /// Records the settings for a redaction run.
    #[must_use]
    pub fn resolved(blur: BlurSettings, face_landmarks: Option<FaceLandmarks>) -> Self {
        let mode = if !blur.any_region() {
            PrivacyMode::None
        } else if face_landmarks.is_some() {
            PrivacyMode::AutoBlur
        } else {
            PrivacyMode::Manual
        };
        Self {
            mode,
            blur,
            face_landmarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundingBox;

    #[test]
    fn test_default_settings() {
        let s = BlurSettings::default();
        assert!(s.blur_eyes && s.blur_hair && s.blur_background);
        assert_eq!(s.blur_strength, 20);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_strength_bounds() {
        for (value, ok) in [(4, false), (5, true), (50, true), (51, false), (0, false)] {
            let s = BlurSettings {
                blur_strength: value,
                ..BlurSettings::default()
            };
            assert_eq!(s.validate().is_ok(), ok, "strength {value}");
        }
    }

    #[test]
    fn test_resolved_mode() {
        let lm = FaceLandmarks {
            bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            left_eye: vec![],
            right_eye: vec![],
            jawline: vec![],
        };
        assert_eq!(
            PrivacySettings::resolved(BlurSettings::default(), Some(lm)).mode,
            PrivacyMode::AutoBlur
        );
        assert_eq!(
            PrivacySettings::resolved(BlurSettings::default(), None).mode,
            PrivacyMode::Manual
        );
        assert_eq!(
            PrivacySettings::resolved(BlurSettings::disabled(), None).mode,
            PrivacyMode::None
        );
    }
}

//! Capture command - run one capture session and save the entry.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use glowtrack_adapters::{device_from_exif, load_data_url, FrameFileCapture, LandmarkFileLocator};
use glowtrack_core::{
    AfterCareLog, BlurSettings, CaptureSession, ComplicationSeverity, EntryDetails, FaceDetector,
    Facing, TrackerError,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::{Env, ExitCode};
use crate::config::AppConfig;
use crate::output::{EntrySummary, JsonOutput};

/// Camera facing direction.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum FacingArg {
    /// Front camera
    #[default]
    User,
    /// Rear camera
    Environment,
}

impl From<FacingArg> for Facing {
    fn from(arg: FacingArg) -> Self {
        match arg {
            FacingArg::User => Self::User,
            FacingArg::Environment => Self::Environment,
        }
    }
}

/// Where the photo comes from.
#[derive(Args, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Frame file kept current by a capture process (verified capture)
    #[arg(long, value_name = "FILE")]
    pub frame_source: Option<PathBuf>,

    /// Image file to upload (test upload, never verified)
    #[arg(long, value_name = "FILE")]
    pub upload: Option<PathBuf>,
}

/// Arguments for a capture session.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CaptureArgs {
    /// Procedure the photo belongs to
    #[arg(long, value_name = "ID")]
    pub procedure: Uuid,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Face landmark file for the captured photo
    #[arg(long, value_name = "FILE")]
    pub landmarks: Option<PathBuf>,

    /// Camera to open
    #[arg(long, value_enum, default_value_t)]
    pub facing: FacingArg,

    /// Do not blur the eyes
    #[arg(long)]
    pub no_eye_blur: bool,

    /// Do not blur the hair
    #[arg(long)]
    pub no_hair_blur: bool,

    /// Do not blur the background
    #[arg(long)]
    pub no_background_blur: bool,

    /// Blur strength (5-50)
    #[arg(long, value_name = "N")]
    pub blur_strength: Option<u8>,

    /// Free-text note
    #[arg(long)]
    pub note: Option<String>,

    /// Rating 1-5 (0 for none)
    #[arg(long, value_name = "N")]
    pub rating: Option<u8>,

    /// Whether the aftercare instructions were followed
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub aftercare_followed: Option<bool>,

    /// Complication severity (none, mild, moderate, severe)
    #[arg(long, value_name = "SEVERITY")]
    pub complication: Option<ComplicationSeverity>,

    /// Complication description
    #[arg(long, value_name = "TEXT")]
    pub complication_note: Option<String>,

    /// The complication was reported to the provider
    #[arg(long)]
    pub complication_reported: bool,

    /// Device descriptor (defaults to config, then EXIF make/model)
    #[arg(long)]
    pub device: Option<String>,

    /// Pretty-print the saved entry
    #[arg(long)]
    pub pretty: bool,
}

impl CaptureArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// CLI `--no-*-blur` always wins; config can disable a region only when
    /// the flag wasn't passed.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.no_eye_blur {
            args.no_eye_blur = config.privacy.blur_eyes.is_some_and(|on| !on);
        }
        if !args.no_hair_blur {
            args.no_hair_blur = config.privacy.blur_hair.is_some_and(|on| !on);
        }
        if !args.no_background_blur {
            args.no_background_blur = config.privacy.blur_background.is_some_and(|on| !on);
        }

        args.blur_strength = args.blur_strength.or(config.privacy.blur_strength);

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }

        args
    }

    /// Blur settings with fallback to the default strength.
    fn blur_settings(&self) -> BlurSettings {
        let defaults = BlurSettings::default();
        BlurSettings {
            blur_eyes: !self.no_eye_blur,
            blur_hair: !self.no_hair_blur,
            blur_background: !self.no_background_blur,
            blur_strength: self.blur_strength.unwrap_or(defaults.blur_strength),
        }
    }

    /// Device descriptor: CLI, then config, then EXIF of the source file.
    fn device(&self, env: &Env) -> Option<String> {
        self.device
            .clone()
            .or_else(|| env.device().map(str::to_string))
            .or_else(|| self.source_path().and_then(device_from_exif))
    }

    fn source_path(&self) -> Option<&Path> {
        self.source
            .frame_source
            .as_deref()
            .or(self.source.upload.as_deref())
    }

    fn details(&self) -> EntryDetails {
        let mut details = EntryDetails::default();
        if let Some(note) = &self.note {
            details = details.with_notes(note.clone());
        }
        if let Some(rating) = self.rating {
            details = details.with_rating(rating);
        }
        if let Some(followed) = self.aftercare_followed {
            details = details.with_after_care(AfterCareLog {
                followed_instructions: followed,
                ..AfterCareLog::default()
            });
        }
        if let Some(severity) = self.complication {
            details = details.with_complication(severity, self.complication_note.clone());
            details.complication_reported = self.complication_reported;
        }
        details
    }
}

/// Run the capture command.
pub fn run(args: &CaptureArgs, env: &Env) -> Result<ExitCode> {
    let detector = match &args.landmarks {
        Some(path) => FaceDetector::available(LandmarkFileLocator::new(path)),
        None => FaceDetector::Unavailable,
    };
    let tracker = env
        .tracker()
        .with_detector(detector)
        .with_device_info(args.device(env));

    if tracker.repository().procedure(args.procedure)?.is_none() {
        return Err(TrackerError::ProcedureNotFound(args.procedure).into());
    }

    let camera = FrameFileCapture::new(args.source.frame_source.clone().unwrap_or_default());
    let mut session = CaptureSession::new(&tracker, Box::new(camera), args.procedure);

    if let Some(upload) = &args.source.upload {
        let payload = load_data_url(upload)?;
        session.upload(payload)?;
    } else {
        session.start_camera(args.facing.into())?;
        session.capture_frame()?;
    }

    let blur = args.blur_settings();
    let redaction = session.accept(blur)?;
    debug!("Redaction applied in {:?} mode", redaction.settings.mode);
    session.confirm_redaction()?;

    let entry = session
        .save(args.details())
        .context("Failed to save progress entry")?;
    info!(
        "Saved entry {} (day {}, verified: {})",
        entry.id(),
        entry.days_since_procedure(),
        entry.verified()
    );

    let output = JsonOutput::stdout();
    output.write_document(&EntrySummary::from(&entry), args.pretty)?;
    output.flush()?;
    Ok(ExitCode::Success)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CaptureArgs,
    }

    fn parse(extra: &[&str]) -> CaptureArgs {
        let mut argv = vec![
            "glowtrack",
            "--procedure",
            "8a6e0804-2bd0-4672-b79d-d97027f9071b",
            "--upload",
            "photo.png",
        ];
        argv.extend_from_slice(extra);
        Harness::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_default_blur_settings() {
        let args = CaptureArgs::with_config(parse(&[]), &AppConfig::default());
        assert_eq!(args.blur_settings(), BlurSettings::default());
    }

    #[test]
    fn test_cli_flags_beat_config() {
        let config: AppConfig = toml::from_str(
            r"
[privacy]
blur_eyes = true
blur_hair = false
blur_strength = 30
",
        )
        .unwrap();
        let args = CaptureArgs::with_config(
            parse(&["--no-eye-blur", "--blur-strength", "10"]),
            &config,
        );
        let blur = args.blur_settings();
        assert!(!blur.blur_eyes);
        assert!(!blur.blur_hair);
        assert!(blur.blur_background);
        assert_eq!(blur.blur_strength, 10);
    }

    #[test]
    fn test_config_strength_applies() {
        let config: AppConfig = toml::from_str("[privacy]\nblur_strength = 45\n").unwrap();
        let args = CaptureArgs::with_config(parse(&[]), &config);
        assert_eq!(args.blur_settings().blur_strength, 45);
    }

    #[test]
    fn test_details_from_flags() {
        let args = parse(&[
            "--note",
            "less redness",
            "--rating",
            "4",
            "--aftercare-followed",
            "false",
            "--complication",
            "mild",
            "--complication-note",
            "swelling",
        ]);
        let details = args.details();
        assert_eq!(details.notes.as_deref(), Some("less redness"));
        assert_eq!(details.rating, Some(4));
        assert!(!details.after_care.unwrap().followed_instructions);
        assert_eq!(details.complication_severity, ComplicationSeverity::Mild);
        assert_eq!(details.complication_description.as_deref(), Some("swelling"));
        assert!(!details.complication_reported);
    }

    #[test]
    fn test_sources_are_exclusive() {
        let result = Harness::try_parse_from([
            "glowtrack",
            "--procedure",
            "8a6e0804-2bd0-4672-b79d-d97027f9071b",
            "--upload",
            "a.png",
            "--frame-source",
            "b.png",
        ]);
        assert!(result.is_err());

        let missing = Harness::try_parse_from([
            "glowtrack",
            "--procedure",
            "8a6e0804-2bd0-4672-b79d-d97027f9071b",
        ]);
        assert!(missing.is_err());
    }
}

//! Capture session transitions and resource handling.

#![allow(clippy::unwrap_used)]

use std::sync::PoisonError;

use glowtrack_core::domain::{BlurSettings, PrivacyMode, Procedure, ProcedureType};
use glowtrack_core::pipeline::{CaptureSession, TrackerContext, ENTRIES_KEY};
use glowtrack_core::{EntryDetails, FaceDetector, Facing, SessionState, TrackerError};
use glowtrack_test_support::{
    face_fixture, CameraMonitor, FailingLocator, FixedClock, MemoryStore, MockCamera, StaticLocator,
    SyntheticImageBuilder,
};
use time::macros::{date, datetime};

struct Harness {
    store: MemoryStore,
    ctx: TrackerContext,
    procedure: Procedure,
}

impl Harness {
    fn new(detector: FaceDetector) -> Self {
        Self::with_store(MemoryStore::new(), detector)
    }

    fn with_store(store: MemoryStore, detector: FaceDetector) -> Self {
        let procedure = Procedure::new(
            ProcedureType::Hydrafacial,
            date!(2024 - 01 - 01),
            datetime!(2024-01-01 9:30 UTC),
        );
        store.insert_raw(
            "procedures",
            &serde_json::to_string(&[procedure.clone()]).unwrap(),
        );
        let ctx = TrackerContext::new(FixedClock::default(), store.clone())
            .with_detector(detector)
            .with_device_info(Some("mock-cam".into()));
        Self {
            store,
            ctx,
            procedure,
        }
    }

    fn session(&self) -> (CaptureSession<'_>, CameraMonitor) {
        let camera = MockCamera::new(SyntheticImageBuilder::face_scene());
        let monitor = camera.monitor();
        (
            CaptureSession::new(&self.ctx, Box::new(camera), self.procedure.id),
            monitor,
        )
    }
}

fn to_detailing(session: &mut CaptureSession<'_>) {
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();
    session.accept(BlurSettings::default()).unwrap();
    session.confirm_redaction().unwrap();
}

#[test]
fn test_happy_path_in_app() {
    let h = Harness::new(FaceDetector::available(StaticLocator::found(face_fixture())));
    let (mut session, monitor) = h.session();
    assert_eq!(session.state(), SessionState::Idle);

    session.start_camera(Facing::User).unwrap();
    assert_eq!(session.state(), SessionState::Capturing);
    assert!(monitor.is_active());

    session.capture_frame().unwrap();
    assert_eq!(session.state(), SessionState::Captured);

    session.accept(BlurSettings::default()).unwrap();
    assert_eq!(session.state(), SessionState::Redacting);
    assert!(!monitor.is_active(), "camera released on accept");
    assert_eq!(session.landmarks(), Some(&face_fixture()));

    session.confirm_redaction().unwrap();
    let entry = session.save(EntryDetails::default().with_notes("day ten")).unwrap();

    assert_eq!(session.state(), SessionState::Saved);
    assert!(entry.verified());
    assert_eq!(entry.notes(), Some("day ten"));
    assert_eq!(entry.privacy_settings().mode, PrivacyMode::AutoBlur);
    let v = entry.verification().unwrap();
    assert_eq!(v.timezone, "Asia/Seoul");
    assert_eq!(v.device_info.as_deref(), Some("mock-cam"));
    assert!(h.store.raw(ENTRIES_KEY).unwrap().contains(&entry.id().to_string()));
}

#[test]
fn test_settings_reapplied_without_relocating() {
    let locator = StaticLocator::found(face_fixture());
    let calls = locator.calls();
    let h = Harness::new(FaceDetector::available(locator));
    let (mut session, _monitor) = h.session();
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();

    let first = session.accept(BlurSettings::default()).unwrap().image.clone();
    let eyes_only = BlurSettings {
        blur_hair: false,
        blur_background: false,
        ..BlurSettings::default()
    };
    let changed = session.apply_settings(eyes_only).unwrap().image.clone();
    let again = session.apply_settings(BlurSettings::default()).unwrap().image.clone();

    assert_ne!(first.as_raw(), changed.as_raw());
    assert_eq!(first.as_raw(), again.as_raw());
    assert_eq!(*calls.lock().unwrap_or_else(PoisonError::into_inner), 1);
    assert_eq!(session.state(), SessionState::Redacting);
}

#[test]
fn test_invalid_strength_keeps_state() {
    let h = Harness::new(FaceDetector::Unavailable);
    let (mut session, monitor) = h.session();
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();

    let too_weak = BlurSettings {
        blur_strength: 2,
        ..BlurSettings::default()
    };
    assert!(matches!(
        session.accept(too_weak),
        Err(TrackerError::InvalidBlurStrength { value: 2, .. })
    ));
    assert_eq!(session.state(), SessionState::Captured);
    assert!(monitor.is_active());

    session.accept(BlurSettings::default()).unwrap();
    assert!(session.apply_settings(too_weak).is_err());
    assert!(session.redaction().is_some());
}

#[test]
fn test_restart_tears_down_previous_stream() {
    let h = Harness::new(FaceDetector::Unavailable);
    let (mut session, monitor) = h.session();

    session.start_camera(Facing::User).unwrap();
    session.start_camera(Facing::User).unwrap();
    session.switch_camera().unwrap();

    assert_eq!(session.facing(), Facing::Environment);
    assert_eq!(
        monitor.starts(),
        [Facing::User, Facing::User, Facing::Environment]
    );
    assert_eq!(monitor.stops(), 2);
    assert!(monitor.is_active());
}

#[test]
fn test_denied_camera_is_acquisition_error() {
    let h = Harness::new(FaceDetector::Unavailable);
    let mut session = CaptureSession::new(&h.ctx, Box::new(MockCamera::denied()), h.procedure.id);

    let err = session.start_camera(Facing::User).unwrap_err();
    assert!(matches!(err, TrackerError::Acquisition(ref m) if m.contains("Permission denied")));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_cancel_from_every_live_state_persists_nothing() {
    let h = Harness::new(FaceDetector::Unavailable);
    type Step = fn(&mut CaptureSession<'_>);
    let steps: [Step; 5] = [
        |_| {},
        |s| s.start_camera(Facing::User).unwrap(),
        |s| {
            s.start_camera(Facing::User).unwrap();
            s.capture_frame().unwrap();
        },
        |s| {
            s.start_camera(Facing::User).unwrap();
            s.capture_frame().unwrap();
            s.accept(BlurSettings::default()).unwrap();
        },
        to_detailing,
    ];

    for step in steps {
        let (mut session, monitor) = h.session();
        step(&mut session);
        session.cancel();

        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(!monitor.is_active());
        assert!(session.redaction().is_none());
        assert!(session.verification().is_none());
        assert!(matches!(
            session.save(EntryDetails::default()),
            Err(TrackerError::Cancelled)
        ));
        assert!(matches!(
            session.start_camera(Facing::User),
            Err(TrackerError::Cancelled)
        ));
    }
    assert!(h.store.raw(ENTRIES_KEY).is_none());
    assert_eq!(h.store.write_count(), 0);
}

#[test]
fn test_drop_releases_camera() {
    let h = Harness::new(FaceDetector::Unavailable);
    let (mut session, monitor) = h.session();
    session.start_camera(Facing::User).unwrap();
    assert!(monitor.is_active());
    drop(session);
    assert!(!monitor.is_active());
}

#[test]
fn test_out_of_order_calls_rejected() {
    let h = Harness::new(FaceDetector::Unavailable);
    let (mut session, _monitor) = h.session();

    assert!(matches!(
        session.capture_frame(),
        Err(TrackerError::InvalidTransition {
            state: SessionState::Idle,
            ..
        })
    ));
    assert!(session.accept(BlurSettings::default()).is_err());
    assert!(session.switch_camera().is_err());
    assert!(session.confirm_redaction().is_err());
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_retake_returns_to_live_view() {
    let h = Harness::new(FaceDetector::Unavailable);
    let (mut session, monitor) = h.session();
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();
    session.retake().unwrap();
    assert_eq!(session.state(), SessionState::Capturing);
    session.capture_frame().unwrap();
    assert_eq!(monitor.snapshots(), 2);
}

#[test]
fn test_upload_from_live_view() {
    let h = Harness::new(FaceDetector::Unavailable);
    let (mut session, _monitor) = h.session();
    session.start_camera(Facing::User).unwrap();

    assert!(matches!(
        session.upload("data:image/png;base64,AAAA".into()),
        Err(TrackerError::InvalidPayload(_))
    ));
    let payload = SyntheticImageBuilder::data_url(&SyntheticImageBuilder::uniform(20, 20, 9, 9, 9)).unwrap();
    session.upload(payload).unwrap();
    session.accept(BlurSettings::default()).unwrap();
    session.confirm_redaction().unwrap();
    assert!(!session.save(EntryDetails::default()).unwrap().verified());
}

#[test]
fn test_locator_error_falls_back() {
    let h = Harness::new(FaceDetector::available(FailingLocator));
    let (mut session, _monitor) = h.session();
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();

    let redaction = session.accept(BlurSettings::default()).unwrap();
    assert_eq!(redaction.settings.mode, PrivacyMode::Manual);
    assert!(redaction.settings.face_landmarks.is_none());
}

#[test]
fn test_failed_write_allows_retry() {
    let h = Harness::with_store(MemoryStore::failing_writes(), FaceDetector::Unavailable);
    let (mut session, _monitor) = h.session();
    to_detailing(&mut session);

    let err = session.save(EntryDetails::default()).unwrap_err();
    assert!(matches!(err, TrackerError::Persistence(_)));
    assert_eq!(session.state(), SessionState::Detailing);
    assert!(session.redaction().is_some());
}

#[test]
fn test_invalid_rating_rejected_at_save() {
    let h = Harness::new(FaceDetector::Unavailable);
    let (mut session, _monitor) = h.session();
    to_detailing(&mut session);

    let err = session.save(EntryDetails::default().with_rating(6)).unwrap_err();
    assert!(matches!(err, TrackerError::InvalidRating(6)));
    assert_eq!(session.state(), SessionState::Detailing);
}

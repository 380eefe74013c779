//! End-to-end scenarios for redaction, day offsets, verification and export.

#![allow(clippy::unwrap_used)]

use glowtrack_core::domain::{BlurSettings, PrivacyMode, Procedure, ProcedureType};
use glowtrack_core::pipeline::{content_hash, render_report, CaptureSession, TrackerContext};
use glowtrack_core::{EntryDetails, FaceDetector, Facing, ProgressEntry, TrackerError};
use glowtrack_test_support::{
    face_fixture, FixedClock, MemoryStore, MockCamera, StaticLocator, SyntheticImageBuilder,
};
use image::RgbaImage;
use time::macros::{date, datetime};
use time::OffsetDateTime;

fn procedure() -> Procedure {
    Procedure::new(
        ProcedureType::Microneedling,
        date!(2024 - 01 - 01),
        datetime!(2024-01-01 8:00 UTC),
    )
}

fn context(store: &MemoryStore, now: OffsetDateTime, detector: FaceDetector) -> TrackerContext {
    TrackerContext::new(FixedClock::at(now), store.clone()).with_detector(detector)
}

fn seeded(store: &MemoryStore) -> Procedure {
    let p = procedure();
    let ctx = TrackerContext::new(FixedClock::default(), store.clone());
    ctx.repository().add_procedure(p.clone()).unwrap();
    p
}

/// Drives an in-app capture through to save.
fn capture_in_app(ctx: &TrackerContext, procedure: &Procedure, blur: BlurSettings) -> ProgressEntry {
    let camera = MockCamera::new(SyntheticImageBuilder::face_scene());
    let mut session = CaptureSession::new(ctx, Box::new(camera), procedure.id);
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();
    session.accept(blur).unwrap();
    session.confirm_redaction().unwrap();
    session.save(EntryDetails::default().with_rating(4)).unwrap()
}

fn decode(payload: &str) -> RgbaImage {
    glowtrack_core::pipeline::decode_image(payload)
        .unwrap()
        .to_rgba8()
}

#[test]
fn test_face_found_all_regions_blurred_except_cutout() {
    let store = MemoryStore::new();
    let p = seeded(&store);
    let ctx = context(
        &store,
        datetime!(2024-01-11 0:00 UTC),
        FaceDetector::available(StaticLocator::found(face_fixture())),
    );

    let entry = capture_in_app(&ctx, &p, BlurSettings::default());
    let original = decode(entry.photo_original());
    let protected = decode(entry.photo_protected());

    assert_eq!(entry.privacy_settings().mode, PrivacyMode::AutoBlur);
    for (x, y) in [(2, 2), (197, 2), (2, 197), (197, 197), (10, 100), (190, 100)] {
        assert_ne!(
            protected.get_pixel(x, y),
            original.get_pixel(x, y),
            "({x}, {y}) outside the face should be blurred"
        );
    }
    for y in 130..150 {
        for x in 95..105 {
            assert_eq!(
                protected.get_pixel(x, y),
                original.get_pixel(x, y),
                "({x}, {y}) inside the cutout should be untouched"
            );
        }
    }
}

#[test]
fn test_no_face_blurs_top_band_only() {
    let store = MemoryStore::new();
    let p = seeded(&store);
    let ctx = context(
        &store,
        datetime!(2024-01-11 0:00 UTC),
        FaceDetector::available(StaticLocator::miss()),
    );

    let source = SyntheticImageBuilder::checkerboard(120, 100);
    let mut session = CaptureSession::new(&ctx, Box::new(MockCamera::new(source.clone())), p.id);
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();
    let blur = BlurSettings {
        blur_eyes: true,
        blur_hair: false,
        blur_background: false,
        blur_strength: 20,
    };
    let redaction = session.accept(blur).unwrap();

    assert_eq!(redaction.settings.mode, PrivacyMode::Manual);
    let original = source.to_rgba8();
    for y in 0..100 {
        let changed = (0..120)
            .filter(|&x| redaction.image.get_pixel(x, y) != original.get_pixel(x, y))
            .count();
        if y < 40 {
            assert!(changed > 100, "row {y} should be blurred, {changed} changed");
        } else {
            assert_eq!(changed, 0, "row {y} should be untouched");
        }
    }
}

#[test]
fn test_days_since_procedure_frozen_at_save() {
    let store = MemoryStore::new();
    let p = seeded(&store);
    let ctx = context(&store, datetime!(2024-01-11 0:00 UTC), FaceDetector::Unavailable);

    let entry = capture_in_app(&ctx, &p, BlurSettings::default());
    assert_eq!(entry.days_since_procedure(), 10);

    // Viewing later does not recompute the offset.
    let later = context(&store, datetime!(2024-06-01 0:00 UTC), FaceDetector::Unavailable);
    let stored = later.repository().entry(entry.id()).unwrap().unwrap();
    assert_eq!(stored.days_since_procedure(), 10);
}

#[test]
fn test_upload_never_verified() {
    let store = MemoryStore::new();
    let p = seeded(&store);
    let ctx = context(
        &store,
        datetime!(2024-01-11 0:00 UTC),
        FaceDetector::available(StaticLocator::found(face_fixture())),
    );
    let payload = SyntheticImageBuilder::data_url(&SyntheticImageBuilder::face_scene()).unwrap();

    for blur in [BlurSettings::default(), BlurSettings::disabled()] {
        let mut session =
            CaptureSession::new(&ctx, Box::new(MockCamera::denied()), p.id);
        session.upload(payload.clone()).unwrap();
        session.accept(blur).unwrap();
        session.confirm_redaction().unwrap();
        let entry = session.save(EntryDetails::default()).unwrap();

        assert!(!entry.verified());
        let v = entry.verification().unwrap();
        assert_eq!(v.hash, content_hash(&payload).unwrap());
        assert_eq!(entry.photo_original(), payload);
    }
}

#[test]
fn test_export_embeds_three_protected_images_in_order() {
    let store = MemoryStore::new();
    let p = seeded(&store);
    let times = [
        datetime!(2024-01-20 0:00 UTC),
        datetime!(2024-01-05 0:00 UTC),
        datetime!(2024-01-12 0:00 UTC),
    ];
    for at in times {
        let ctx = context(&store, at, FaceDetector::Unavailable);
        capture_in_app(&ctx, &p, BlurSettings::default());
    }

    let ctx = context(&store, datetime!(2024-02-01 0:00 UTC), FaceDetector::Unavailable);
    let entries = ctx.repository().entries().unwrap();
    let html = render_report(&p, &entries, ctx.clock().now());

    assert_eq!(html.matches("<img").count(), 3);
    for e in &entries {
        assert!(!html.contains(e.photo_original()));
    }
    let day = |n: i64| html.find(&format!("<strong>Day {n}</strong>")).unwrap();
    assert!(day(4) < day(11));
    assert!(day(11) < day(19));
}

#[test]
fn test_unknown_procedure_is_rejected_before_persisting() {
    let store = MemoryStore::new();
    seeded(&store);
    let ctx = context(&store, datetime!(2024-01-11 0:00 UTC), FaceDetector::Unavailable);
    let orphan = procedure();

    let mut session = CaptureSession::new(
        &ctx,
        Box::new(MockCamera::new(SyntheticImageBuilder::face_scene())),
        orphan.id,
    );
    session.start_camera(Facing::User).unwrap();
    session.capture_frame().unwrap();
    session.accept(BlurSettings::disabled()).unwrap();
    session.confirm_redaction().unwrap();

    let err = session.save(EntryDetails::default()).unwrap_err();
    assert!(matches!(err, TrackerError::ProcedureNotFound(id) if id == orphan.id));
    assert!(ctx.repository().entries().unwrap().is_empty());
}

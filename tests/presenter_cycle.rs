use holdview::catalog::RotationState;
use holdview::detector::{DetectorState, HoldDetector};
use holdview::presenter::{Presenter, PresenterState};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use fakes::{FakeBindings, FakeSurface};

const INTERVAL: Duration = Duration::from_millis(100);

fn presenter_with(paths: Vec<PathBuf>) -> Presenter {
    Presenter::new(RotationState::new(paths), HoldDetector::new(INTERVAL))
}

fn assert_in_sync(presenter: &Presenter) {
    let shown = presenter.state() == PresenterState::Shown;
    assert_eq!(
        shown,
        presenter.detector_state() == DetectorState::Armed,
        "presenter and detector states diverged"
    );
    assert_eq!(
        shown,
        presenter.next_deadline().is_some(),
        "poll handle presence diverged from presenter state"
    );
}

/// Drive one full press/hold/release cycle and return the advanced clock.
fn full_cycle(
    presenter: &mut Presenter,
    bindings: &mut FakeBindings,
    surface: &mut FakeSurface,
    mut now: Instant,
    held_ticks: u32,
) -> Instant {
    bindings.press_queued = true;
    bindings.held = true;
    presenter.tick(now, bindings, surface);
    assert_eq!(presenter.state(), PresenterState::Shown);
    assert_in_sync(presenter);

    for _ in 0..held_ticks {
        now += INTERVAL;
        presenter.tick(now, bindings, surface);
        assert_eq!(presenter.state(), PresenterState::Shown);
        assert_in_sync(presenter);
    }

    bindings.held = false;
    now += INTERVAL;
    presenter.tick(now, bindings, surface);
    assert_eq!(presenter.state(), PresenterState::Hidden);
    assert_in_sync(presenter);
    now
}

#[test]
fn press_hold_release_rotates_catalog() {
    let a = PathBuf::from("/images/a.png");
    let b = PathBuf::from("/images/b.jpg");
    let mut presenter = presenter_with(vec![a.clone(), b.clone()]);
    let mut bindings = FakeBindings::default();
    let mut surface = FakeSurface::default();
    let mut now = Instant::now();

    // Press shows the first image without advancing the index.
    bindings.press_queued = true;
    bindings.held = true;
    presenter.tick(now, &mut bindings, &mut surface);
    assert_eq!(surface.shown.len(), 1);
    assert_eq!(surface.shown[0].source, a);
    assert_eq!(presenter.rotation().index(), 0);
    assert!(surface.visible);
    assert_in_sync(&presenter);

    // Three probes with the chord held keep the overlay up.
    for _ in 0..3 {
        now += INTERVAL;
        presenter.tick(now, &mut bindings, &mut surface);
        assert_eq!(surface.hide_count, 0);
    }

    // Release hides exactly once and advances the rotation.
    bindings.held = false;
    now += INTERVAL;
    presenter.tick(now, &mut bindings, &mut surface);
    assert_eq!(surface.hide_count, 1);
    assert!(!surface.visible);
    assert_eq!(presenter.rotation().index(), 1);
    assert_in_sync(&presenter);

    // Next press shows the second image.
    bindings.press_queued = true;
    bindings.held = true;
    now += INTERVAL;
    presenter.tick(now, &mut bindings, &mut surface);
    assert_eq!(surface.shown.len(), 2);
    assert_eq!(surface.shown[1].source, b);
}

#[test]
fn empty_catalog_press_is_a_noop() {
    let mut presenter = presenter_with(Vec::new());
    let mut bindings = FakeBindings::default();
    let mut surface = FakeSurface::default();

    bindings.press_queued = true;
    bindings.held = true;
    presenter.tick(Instant::now(), &mut bindings, &mut surface);

    assert_eq!(presenter.state(), PresenterState::Hidden);
    assert_eq!(presenter.detector_state(), DetectorState::Idle);
    assert!(surface.shown.is_empty());
    assert_eq!(presenter.rotation().index(), 0);
}

#[test]
fn index_is_cycle_count_modulo_catalog_size() {
    let paths: Vec<PathBuf> = (0..3)
        .map(|i| PathBuf::from(format!("/images/{i}.png")))
        .collect();
    let mut presenter = presenter_with(paths);
    let mut bindings = FakeBindings::default();
    let mut surface = FakeSurface::default();
    let mut now = Instant::now();

    for _ in 0..7 {
        now = full_cycle(&mut presenter, &mut bindings, &mut surface, now, 1);
        now += INTERVAL;
    }
    assert_eq!(presenter.rotation().index(), 7 % 3);
    assert_eq!(surface.shown.len(), 7);
    assert_eq!(surface.hide_count, 7);
}

#[test]
fn press_edge_while_shown_is_dropped() {
    let mut presenter = presenter_with(vec![PathBuf::from("/images/a.png")]);
    let mut bindings = FakeBindings::default();
    let mut surface = FakeSurface::default();
    let now = Instant::now();

    bindings.press_queued = true;
    bindings.held = true;
    presenter.tick(now, &mut bindings, &mut surface);
    assert_eq!(surface.shown.len(), 1);

    // A stray second edge on the shared event channel must not re-show.
    bindings.press_queued = true;
    presenter.tick(now + INTERVAL / 4, &mut bindings, &mut surface);
    assert_eq!(surface.shown.len(), 1);
    assert_eq!(presenter.state(), PresenterState::Shown);
}

#[test]
fn image_bytes_travel_with_the_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.png");
    std::fs::write(&path, b"fake png bytes").unwrap();

    let mut presenter = presenter_with(vec![path.clone()]);
    let mut bindings = FakeBindings::default();
    let mut surface = FakeSurface::default();

    bindings.press_queued = true;
    bindings.held = true;
    presenter.tick(Instant::now(), &mut bindings, &mut surface);

    assert_eq!(surface.shown[0].source, path);
    assert_eq!(surface.shown[0].bytes, b"fake png bytes");
}

#[test]
fn unreadable_image_still_shows_blank_overlay() {
    let mut presenter = presenter_with(vec![PathBuf::from("/nonexistent/zzz.png")]);
    let mut bindings = FakeBindings::default();
    let mut surface = FakeSurface::default();

    bindings.press_queued = true;
    bindings.held = true;
    presenter.tick(Instant::now(), &mut bindings, &mut surface);

    // The cycle must not stall on presentation failures.
    assert_eq!(presenter.state(), PresenterState::Shown);
    assert_eq!(surface.shown.len(), 1);
    assert!(surface.shown[0].bytes.is_empty());
}

#[test]
fn shutdown_while_armed_emits_no_release() {
    let mut presenter = presenter_with(vec![PathBuf::from("/images/a.png")]);
    let mut bindings = FakeBindings::default();
    let mut surface = FakeSurface::default();
    let now = Instant::now();

    bindings.press_queued = true;
    bindings.held = true;
    presenter.tick(now, &mut bindings, &mut surface);
    assert_eq!(presenter.detector_state(), DetectorState::Armed);

    presenter.shutdown(&mut bindings, &mut surface);
    assert_eq!(presenter.state(), PresenterState::Hidden);
    assert_eq!(presenter.detector_state(), DetectorState::Idle);
    assert_eq!(surface.hide_count, 1);
    assert!(!bindings.registered);
    // Hidden by teardown, not by an inferred release: no rotation.
    assert_eq!(presenter.rotation().index(), 0);

    // A late tick after teardown stays silent.
    bindings.held = false;
    presenter.tick(now + INTERVAL * 4, &mut bindings, &mut surface);
    assert_eq!(surface.hide_count, 1);
    assert_eq!(presenter.rotation().index(), 0);
}

#[test]
fn denied_registration_leaves_presenter_inert_until_retry() {
    let mut presenter = presenter_with(vec![PathBuf::from("/images/a.png")]);
    let mut bindings = FakeBindings {
        deny: true,
        ..Default::default()
    };
    let mut surface = FakeSurface::default();

    // With the press binding denied no edge ever arrives; ticking is a no-op.
    use holdview::hotkey::ChordBindings;
    assert!(bindings.register().is_err());
    presenter.tick(Instant::now(), &mut bindings, &mut surface);
    assert_eq!(presenter.state(), PresenterState::Hidden);
    assert!(surface.shown.is_empty());

    // A later registration attempt succeeds independently.
    bindings.deny = false;
    assert!(bindings.register().is_ok());
    assert!(bindings.registered);
}

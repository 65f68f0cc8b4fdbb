use crate::catalog::RotationState;
use crate::detector::{DetectorState, HoldDetector};
use crate::hotkey::ChordBindings;
use std::path::PathBuf;
use std::time::Instant;

/// Image payload delivered to the display layer. The presenter reads the
/// bytes itself so the display side never touches the filesystem; `source`
/// is kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayContent {
    pub source: PathBuf,
    pub bytes: Vec<u8>,
}

/// The overlay display surface as the presenter sees it: resident across
/// cycles, shown with fresh content on each press, hidden on release.
pub trait Surface {
    fn show(&mut self, content: DisplayContent);
    fn hide(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterState {
    Hidden,
    Shown,
}

/// Orchestrates catalog, surface and hold detector. The presenter owns the
/// visibility flag and the rotation index; both change only on its two
/// transitions, which mirror the detector's states 1:1.
pub struct Presenter {
    rotation: RotationState,
    state: PresenterState,
    detector: HoldDetector,
}

impl Presenter {
    pub fn new(rotation: RotationState, detector: HoldDetector) -> Self {
        Self {
            rotation,
            state: PresenterState::Hidden,
            detector,
        }
    }

    pub fn state(&self) -> PresenterState {
        self.state
    }

    pub fn detector_state(&self) -> DetectorState {
        self.detector.state()
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.detector.next_deadline()
    }

    /// One cooperative step: drain the press edge, then drive the release
    /// probe. The only entry point the event loop needs.
    pub fn tick<B: ChordBindings, S: Surface>(
        &mut self,
        now: Instant,
        bindings: &mut B,
        surface: &mut S,
    ) {
        if bindings.take_press() {
            self.on_press_edge(now, bindings, surface);
        }
        if self.state == PresenterState::Shown && self.detector.poll(now, bindings) {
            self.on_release_inferred(surface);
        }
    }

    /// Hidden → Shown. Shows the current image and arms the detector. With
    /// an empty catalog this is a logged no-op and the detector stays idle.
    pub fn on_press_edge<B: ChordBindings, S: Surface>(
        &mut self,
        now: Instant,
        bindings: &mut B,
        surface: &mut S,
    ) {
        if self.state == PresenterState::Shown {
            // Cannot happen while the press binding is absent, but the event
            // receiver is a process-wide channel, so drop rather than assert.
            tracing::warn!("press edge delivered while overlay already shown; dropping");
            return;
        }
        let Some(path) = self.rotation.current().map(PathBuf::from) else {
            tracing::info!("image catalog is empty; press ignored");
            return;
        };

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                // The show/hide cycle must not stall on presentation
                // failures; the overlay comes up blank instead.
                tracing::error!(path = %path.display(), error = %e, "failed to read image");
                Vec::new()
            }
        };

        tracing::debug!(path = %path.display(), index = self.rotation.index(), "showing overlay");
        surface.show(DisplayContent {
            source: path,
            bytes,
        });
        self.state = PresenterState::Shown;
        self.detector.arm(now, bindings);
    }

    /// Shown → Hidden. Hides the surface and advances the rotation.
    pub fn on_release_inferred<S: Surface>(&mut self, surface: &mut S) {
        surface.hide();
        self.state = PresenterState::Hidden;
        self.rotation.advance();
        tracing::debug!(index = self.rotation.index(), "overlay hidden, rotation advanced");
    }

    /// Tear down without emitting a release: cancel the poll, hide the
    /// surface if needed and drop every chord binding. Safe to call from any
    /// state.
    pub fn shutdown<B: ChordBindings, S: Surface>(&mut self, bindings: &mut B, surface: &mut S) {
        self.detector.disarm();
        if self.state == PresenterState::Shown {
            surface.hide();
            self.state = PresenterState::Hidden;
        }
        bindings.unregister_all();
        tracing::debug!("presenter shut down");
    }
}

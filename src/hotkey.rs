use anyhow::{anyhow, Context as _};
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

/// The chord that triggers the overlay: Ctrl+Shift+Space. The binding is
/// fixed; only the probe cadence is configurable.
pub fn press_chord() -> HotKey {
    HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::Space)
}

/// Access to the single chord-binding slot the detector alternates over.
///
/// `register` must report a contested chord as a synchronous `Err`; the
/// hold detector uses that refusal as its "still held" signal. `take_press`
/// drains the press edge latched since the last call, in the same
/// take-and-reset style as a trigger flag.
pub trait ChordBindings {
    fn register(&mut self) -> anyhow::Result<()>;
    fn unregister(&mut self) -> anyhow::Result<()>;
    /// Best-effort removal of every binding this slot ever installed.
    /// Failures are logged and swallowed; shutdown proceeds regardless.
    fn unregister_all(&mut self);
    fn take_press(&mut self) -> bool;
}

/// OS-backed bindings over [`GlobalHotKeyManager`]. Press edges arrive on the
/// crate's global event receiver and are drained non-blocking; release events
/// some platforms synthesise are ignored, the detector infers release itself.
pub struct SystemBindings {
    manager: GlobalHotKeyManager,
    chord: HotKey,
}

impl SystemBindings {
    pub fn new(chord: HotKey) -> anyhow::Result<Self> {
        let manager =
            GlobalHotKeyManager::new().context("failed to initialise global hotkey manager")?;
        Ok(Self { manager, chord })
    }
}

impl ChordBindings for SystemBindings {
    fn register(&mut self) -> anyhow::Result<()> {
        self.manager
            .register(self.chord)
            .map_err(|e| anyhow!("could not acquire chord binding: {e}"))
    }

    fn unregister(&mut self) -> anyhow::Result<()> {
        self.manager
            .unregister(self.chord)
            .map_err(|e| anyhow!("could not release chord binding: {e}"))
    }

    fn unregister_all(&mut self) {
        if let Err(e) = self.manager.unregister_all(&[self.chord]) {
            tracing::warn!(error = %e, "failed to unregister chord bindings at shutdown");
        }
    }

    fn take_press(&mut self) -> bool {
        let mut pressed = false;
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.id == self.chord.id() && event.state == HotKeyState::Pressed {
                pressed = true;
            }
        }
        pressed
    }
}

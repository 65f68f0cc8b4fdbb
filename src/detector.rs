use crate::hotkey::ChordBindings;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// No poll running; the permanent press binding owns the chord.
    Idle,
    /// A poll is running, probing for release.
    Armed,
}

/// The active recurring probe. At most one exists at a time; its absence is
/// what makes the detector idle.
#[derive(Debug)]
struct PollHandle {
    next_probe: Instant,
    interval: Duration,
}

/// Infers a held/released level signal for a global chord that only delivers
/// a press edge.
///
/// The OS refuses to hand out a hotkey binding while the chord is physically
/// held, so while armed the detector repeatedly tries to re-acquire the same
/// binding: refusal means the hold continues, success means the user let go.
/// The press binding is removed for the whole armed period: ownership of the
/// single binding slot alternates between the permanent press registration
/// (idle) and the transient probe (each armed tick), never both at once.
/// That also guarantees no second press edge can fire while a hold is being
/// resolved.
pub struct HoldDetector {
    interval: Duration,
    poll: Option<PollHandle>,
}

impl HoldDetector {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            poll: None,
        }
    }

    pub fn state(&self) -> DetectorState {
        if self.poll.is_some() {
            DetectorState::Armed
        } else {
            DetectorState::Idle
        }
    }

    /// Deadline of the pending probe, if armed. The event loop uses this to
    /// schedule its next wakeup.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.poll.as_ref().map(|p| p.next_probe)
    }

    /// Idle → Armed. Must be called right after a press edge fires, while
    /// the chord is still held. Releases the press binding and schedules the
    /// first probe one interval out.
    pub fn arm<B: ChordBindings>(&mut self, now: Instant, bindings: &mut B) {
        if self.poll.is_some() {
            tracing::warn!("arm requested while already armed; ignoring");
            return;
        }
        if let Err(e) = bindings.unregister() {
            tracing::warn!(error = %e, "failed to release press binding before probing");
        }
        self.poll = Some(PollHandle {
            next_probe: now + self.interval,
            interval: self.interval,
        });
        tracing::debug!(interval_ms = self.interval.as_millis() as u64, "hold detector armed");
    }

    /// Run one probe if armed and due. Returns `true` exactly once per arm
    /// cycle, on the tick where release is inferred; the poll handle is
    /// dropped before returning so no later tick can emit again.
    pub fn poll<B: ChordBindings>(&mut self, now: Instant, bindings: &mut B) -> bool {
        match self.poll.as_ref() {
            None => return false,
            Some(handle) if now < handle.next_probe => return false,
            Some(_) => {}
        }

        match bindings.register() {
            Ok(()) => {
                // The chord is free again, so the hold ended. Drop the
                // transient acquisition and restore the permanent press
                // binding before reporting.
                if let Err(e) = bindings.unregister() {
                    tracing::warn!(error = %e, "failed to drop transient chord acquisition");
                }
                self.poll = None;
                if let Err(e) = bindings.register() {
                    tracing::warn!(
                        error = %e,
                        "press binding could not be restored; chord inert until re-registration"
                    );
                }
                tracing::debug!("chord release inferred");
                true
            }
            Err(e) => {
                // Contention is the expected signal while the user holds the
                // chord, not an error condition.
                tracing::trace!(error = %e, "chord still contested; hold continues");
                if let Some(handle) = self.poll.as_mut() {
                    handle.next_probe = now + handle.interval;
                }
                false
            }
        }
    }

    /// Cancel any running poll without emitting a release. Shutdown only;
    /// the caller unregisters the bindings afterwards.
    pub fn disarm(&mut self) {
        if self.poll.take().is_some() {
            tracing::debug!("hold detector disarmed without release");
        }
    }
}

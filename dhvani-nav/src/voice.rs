//! Speech output routed through the announcement arbiter.

use crate::arbiter::{AnnouncementArbiter, ArbiterConfig, Tier};
use crate::host::{SpeechMode, SpeechSink};

/// What happened to a spoken cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueOutcome {
    /// Handed to the speech backend.
    Spoken,
    /// Blocked by a higher tier's cooldown.
    Suppressed,
    /// Speech is unavailable; the cue is dropped.
    Muted,
}

impl CueOutcome {
    /// Whether the cue was delivered.
    pub fn is_spoken(self) -> bool {
        self == CueOutcome::Spoken
    }
}

/// Gated speech output.
///
/// Owns the arbiter so every automatic cue passes the same cooldown gate.
/// A backend that reports itself unavailable mutes speech for the rest of
/// the session; navigation keeps running.
#[derive(Clone, Debug)]
pub struct Announcer {
    arbiter: AnnouncementArbiter,
    speech_available: bool,
}

impl Announcer {
    /// Create an announcer with an idle arbiter.
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            arbiter: AnnouncementArbiter::new(config),
            speech_available: true,
        }
    }

    /// The cooldown gate.
    pub fn arbiter(&self) -> &AnnouncementArbiter {
        &self.arbiter
    }

    /// Mutable access to the cooldown gate.
    pub fn arbiter_mut(&mut self) -> &mut AnnouncementArbiter {
        &mut self.arbiter
    }

    /// Whether speech is still available.
    pub fn speech_available(&self) -> bool {
        self.speech_available
    }

    /// Speak `text` at `tier` if the arbiter allows it, then stamp the tier.
    pub fn cue<S: SpeechSink + ?Sized>(
        &mut self,
        sink: &mut S,
        tier: Tier,
        text: &str,
        mode: SpeechMode,
        now_ms: u64,
    ) -> CueOutcome {
        if !self.arbiter.is_allowed(tier, now_ms) {
            log::debug!("Suppressed {} cue: {}", tier.name(), text);
            return CueOutcome::Suppressed;
        }

        let outcome = self.say(sink, text, mode);
        if outcome.is_spoken() {
            self.arbiter.record_fired(tier, now_ms);
        }
        outcome
    }

    /// Speak `text` without consulting the arbiter.
    ///
    /// Used for direct answers to player requests.
    pub fn say<S: SpeechSink + ?Sized>(&mut self, sink: &mut S, text: &str, mode: SpeechMode) -> CueOutcome {
        if !self.speech_available {
            return CueOutcome::Muted;
        }

        match sink.speak(text, mode) {
            Ok(()) => {
                log::info!("Speak: {}", text);
                CueOutcome::Spoken
            }
            Err(e) if e.is_recoverable() => {
                log::debug!("Speech rejected: {}", e);
                CueOutcome::Muted
            }
            Err(e) => {
                log::warn!("[{}] disabling speech: {}", e.code(), e);
                self.speech_available = false;
                CueOutcome::Muted
            }
        }
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(ArbiterConfig::default())
    }
}

//! Sound cue seam.
//!
//! The engine fires exactly one cue per interval transition; playback is a
//! fire-and-forget capability supplied by the embedding application.

/// Capability for interval-change audio cues.
pub trait SoundCue: Send + Sync {
    fn play_interval_change(&self);
}

/// No-op cue for headless use and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCue;

impl SoundCue for NullCue {
    fn play_interval_change(&self) {}
}

/// Cue that only logs. Useful as a CLI default.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCue;

impl SoundCue for LogCue {
    fn play_interval_change(&self) {
        log::debug!("interval change cue");
    }
}

//! Directional tone encoding and single-voice channel playback.
//!
//! A bearing becomes a stereo position, a pitch and a gain:
//!
//! - pan = clamp(a * pan_scale, -1, 1), monotonic in the angle offset `a`
//! - pitch = base * (1 + alignment_bonus(|a|)) + vertical_gain * v, clamped
//! - the alignment bonus peaks on target and steps down with |a|
//!
//! Every channel holds a single voice. A request on a channel that is
//! still sounding is dropped, never queued or interrupted.

use serde::{Deserialize, Serialize};

use crate::host::{Channel, ToneRequest, ToneSink};

/// Encoding parameters for one channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelProfile {
    /// Base pitch before category multipliers.
    /// Default: 1.0
    pub base_pitch: f32,

    /// Pan per unit of angle offset.
    /// Default: 2.0
    pub pan_scale: f32,

    /// Pitch bonus when |a| is below `center_width`.
    /// Default: 0.3
    pub center_bonus: f32,

    /// Angle offset treated as dead on target.
    /// Default: 0.1
    pub center_width: f32,

    /// Pitch bonus when |a| is below `near_width`.
    /// Default: 0.15
    pub near_bonus: f32,

    /// Angle offset treated as nearly on target.
    /// Default: 0.3
    pub near_width: f32,

    /// Pitch change per unit of vertical ratio.
    /// Default: 0.3
    pub vertical_gain: f32,

    /// Lowest playable pitch.
    /// Default: 0.5
    pub min_pitch: f32,

    /// Highest playable pitch.
    /// Default: 2.0
    pub max_pitch: f32,

    /// Output gain.
    /// Default: 0.4
    pub gain: f32,
}

impl Default for ChannelProfile {
    fn default() -> Self {
        Self::navigation()
    }
}

impl ChannelProfile {
    /// Target guidance channel.
    pub fn navigation() -> Self {
        Self {
            base_pitch: 1.0,
            pan_scale: 2.0,
            center_bonus: 0.3,
            center_width: 0.1,
            near_bonus: 0.15,
            near_width: 0.3,
            vertical_gain: 0.3,
            min_pitch: 0.5,
            max_pitch: 2.0,
            gain: 0.4,
        }
    }

    /// Threat radar channel. No alignment bonus; pitch comes from the threat kind.
    pub fn radar() -> Self {
        Self {
            base_pitch: 1.0,
            pan_scale: 1.0,
            center_bonus: 0.0,
            center_width: 0.0,
            near_bonus: 0.0,
            near_width: 0.0,
            vertical_gain: 0.3,
            min_pitch: 0.4,
            max_pitch: 2.5,
            gain: 0.35,
        }
    }

    /// Pitch bonus for an angle offset.
    pub fn alignment_bonus(&self, offset: f32) -> f32 {
        let a = offset.abs();
        if a < self.center_width {
            self.center_bonus
        } else if a < self.near_width {
            self.near_bonus
        } else {
            0.0
        }
    }

    /// Encode an angle offset and vertical ratio into a tone request.
    ///
    /// `multiplier` scales the base pitch (e.g. per threat kind) and
    /// `gain_scale` scales the channel gain (e.g. by distance).
    pub fn encode(&self, offset: f32, vertical: f32, multiplier: f32, gain_scale: f32) -> ToneRequest {
        let offset = offset.clamp(-1.0, 1.0);
        let vertical = vertical.clamp(-1.0, 1.0);
        let base = self.base_pitch * multiplier;
        let pitch = base * (1.0 + self.alignment_bonus(offset)) + self.vertical_gain * vertical;

        ToneRequest {
            pan: (offset * self.pan_scale).clamp(-1.0, 1.0),
            elevation: vertical,
            pitch: pitch.clamp(self.min_pitch, self.max_pitch),
            gain: (self.gain * gain_scale).clamp(0.0, 1.0),
        }
    }
}

/// View-pitch indicator settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchIndicatorConfig {
    /// Pitch angle treated as level (radians).
    /// Default: 0.26 (~15 degrees)
    pub level_threshold: f32,

    /// Pitch change per unit of normalized view pitch.
    /// Default: 0.5
    pub pitch_scale: f32,

    /// Gain of the off-level tone.
    /// Default: 0.3
    pub gain: f32,

    /// Repeat the off-level tone every this many evaluations.
    /// Default: 3
    pub repeat_every: u32,

    /// Pitch of the tone played on returning to level.
    /// Default: 1.5
    pub centering_pitch: f32,

    /// Gain of the centering tone.
    /// Default: 0.4
    pub centering_gain: f32,
}

impl Default for PitchIndicatorConfig {
    fn default() -> Self {
        Self {
            level_threshold: 0.26,
            pitch_scale: 0.5,
            gain: 0.3,
            repeat_every: 3,
            centering_pitch: 1.5,
            centering_gain: 0.4,
        }
    }
}

/// Tone channel configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Navigation guidance channel.
    pub navigation: ChannelProfile,

    /// Threat radar channel.
    pub radar: ChannelProfile,

    /// Whether the radar channel runs at all.
    /// Default: true
    pub radar_enabled: bool,

    /// Radar detection range.
    /// Default: 50000
    pub radar_range: f32,

    /// Lowest distance attenuation applied to radar gain.
    /// Default: 0.2
    pub radar_min_gain_factor: f32,

    /// View pitch indicator.
    pub pitch_indicator: PitchIndicatorConfig,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            navigation: ChannelProfile::navigation(),
            radar: ChannelProfile::radar(),
            radar_enabled: true,
            radar_range: 50_000.0,
            radar_min_gain_factor: 0.2,
            pitch_indicator: PitchIndicatorConfig::default(),
        }
    }
}

impl ToneConfig {
    /// Radar gain attenuation for a threat at `distance`.
    pub fn radar_gain_scale(&self, distance: f32) -> f32 {
        if self.radar_range <= 0.0 {
            return 1.0;
        }
        (1.0 - distance / self.radar_range).clamp(self.radar_min_gain_factor, 1.0)
    }
}

/// What happened to a tone request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneOutcome {
    /// Handed to the backend.
    Played,
    /// Dropped because the channel is still sounding.
    Busy,
    /// Dropped because the channel's backend failed earlier.
    Disabled,
    /// The backend rejected this request.
    Failed,
}

/// Plays encoded tones on exclusive channels.
#[derive(Clone, Debug)]
pub struct ToneEncoder {
    config: ToneConfig,
    disabled: [bool; 3],
}

impl ToneEncoder {
    /// Create an encoder with every channel enabled.
    pub fn new(config: ToneConfig) -> Self {
        Self {
            config,
            disabled: [false; 3],
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    /// Whether `channel` has been disabled by a backend failure.
    pub fn is_disabled(&self, channel: Channel) -> bool {
        self.disabled[Self::slot(channel)]
    }

    /// Play `request` on `channel` unless it is busy or disabled.
    pub fn play<S: ToneSink + ?Sized>(
        &mut self,
        sink: &mut S,
        channel: Channel,
        request: ToneRequest,
    ) -> ToneOutcome {
        let slot = Self::slot(channel);
        if self.disabled[slot] {
            return ToneOutcome::Disabled;
        }
        if sink.is_playing(channel) {
            return ToneOutcome::Busy;
        }

        match sink.play_tone(channel, request) {
            Ok(()) => ToneOutcome::Played,
            Err(e) if e.is_recoverable() => {
                log::debug!("{} tone rejected: {}", channel.name(), e);
                ToneOutcome::Failed
            }
            Err(e) => {
                log::warn!(
                    "[{}] disabling {} tone channel: {}",
                    e.code(),
                    channel.name(),
                    e
                );
                self.disabled[slot] = true;
                ToneOutcome::Disabled
            }
        }
    }

    /// Encode and play a navigation tone.
    pub fn play_navigation<S: ToneSink + ?Sized>(
        &mut self,
        sink: &mut S,
        offset: f32,
        vertical: f32,
    ) -> ToneOutcome {
        let request = self.config.navigation.encode(offset, vertical, 1.0, 1.0);
        self.play(sink, Channel::Navigation, request)
    }

    /// Encode and play a radar tone for a threat at `distance`.
    pub fn play_radar<S: ToneSink + ?Sized>(
        &mut self,
        sink: &mut S,
        offset: f32,
        vertical: f32,
        multiplier: f32,
        distance: f32,
    ) -> ToneOutcome {
        let gain_scale = self.config.radar_gain_scale(distance);
        let request = self
            .config
            .radar
            .encode(offset, vertical, multiplier, gain_scale);
        self.play(sink, Channel::Radar, request)
    }

    fn slot(channel: Channel) -> usize {
        match channel {
            Channel::Radar => 0,
            Channel::PitchIndicator => 1,
            Channel::Navigation => 2,
        }
    }
}

/// View pitch zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitchZone {
    Level,
    Up,
    Down,
}

/// Tracks view pitch and decides when the indicator should sound.
#[derive(Clone, Debug)]
pub struct PitchIndicator {
    config: PitchIndicatorConfig,
    zone: PitchZone,
    evaluations: u32,
}

impl PitchIndicator {
    /// Create an indicator that assumes a level view.
    pub fn new(config: PitchIndicatorConfig) -> Self {
        Self {
            config,
            zone: PitchZone::Level,
            evaluations: 0,
        }
    }

    /// Current zone.
    pub fn zone(&self) -> PitchZone {
        self.zone
    }

    /// Evaluate a view pitch (radians). Returns a tone to play, if any.
    pub fn update(&mut self, pitch: f32) -> Option<ToneRequest> {
        let zone = if pitch > self.config.level_threshold {
            PitchZone::Up
        } else if pitch < -self.config.level_threshold {
            PitchZone::Down
        } else {
            PitchZone::Level
        };

        let changed = zone != self.zone;
        self.zone = zone;
        self.evaluations = if changed { 0 } else { self.evaluations + 1 };

        if zone == PitchZone::Level {
            return changed.then(|| self.centering_tone());
        }

        let repeat = self.config.repeat_every.max(1);
        if changed || self.evaluations % repeat == 0 {
            let normalized = (pitch / std::f32::consts::PI).clamp(-1.0, 1.0);
            Some(ToneRequest {
                pan: 0.0,
                elevation: normalized,
                pitch: 1.0 + normalized * self.config.pitch_scale,
                gain: self.config.gain,
            })
        } else {
            None
        }
    }

    /// Tone confirming the view is level again.
    pub fn centering_tone(&self) -> ToneRequest {
        ToneRequest {
            pan: 0.0,
            elevation: 0.0,
            pitch: self.config.centering_pitch,
            gain: self.config.centering_gain,
        }
    }
}

//! Priority and cooldown gate for voice and tone cues.
//!
//! Four ordered tiers. A cue may fire only when no strictly higher tier
//! fired within that tier's cooldown window. Suppressed cues are dropped,
//! not queued, so bursts collapse to the most relevant cue.

use serde::{Deserialize, Serialize};

/// Announcement priority tier, highest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Damage, imminent danger, unrecoverable navigation failure.
    Critical,
    /// Collision alerts, arrivals.
    High,
    /// Strategy changes, door and lift events.
    Normal,
    /// Progress chatter and guidance tones.
    Low,
}

impl Tier {
    /// Tier name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Tier::Critical => "critical",
            Tier::High => "high",
            Tier::Normal => "normal",
            Tier::Low => "low",
        }
    }
}

/// Cooldown windows, in milliseconds, measured from the last firing of a tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Window after a CRITICAL cue during which lower tiers are blocked.
    /// Default: 600
    pub critical_cooldown_ms: u64,

    /// Window after a HIGH cue during which NORMAL and LOW are blocked.
    /// Default: 400
    pub high_cooldown_ms: u64,

    /// Window after a NORMAL cue during which LOW is blocked.
    /// Default: 200
    pub normal_cooldown_ms: u64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            critical_cooldown_ms: 600,
            high_cooldown_ms: 400,
            normal_cooldown_ms: 200,
        }
    }
}

/// Last-fired timestamps per gating tier.
#[derive(Clone, Debug)]
pub struct AnnouncementArbiter {
    config: ArbiterConfig,
    last_critical: Option<u64>,
    last_high: Option<u64>,
    last_normal: Option<u64>,
}

impl AnnouncementArbiter {
    /// Create an arbiter with nothing fired yet.
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config,
            last_critical: None,
            last_high: None,
            last_normal: None,
        }
    }

    /// Whether a cue of `tier` may fire at `now_ms`.
    pub fn is_allowed(&self, tier: Tier, now_ms: u64) -> bool {
        let within = |last: Option<u64>, window: u64| {
            last.is_some_and(|t| now_ms.saturating_sub(t) < window)
        };

        let critical = within(self.last_critical, self.config.critical_cooldown_ms);
        let high = within(self.last_high, self.config.high_cooldown_ms);
        let normal = within(self.last_normal, self.config.normal_cooldown_ms);

        match tier {
            Tier::Critical => true,
            Tier::High => !critical,
            Tier::Normal => !critical && !high,
            Tier::Low => !critical && !high && !normal,
        }
    }

    /// Stamp `tier` as fired at `now_ms`. LOW gates nothing and is not stored.
    pub fn record_fired(&mut self, tier: Tier, now_ms: u64) {
        match tier {
            Tier::Critical => self.last_critical = Some(now_ms),
            Tier::High => self.last_high = Some(now_ms),
            Tier::Normal => self.last_normal = Some(now_ms),
            Tier::Low => {}
        }
    }

    /// Forget all timestamps.
    pub fn reset(&mut self) {
        self.last_critical = None;
        self.last_high = None;
        self.last_normal = None;
    }

    /// Active configuration.
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }
}

impl Default for AnnouncementArbiter {
    fn default() -> Self {
        Self::new(ArbiterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_fired_allows_everything() {
        let arbiter = AnnouncementArbiter::default();
        for tier in [Tier::Critical, Tier::High, Tier::Normal, Tier::Low] {
            assert!(arbiter.is_allowed(tier, 0));
        }
    }

    #[test]
    fn test_critical_blocks_high_for_window() {
        let mut arbiter = AnnouncementArbiter::default();
        arbiter.record_fired(Tier::Critical, 1000);

        for t in [1001, 1200, 1400, 1599] {
            assert!(!arbiter.is_allowed(Tier::High, t), "t={}", t);
        }
        assert!(arbiter.is_allowed(Tier::High, 1600));
        assert!(arbiter.is_allowed(Tier::High, 1700));
        assert!(arbiter.is_allowed(Tier::Critical, 1001));
    }

    #[test]
    fn test_high_blocks_lower_tiers_only() {
        let mut arbiter = AnnouncementArbiter::default();
        arbiter.record_fired(Tier::High, 5000);

        assert!(arbiter.is_allowed(Tier::High, 5100));
        assert!(!arbiter.is_allowed(Tier::Normal, 5100));
        assert!(!arbiter.is_allowed(Tier::Low, 5399));
        assert!(arbiter.is_allowed(Tier::Normal, 5400));
    }

    #[test]
    fn test_normal_blocks_low() {
        let mut arbiter = AnnouncementArbiter::default();
        arbiter.record_fired(Tier::Normal, 100);
        assert!(arbiter.is_allowed(Tier::Normal, 150));
        assert!(!arbiter.is_allowed(Tier::Low, 250));
        assert!(arbiter.is_allowed(Tier::Low, 300));
    }

    #[test]
    fn test_low_never_gates() {
        let mut arbiter = AnnouncementArbiter::default();
        arbiter.record_fired(Tier::Low, 100);
        assert!(arbiter.is_allowed(Tier::Low, 101));
    }

    #[test]
    fn test_reset_clears_windows() {
        let mut arbiter = AnnouncementArbiter::default();
        arbiter.record_fired(Tier::Critical, 100);
        arbiter.reset();
        assert!(arbiter.is_allowed(Tier::Low, 101));
    }
}

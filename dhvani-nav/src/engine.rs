//! Navigation engine: per-tick pipeline and player triggers.
//!
//! One [`NavigationEngine::tick`] per host frame runs, in order:
//!
//! ```text
//! obstruction scan (every 10) -> radar tone (every 30) -> pitch indicator (every 20)
//!     -> locomotion controller (every tick)
//! ```
//!
//! Sensing runs before the controller so steering always sees the latest
//! scan. Triggers are answered immediately and bypass the arbiter.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::arbiter::Tier;
use crate::config::NavConfig;
use crate::core::{Bearing, Cadence};
use crate::host::{Channel, Host, SpeechMode};
use crate::navigation::{LocomotionController, NavigationState, NavigationStep, TickContext};
use crate::report::{Survey, target_announcement};
use crate::sensor::{AlertKind, ObstacleSensor, ObstructionMonitor, ObstructionState};
use crate::target::{Target, TargetSelector};
use crate::tone::{PitchIndicator, ToneEncoder, ToneOutcome};
use crate::voice::Announcer;

const NO_PLAYER_MESSAGE: &str = "Cannot detect: player unavailable.";

/// Player-initiated request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    ToggleEnabled,
    ToggleAutoRotate,
    ToggleAutoMove,
    CycleTargetCategory,
    FindTarget,
    AnnounceAhead,
    AnnounceSurroundings,
    ToggleObstructionAlerts,
    DescribeEnvironment,
    ScanInteractives,
    RadarScan,
}

impl Trigger {
    /// Every trigger, in key-binding order.
    pub const ALL: [Trigger; 11] = [
        Trigger::ToggleEnabled,
        Trigger::ToggleAutoRotate,
        Trigger::ToggleAutoMove,
        Trigger::CycleTargetCategory,
        Trigger::FindTarget,
        Trigger::AnnounceAhead,
        Trigger::AnnounceSurroundings,
        Trigger::ToggleObstructionAlerts,
        Trigger::DescribeEnvironment,
        Trigger::ScanInteractives,
        Trigger::RadarScan,
    ];

    /// Trigger name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Trigger::ToggleEnabled => "toggle-enabled",
            Trigger::ToggleAutoRotate => "toggle-auto-rotate",
            Trigger::ToggleAutoMove => "toggle-auto-move",
            Trigger::CycleTargetCategory => "cycle-target-category",
            Trigger::FindTarget => "find-target",
            Trigger::AnnounceAhead => "announce-ahead",
            Trigger::AnnounceSurroundings => "announce-surroundings",
            Trigger::ToggleObstructionAlerts => "toggle-obstruction-alerts",
            Trigger::DescribeEnvironment => "describe-environment",
            Trigger::ScanInteractives => "scan-interactives",
            Trigger::RadarScan => "radar-scan",
        }
    }
}

/// Everything one engine tick did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Locomotion result.
    pub navigation: NavigationStep,
    /// Collision alert that passed the debounce this tick.
    pub alert: Option<AlertKind>,
    /// Radar tone attempt.
    pub radar: Option<ToneOutcome>,
    /// Pitch indicator tone attempt.
    pub pitch: Option<ToneOutcome>,
}

/// Owns every navigation component and drives them from host ticks.
#[derive(Clone, Debug)]
pub struct NavigationEngine {
    config: NavConfig,
    sensor: ObstacleSensor,
    selector: TargetSelector,
    obstruction: ObstructionMonitor,
    announcer: Announcer,
    tones: ToneEncoder,
    pitch: PitchIndicator,
    controller: LocomotionController,

    obstruction_scan: Cadence,
    radar_sweep: Cadence,
    pitch_check: Cadence,

    /// Last look-ahead text and when it was spoken.
    last_ahead: Option<(String, u64)>,
}

impl NavigationEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: NavConfig) -> Self {
        let controller = LocomotionController::new(
            config.to_locomotion_config(),
            config.history.clone(),
            &config.cadence,
        );

        Self {
            sensor: ObstacleSensor::new(config.sensor.clone()),
            selector: TargetSelector::new(config.selector.clone()),
            obstruction: ObstructionMonitor::new(config.obstruction.clone()),
            announcer: Announcer::new(config.arbiter.clone()),
            tones: ToneEncoder::new(config.tones.clone()),
            pitch: PitchIndicator::new(config.tones.pitch_indicator.clone()),
            controller,
            obstruction_scan: Cadence::every(config.cadence.obstruction),
            radar_sweep: Cadence::every(config.cadence.radar),
            pitch_check: Cadence::every(config.cadence.pitch),
            last_ahead: None,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Navigation flags and target.
    pub fn state(&self) -> &NavigationState {
        self.controller.state()
    }

    /// Locomotion controller.
    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    /// Latest obstruction scan.
    pub fn obstruction(&self) -> &ObstructionState {
        self.obstruction.state()
    }

    /// Gated speech.
    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    /// Tone channels.
    pub fn tones(&self) -> &ToneEncoder {
        &self.tones
    }

    /// Record a cue the host spoke itself (damage, pickups) so navigation
    /// chatter yields to it.
    pub fn record_external(&mut self, tier: Tier, now_ms: u64) {
        log::debug!("External {} cue at {}", tier.name(), now_ms);
        self.announcer.arbiter_mut().record_fired(tier, now_ms);
    }

    /// Run one frame.
    pub fn tick<H: Host>(&mut self, host: &mut H, now_ms: u64) -> TickReport {
        let pose = host.player_position().zip(host.player_orientation());

        let mut alert = None;
        if self.obstruction_scan.tick() {
            if let Some((feet, orientation)) = pose {
                alert = self.obstruction.update(
                    &*host,
                    &self.sensor,
                    feet,
                    orientation,
                    self.announcer.arbiter(),
                    now_ms,
                );
                if let Some(kind) = alert {
                    self.announcer
                        .cue(host, Tier::High, kind.message(), SpeechMode::Queued, now_ms);
                }
            }
        }

        let radar = if self.radar_sweep.tick() {
            pose.and_then(|(feet, orientation)| self.sweep_radar(host, feet, orientation, now_ms))
        } else {
            None
        };

        let pitch = if self.pitch_check.tick() {
            self.check_pitch(host)
        } else {
            None
        };

        let navigation = self.controller.update(
            host,
            TickContext {
                sensor: &self.sensor,
                selector: &self.selector,
                obstruction: self.obstruction.state(),
                announcer: &mut self.announcer,
                tones: &mut self.tones,
                now_ms,
            },
        );

        TickReport {
            navigation,
            alert,
            radar,
            pitch,
        }
    }

    /// Answer a player request. Returns the texts handed to speech.
    pub fn handle_trigger<H: Host>(&mut self, trigger: Trigger, host: &mut H, now_ms: u64) -> Vec<String> {
        log::info!("Trigger: {}", trigger.name());
        let mut said = Vec::new();

        match trigger {
            Trigger::ToggleEnabled => self.toggle_enabled(host, now_ms, &mut said),
            Trigger::ToggleAutoRotate => {
                let on = self.controller.toggle_auto_rotate();
                self.respond(host, &toggle_message("Auto-rotation", on), &mut said);
            }
            Trigger::ToggleAutoMove => {
                let on = self.controller.toggle_auto_move();
                self.respond(host, &toggle_message("Auto-movement", on), &mut said);
            }
            Trigger::ToggleObstructionAlerts => {
                let on = self.obstruction.toggle_alerts();
                self.respond(host, &toggle_message("Obstruction alerts", on), &mut said);
            }
            Trigger::CycleTargetCategory => {
                let category = self.controller.cycle_category();
                self.respond(host, &format!("Now targeting: {}.", category.name()), &mut said);
                if let Some(target) = self.acquire(host, now_ms) {
                    self.announce_target(host, &target, &mut said);
                }
            }
            Trigger::FindTarget => match self.acquire(host, now_ms) {
                Some(target) => self.announce_target(host, &target, &mut said),
                None => {
                    let category = self.controller.state().category;
                    self.respond(host, &format!("No {} found nearby.", category.name()), &mut said);
                }
            },
            Trigger::AnnounceAhead => self.announce_ahead(host, now_ms, &mut said),
            Trigger::AnnounceSurroundings
            | Trigger::DescribeEnvironment
            | Trigger::ScanInteractives
            | Trigger::RadarScan => {
                let text = self.survey_report(trigger, &*host);
                self.respond(host, &text, &mut said);
            }
        }

        said
    }

    fn toggle_enabled<H: Host>(&mut self, host: &mut H, now_ms: u64, said: &mut Vec<String>) {
        if self.controller.state().enabled {
            self.controller.disable();
            self.respond(host, "Auto-navigation disabled.", said);
            return;
        }

        self.controller.enable();
        match self.acquire(host, now_ms) {
            Some(target) => {
                let category = self.controller.state().category;
                let text = format!("Auto-navigation enabled. Targeting {}.", category.name());
                self.respond(host, &text, said);
                self.announce_target(host, &target, said);
            }
            None => self.respond(host, "Auto-navigation enabled. No target found.", said),
        }
    }

    fn acquire<H: Host>(&mut self, host: &H, now_ms: u64) -> Option<Target> {
        let feet = host.player_position()?;
        let faction = host.player_faction();
        self.controller
            .acquire_target(host, &self.selector, feet, faction, now_ms)
    }

    /// Speak where the target is and sound the navigation tone towards it.
    fn announce_target<H: Host>(&mut self, host: &mut H, target: &Target, said: &mut Vec<String>) {
        let Some((feet, orientation)) = host.player_position().zip(host.player_orientation()) else {
            return;
        };
        let text = target_announcement(target, feet, orientation);
        self.speak(host, &text, SpeechMode::Queued, said);

        let bearing = Bearing::between(feet, orientation, target.position);
        self.tones
            .play_navigation(host, bearing.angle_offset(), bearing.vertical_ratio);
    }

    fn announce_ahead<H: Host>(&mut self, host: &mut H, now_ms: u64, said: &mut Vec<String>) {
        let Some((feet, orientation)) = host.player_position().zip(host.player_orientation()) else {
            self.respond(host, NO_PLAYER_MESSAGE, said);
            return;
        };

        let report = self
            .survey(&*host, feet, orientation)
            .ahead(&self.config.navigation.interact_key);

        let repeat_ms = self.config.reports.repeat_ms;
        let repeated = self.last_ahead.as_ref().is_some_and(|(text, at)| {
            *text == report.text && now_ms.saturating_sub(*at) < repeat_ms
        });

        if repeated {
            log::debug!("Repeated look-ahead, tone only");
        } else {
            self.respond(host, &report.text, said);
            self.last_ahead = Some((report.text, now_ms));
        }

        if report.hit {
            self.tones.play_navigation(host, 0.0, 0.0);
        }
    }

    fn survey_report<H: Host>(&self, trigger: Trigger, host: &H) -> String {
        let Some((feet, orientation)) = host.player_position().zip(host.player_orientation()) else {
            return NO_PLAYER_MESSAGE.to_string();
        };
        let survey = self.survey(host, feet, orientation);
        let faction = host.player_faction();
        let radar_range = self.config.tones.radar_range;

        match trigger {
            Trigger::AnnounceSurroundings => survey.surroundings(),
            Trigger::DescribeEnvironment => survey.environment(faction),
            Trigger::ScanInteractives => survey.interactives(&self.selector, radar_range * 2.0),
            _ => survey.radar(faction, radar_range),
        }
    }

    fn survey<'a, H: Host>(&'a self, host: &'a H, feet: Vec3, orientation: Mat3) -> Survey<'a, H> {
        Survey::new(host, &self.sensor, &self.config.reports, feet, orientation)
    }

    fn sweep_radar<H: Host>(
        &mut self,
        host: &mut H,
        feet: Vec3,
        orientation: Mat3,
        now_ms: u64,
    ) -> Option<ToneOutcome> {
        if !self.tones.config().radar_enabled || !self.announcer.arbiter().is_allowed(Tier::Low, now_ms) {
            return None;
        }

        let faction = host.player_faction();
        let range = self.tones.config().radar_range;
        let threat = self.selector.nearest_threat(&*host, feet, faction, range)?;
        let bearing = Bearing::between(feet, orientation, threat.position);

        Some(self.tones.play_radar(
            host,
            bearing.angle_offset(),
            bearing.vertical_ratio,
            threat.kind.info().pitch_multiplier,
            threat.distance,
        ))
    }

    fn check_pitch<H: Host>(&mut self, host: &mut H) -> Option<ToneOutcome> {
        let pitch = host.view_pitch()?;
        let request = self.pitch.update(pitch)?;
        Some(self.tones.play(host, Channel::PitchIndicator, request))
    }

    /// First answer to a trigger interrupts whatever is being said.
    fn respond<H: Host>(&mut self, host: &mut H, text: &str, said: &mut Vec<String>) {
        let mode = if said.is_empty() {
            SpeechMode::Immediate
        } else {
            SpeechMode::Queued
        };
        self.speak(host, text, mode, said);
    }

    fn speak<H: Host>(&mut self, host: &mut H, text: &str, mode: SpeechMode, said: &mut Vec<String>) {
        self.announcer.say(host, text, mode);
        said.push(text.to_string());
    }
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

fn toggle_message(feature: &str, on: bool) -> String {
    format!("{} {}.", feature, if on { "enabled" } else { "disabled" })
}

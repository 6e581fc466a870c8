//! Closed-loop simulation: scenario events, engine ticks and world steps.
//!
//! One simulation step:
//!
//! ```text
//! due events -> NavigationEngine::tick(world, now) -> SimWorld::step(tick_ms)
//! ```

use dhvani_nav::navigation::Escalation;
use dhvani_nav::{NavConfig, NavigationEngine, TickReport};
use glam::Vec3;

use crate::error::Result;
use crate::scenario::{EventAction, Scenario};
use crate::world::SimWorld;

/// Result of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOutcome {
    pub scenario: String,
    pub ticks: u32,
    pub elapsed_ms: u64,
    /// Time the target was first reached
    pub arrived_at_ms: Option<u64>,
    /// Whether the engine abandoned the target
    pub gave_up: bool,
    /// Every escalation with its time
    pub escalations: Vec<(u64, Escalation)>,
    pub final_position: Vec3,
    /// Spoken texts in order
    pub spoken: Vec<String>,
}

impl SimOutcome {
    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        let result = match (self.arrived_at_ms, self.gave_up) {
            (Some(at), _) => format!("arrived at {} ms", at),
            (None, true) => "gave up".to_string(),
            (None, false) => "did not arrive".to_string(),
        };
        format!(
            "{}: {} after {} ticks, {} escalations, final position ({:.0}, {:.0}, {:.0})",
            self.scenario,
            result,
            self.ticks,
            self.escalations.len(),
            self.final_position.x,
            self.final_position.y,
            self.final_position.z
        )
    }
}

/// Engine and world stepped in lockstep.
pub struct Simulation {
    name: String,
    tick_ms: u64,
    stop_when_done: bool,
    world: SimWorld,
    engine: NavigationEngine,
    schedule: Vec<(u64, EventAction)>,
    next_event: usize,
    ticks: u32,
    escalations: Vec<(u64, Escalation)>,
    arrived_at_ms: Option<u64>,
    gave_up: bool,
}

impl Simulation {
    /// Simulation using the scenario's own engine configuration.
    pub fn new(scenario: &Scenario) -> Result<Self> {
        Self::with_config(scenario, scenario.nav.clone())
    }

    /// Simulation with an explicit engine configuration.
    pub fn with_config(scenario: &Scenario, nav: NavConfig) -> Result<Self> {
        Ok(Self {
            name: scenario.name.clone(),
            tick_ms: scenario.tick_ms,
            stop_when_done: scenario.stop_when_done,
            world: scenario.build_world(),
            engine: NavigationEngine::new(nav),
            schedule: scenario.schedule()?,
            next_event: 0,
            ticks: 0,
            escalations: Vec::new(),
            arrived_at_ms: None,
            gave_up: false,
        })
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    /// Whether the run has nothing left to show.
    pub fn is_done(&self) -> bool {
        let settled = self.gave_up || self.engine.state().arrival_announced;
        settled && self.next_event >= self.schedule.len()
    }

    /// Run one step.
    pub fn step(&mut self) -> TickReport {
        let now = self.world.now_ms();
        self.apply_due_events(now);

        let report = self.engine.tick(&mut self.world, now);
        self.ticks += 1;

        if let Some((cause, escalation)) = report.navigation.escalation {
            tracing::info!(at_ms = now, cause = cause.name(), "Escalation: {:?}", escalation);
            self.escalations.push((now, escalation));
            if matches!(escalation, Escalation::GaveUp { .. }) {
                self.gave_up = true;
            }
        }
        if report.navigation.arrived && self.arrived_at_ms.is_none() {
            tracing::info!(at_ms = now, "Target reached");
            self.arrived_at_ms = Some(now);
        }

        self.world.step(self.tick_ms);
        report
    }

    /// Step until done or `max_ticks` pass.
    pub fn run(&mut self, max_ticks: u32) -> SimOutcome {
        for _ in 0..max_ticks {
            self.step();
            if self.stop_when_done && self.is_done() {
                break;
            }
        }
        self.outcome()
    }

    /// Snapshot of the run so far.
    pub fn outcome(&self) -> SimOutcome {
        SimOutcome {
            scenario: self.name.clone(),
            ticks: self.ticks,
            elapsed_ms: self.world.now_ms(),
            arrived_at_ms: self.arrived_at_ms,
            gave_up: self.gave_up,
            escalations: self.escalations.clone(),
            final_position: self.world.player.position,
            spoken: self.world.spoken().map(str::to_string).collect(),
        }
    }

    fn apply_due_events(&mut self, now: u64) {
        while let Some(&(at, action)) = self.schedule.get(self.next_event) {
            if at > now {
                break;
            }
            self.next_event += 1;

            match action {
                EventAction::Trigger(trigger) => {
                    self.engine.handle_trigger(trigger, &mut self.world, now);
                }
                EventAction::Interact => {
                    if self.world.interact().is_none() {
                        tracing::info!(at_ms = now, "Interact: nothing in reach");
                    }
                }
                EventAction::Remove(id) => {
                    if !self.world.remove_entity(id) {
                        tracing::warn!("Remove: no entity {:?}", id);
                    }
                }
                EventAction::Pitch(pitch) => self.world.player.pitch = pitch,
                EventAction::Kill => {
                    tracing::info!(at_ms = now, "Player killed");
                    self.world.player.alive = false;
                }
            }
        }
    }
}

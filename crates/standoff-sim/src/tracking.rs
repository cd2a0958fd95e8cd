//! TTI tracking engine.
//!
//! Every enrolled munition gets its own recurring check, due one interval
//! after enrollment. A check that finds the munition still closing on its
//! target reports the TTI and re-enqueues itself; any other outcome is
//! terminal: the entry is removed and never checked again.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, info, trace};

use standoff_core::enums::{Audience, MunitionState};
use standoff_core::types::{secs_to_ticks, ObjectHandle, Position, Velocity};

use crate::host::{NotificationSink, Telemetry};

/// One munition in flight under TTI observation.
#[derive(Debug, Clone)]
pub struct TrackedMunition {
    /// Session-unique display number.
    pub id: u32,
    pub handle: ObjectHandle,
    /// Aim point copied at enrollment; never re-read.
    pub target: Position,
    pub audience: Audience,
    pub launched_by: String,
    pub enrolled_tick: u64,
    pub last_tti_secs: Option<f64>,
}

/// Outcome of one recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TtiStep {
    /// Still closing; check again after the interval.
    Closing {
        tti_secs: f64,
        distance: f64,
        closing_speed: f64,
    },
    ObjectGone,
    VelocityUnavailable,
    Arrived,
    NotClosing { closing_speed: f64 },
}

impl TtiStep {
    /// State the munition is in after this step.
    pub fn state(&self) -> MunitionState {
        match self {
            TtiStep::Closing { .. } => MunitionState::Active,
            TtiStep::Arrived => MunitionState::Impacted,
            TtiStep::ObjectGone | TtiStep::VelocityUnavailable => MunitionState::Lost,
            TtiStep::NotClosing { .. } => MunitionState::Unresolvable,
        }
    }

    /// Text reported to the munition's audience.
    pub fn message(&self, id: u32) -> String {
        match self {
            TtiStep::Closing { tti_secs, .. } => format!("Munition #{id} TTI {tti_secs:.1} seconds"),
            TtiStep::ObjectGone => format!("Munition #{id} no longer exists"),
            TtiStep::VelocityUnavailable => format!("Munition #{id}: unable to retrieve velocity"),
            TtiStep::Arrived => format!("Munition #{id} has reached its target"),
            TtiStep::NotClosing { .. } => format!("Munition #{id}: unable to calculate TTI"),
        }
    }
}

/// A munition that reached a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub id: u32,
    pub handle: ObjectHandle,
    pub state: MunitionState,
}

/// Time to impact from a kinematic sample. Only the velocity component
/// directed at the target counts.
pub fn time_to_impact(position: Position, velocity: Velocity, target: Position) -> TtiStep {
    let offset = target.to_dvec3() - position.to_dvec3();
    let distance = offset.length();
    if distance == 0.0 {
        return TtiStep::Arrived;
    }
    let direction = offset / distance;
    let closing_speed = velocity.to_dvec3().dot(direction);
    if closing_speed > 0.0 {
        TtiStep::Closing {
            tti_secs: distance / closing_speed,
            distance,
            closing_speed,
        }
    } else {
        TtiStep::NotClosing { closing_speed }
    }
}

/// Sample telemetry for `handle` and evaluate it against `target`.
pub fn recompute(handle: ObjectHandle, target: Position, telemetry: &impl Telemetry) -> TtiStep {
    if !telemetry.object_exists(handle) {
        return TtiStep::ObjectGone;
    }
    let Some(position) = telemetry.position(handle) else {
        return TtiStep::ObjectGone;
    };
    let Some(velocity) = telemetry.velocity(handle) else {
        return TtiStep::VelocityUnavailable;
    };
    time_to_impact(position, velocity, target)
}

/// Owns every tracked munition and the queue of their pending checks.
#[derive(Debug)]
pub struct TtiTracker {
    entries: HashMap<ObjectHandle, TrackedMunition>,
    /// Min-heap of (due tick, munition id, handle).
    schedule: BinaryHeap<Reverse<(u64, u32, ObjectHandle)>>,
    interval_ticks: u64,
    next_id: u32,
}

impl TtiTracker {
    pub fn new(interval_secs: f64) -> Self {
        Self {
            entries: HashMap::new(),
            schedule: BinaryHeap::new(),
            interval_ticks: secs_to_ticks(interval_secs),
            next_id: 1,
        }
    }

    pub fn interval_ticks(&self) -> u64 {
        self.interval_ticks
    }

    /// Start tracking `handle` toward `target`. The first check is due one
    /// interval from `now_tick`. Returns the assigned display id.
    pub fn enroll(
        &mut self,
        handle: ObjectHandle,
        target: Position,
        audience: Audience,
        launched_by: &str,
        now_tick: u64,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let munition = TrackedMunition {
            id,
            handle,
            target,
            audience,
            launched_by: launched_by.to_string(),
            enrolled_tick: now_tick,
            last_tti_secs: None,
        };
        if let Some(replaced) = self.entries.insert(handle, munition) {
            debug!(handle = %handle, replaced = replaced.id, "handle re-enrolled, old entry dropped");
        }
        self.schedule_check(id, handle, now_tick);
        debug!(munition = id, handle = %handle, asset = launched_by, "munition enrolled");
        id
    }

    /// Run every check due at or before `now_tick`.
    pub fn run_due<H>(&mut self, now_tick: u64, host: &mut H) -> Vec<Resolution>
    where
        H: Telemetry + NotificationSink,
    {
        let mut resolved = Vec::new();
        while let Some(Reverse((due, id, handle))) = self.schedule.peek().copied() {
            if due > now_tick {
                break;
            }
            self.schedule.pop();
            if let Some(resolution) = self.check(id, handle, now_tick, host) {
                resolved.push(resolution);
            }
        }
        resolved
    }

    fn check<H>(&mut self, id: u32, handle: ObjectHandle, now_tick: u64, host: &mut H) -> Option<Resolution>
    where
        H: Telemetry + NotificationSink,
    {
        let entry = match self.entries.get_mut(&handle) {
            Some(e) if e.id == id => e,
            _ => {
                trace!(munition = id, "check for resolved munition skipped");
                return None;
            }
        };

        let step = recompute(handle, entry.target, &*host);
        host.notify(entry.audience, &step.message(id));

        let state = step.state();
        if state.is_terminal() {
            self.entries.remove(&handle);
            info!(munition = id, ?state, "munition resolved");
            return Some(Resolution { id, handle, state });
        }

        if let TtiStep::Closing { tti_secs, distance, .. } = step {
            entry.last_tti_secs = Some(tti_secs);
            debug!(munition = id, tti_secs, distance, "tti recomputed");
        }
        self.schedule_check(id, handle, now_tick);
        None
    }

    fn schedule_check(&mut self, id: u32, handle: ObjectHandle, from_tick: u64) {
        self.schedule
            .push(Reverse((from_tick.saturating_add(self.interval_ticks), id, handle)));
    }

    pub fn get(&self, handle: ObjectHandle) -> Option<&TrackedMunition> {
        self.entries.get(&handle)
    }

    /// Tracked munitions in id order.
    pub fn munitions(&self) -> Vec<&TrackedMunition> {
        let mut all: Vec<&TrackedMunition> = self.entries.values().collect();
        all.sort_by_key(|m| m.id);
        all
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Session context: the single owner of all engine state.
//!
//! `Session` holds the asset registry, the TTI tracker, the munition id
//! counter (inside the tracker) and the launch-event inbox. It is driven by
//! the host's timer through [`Session::tick`] and never blocks.

use std::collections::VecDeque;
use std::sync::mpsc;

use tracing::info;

use standoff_core::commands::OperatorCommand;
use standoff_core::config::{ConfigError, SessionConfig};
use standoff_core::enums::{Faction, MunitionState};
use standoff_core::events::LaunchEvent;
use standoff_core::state::{SessionSnapshot, StatsView};
use standoff_core::types::SimTime;

use crate::assignment::{self, AssignmentMiss};
use crate::authorization::{self, LaunchRefusal};
use crate::host::Host;
use crate::registry::AssetRegistry;
use crate::snapshot;
use crate::targets::resolve_targets;
use crate::tracking::TtiTracker;

/// One engine session: one set of assets, rebuilt at start, never saved.
pub struct Session {
    config: SessionConfig,
    time: SimTime,
    registry: AssetRegistry,
    tracker: TtiTracker,
    command_queue: VecDeque<OperatorCommand>,
    launch_events: mpsc::Receiver<LaunchEvent>,
    stats: StatsView,
}

impl Session {
    /// Validate `config`, discover assets and subscribe to launch events.
    pub fn start<H: Host>(config: SessionConfig, host: &mut H) -> Result<Self, ConfigError> {
        config.validate()?;

        let registry = AssetRegistry::discover(&config, &*host);

        let (tx, rx) = mpsc::channel();
        host.subscribe(Box::new(move |event| {
            // The session may already be gone; late events are dropped.
            let _ = tx.send(event);
        }));

        for faction in Faction::ALL {
            let count = registry.list_assets(faction).count();
            host.notify(
                faction.into(),
                &format!("Standoff strike ready: {count} launch asset(s) available"),
            );
        }
        info!(assets = registry.len(), "session started");

        Ok(Self {
            tracker: TtiTracker::new(config.tti_interval_secs),
            config,
            time: SimTime::default(),
            registry,
            command_queue: VecDeque::new(),
            launch_events: rx,
            stats: StatsView::default(),
        })
    }

    /// Queue an operator command for the next tick boundary.
    pub fn queue_command(&mut self, command: OperatorCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = OperatorCommand>) {
        self.command_queue.extend(commands);
    }

    /// Process commands and launch events, run due TTI checks, then advance
    /// one tick and return the resulting snapshot.
    pub fn tick<H: Host>(&mut self, host: &mut H) -> SessionSnapshot {
        self.process_commands(host);
        self.process_launch_events(host);

        for resolution in self.tracker.run_due(self.time.tick, host) {
            match resolution.state {
                MunitionState::Impacted => self.stats.impacted += 1,
                MunitionState::Lost => self.stats.lost += 1,
                MunitionState::Unresolvable => self.stats.unresolvable += 1,
                MunitionState::Active => {}
            }
        }

        self.time.advance();
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        snapshot::build_snapshot(&self.time, &self.registry, &self.tracker, &self.stats)
    }

    /// Authorize the named asset against the current designation markers.
    /// Returns the number of fire commands issued.
    pub fn authorize<H: Host>(&mut self, faction: Faction, asset: &str, host: &mut H) -> u32 {
        let Some(entry) = self.registry.lookup_mut(faction, asset) else {
            let refusal = LaunchRefusal::AssetUnavailable {
                asset: asset.to_string(),
            };
            host.notify(faction.into(), &refusal.to_string());
            return 0;
        };
        let targets = resolve_targets(&*host, &self.config.marker_prefix);
        let launched = authorization::authorize(entry, &targets, &self.config, host);
        self.stats.launches_authorized += launched;
        launched
    }

    /// Match a launch event to its target. Also fed by the subscription
    /// registered in [`Session::start`].
    pub fn handle_launch_event<H: Host>(&mut self, event: LaunchEvent, host: &mut H) -> Option<u32> {
        match assignment::on_weapon_launched(
            &event,
            &mut self.registry,
            &mut self.tracker,
            self.time.tick,
            host,
        ) {
            Ok(id) => {
                self.stats.munitions_enrolled += 1;
                Some(id)
            }
            Err(AssignmentMiss::NoPendingTarget { .. }) => {
                self.stats.unmatched_launches += 1;
                None
            }
            Err(AssignmentMiss::UnknownAsset { .. }) => None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &TtiTracker {
        &self.tracker
    }

    pub fn stats(&self) -> &StatsView {
        &self.stats
    }

    fn process_commands<H: Host>(&mut self, host: &mut H) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, host);
        }
    }

    fn process_launch_events<H: Host>(&mut self, host: &mut H) {
        while let Ok(event) = self.launch_events.try_recv() {
            self.handle_launch_event(event, host);
        }
    }

    fn handle_command<H: Host>(&mut self, command: OperatorCommand, host: &mut H) {
        match command {
            OperatorCommand::Authorize { faction, asset } => {
                self.authorize(faction, &asset, host);
            }
            OperatorCommand::ReportInventory { faction, asset } => {
                let text = match self.registry.lookup_mut(faction, &asset) {
                    Some(entry) => {
                        if entry.is_available(&*host) {
                            format!(
                                "{}: {} missile(s) remaining, {} launch(es) pending",
                                entry.name,
                                entry.remaining_inventory(),
                                entry.pending_targets().len()
                            )
                        } else {
                            LaunchRefusal::AssetUnavailable { asset }.to_string()
                        }
                    }
                    None => LaunchRefusal::AssetUnavailable { asset }.to_string(),
                };
                host.notify(faction.into(), &text);
            }
            OperatorCommand::ListAssets { faction } => {
                let mut listed = Vec::new();
                for entry in self.registry.list_assets_mut(faction) {
                    if entry.is_available(&*host) {
                        listed.push(format!("{} ({})", entry.name, entry.remaining_inventory()));
                    }
                }
                let text = if listed.is_empty() {
                    "No standoff assets available".to_string()
                } else {
                    format!("Available standoff assets: {}", listed.join(", "))
                };
                host.notify(faction.into(), &text);
            }
            OperatorCommand::ListTracked { faction } => {
                let listed: Vec<String> = self
                    .tracker
                    .munitions()
                    .into_iter()
                    .filter(|m| m.audience.includes(faction))
                    .map(|m| match m.last_tti_secs {
                        Some(tti) => format!("#{} ({}, TTI {tti:.1}s)", m.id, m.launched_by),
                        None => format!("#{} ({}, TTI pending)", m.id, m.launched_by),
                    })
                    .collect();
                let text = if listed.is_empty() {
                    "No munitions in flight".to_string()
                } else {
                    format!("Munitions in flight: {}", listed.join(", "))
                };
                host.notify(faction.into(), &text);
            }
        }
    }
}

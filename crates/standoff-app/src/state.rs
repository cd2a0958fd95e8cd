//! State shared between the runner's main thread and the session loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use standoff_core::commands::OperatorCommand;
use standoff_core::state::SessionSnapshot;
use standoff_core::types::Position;

/// Commands sent to the session loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forward an operator command to the session.
    Operator(OperatorCommand),
    /// Draw a marker on the sandbox map.
    PlaceMarker { label: String, position: Position },
    /// Shut down the loop thread gracefully.
    Shutdown,
}

/// Handle to a running session loop.
pub struct SessionLoop {
    pub(crate) command_tx: mpsc::Sender<LoopCommand>,
    pub(crate) latest_snapshot: Arc<Mutex<Option<SessionSnapshot>>>,
    pub(crate) thread: JoinHandle<()>,
}

impl SessionLoop {
    /// Send a command. Returns false if the loop has already exited.
    pub fn send(&self, command: LoopCommand) -> bool {
        self.command_tx.send(command).is_ok()
    }

    pub fn operator(&self, command: OperatorCommand) -> bool {
        self.send(LoopCommand::Operator(command))
    }

    /// Most recent snapshot, if the loop has ticked at least once.
    pub fn latest(&self) -> Option<SessionSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Stop the loop and wait for its thread. Returns the final snapshot.
    pub fn shutdown(self) -> Option<SessionSnapshot> {
        let _ = self.command_tx.send(LoopCommand::Shutdown);
        if self.thread.join().is_err() {
            tracing::error!("session loop thread panicked");
        }
        self.latest_snapshot.lock().ok().and_then(|mut s| s.take())
    }
}

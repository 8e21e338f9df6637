//! Configuration intents from the presentation side
//!
//! Intents travel over a bounded queue. Neither side needs an async runtime:
//! the presentation side uses `try_send`, the simulation `try_recv`.

use partnet_core::{Facing, PartPos};
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tracing::warn;

use crate::{RuntimeError, RuntimeResult};

/// One requested settings change
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingChange {
    /// Target side; `None` restores the default side
    Side(Option<Facing>),
    UpdateInterval(i32),
    Priority(i32),
    /// Channel by name; `None` clears it
    Channel(Option<String>),
    CreateChannel(String),
}

/// A settings change addressed to one part
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsIntent {
    pub target: PartPos,
    pub change: SettingChange,
}

impl SettingsIntent {
    pub fn new(target: PartPos, change: SettingChange) -> Self {
        SettingsIntent { target, change }
    }
}

/// Presentation-side handle of the intent queue
#[derive(Clone, Debug)]
pub struct IntentSender {
    tx: mpsc::Sender<SettingsIntent>,
}

impl IntentSender {
    pub fn send(&self, intent: SettingsIntent) -> RuntimeResult<()> {
        self.tx.try_send(intent).map_err(|e| match e {
            TrySendError::Full(intent) => {
                warn!(target_part = %intent.target, "intent queue full, dropping intent");
                RuntimeError::IntentQueueFull
            }
            TrySendError::Closed(_) => RuntimeError::IntentQueueClosed,
        })
    }
}

/// Simulation-side end of the intent queue
#[derive(Debug)]
pub struct IntentReceiver {
    rx: mpsc::Receiver<SettingsIntent>,
}

impl IntentReceiver {
    /// Next pending intent, if any
    pub fn next(&mut self) -> Option<SettingsIntent> {
        match self.rx.try_recv() {
            Ok(intent) => Some(intent),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// All pending intents in arrival order
    pub fn drain(&mut self) -> Vec<SettingsIntent> {
        std::iter::from_fn(|| self.next()).collect()
    }
}

/// Create a bounded intent queue
pub fn intent_channel(capacity: usize) -> (IntentSender, IntentReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (IntentSender { tx }, IntentReceiver { rx })
}

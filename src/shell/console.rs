use std::collections::VecDeque;
use std::sync::Mutex;

use log::{info, warn};

use super::{NotificationKind, Navigator, Notifier};

/// Prints notifications to stderr so stdout stays clean for screens and JSON.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => {
                info!("{}", message);
                if !self.quiet {
                    eprintln!("[ok] {}", message);
                }
            }
            NotificationKind::Error => {
                warn!("{}", message);
                eprintln!("[error] {}", message);
            }
        }
    }
}

/// Records navigation requests so the host can follow them after an action.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    pending: Mutex<VecDeque<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest navigation request not yet followed.
    pub fn take_pending(&self) -> Option<String> {
        self.pending
            .lock()
            .map(|mut pending| pending.pop_front())
            .unwrap_or_else(|poisoned| poisoned.into_inner().pop_front())
    }

    pub fn pending(&self) -> Vec<String> {
        self.pending
            .lock()
            .map(|pending| pending.iter().cloned().collect())
            .unwrap_or_else(|poisoned| poisoned.into_inner().iter().cloned().collect())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        info!("Navigating to {}", path);
        match self.pending.lock() {
            Ok(mut pending) => pending.push_back(path.to_string()),
            Err(poisoned) => poisoned.into_inner().push_back(path.to_string()),
        }
    }
}

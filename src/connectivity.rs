//! Online/offline signal for the status line.
//!
//! The provider host is probed with a plain TCP connect on a fixed interval.
//! Only transitions are reported, and the session is assumed to start online,
//! so a healthy network produces no messages at all.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::events::AppEvent;

pub const RESTORED_MESSAGE: &str = "Connection restored - press r to reload";
pub const LOST_MESSAGE: &str = "No internet connection";

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    /// Fixed status text announcing a switch into this state.
    pub fn status_message(self) -> &'static str {
        match self {
            Connectivity::Online => RESTORED_MESSAGE,
            Connectivity::Offline => LOST_MESSAGE,
        }
    }
}

/// Remembers the last known state and reports changes only.
#[derive(Debug)]
pub struct ConnectivityTracker {
    current: Connectivity,
}

impl ConnectivityTracker {
    pub fn new() -> Self {
        Self {
            current: Connectivity::Online,
        }
    }

    /// Record the outcome of one probe.
    ///
    /// # Arguments
    ///
    /// * `reachable` - Whether the provider host answered
    ///
    /// # Returns
    ///
    /// The new state if it differs from the last one, otherwise `None`.
    pub fn observe(&mut self, reachable: bool) -> Option<Connectivity> {
        let next = if reachable {
            Connectivity::Online
        } else {
            Connectivity::Offline
        };
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

impl Default for ConnectivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// True if a TCP connection to `host:port` opens within the probe timeout.
pub async fn probe(host: &str, port: u16) -> bool {
    matches!(
        timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

/// Probe forever, sending an event on each transition.
///
/// Returns once the receiving side of `events` is gone.
#[instrument(level = "info", skip(events))]
pub async fn watch(host: String, port: u16, every: Duration, events: UnboundedSender<AppEvent>) {
    let mut tracker = ConnectivityTracker::new();
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let reachable = probe(&host, port).await;
        debug!(reachable, "Connectivity probe");

        let Some(change) = tracker.observe(reachable) else {
            continue;
        };
        match change {
            Connectivity::Online => info!("Internet connection restored"),
            Connectivity::Offline => warn!("Internet connection lost"),
        }
        if events.send(AppEvent::Connectivity(change)).is_err() {
            break;
        }
    }
}

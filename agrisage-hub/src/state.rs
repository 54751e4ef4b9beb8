use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use agrisage_core::Device;
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::debug;

use crate::telemetry::{Drift, Roster, TelemetrySource};

/// The roster as returned by one poll.
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    /// Number of steps taken since the roster was seeded.
    pub step: u64,
    pub devices: Vec<Device>,
}

/// Shared, lock-guarded simulator state.
///
/// Every clone refers to the same roster; concurrent polls are serialized
/// so each one sees the result of the previous.
pub struct RosterState {
    inner: Arc<Mutex<Inner>>,
    network_delay: Duration,
}

struct Inner {
    roster: Roster,
    rng: StdRng,
    drift: Drift,
    step: u64,
}

impl RosterState {
    /// Create state around `roster`. With no `seed` the random source is
    /// seeded from the operating system.
    pub fn new(roster: Roster, drift: Drift, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            inner: Arc::new(Mutex::new(Inner {
                roster,
                rng,
                drift,
                step: 0,
            })),
            network_delay: Duration::ZERO,
        }
    }

    /// Pause this long after each poll, imitating a round trip to the
    /// devices.
    pub fn with_network_delay(mut self, delay: Duration) -> Self {
        self.network_delay = delay;
        self
    }

    /// Advance the roster by one step and return the new state.
    pub async fn poll(&self) -> RosterSnapshot {
        let snapshot = {
            let mut inner = self.inner.lock().await;
            let Inner {
                roster,
                rng,
                drift,
                step,
            } = &mut *inner;

            *roster = roster.step(drift, rng);
            *step += 1;

            debug!(step = *step, device_count = roster.len(), "Advanced roster");

            RosterSnapshot {
                step: *step,
                devices: roster.devices().to_vec(),
            }
        };

        if !self.network_delay.is_zero() {
            tokio::time::sleep(self.network_delay).await;
        }

        snapshot
    }

    /// Return the roster as of the last poll without advancing it.
    pub async fn current(&self) -> RosterSnapshot {
        let inner = self.inner.lock().await;
        RosterSnapshot {
            step: inner.step,
            devices: inner.roster.devices().to_vec(),
        }
    }
}

impl Default for RosterState {
    fn default() -> Self {
        Self::new(Roster::seed(), Drift::default(), None)
    }
}

impl Clone for RosterState {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            network_delay: self.network_delay,
        }
    }
}

#[async_trait]
impl TelemetrySource for RosterState {
    type Error = Infallible;

    async fn devices(&self) -> Result<Vec<Device>, Self::Error> {
        Ok(self.poll().await.devices)
    }
}

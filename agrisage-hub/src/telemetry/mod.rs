pub mod simulator;

use agrisage_core::Device;
use async_trait::async_trait;

pub use simulator::{DRONE_CAMERA_ID, Drift, Roster};

/// Trait for fetching the current state of farm devices.
///
/// The hub ships a simulated implementation; a hardware backend would
/// implement this against real telemetry and define its own timeout and
/// partial-failure behaviour through `Error`.
#[async_trait]
pub trait TelemetrySource: Send + Sync + 'static {
    /// Error type for this telemetry source implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Return a fresh snapshot of every device, in roster order.
    async fn devices(&self) -> Result<Vec<Device>, Self::Error>;
}

pub mod file;
pub mod memory;

use agrisage_core::Preferences;
use async_trait::async_trait;

pub use file::{FilePreferences, FilePreferencesError};
pub use memory::MemoryPreferences;

/// Storage for the single user-preference blob.
#[async_trait]
pub trait PreferencesStorage: Send + Sync + 'static {
    /// Error type specific to this storage implementation
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the saved preferences, or defaults if none were saved.
    async fn load(&self) -> Result<Preferences, Self::Error>;

    /// Replace the saved preferences.
    async fn save(&self, preferences: Preferences) -> Result<(), Self::Error>;
}

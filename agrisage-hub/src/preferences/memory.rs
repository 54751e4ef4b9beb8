use std::convert::Infallible;
use std::sync::Arc;

use agrisage_core::Preferences;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::PreferencesStorage;

/// In-memory preferences, lost on restart.
#[derive(Clone, Default)]
pub struct MemoryPreferences {
    preferences: Arc<RwLock<Preferences>>,
}

impl MemoryPreferences {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences: Arc::new(RwLock::new(preferences)),
        }
    }
}

#[async_trait]
impl PreferencesStorage for MemoryPreferences {
    type Error = Infallible;

    async fn load(&self) -> Result<Preferences, Self::Error> {
        Ok(self.preferences.read().await.clone())
    }

    async fn save(&self, preferences: Preferences) -> Result<(), Self::Error> {
        *self.preferences.write().await = preferences;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let storage = MemoryPreferences::default();
        assert_eq!(storage.load().await.unwrap(), Preferences::default());

        let prefs = Preferences {
            default_crop: Some("Wheat".into()),
            ..Default::default()
        };
        storage.save(prefs.clone()).await.unwrap();

        let other = storage.clone();
        assert_eq!(other.load().await.unwrap(), prefs);
    }
}

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use agrisage_core::Preferences;
use agrisage_core::preferences::PREFERENCES_KEY;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::warn;

use super::PreferencesStorage;

/// Preferences kept in a JSON object file under [`PREFERENCES_KEY`].
///
/// Other keys in the file are left untouched, so the file can be shared
/// with other settings.
#[derive(Clone)]
pub struct FilePreferences {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Arc<Mutex<()>>,
}

#[derive(Debug, thiserror::Error)]
pub enum FilePreferencesError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a JSON object", .0.display())]
    NotAnObject(PathBuf),
    #[error("failed to encode preferences")]
    Encode(#[source] serde_json::Error),
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> FilePreferencesError {
        FilePreferencesError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the whole settings object. A missing file is an empty object.
    async fn read_object(&self) -> Result<Map<String, Value>, FilePreferencesError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(FilePreferencesError::NotAnObject(self.path.clone())),
        }
    }

    async fn write_object(&self, map: Map<String, Value>) -> Result<(), FilePreferencesError> {
        let content =
            serde_json::to_string_pretty(&Value::Object(map)).map_err(FilePreferencesError::Encode)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

#[async_trait]
impl PreferencesStorage for FilePreferences {
    type Error = FilePreferencesError;

    async fn load(&self) -> Result<Preferences, Self::Error> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_object().await?;

        let Some(blob) = map.remove(PREFERENCES_KEY) else {
            return Ok(Preferences::default());
        };

        match serde_json::from_value(blob) {
            Ok(preferences) => Ok(preferences),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to parse saved preferences, using defaults");
                Ok(Preferences::default())
            }
        }
    }

    async fn save(&self, preferences: Preferences) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_object().await?;

        let blob = serde_json::to_value(&preferences).map_err(FilePreferencesError::Encode)?;
        map.insert(PREFERENCES_KEY.to_owned(), blob);

        self.write_object(map).await
    }
}

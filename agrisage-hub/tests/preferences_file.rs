use agrisage_core::Preferences;
use agrisage_core::preferences::PREFERENCES_KEY;
use agrisage_hub::preferences::{FilePreferences, FilePreferencesError, PreferencesStorage};
use serde_json::{Value, json};
use tempfile::TempDir;

fn sample() -> Preferences {
    Preferences {
        default_location: Some("Karnal, Haryana".into()),
        default_region: Some("North India".into()),
        default_crop: Some("Basmati Rice".into()),
    }
}

#[tokio::test]
async fn missing_file_loads_defaults() -> Result<(), FilePreferencesError> {
    let dir = TempDir::new().unwrap();
    let storage = FilePreferences::new(dir.path().join("settings.json"));

    assert_eq!(storage.load().await?, Preferences::default());
    Ok(())
}

#[tokio::test]
async fn save_then_load_from_new_handle() -> Result<(), FilePreferencesError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    FilePreferences::new(&path).save(sample()).await?;

    let reopened = FilePreferences::new(&path);
    assert_eq!(reopened.path(), path.as_path());
    assert_eq!(reopened.load().await?, sample());
    Ok(())
}

#[tokio::test]
async fn save_keeps_unrelated_keys() -> Result<(), FilePreferencesError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

    let storage = FilePreferences::new(&path);
    storage.save(sample()).await?;

    let content: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["theme"], json!("dark"));
    assert_eq!(content[PREFERENCES_KEY]["defaultCrop"], json!("Basmati Rice"));
    Ok(())
}

#[tokio::test]
async fn corrupt_blob_falls_back_to_defaults() -> Result<(), FilePreferencesError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, format!(r#"{{"{PREFERENCES_KEY}": "not an object"}}"#)).unwrap();

    let storage = FilePreferences::new(&path);
    assert_eq!(storage.load().await?, Preferences::default());
    Ok(())
}

#[tokio::test]
async fn non_object_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let storage = FilePreferences::new(&path);
    assert!(matches!(
        storage.load().await,
        Err(FilePreferencesError::NotAnObject(_))
    ));
}

use serde::{Deserialize, Serialize};

/// Storage key of the preference blob.
pub const PREFERENCES_KEY: &str = "agrisage_settings";

/// Per-user defaults used to prefill advisory requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub default_location: Option<String>,
    pub default_region: Option<String>,
    pub default_crop: Option<String>,
}

impl Preferences {
    pub fn location(&self) -> Option<&str> {
        non_empty(&self.default_location)
    }

    pub fn region(&self) -> Option<&str> {
        non_empty(&self.default_region)
    }

    pub fn crop(&self) -> Option<&str> {
        non_empty(&self.default_crop)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Replace `field` with `default` when the field is blank.
pub fn fill_blank(field: &mut String, default: Option<&str>) {
    if !field.trim().is_empty() {
        return;
    }
    if let Some(value) = default {
        *field = value.to_owned();
    }
}

pub mod advisory;
pub mod contract;
pub mod preferences;

use serde::{Deserialize, Serialize};

pub use contract::{Contract, ContractId, ContractRequest};
pub use preferences::Preferences;

// We use `Box<str>` and `Box<[T]>` for structures that don't need to be
// dynamically sized. This helps us keep allocations compact and avoid
// accidental cloning of large values.
type BoxStr = Box<str>;
type BoxList<T> = Box<[T]>;

/// Stable identifier of a farm device, e.g. `SS-PLOT-A-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub BoxStr);

impl DeviceId {
    pub fn new(id: &str) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Percentage value in the range 0–100 (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Percentage(pub u8);

/// Whether a device is currently reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Online,
    Offline,
}

/// A single labeled sensor value, e.g. `Moisture` / `74%`.
///
/// The value is kept in its display form; the label decides how it is
/// interpreted (see [`ReadingKind`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub label: BoxStr,
    pub value: BoxStr,
}

impl Reading {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> ReadingKind {
        ReadingKind::classify(&self.label)
    }
}

/// Unit and formatting rule implied by a reading label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    /// Moisture or humidity, shown as a whole percentage (`74%`).
    Percent,
    /// Any temperature, shown with one decimal place (`28.1°C`).
    Celsius,
    /// Anything else. Values are never reinterpreted.
    Opaque,
}

impl ReadingKind {
    /// Classify a label. Moisture and humidity win over temperature.
    pub fn classify(label: &str) -> Self {
        if label.contains("Moisture") || label.contains("Humidity") {
            ReadingKind::Percent
        } else if label.contains("Temp") {
            ReadingKind::Celsius
        } else {
            ReadingKind::Opaque
        }
    }

    /// Render a numeric value in this kind's display form.
    ///
    /// Returns `None` for [`ReadingKind::Opaque`], whose values have no
    /// numeric form.
    pub fn format(self, value: f64) -> Option<String> {
        match self {
            ReadingKind::Percent => Some(format!("{}%", normalize_zero(value.round()))),
            ReadingKind::Celsius => {
                let tenths = normalize_zero((value * 10.0).round() / 10.0);
                Some(format!("{tenths:.1}°C"))
            }
            ReadingKind::Opaque => None,
        }
    }
}

// Keeps `-0.2` from rendering as `-0%`.
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Parse the leading decimal number of a display value.
///
/// Trailing units are ignored, so `"28°C"` yields `28.0` and `"74%"` yields
/// `74.0`. Returns `None` when the value does not start with a number.
pub fn leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let dot = end;
        end += 1;
        let mut fraction = 0;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            fraction += 1;
        }
        if fraction == 0 {
            end = dot;
        }
        digits += fraction;
    }

    if digits == 0 {
        return None;
    }

    trimmed[..end].parse().ok()
}

/// A snapshot of one simulated farm device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Stable identity of this device.
    pub id: DeviceId,
    /// Display name.
    pub name: BoxStr,
    /// Connectivity in this snapshot.
    pub status: ConnectionStatus,
    /// Signal strength. Always 0 while offline.
    pub signal: Percentage,
    /// Battery charge in percent. Never increases.
    pub battery: f64,
    /// Live readings. Empty while offline.
    #[serde(rename = "data")]
    pub readings: BoxList<Reading>,
}

impl Device {
    pub fn is_online(&self) -> bool {
        self.status == ConnectionStatus::Online
    }
}

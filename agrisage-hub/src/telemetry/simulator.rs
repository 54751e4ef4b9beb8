use std::collections::HashSet;

use agrisage_core::{
    ConnectionStatus, Device, DeviceId, Percentage, Reading, ReadingKind, leading_number,
};
use rand::Rng;

/// Id of the drone camera, which never comes online.
pub const DRONE_CAMERA_ID: &str = "DR-NF-001";

/// Signal is held within these bounds while a device is online.
const ONLINE_SIGNAL_FLOOR: u8 = 50;
const SIGNAL_CEILING: u8 = 100;

/// Magnitudes of the random changes applied on each step.
///
/// Every jitter is symmetric around zero except battery drain, which only
/// ever subtracts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    /// Chance that an online-capable device drops out for one step.
    pub outage_probability: f64,
    /// Maximum signal change per step, in whole percent.
    pub signal_jitter: u8,
    /// Maximum battery drained per online step.
    pub battery_drain: f64,
    /// Battery drained per offline step.
    pub offline_battery_step: f64,
    /// Maximum change of moisture and humidity readings.
    pub percent_jitter: f64,
    /// Maximum change of temperature readings.
    pub celsius_jitter: f64,
}

impl Drift {
    /// No randomness at all. Online devices keep every value; offline
    /// devices still lose the fixed battery step.
    pub fn still() -> Self {
        Self {
            outage_probability: 0.0,
            signal_jitter: 0,
            battery_drain: 0.0,
            offline_battery_step: 1.0,
            percent_jitter: 0.0,
            celsius_jitter: 0.0,
        }
    }
}

impl Default for Drift {
    fn default() -> Self {
        Self {
            outage_probability: 0.05,
            signal_jitter: 5,
            battery_drain: 0.1,
            offline_battery_step: 1.0,
            percent_jitter: 1.0,
            celsius_jitter: 0.25,
        }
    }
}

/// The fixed, ordered set of simulated devices.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    devices: Vec<Device>,
    always_offline: HashSet<DeviceId>,
}

impl Roster {
    pub fn new(devices: Vec<Device>, always_offline: impl IntoIterator<Item = DeviceId>) -> Self {
        Self {
            devices,
            always_offline: always_offline.into_iter().collect(),
        }
    }

    /// The farm's starting roster: a soil sensor, a weather station and a
    /// grounded drone camera.
    pub fn seed() -> Self {
        let devices = vec![
            Device {
                id: DeviceId::new("SS-PLOT-A-001"),
                name: "Soil Sensor - Plot A".into(),
                status: ConnectionStatus::Online,
                signal: Percentage(92),
                battery: 88.0,
                readings: vec![
                    Reading::new("Moisture", "74%"),
                    Reading::new("Temperature", "28°C"),
                ]
                .into_boxed_slice(),
            },
            Device {
                id: DeviceId::new("WS-MAIN-001"),
                name: "Weather Station".into(),
                status: ConnectionStatus::Online,
                signal: Percentage(98),
                battery: 100.0,
                readings: vec![
                    Reading::new("Air Temp", "32°C"),
                    Reading::new("Humidity", "65%"),
                ]
                .into_boxed_slice(),
            },
            Device {
                id: DeviceId::new(DRONE_CAMERA_ID),
                name: "Drone Camera - North Field".into(),
                status: ConnectionStatus::Offline,
                signal: Percentage(0),
                battery: 12.0,
                readings: Box::new([]),
            },
        ];

        Self::new(devices, [DeviceId::new(DRONE_CAMERA_ID)])
    }

    /// Pin more devices offline. Devices already pinned stay pinned.
    pub fn with_always_offline(mut self, ids: impl IntoIterator<Item = DeviceId>) -> Self {
        self.always_offline.extend(ids);
        self
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn is_always_offline(&self, id: &DeviceId) -> bool {
        self.always_offline.contains(id)
    }

    /// Advance every device by one step.
    ///
    /// `self` is the only input besides the random source; the returned
    /// roster has the same devices in the same order.
    pub fn step<R: Rng + ?Sized>(&self, drift: &Drift, rng: &mut R) -> Roster {
        let devices = self
            .devices
            .iter()
            .map(|device| {
                // The roll happens for every device so the random stream
                // does not depend on which devices are pinned offline.
                let outage = rng.random_bool(drift.outage_probability);
                if outage || self.is_always_offline(&device.id) {
                    go_offline(device, drift)
                } else {
                    stay_online(device, drift, rng)
                }
            })
            .collect();

        Roster {
            devices,
            always_offline: self.always_offline.clone(),
        }
    }
}

fn go_offline(device: &Device, drift: &Drift) -> Device {
    Device {
        id: device.id.clone(),
        name: device.name.clone(),
        status: ConnectionStatus::Offline,
        signal: Percentage(0),
        battery: (device.battery - drift.offline_battery_step).max(0.0),
        readings: Box::new([]),
    }
}

fn stay_online<R: Rng + ?Sized>(device: &Device, drift: &Drift, rng: &mut R) -> Device {
    let jitter = i16::from(drift.signal_jitter);
    let delta = rng.random_range(-jitter..=jitter);
    let signal = (i16::from(device.signal.0) + delta).clamp(
        i16::from(ONLINE_SIGNAL_FLOOR),
        i16::from(SIGNAL_CEILING),
    );

    let drain = rng.random_range(0.0..=drift.battery_drain);
    let battery = (device.battery - drain).max(0.0);

    let readings = device
        .readings
        .iter()
        .map(|reading| perturb(reading, drift, rng))
        .collect();

    Device {
        id: device.id.clone(),
        name: device.name.clone(),
        status: ConnectionStatus::Online,
        // Clamped to 50..=100 above.
        signal: Percentage(signal as u8),
        battery,
        readings,
    }
}

fn perturb<R: Rng + ?Sized>(reading: &Reading, drift: &Drift, rng: &mut R) -> Reading {
    let kind = reading.kind();
    let amplitude = match kind {
        ReadingKind::Percent => drift.percent_jitter,
        ReadingKind::Celsius => drift.celsius_jitter,
        ReadingKind::Opaque => return reading.clone(),
    };

    let Some(current) = leading_number(&reading.value) else {
        return reading.clone();
    };

    let next = current + rng.random_range(-amplitude..=amplitude);
    match kind.format(next) {
        Some(value) => Reading {
            label: reading.label.clone(),
            value: value.into(),
        },
        None => reading.clone(),
    }
}

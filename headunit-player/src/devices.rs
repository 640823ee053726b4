//! Mock device managers
//!
//! Simple synchronous getter/setter stores for the demo connectivity and
//! climate endpoints that ship alongside the player: Wi-Fi, Bluetooth, NFC
//! and HVAC. No events, no state machine; each store sits behind its own
//! mutex.

use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// SSID reported while Wi-Fi is enabled
const DEMO_SSID: &str = "Demo_WiFi_5G";

/// Fixed demo pairing list
const PAIRED_DEVICES: [&str; 3] = ["MyPhone", "Headset X", "CarKit"];

/// Default cabin temperature per zone, in degrees Celsius
const DEFAULT_HVAC_TEMP: f32 = 22.0;

/// All mock device stores behind one value
#[derive(Debug, Default)]
pub struct DeviceHub {
    wifi_enabled: Mutex<bool>,
    bluetooth_enabled: Mutex<bool>,
    hvac_temps: Mutex<HashMap<i32, f32>>,
}

impl DeviceHub {
    pub fn new() -> Self {
        Self {
            wifi_enabled: Mutex::new(false),
            bluetooth_enabled: Mutex::new(false),
            hvac_temps: Mutex::new(HashMap::from([
                (0, DEFAULT_HVAC_TEMP),
                (1, DEFAULT_HVAC_TEMP),
            ])),
        }
    }

    // --- Wi-Fi ---

    pub fn set_wifi_enabled(&self, enabled: bool) {
        debug!(enabled, "wifi state changed");
        *self.wifi_enabled.lock().unwrap() = enabled;
    }

    pub fn wifi_enabled(&self) -> bool {
        *self.wifi_enabled.lock().unwrap()
    }

    /// SSID of the connected network; `<unknown>` while Wi-Fi is off
    pub fn ssid(&self) -> String {
        if self.wifi_enabled() {
            DEMO_SSID.to_string()
        } else {
            "<unknown>".to_string()
        }
    }

    // --- Bluetooth ---

    pub fn set_bluetooth_enabled(&self, enabled: bool) {
        debug!(enabled, "bluetooth state changed");
        *self.bluetooth_enabled.lock().unwrap() = enabled;
    }

    pub fn bluetooth_enabled(&self) -> bool {
        *self.bluetooth_enabled.lock().unwrap()
    }

    pub fn paired_devices(&self) -> Vec<String> {
        PAIRED_DEVICES.iter().map(|d| d.to_string()).collect()
    }

    // --- NFC ---

    /// Mock is always on
    pub fn nfc_enabled(&self) -> bool {
        true
    }

    // --- Climate control ---

    pub fn set_hvac_temperature(&self, zone: i32, temperature: f32) {
        debug!(zone, temperature, "hvac temperature changed");
        self.hvac_temps.lock().unwrap().insert(zone, temperature);
    }

    /// Zone temperature; unknown zones read the default
    pub fn hvac_temperature(&self, zone: i32) -> f32 {
        self.hvac_temps
            .lock()
            .unwrap()
            .get(&zone)
            .copied()
            .unwrap_or(DEFAULT_HVAC_TEMP)
    }

    /// Accepted and logged; the mock keeps no window state
    pub fn set_window_position(&self, window_id: i32, position: i32) {
        debug!(window_id, position, "window position changed");
    }
}

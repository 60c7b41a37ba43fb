//! Wire types for the device API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of a set command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HvacSet {
    pub param: String,
    pub value: String,
}

/// A snapshot of the device, as returned by `GET /hvac/{device}`.
///
/// Missing fields decode to their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HvacStatus {
    pub device: HvacDevice,
    pub status: HvacState,
}

/// Identity of the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HvacDevice {
    pub id: String,
    pub name: String,
    #[serde(rename = "familyId")]
    pub family_id: i64,
    #[serde(rename = "modelId")]
    pub model_id: i64,
    #[serde(rename = "installationId")]
    pub installation_id: i64,
    #[serde(rename = "zoneId")]
    pub zone_id: i64,
    pub order: i64,
    pub widgets: Vec<i64>,
}

/// Fan speed labels, keyed by the numeric speed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanMap {
    #[serde(rename = "0")]
    pub speed_0: String,
    #[serde(rename = "1")]
    pub speed_1: String,
    #[serde(rename = "2")]
    pub speed_2: String,
    #[serde(rename = "3")]
    pub speed_3: String,
    #[serde(rename = "4")]
    pub speed_4: String,
}

impl fmt::Display for FanMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0={} 1={} 2={} 3={} 4={}", self.speed_0, self.speed_1, self.speed_2, self.speed_3, self.speed_4)
    }
}

/// The live state of the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HvacState {
    #[serde(rename = "187")]
    pub uid_187: i64,
    #[serde(rename = "188")]
    pub uid_188: i64,
    #[serde(rename = "189")]
    pub uid_189: i64,
    #[serde(rename = "190")]
    pub uid_190: i64,
    #[serde(rename = "50008")]
    pub uid_50008: i64,
    #[serde(rename = "50010")]
    pub uid_50010: i64,
    pub alarm_status: i64,
    pub config_confirm_off: i64,
    pub config_fan_map: FanMap,
    pub config_mode_map: i64,
    pub config_quiet: i64,
    pub config_vertical_vanes: i64,
    pub cool_temperature_max: i64,
    pub cool_temperature_min: i64,
    pub error_address: i64,
    pub error_code: i64,
    pub external_led: String,
    pub fan_speed: i64,
    pub filter_clean: i64,
    pub filter_due_hours: i64,
    pub heat_temperature_min: i64,
    pub internal_led: String,
    pub internal_temperature_offset: i64,
    // The device API spells these without the second `t`.
    #[serde(rename = "mainenance_w_reset")]
    pub maintenance_w_reset: i64,
    #[serde(rename = "mainenance_wo_reset")]
    pub maintenance_wo_reset: i64,
    pub mode: String,
    pub power: String,
    pub quiet_mode: String,
    pub remote_controller_lock: i64,
    pub rssi: i64,
    pub runtime_mode_restrictions: i64,
    pub setpoint: i64,
    pub setpoint_max: i64,
    pub setpoint_min: i64,
    pub temp_limitation: String,
    pub temperature: i64,
    pub uid_185: i64,
    pub uid_186: i64,
    pub vvane: String,
    pub working_hours: i64,
}

impl HvacState {
    /// Returns every field as a `(label, value)` pair, in schema order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("187", self.uid_187.to_string()),
            ("188", self.uid_188.to_string()),
            ("189", self.uid_189.to_string()),
            ("190", self.uid_190.to_string()),
            ("50008", self.uid_50008.to_string()),
            ("50010", self.uid_50010.to_string()),
            ("alarm_status", self.alarm_status.to_string()),
            ("config_confirm_off", self.config_confirm_off.to_string()),
            ("config_fan_map", self.config_fan_map.to_string()),
            ("config_mode_map", self.config_mode_map.to_string()),
            ("config_quiet", self.config_quiet.to_string()),
            ("config_vertical_vanes", self.config_vertical_vanes.to_string()),
            ("cool_temperature_max", self.cool_temperature_max.to_string()),
            ("cool_temperature_min", self.cool_temperature_min.to_string()),
            ("error_address", self.error_address.to_string()),
            ("error_code", self.error_code.to_string()),
            ("external_led", self.external_led.clone()),
            ("fan_speed", self.fan_speed.to_string()),
            ("filter_clean", self.filter_clean.to_string()),
            ("filter_due_hours", self.filter_due_hours.to_string()),
            ("heat_temperature_min", self.heat_temperature_min.to_string()),
            ("internal_led", self.internal_led.clone()),
            ("internal_temperature_offset", self.internal_temperature_offset.to_string()),
            ("maintenance_w_reset", self.maintenance_w_reset.to_string()),
            ("maintenance_wo_reset", self.maintenance_wo_reset.to_string()),
            ("mode", self.mode.clone()),
            ("power", self.power.clone()),
            ("quiet_mode", self.quiet_mode.clone()),
            ("remote_controller_lock", self.remote_controller_lock.to_string()),
            ("rssi", self.rssi.to_string()),
            ("runtime_mode_restrictions", self.runtime_mode_restrictions.to_string()),
            ("setpoint", self.setpoint.to_string()),
            ("setpoint_max", self.setpoint_max.to_string()),
            ("setpoint_min", self.setpoint_min.to_string()),
            ("temp_limitation", self.temp_limitation.clone()),
            ("temperature", self.temperature.to_string()),
            ("uid_185", self.uid_185.to_string()),
            ("uid_186", self.uid_186.to_string()),
            ("vvane", self.vvane.clone()),
            ("working_hours", self.working_hours.to_string()),
        ]
    }
}

/// Renders the status as `label: value` lines.
impl fmt::Display for HvacStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.status.fields().into_iter().map(|(label, value)| format!("{label}: {value}")).collect::<Vec<_>>();

        f.write_str(&lines.join("\n"))
    }
}

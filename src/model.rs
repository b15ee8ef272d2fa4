// keep in sync with the Node-RED flow output
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    KiwiSensor,
    StregaValve,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::KiwiSensor => "KIWI_SENSOR",
            DeviceType::StregaValve => "STREGA_VALVE",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "KIWI_SENSOR" => Some(DeviceType::KiwiSensor),
            "STREGA_VALVE" => Some(DeviceType::StregaValve),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValveState {
    Open,
    Closed,
}

impl ValveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValveState::Open => "OPEN",
            ValveState::Closed => "CLOSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValveAction {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerMetric {
    SwtWm1,
    SwtWm2,
    SwtAvg,
}

impl TriggerMetric {
    pub const ALL: [TriggerMetric; 3] = [
        TriggerMetric::SwtWm1,
        TriggerMetric::SwtWm2,
        TriggerMetric::SwtAvg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMetric::SwtWm1 => "SWT_WM1",
            TriggerMetric::SwtWm2 => "SWT_WM2",
            TriggerMetric::SwtAvg => "SWT_AVG",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "SWT_WM1" => Some(TriggerMetric::SwtWm1),
            "SWT_WM2" => Some(TriggerMetric::SwtWm2),
            "SWT_AVG" => Some(TriggerMetric::SwtAvg),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriggerMetric::SwtWm1 => "Soil Water Tension 1",
            TriggerMetric::SwtWm2 => "Soil Water Tension 2",
            TriggerMetric::SwtAvg => "Average (WM1 + WM2)",
        }
    }
}

/// Sensors report a sparse set of metrics; valves report none of them.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
pub struct SensorReadings {
    pub swt_wm1: Option<f64>, // soil water tension, kPa
    pub swt_wm2: Option<f64>, // kPa
    pub light_lux: Option<f64>,
    pub ambient_temperature: Option<f64>, // °C
    pub relative_humidity: Option<f64>,   // percent
}

/// WM1 readings under this trip the watering alert on the sensor card.
pub const DRY_ALERT_KPA: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Device {
    pub deveui: String, // 16 hex chars, unique
    pub name: String,
    pub type_id: DeviceType,
    pub last_seen: DateTime<Utc>,
    #[serde(default)]
    pub latest_data: SensorReadings,
    #[serde(default)]
    pub current_state: Option<ValveState>,
    #[serde(default)]
    pub target_state: Option<ValveState>,
    #[serde(default)]
    pub irrigation_zone_id: Option<i64>,
}

impl Device {
    pub fn needs_water(&self) -> bool {
        self.type_id == DeviceType::KiwiSensor
            && self.latest_data.swt_wm1.is_some_and(|kpa| kpa < DRY_ALERT_KPA)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct IrrigationSchedule {
    pub irrigation_zone_id: i64,
    pub trigger_metric: TriggerMetric,
    pub threshold_kpa: f64,
    #[serde(deserialize_with = "bool_like")]
    pub enabled: bool,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub last_triggered_at: Option<String>,
}

// SQLite booleans come through the flow as 0/1
fn bool_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
    }
    Ok(match BoolLike::deserialize(deserializer)? {
        BoolLike::Bool(b) => b,
        BoolLike::Int(i) => i != 0,
    })
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct IrrigationZone {
    pub id: i64,
    pub name: String,
    pub device_count: i64,
    pub created_at: String, // SQLite datetime, display only
    pub updated_at: String,
    #[serde(default)]
    pub schedule: Option<IrrigationSchedule>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct DeviceCatalogItem {
    pub id: DeviceType,
    pub name: String,
}

// ===============================================
// request/response bodies
// ===============================================

/// Body of both `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct AddDeviceRequest {
    pub deveui: String,
    pub name: String,
    pub type_id: DeviceType,
}

#[derive(Debug, serde::Serialize)]
pub struct ValveActionRequest {
    pub action: ValveAction,
}

#[derive(Debug, serde::Serialize)]
pub struct CreateZoneRequest {
    pub name: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UpdateScheduleRequest {
    pub trigger_metric: TriggerMetric,
    pub threshold_kpa: f64,
    pub enabled: bool,
    pub duration_minutes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_with_valve_states_deserializes() {
        let json = r#"{
            "deveui": "A84041FFFF1F2B3C",
            "name": "Main Valve",
            "type_id": "STREGA_VALVE",
            "last_seen": "2026-08-01T06:00:00Z",
            "latest_data": {},
            "current_state": "CLOSED",
            "target_state": "OPEN",
            "irrigation_zone_id": 3
        }"#;
        let dev: Device = serde_json::from_str(json).unwrap();
        assert_eq!(dev.type_id, DeviceType::StregaValve);
        assert_eq!(dev.current_state, Some(ValveState::Closed));
        assert_eq!(dev.target_state, Some(ValveState::Open));
        assert_eq!(dev.irrigation_zone_id, Some(3));
    }

    #[test]
    fn sensor_with_sparse_readings_deserializes() {
        let json = r#"{
            "deveui": "0004A30B001C1234",
            "name": "North Field",
            "type_id": "KIWI_SENSOR",
            "last_seen": "2026-08-01T06:00:00Z",
            "latest_data": { "swt_wm1": 12.5, "light_lux": 20000 }
        }"#;
        let dev: Device = serde_json::from_str(json).unwrap();
        assert_eq!(dev.latest_data.swt_wm1, Some(12.5));
        assert_eq!(dev.latest_data.swt_wm2, None);
        assert_eq!(dev.irrigation_zone_id, None);
        assert!(dev.needs_water());
    }

    #[test]
    fn zone_without_schedule_deserializes() {
        let json = r#"{
            "id": 1,
            "name": "Garden A",
            "device_count": 0,
            "created_at": "2026-07-30 12:00:00",
            "updated_at": "2026-07-30 12:00:00",
            "schedule": null
        }"#;
        let zone: IrrigationZone = serde_json::from_str(json).unwrap();
        assert!(zone.schedule.is_none());
    }

    #[test]
    fn schedule_accepts_sqlite_integer_booleans() {
        let json = r#"{
            "irrigation_zone_id": 1,
            "trigger_metric": "SWT_AVG",
            "threshold_kpa": 35,
            "enabled": 1,
            "duration_minutes": 20,
            "last_triggered_at": null
        }"#;
        let schedule: IrrigationSchedule = serde_json::from_str(json).unwrap();
        assert!(schedule.enabled);
        assert_eq!(schedule.trigger_metric, TriggerMetric::SwtAvg);

        let json = json.replace("\"enabled\": 1", "\"enabled\": false");
        let schedule: IrrigationSchedule = serde_json::from_str(&json).unwrap();
        assert!(!schedule.enabled);
    }

    #[test]
    fn valve_action_serializes_uppercase() {
        let body = serde_json::to_string(&ValveActionRequest {
            action: ValveAction::Open,
        })
        .unwrap();
        assert_eq!(body, r#"{"action":"OPEN"}"#);
    }

    #[test]
    fn trigger_metric_select_values_round_trip() {
        for metric in TriggerMetric::ALL {
            assert_eq!(TriggerMetric::from_value(metric.as_str()), Some(metric));
        }
        assert_eq!(TriggerMetric::from_value("SWT_MAX"), None);
    }
}

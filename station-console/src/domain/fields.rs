//! Client-writable station fields.

use serde::{Deserialize, Serialize};

use super::station::{Station, StationStatus};

/// Every field the console may write.
///
/// This is both the insert payload and the form draft. Identity and
/// timestamps are deliberately absent: the server owns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationFields {
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: StationStatus,
    pub power_output: i32,
    pub connector_type: String,
}

impl Default for StationFields {
    /// Defaults for a brand new station.
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            status: StationStatus::Active,
            power_output: 50,
            connector_type: "CCS".to_string(),
        }
    }
}

impl From<&Station> for StationFields {
    fn from(station: &Station) -> Self {
        Self {
            name: station.name.clone(),
            location: station.location.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            status: station.status,
            power_output: station.power_output,
            connector_type: station.connector_type.clone(),
        }
    }
}

/// Partial update payload. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_output: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_type: Option<String>,
}

impl StationPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the present fields to `station`, leaving the rest alone.
    pub fn apply_to(&self, station: &mut Station) {
        if let Some(name) = &self.name {
            station.name = name.clone();
        }
        if let Some(location) = &self.location {
            station.location = location.clone();
        }
        if let Some(latitude) = self.latitude {
            station.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            station.longitude = longitude;
        }
        if let Some(status) = self.status {
            station.status = status;
        }
        if let Some(power_output) = self.power_output {
            station.power_output = power_output;
        }
        if let Some(connector_type) = &self.connector_type {
            station.connector_type = connector_type.clone();
        }
    }
}

impl From<StationFields> for StationPatch {
    fn from(fields: StationFields) -> Self {
        Self {
            name: Some(fields.name),
            location: Some(fields.location),
            latitude: Some(fields.latitude),
            longitude: Some(fields.longitude),
            status: Some(fields.status),
            power_output: Some(fields.power_output),
            connector_type: Some(fields.connector_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;

    fn station() -> Station {
        Station {
            id: StationId::new("st-1"),
            name: "Downtown Hub".into(),
            location: "5th Ave".into(),
            latitude: 1.0,
            longitude: 2.0,
            status: StationStatus::Active,
            power_output: 150,
            connector_type: "CCS".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn defaults_for_new_station() {
        let fields = StationFields::default();
        assert_eq!(fields.status, StationStatus::Active);
        assert_eq!(fields.power_output, 50);
        assert_eq!(fields.connector_type, "CCS");
        assert_eq!(fields.latitude, 0.0);
        assert_eq!(fields.longitude, 0.0);
        assert!(fields.name.is_empty());
        assert!(fields.location.is_empty());
    }

    #[test]
    fn insert_payload_has_no_server_fields() {
        let json = serde_json::to_value(StationFields::default()).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("created_at"));
        assert!(!object.contains_key("updated_at"));
        assert_eq!(object["status"], "Active");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = StationPatch {
            status: Some(StationStatus::Inactive),
            ..StationPatch::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"status":"Inactive"}"#);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut target = station();
        let patch = StationPatch {
            name: Some("Renamed".into()),
            power_output: Some(22),
            ..StationPatch::default()
        };

        patch.apply_to(&mut target);

        assert_eq!(target.name, "Renamed");
        assert_eq!(target.power_output, 22);
        assert_eq!(target.location, "5th Ave");
        assert_eq!(target.id, StationId::new("st-1"));
    }

    #[test]
    fn full_patch_from_fields() {
        let fields = StationFields::from(&station());
        let patch = StationPatch::from(fields.clone());
        assert!(!patch.is_empty());

        let mut target = station();
        target.name = "Other".into();
        patch.apply_to(&mut target);
        assert_eq!(StationFields::from(&target), fields);
    }
}

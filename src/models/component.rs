//! Modelos de estado de componentes
//!
//! Estado de salud por subsistema del camión (filtros, aceite, frenos,
//! neumáticos, inyectores) tal como lo calcula el backend.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::truck::TruckId;

/// Máximo de camiones por request al endpoint bulk
pub const BULK_STATUS_LIMIT: usize = 50;

/// Estado de salud de un componente o del camión completo
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Excellent,
    VeryGood,
    #[default]
    Good,
    Fair,
    MaintenanceRequired,
    Poor,
    Critical,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::VeryGood => "Very Good",
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::MaintenanceRequired => "Maintenance Required",
            HealthStatus::Poor => "Poor",
            HealthStatus::Critical => "Critical",
            HealthStatus::Other(raw) => raw,
        }
    }

    /// Puntaje general estimado a partir del estado
    pub fn score(&self) -> u8 {
        match self {
            HealthStatus::Excellent => 95,
            HealthStatus::VeryGood => 90,
            HealthStatus::Good => 85,
            HealthStatus::Fair => 70,
            HealthStatus::Poor => 50,
            HealthStatus::Critical => 30,
            HealthStatus::MaintenanceRequired => 65,
            HealthStatus::Other(_) => 85,
        }
    }

    pub fn requires_maintenance(&self) -> bool {
        *self == HealthStatus::MaintenanceRequired
    }
}

impl From<String> for HealthStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Excellent" => HealthStatus::Excellent,
            "Very Good" => HealthStatus::VeryGood,
            "Good" => HealthStatus::Good,
            "Fair" => HealthStatus::Fair,
            "Maintenance Required" => HealthStatus::MaintenanceRequired,
            "Poor" => HealthStatus::Poor,
            "Critical" => HealthStatus::Critical,
            _ => HealthStatus::Other(value),
        }
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub component_name: String,
    pub current_status: HealthStatus,
    #[serde(default)]
    pub health_percentage: f64,
    #[serde(default)]
    pub last_maintenance_mileage: f64,
    #[serde(default)]
    pub next_maintenance_mileage: f64,
    #[serde(default)]
    pub km_remaining: f64,
    #[serde(default)]
    pub maintenance_interval: Option<f64>,
}

/// Reporte de componentes de un camión
///
/// También es el elemento de `successful_trucks` en el endpoint bulk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TruckComponentsStatus {
    #[serde(default)]
    pub truck_id: TruckId,
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub current_mileage: f64,
    #[serde(default)]
    pub overall_health_status: HealthStatus,
    #[serde(default)]
    pub components: Vec<ComponentStatus>,
    #[serde(default)]
    pub total_components: u32,
    #[serde(default)]
    pub components_requiring_maintenance: u32,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl TruckComponentsStatus {
    /// Reporte vacío que se usa cuando el backend no responde
    pub fn fallback(truck_id: TruckId) -> Self {
        Self {
            truck_id,
            ..Default::default()
        }
    }

    pub fn components_needing_maintenance(&self) -> Vec<&ComponentStatus> {
        self.components
            .iter()
            .filter(|c| c.current_status.requires_maintenance())
            .collect()
    }
}

/// Request de `POST /components/bulk/status`
#[derive(Debug, Clone, Serialize)]
pub struct BulkComponentsRequest {
    pub truck_ids: Vec<TruckId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedTruck {
    pub truck_id: TruckId,
    pub error: String,
}

/// Response del endpoint bulk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkComponentsResponse {
    #[serde(default)]
    pub successful_trucks: Vec<TruckComponentsStatus>,
    #[serde(default)]
    pub failed_trucks: Vec<FailedTruck>,
    #[serde(default)]
    pub total_requested: u32,
    #[serde(default)]
    pub total_successful: u32,
    #[serde(default)]
    pub total_failed: u32,
    #[serde(default)]
    pub processing_time_ms: f64,
}

impl BulkComponentsResponse {
    pub fn total_components(&self) -> u32 {
        self.successful_trucks.iter().map(|t| t.total_components).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_scores() {
        assert_eq!(HealthStatus::Excellent.score(), 95);
        assert_eq!(HealthStatus::MaintenanceRequired.score(), 65);
        assert_eq!(HealthStatus::Other("Desconocido".into()).score(), 85);
    }

    #[test]
    fn test_components_status_deserialize() {
        let report: TruckComponentsStatus = serde_json::from_value(json!({
            "truck_id": 3,
            "plate": "AB123CD",
            "model": "R450",
            "brand": "Scania",
            "current_mileage": 120500,
            "overall_health_status": "Maintenance Required",
            "components": [
                {
                    "component_name": "Aceite",
                    "current_status": "Maintenance Required",
                    "health_percentage": 12.5,
                    "last_maintenance_mileage": 100000,
                    "next_maintenance_mileage": 120000,
                    "km_remaining": -500,
                    "maintenance_interval": 20000
                },
                {
                    "component_name": "Frenos",
                    "current_status": "Very Good",
                    "health_percentage": 88,
                    "last_maintenance_mileage": 110000,
                    "next_maintenance_mileage": 150000,
                    "km_remaining": 29500
                }
            ],
            "total_components": 2,
            "components_requiring_maintenance": 1,
            "last_updated": "2025-02-01T08:00:00"
        }))
        .unwrap();

        assert_eq!(report.overall_health_status, HealthStatus::MaintenanceRequired);
        let needing = report.components_needing_maintenance();
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].component_name, "Aceite");
        assert_eq!(report.components[1].maintenance_interval, None);
    }
}

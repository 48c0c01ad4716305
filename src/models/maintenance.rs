//! Modelos de mantenimiento
//!
//! Registros de mantenimiento, órdenes pendientes de aprobación y el
//! historial por camión.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::component::HealthStatus;
use super::driver::DriverId;
use super::truck::TruckId;

pub type MaintenanceId = i64;

/// Copia del camión dentro del registro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTruck {
    pub truck_id: TruckId,
    pub plate: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub mileage: f64,
}

/// Copia del conductor dentro del registro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceDriver {
    pub id: DriverId,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub maintenance_id: MaintenanceId,
    #[serde(default)]
    pub description: String,
    pub status: HealthStatus,
    pub component: String,
    pub cost: Decimal,
    #[serde(default)]
    pub mileage_interval: f64,
    #[serde(default)]
    pub last_maintenance_mileage: f64,
    #[serde(default)]
    pub next_maintenance_mileage: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub truck: MaintenanceTruck,
    #[serde(default)]
    pub driver: Option<MaintenanceDriver>,
}

/// Response de `GET /Maintenance/truck/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceHistoryResponse {
    #[serde(default)]
    pub maintenances: Vec<MaintenanceRecord>,
}

/// Response de `GET /Maintenance/pending`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingMaintenancesResponse {
    #[serde(default)]
    pub pending_maintenances: Vec<MaintenanceRecord>,
    #[serde(default)]
    pub total_pending: u64,
}

/// Decisión del owner sobre una orden pendiente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Approved => f.write_str("Approved"),
            ApprovalStatus::Rejected => f.write_str("Rejected"),
        }
    }
}

/// Request de `POST /Maintenance/{id}/approve`
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRequest {
    pub approval_status: ApprovalStatus,
}

/// Response de crear orden o aprobar/rechazar
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceMutationResponse {
    #[serde(default)]
    pub maintenance: Option<serde_json::Value>,
    #[serde(default)]
    pub maintenance_id: Option<MaintenanceId>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_pending_response_deserialize() {
        let response: PendingMaintenancesResponse = serde_json::from_value(json!({
            "pending_maintenances": [{
                "maintenance_id": 5,
                "description": "Cambio de aceite",
                "status": "Maintenance Required",
                "component": "Aceite",
                "cost": 150.5,
                "mileage_interval": 10000,
                "last_maintenance_mileage": 100000,
                "next_maintenance_mileage": 110000,
                "created_at": "2025-02-01T08:00:00",
                "updated_at": "2025-02-01T08:00:00",
                "truck": { "truck_id": 3, "plate": "AB123CD", "model": "R450", "brand": "Scania", "mileage": 109000 },
                "driver": { "id": 7, "name": "Lucía", "surname": "Pereyra", "email": "lucia@truckguard.io" }
            }],
            "total_pending": 1
        }))
        .unwrap();

        assert_eq!(response.total_pending, 1);
        let record = &response.pending_maintenances[0];
        assert_eq!(record.cost, Decimal::from_str("150.5").unwrap());
        assert_eq!(record.status, HealthStatus::MaintenanceRequired);
    }

    #[test]
    fn test_approval_request_wire_format() {
        let body = serde_json::to_value(ApprovalRequest {
            approval_status: ApprovalStatus::Rejected,
        })
        .unwrap();
        assert_eq!(body, json!({ "approval_status": "Rejected" }));
    }
}

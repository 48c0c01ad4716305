//! Vista de detalle de un camión
//!
//! Junta el camión, el estado de sus componentes y el historial de
//! mantenimiento. Si fallan los componentes o el historial la vista sigue
//! armándose con valores por defecto; si falla el camión, falla todo.

use futures::join;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::models::component::TruckComponentsStatus;
use crate::models::maintenance::{MaintenanceId, MaintenanceRecord};
use crate::models::truck::{Truck, TruckId};
use crate::services::backend::FleetBackend;
use crate::utils::errors::AppResult;

/// Serie del radar cuando el backend no trae componentes
const RADAR_FALLBACK: [(&str, f64); 5] = [
    ("Filtros", 90.0),
    ("Aceite", 80.0),
    ("Frenos", 95.0),
    ("Neumático", 75.0),
    ("Inyectores", 70.0),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HistoryStatus {
    Programado,
    Completado,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: MaintenanceId,
    pub title: String,
    pub date: Option<String>,
    pub status: HistoryStatus,
    pub cost: Decimal,
}

impl From<&MaintenanceRecord> for HistoryEntry {
    fn from(record: &MaintenanceRecord) -> Self {
        let title = if record.description.trim().is_empty() {
            format!("{} - Mantenimiento", record.component)
        } else {
            record.description.clone()
        };

        Self {
            id: record.maintenance_id,
            title,
            date: record.updated_at.clone().or_else(|| record.created_at.clone()),
            status: if record.status.requires_maintenance() {
                HistoryStatus::Programado
            } else {
                HistoryStatus::Completado
            },
            cost: record.cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruckDetail {
    pub truck: Truck,
    pub driver_name: String,
    pub driver_phone: Option<String>,
    pub health_score: u8,
    pub radar: Vec<RadarPoint>,
    pub history: Vec<HistoryEntry>,
    #[serde(skip)]
    pub components: TruckComponentsStatus,
}

impl TruckDetail {
    pub fn build(
        truck: Truck,
        components: TruckComponentsStatus,
        maintenances: &[MaintenanceRecord],
    ) -> Self {
        let radar = if components.components.is_empty() {
            RADAR_FALLBACK
                .iter()
                .map(|(label, value)| RadarPoint {
                    label: label.to_string(),
                    value: *value,
                })
                .collect()
        } else {
            components
                .components
                .iter()
                .map(|component| RadarPoint {
                    label: component.component_name.clone(),
                    value: component.health_percentage,
                })
                .collect()
        };

        Self {
            driver_name: truck.driver_display_name(),
            driver_phone: truck.driver.as_ref().map(|driver| driver.phone.clone()),
            health_score: components.overall_health_status.score(),
            radar,
            history: maintenances.iter().map(HistoryEntry::from).collect(),
            components,
            truck,
        }
    }
}

/// Cargar el detalle con las tres lecturas en paralelo
pub async fn load_truck_detail<B: FleetBackend + ?Sized>(
    backend: &B,
    truck_id: TruckId,
) -> AppResult<TruckDetail> {
    let (truck, components, history) = join!(
        backend.get_truck(truck_id),
        backend.component_status(truck_id),
        backend.maintenance_history(truck_id)
    );

    let truck = truck?;
    let components = components.unwrap_or_else(|e| {
        warn!("⚠️ Estado de componentes no disponible para camión {}: {}", truck_id, e);
        TruckComponentsStatus::fallback(truck_id)
    });
    let history = history.unwrap_or_else(|e| {
        warn!("⚠️ Historial no disponible para camión {}: {}", truck_id, e);
        Vec::new()
    });

    Ok(TruckDetail::build(truck, components, &history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::component::{ComponentStatus, HealthStatus};
    use crate::models::maintenance::MaintenanceTruck;
    use crate::models::truck::TruckStatus;

    fn truck() -> Truck {
        Truck {
            truck_id: 3,
            plate: "AB123CD".to_string(),
            brand: "Scania".to_string(),
            model: "R450".to_string(),
            year: "2021".to_string(),
            mileage: 120500.0,
            color: "Blanco".to_string(),
            status: TruckStatus::Active,
            updated_at: None,
            driver: None,
        }
    }

    fn record(description: &str, status: HealthStatus) -> MaintenanceRecord {
        MaintenanceRecord {
            maintenance_id: 1,
            description: description.to_string(),
            status,
            component: "Aceite".to_string(),
            cost: Decimal::new(15050, 2),
            mileage_interval: 10000.0,
            last_maintenance_mileage: 100000.0,
            next_maintenance_mileage: 110000.0,
            created_at: Some("2025-02-01T08:00:00".to_string()),
            updated_at: None,
            truck: MaintenanceTruck {
                truck_id: 3,
                plate: "AB123CD".to_string(),
                model: "R450".to_string(),
                brand: "Scania".to_string(),
                mileage: 120500.0,
            },
            driver: None,
        }
    }

    #[test]
    fn test_fallbacks() {
        let detail = TruckDetail::build(truck(), TruckComponentsStatus::fallback(3), &[]);
        assert_eq!(detail.health_score, 85);
        assert_eq!(detail.driver_name, "—");
        assert_eq!(detail.radar.len(), 5);
        assert_eq!(detail.radar[3].label, "Neumático");
        assert!(detail.history.is_empty());
    }

    #[test]
    fn test_radar_from_components_and_history_entries() {
        let components = TruckComponentsStatus {
            overall_health_status: HealthStatus::MaintenanceRequired,
            components: vec![ComponentStatus {
                component_name: "Frenos".to_string(),
                current_status: HealthStatus::Good,
                health_percentage: 64.0,
                last_maintenance_mileage: 0.0,
                next_maintenance_mileage: 0.0,
                km_remaining: 0.0,
                maintenance_interval: None,
            }],
            ..TruckComponentsStatus::fallback(3)
        };
        let history = vec![
            record("", HealthStatus::MaintenanceRequired),
            record("Cambio de aceite", HealthStatus::Good),
        ];

        let detail = TruckDetail::build(truck(), components, &history);
        assert_eq!(detail.health_score, 65);
        assert_eq!(
            detail.radar,
            vec![RadarPoint {
                label: "Frenos".to_string(),
                value: 64.0
            }]
        );
        assert_eq!(detail.history[0].title, "Aceite - Mantenimiento");
        assert_eq!(detail.history[0].status, HistoryStatus::Programado);
        assert_eq!(detail.history[0].date.as_deref(), Some("2025-02-01T08:00:00"));
        assert_eq!(detail.history[1].title, "Cambio de aceite");
        assert_eq!(detail.history[1].status, HistoryStatus::Completado);
    }
}

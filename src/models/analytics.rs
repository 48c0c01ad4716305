//! Modelos de Analytics
//!
//! Métricas agregadas de la flota calculadas por el backend (solo lectura)
//! y los KPIs que el dashboard deriva de los listados locales.

use serde::{Deserialize, Serialize};

use super::component::BulkComponentsResponse;
use super::truck::Truck;

/// Métricas de flota de `GET /Fleetanalytics/analytics`
///
/// Los campos que el cliente no conoce se conservan en `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetAnalytics {
    #[serde(default)]
    pub total_trucks: Option<i64>,
    #[serde(default)]
    pub active_trucks: Option<i64>,
    #[serde(default)]
    pub trucks_in_maintenance: Option<i64>,
    #[serde(default)]
    pub pending_maintenance: Option<i64>,
    #[serde(default)]
    pub total_trips: Option<i64>,
    #[serde(default)]
    pub fleet_health_score: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// KPIs del dashboard y de la pantalla de mantenimiento
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetKpis {
    pub total_trucks: usize,
    pub trucks_with_driver: usize,
    pub trucks_without_driver: usize,
    pub total_components: u32,
}

impl FleetKpis {
    pub fn from_trucks(trucks: &[Truck], components: Option<&BulkComponentsResponse>) -> Self {
        let total_trucks = trucks.len();
        let trucks_with_driver = trucks.iter().filter(|t| t.has_driver()).count();

        Self {
            total_trucks,
            trucks_with_driver,
            trucks_without_driver: total_trucks - trucks_with_driver,
            total_components: components.map(|c| c.total_components()).unwrap_or(0),
        }
    }
}

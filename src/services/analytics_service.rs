//! Servicio de analytics de flota
//!
//! Las métricas agregadas las calcula el backend; acá solo se piden, se
//! refrescan y se combinan con los KPIs que salen de la lista de camiones.

use futures::future::try_join;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::analytics::{FleetAnalytics, FleetKpis};
use crate::models::component::BULK_STATUS_LIMIT;
use crate::models::truck::TruckId;
use crate::services::backend::FleetBackend;
use crate::utils::errors::AppResult;

/// Camiones que se consideran para los KPIs del dashboard
pub const DASHBOARD_TRUCKS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetOverview {
    pub analytics: FleetAnalytics,
    pub kpis: FleetKpis,
    pub available_drivers: usize,
}

pub struct AnalyticsService<'a, B: FleetBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: FleetBackend + ?Sized> AnalyticsService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    pub async fn analytics(&self) -> AppResult<FleetAnalytics> {
        self.backend.fleet_analytics().await
    }

    /// Pedir al backend que recalcule y devolver las métricas nuevas
    pub async fn refresh(&self) -> AppResult<FleetAnalytics> {
        let analytics = self.backend.refresh_fleet_analytics().await?;
        info!("📊 Analytics refrescados (actualizado: {:?})", analytics.updated_at);
        Ok(analytics)
    }

    /// Datos del dashboard: analytics, KPIs de camiones y conductores libres
    ///
    /// El estado de componentes es opcional: si el endpoint bulk falla, el
    /// total de componentes queda en cero.
    pub async fn overview(&self) -> AppResult<FleetOverview> {
        let (analytics, trucks) = try_join(
            self.backend.fleet_analytics(),
            self.backend.list_trucks(1, DASHBOARD_TRUCKS),
        )
        .await?;

        let available_drivers = match self.backend.drivers_without_truck().await {
            Ok(drivers) => drivers.len(),
            Err(e) => {
                warn!("⚠️ No se pudieron contar conductores disponibles: {}", e);
                0
            }
        };

        let ids: Vec<TruckId> = trucks
            .items
            .iter()
            .take(BULK_STATUS_LIMIT)
            .map(|truck| truck.truck_id)
            .collect();
        let components = if ids.is_empty() {
            None
        } else {
            match self.backend.bulk_component_status(&ids).await {
                Ok(response) => Some(response),
                Err(e) => {
                    warn!("⚠️ Estado de componentes no disponible: {}", e);
                    None
                }
            }
        };

        Ok(FleetOverview {
            kpis: FleetKpis::from_trucks(&trucks.items, components.as_ref()),
            analytics,
            available_drivers,
        })
    }
}

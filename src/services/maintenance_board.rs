//! Tablero de mantenimiento
//!
//! Órdenes pendientes de aprobación y creación de nuevas órdenes a partir del
//! estado de un componente.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::dto::MaintenanceOrderForm;
use crate::models::maintenance::{
    ApprovalStatus, MaintenanceId, MaintenanceMutationResponse, MaintenanceRecord,
};
use crate::services::backend::FleetBackend;
use crate::services::store::{Collection, Optimistic};
use crate::utils::errors::{not_found_error, AppResult};

pub struct MaintenanceBoard<B: FleetBackend> {
    backend: Arc<B>,
    pending: Collection<MaintenanceRecord>,
}

impl<B: FleetBackend> MaintenanceBoard<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            pending: Collection::default(),
        }
    }

    pub async fn load_pending(&mut self) -> AppResult<()> {
        let response = self.backend.pending_maintenances().await.map_err(|e| {
            error!("❌ Error cargando mantenimientos pendientes: {}", e);
            e
        })?;

        info!("🔧 {} mantenimientos pendientes", response.total_pending);
        self.pending.replace_all(response.pending_maintenances);
        Ok(())
    }

    pub async fn approve(&mut self, maintenance_id: MaintenanceId) -> AppResult<()> {
        self.review(maintenance_id, ApprovalStatus::Approved).await
    }

    pub async fn reject(&mut self, maintenance_id: MaintenanceId) -> AppResult<()> {
        self.review(maintenance_id, ApprovalStatus::Rejected).await
    }

    /// Aprobar o rechazar: la orden sale de la lista en ambos casos
    pub async fn review(&mut self, maintenance_id: MaintenanceId, decision: ApprovalStatus) -> AppResult<()> {
        if !self.pending.contains(maintenance_id) {
            return Err(not_found_error("Pending maintenance", maintenance_id));
        }

        let mut pending = Optimistic::begin(&mut self.pending, "revisar mantenimiento");
        pending.remove(maintenance_id);

        match self.backend.review_maintenance(maintenance_id, decision).await {
            Ok(_) => {
                pending.commit();
                info!("✅ Mantenimiento {} {}", maintenance_id, decision);
                Ok(())
            }
            Err(e) => {
                pending.rollback();
                error!("❌ Error revisando mantenimiento {}: {}", maintenance_id, e);
                Err(e)
            }
        }
    }

    /// Enviar la orden del modal de mantenimiento
    pub async fn create_order(&self, form: MaintenanceOrderForm) -> AppResult<MaintenanceMutationResponse> {
        let request = form.into_request()?;
        self.backend.create_maintenance(&request).await.map_err(|e| {
            error!("❌ Error creando orden de mantenimiento: {}", e);
            e
        })
    }

    pub fn pending(&self) -> &[MaintenanceRecord] {
        self.pending.as_slice()
    }

    /// Costo total de lo pendiente
    pub fn pending_cost(&self) -> Decimal {
        self.pending.iter().map(|record| record.cost).sum()
    }
}

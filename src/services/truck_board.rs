//! Tablero de camiones y conductores disponibles
//!
//! Mantiene la página actual de camiones y el pool de conductores sin camión.
//! Cambio de estado, asignación y desasignación son optimistas: se aplican
//! localmente, se envía el request y ante un error se restaura el snapshot.

use std::sync::Arc;

use futures::future::try_join;
use tracing::{debug, error, info, warn};

use crate::dto::{CreateTruckRequest, UpdateTruckRequest};
use crate::models::analytics::FleetKpis;
use crate::models::component::BulkComponentsResponse;
use crate::models::driver::{Driver, DriverId};
use crate::models::truck::{Truck, TruckId, TruckStatus};
use crate::models::component::BULK_STATUS_LIMIT;
use crate::services::backend::FleetBackend;
use crate::services::pagination::Pager;
use crate::services::store::{Collection, Optimistic};
use crate::utils::errors::{forbidden_error, not_found_error, AppResult};

/// Colecciones que una mutación puede tocar a la vez
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetState {
    pub trucks: Collection<Truck>,
    pub drivers: Collection<Driver>,
}

/// Filtros locales sobre la página cargada
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TruckFilter {
    pub search: String,
    pub status: Option<TruckStatus>,
}

impl TruckFilter {
    pub fn matches(&self, truck: &Truck) -> bool {
        truck.matches_search(&self.search)
            && self.status.as_ref().map_or(true, |status| truck.status == *status)
    }
}

pub struct TruckBoard<B: FleetBackend> {
    backend: Arc<B>,
    state: FleetState,
    components: Option<BulkComponentsResponse>,
    pager: Pager,
    pub filter: TruckFilter,
}

impl<B: FleetBackend> TruckBoard<B> {
    pub fn new(backend: Arc<B>, per_page: u32) -> Self {
        Self {
            backend,
            state: FleetState::default(),
            components: None,
            pager: Pager::new(per_page),
            filter: TruckFilter::default(),
        }
    }

    /// Cargar camiones y conductores disponibles en paralelo
    pub async fn load(&mut self) -> AppResult<()> {
        let (page, drivers) = loop {
            let (page, drivers) = try_join(
                self.backend.list_trucks(self.pager.page(), self.pager.per_page()),
                self.backend.drivers_without_truck(),
            )
            .await
            .map_err(|e| {
                error!("❌ Error cargando camiones: {}", e);
                e
            })?;

            self.pager.record(page.total, page.pages);
            if !self.pager.set_page(self.pager.page()) {
                break (page, drivers);
            }
            debug!("📄 Página {} fuera de rango, pidiendo la {}", page.page, self.pager.page());
        };

        self.state.trucks.replace_all(page.items);
        self.state.drivers.replace_all(drivers);
        info!(
            "🚚 Tablero cargado: {} camiones, {} conductores disponibles",
            self.state.trucks.len(),
            self.state.drivers.len()
        );
        Ok(())
    }

    /// Cargar un solo camión (vista de detalle) junto con el pool de conductores
    pub async fn load_single(&mut self, truck_id: TruckId) -> AppResult<()> {
        let (truck, drivers) = try_join(
            self.backend.get_truck(truck_id),
            self.backend.drivers_without_truck(),
        )
        .await?;

        self.pager.record(1, 1);
        self.state.trucks.replace_all(vec![truck]);
        self.state.drivers.replace_all(drivers);
        Ok(())
    }

    /// Volver a pedir todo al backend, que es la fuente de verdad
    pub async fn resync(&mut self) -> AppResult<()> {
        self.load().await
    }

    pub async fn set_page(&mut self, page: u32) -> AppResult<()> {
        if self.pager.set_page(page) {
            self.load().await?;
        }
        Ok(())
    }

    pub async fn set_per_page(&mut self, per_page: u32) -> AppResult<()> {
        self.pager.set_per_page(per_page);
        self.load().await
    }

    /// Estado de componentes de los camiones cargados, en tandas de 50
    pub async fn load_components(&mut self) -> AppResult<&BulkComponentsResponse> {
        let ids: Vec<TruckId> = self.state.trucks.iter().map(|t| t.truck_id).collect();
        let mut merged = BulkComponentsResponse::default();

        for chunk in ids.chunks(BULK_STATUS_LIMIT) {
            let response = self.backend.bulk_component_status(chunk).await?;
            merged.successful_trucks.extend(response.successful_trucks);
            merged.failed_trucks.extend(response.failed_trucks);
            merged.total_requested += response.total_requested;
            merged.total_successful += response.total_successful;
            merged.total_failed += response.total_failed;
            merged.processing_time_ms += response.processing_time_ms;
        }

        Ok(self.components.insert(merged))
    }

    /// Cambiar el estado del camión (optimista)
    pub async fn update_status(&mut self, truck_id: TruckId, status: TruckStatus) -> AppResult<()> {
        self.edit_truck(truck_id, UpdateTruckRequest::status(status)).await
    }

    /// Editar campos del camión (optimista)
    pub async fn edit_truck(&mut self, truck_id: TruckId, changes: UpdateTruckRequest) -> AppResult<()> {
        if !self.state.trucks.contains(truck_id) {
            return Err(not_found_error("Truck", truck_id));
        }

        let mut state = Optimistic::begin(&mut self.state, "editar camión");
        state.trucks.update(truck_id, |truck| changes.apply_to(truck));

        match self.backend.edit_truck(truck_id, &changes).await {
            Ok(response) => {
                let merged = state.trucks.get(truck_id).and_then(|current| response.merged_into(current));
                if let Some(merged) = merged {
                    state.trucks.replace(merged);
                }
                state.commit();
                info!("✅ Camión {} actualizado", truck_id);
                Ok(())
            }
            Err(e) => {
                state.rollback();
                error!("❌ Error editando camión {}: {}", truck_id, e);
                Err(e)
            }
        }
    }

    /// Asignar un conductor del pool a un camión (optimista)
    ///
    /// Si el camión ya tenía conductor, ese conductor vuelve al pool.
    pub async fn assign_driver(&mut self, truck_id: TruckId, driver_id: DriverId) -> AppResult<()> {
        let driver = self
            .state
            .drivers
            .get(driver_id)
            .cloned()
            .ok_or_else(|| not_found_error("Available driver", driver_id))?;
        if !self.state.trucks.contains(truck_id) {
            return Err(not_found_error("Truck", truck_id));
        }

        let mut state = Optimistic::begin(&mut self.state, "asignar conductor");
        let mut previous = None;
        state.trucks.update(truck_id, |truck| {
            previous = truck.driver.replace(driver);
        });

        match self.backend.assign_driver(truck_id, driver_id).await {
            Ok(response) => {
                state.drivers.remove(driver_id);
                if let Some(previous) = previous {
                    state.drivers.push(previous);
                }
                let merged = state.trucks.get(truck_id).and_then(|current| response.merged_into(current));
                if let Some(merged) = merged {
                    if merged.driver.as_ref().map(|d| d.id) == Some(driver_id) {
                        state.trucks.replace(merged);
                    }
                }
                state.commit();
                info!("👤 Conductor {} asignado al camión {}", driver_id, truck_id);
                Ok(())
            }
            Err(e) => {
                state.rollback();
                error!(
                    "❌ Error asignando conductor {} al camión {}: {}",
                    driver_id, truck_id, e
                );
                Err(e)
            }
        }
    }

    /// Quitar el conductor de un camión (optimista)
    pub async fn unassign_driver(&mut self, truck_id: TruckId) -> AppResult<()> {
        let driver = self
            .state
            .trucks
            .get(truck_id)
            .ok_or_else(|| not_found_error("Truck", truck_id))?
            .driver
            .clone()
            .ok_or_else(|| forbidden_error("unassign driver", "truck has no driver"))?;

        let mut state = Optimistic::begin(&mut self.state, "desasignar conductor");
        state.trucks.update(truck_id, |truck| truck.driver = None);

        match self.backend.unassign_driver(truck_id).await {
            Ok(_) => {
                state.drivers.push(driver);
                state.commit();
                info!("👤 Camión {} quedó sin conductor", truck_id);
                Ok(())
            }
            Err(e) => {
                state.rollback();
                error!("❌ Error desasignando conductor del camión {}: {}", truck_id, e);
                Err(e)
            }
        }
    }

    /// Dar de alta un camión y agregarlo a la lista local
    pub async fn create_truck(&mut self, request: &CreateTruckRequest) -> AppResult<Option<TruckId>> {
        let response = self.backend.create_truck(request).await.map_err(|e| {
            error!("❌ Error creando camión {}: {}", request.plate, e);
            e
        })?;

        let created = response
            .confirmed_truck()
            .or_else(|| response.truck_id().map(|id| request.to_truck(id)));

        match created {
            Some(truck) => {
                let truck_id = truck.truck_id;
                self.state.trucks.push(truck);
                info!("✅ Camión {} creado con id {}", request.plate, truck_id);
                Ok(Some(truck_id))
            }
            None => {
                warn!("⚠️ El backend no devolvió el id del camión creado, resincronizando");
                self.resync().await?;
                Ok(None)
            }
        }
    }

    pub fn trucks(&self) -> &[Truck] {
        self.state.trucks.as_slice()
    }

    pub fn truck(&self, truck_id: TruckId) -> Option<&Truck> {
        self.state.trucks.get(truck_id)
    }

    pub fn available_drivers(&self) -> &[Driver] {
        self.state.drivers.as_slice()
    }

    pub fn search_drivers(&self, term: &str) -> Vec<&Driver> {
        self.state
            .drivers
            .iter()
            .filter(|driver| driver.matches_search(term))
            .collect()
    }

    /// Camiones de la página actual que pasan los filtros locales
    pub fn visible_trucks(&self) -> Vec<&Truck> {
        self.pager
            .visible(self.state.trucks.as_slice())
            .iter()
            .filter(|truck| self.filter.matches(truck))
            .collect()
    }

    pub fn trucks_without_driver(&self) -> Vec<&Truck> {
        self.state.trucks.iter().filter(|t| !t.has_driver()).collect()
    }

    pub fn kpis(&self) -> FleetKpis {
        FleetKpis::from_trucks(self.state.trucks.as_slice(), self.components.as_ref())
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn state(&self) -> &FleetState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truck(status: TruckStatus) -> Truck {
        Truck {
            truck_id: 1,
            plate: "AB123CD".to_string(),
            brand: "Scania".to_string(),
            model: "R450".to_string(),
            year: "2021".to_string(),
            mileage: 0.0,
            color: "Blanco".to_string(),
            status,
            updated_at: None,
            driver: None,
        }
    }

    #[test]
    fn test_filter_by_text_and_status() {
        let filter = TruckFilter {
            search: "scan".to_string(),
            status: Some(TruckStatus::Active),
        };
        assert!(filter.matches(&truck(TruckStatus::Active)));
        assert!(!filter.matches(&truck(TruckStatus::Inactive)));

        let by_text = TruckFilter {
            search: "volvo".to_string(),
            status: None,
        };
        assert!(!by_text.matches(&truck(TruckStatus::Active)));
        assert!(TruckFilter::default().matches(&truck(TruckStatus::Maintenance)));
    }
}

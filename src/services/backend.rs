//! Contrato con el backend de flota
//!
//! `FleetBackend` es la costura entre los tableros (estado local) y el
//! transporte HTTP. La implementación de producción es
//! [`FleetApiClient`](crate::client::FleetApiClient); los tests usan dobles.

use async_trait::async_trait;

use crate::dto::{CreateMaintenanceRequest, CreateTripRequest, CreateTruckRequest, UpdateTruckRequest};
use crate::models::component::{BulkComponentsResponse, TruckComponentsStatus};
use crate::models::driver::{Driver, DriverId};
use crate::models::maintenance::{
    ApprovalStatus, MaintenanceId, MaintenanceMutationResponse, MaintenanceRecord,
    PendingMaintenancesResponse,
};
use crate::models::trip::{Trip, TripId, TripMutationResponse};
use crate::models::truck::{Truck, TruckId, TruckMutationResponse};
use crate::models::analytics::FleetAnalytics;
use crate::utils::errors::AppResult;

/// Una página de resultados tal como la reporta el servidor
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
}

impl<T> Page<T> {
    /// Página única cuando el endpoint no informa paginación
    pub fn single(items: Vec<T>, page: u32) -> Self {
        Self {
            total: items.len() as u64,
            page,
            pages: 1,
            items,
        }
    }
}

#[async_trait]
pub trait FleetBackend: Send + Sync {
    // Camiones y conductores
    async fn list_trucks(&self, page: u32, per_page: u32) -> AppResult<Page<Truck>>;
    async fn get_truck(&self, truck_id: TruckId) -> AppResult<Truck>;
    async fn create_truck(&self, request: &CreateTruckRequest) -> AppResult<TruckMutationResponse>;
    async fn edit_truck(
        &self,
        truck_id: TruckId,
        request: &UpdateTruckRequest,
    ) -> AppResult<TruckMutationResponse>;
    async fn assign_driver(
        &self,
        truck_id: TruckId,
        driver_id: DriverId,
    ) -> AppResult<TruckMutationResponse>;
    async fn unassign_driver(&self, truck_id: TruckId) -> AppResult<TruckMutationResponse>;
    async fn drivers_without_truck(&self) -> AppResult<Vec<Driver>>;

    // Viajes
    async fn list_trips(&self, page: u32, per_page: u32) -> AppResult<Page<Trip>>;
    async fn get_trip(&self, trip_id: TripId) -> AppResult<Trip>;
    async fn create_trip(&self, request: &CreateTripRequest) -> AppResult<TripMutationResponse>;
    async fn activate_trip(&self, trip_id: TripId) -> AppResult<TripMutationResponse>;
    async fn complete_trip(&self, trip_id: TripId) -> AppResult<TripMutationResponse>;
    async fn delete_trip(&self, trip_id: TripId) -> AppResult<TripMutationResponse>;

    // Componentes y mantenimiento
    async fn component_status(&self, truck_id: TruckId) -> AppResult<TruckComponentsStatus>;
    async fn bulk_component_status(&self, truck_ids: &[TruckId]) -> AppResult<BulkComponentsResponse>;
    async fn maintenance_history(&self, truck_id: TruckId) -> AppResult<Vec<MaintenanceRecord>>;
    async fn create_maintenance(
        &self,
        request: &CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceMutationResponse>;
    async fn pending_maintenances(&self) -> AppResult<PendingMaintenancesResponse>;
    async fn review_maintenance(
        &self,
        maintenance_id: MaintenanceId,
        decision: ApprovalStatus,
    ) -> AppResult<MaintenanceMutationResponse>;

    // Analytics
    async fn fleet_analytics(&self) -> AppResult<FleetAnalytics>;
    async fn refresh_fleet_analytics(&self) -> AppResult<FleetAnalytics>;
}

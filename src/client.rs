//! Cliente HTTP para el backend de TruckGuard
//!
//! Este módulo contiene el cliente HTTP que consume la API REST de flota
//! (camiones, viajes, mantenimiento, componentes y analytics). Cada request
//! autenticado lleva el bearer token de la [`Session`] explícita.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::{
    AssignDriverRequest, CreateMaintenanceRequest, CreateTripRequest, CreateTruckRequest,
    LoginRequest, RegisterRequest, UpdateTruckRequest,
};
use crate::models::analytics::FleetAnalytics;
use crate::models::auth::LoginResponse;
use crate::models::component::{
    BulkComponentsRequest, BulkComponentsResponse, TruckComponentsStatus, BULK_STATUS_LIMIT,
};
use crate::models::driver::{Driver, DriverId, DriversWithoutTruckResponse};
use crate::models::maintenance::{
    ApprovalRequest, ApprovalStatus, MaintenanceHistoryResponse, MaintenanceId,
    MaintenanceMutationResponse, MaintenanceRecord, PendingMaintenancesResponse,
};
use crate::models::trip::{SingleTripResponse, Trip, TripId, TripListResponse, TripMutationResponse};
use crate::models::truck::{
    SingleTruckResponse, Truck, TruckId, TruckListResponse, TruckMutationResponse,
};
use crate::services::backend::{FleetBackend, Page};
use crate::state::Session;
use crate::utils::errors::{unexpected_shape, validation_error, AppError, AppResult};

/// Cliente HTTP para la API de flota
#[derive(Clone)]
pub struct FleetApiClient {
    client: Client,
    base_url: String,
    session: Option<Session>,
}

impl FleetApiClient {
    /// Crear nuevo cliente HTTP con la configuración del entorno
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    /// Mismo cliente con una sesión autenticada
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Iniciar sesión (`POST /Auth/login`)
    pub async fn login(&self, request: &LoginRequest) -> AppResult<Session> {
        request.validate()?;
        info!("🔐 Iniciando sesión para {}", request.email);

        let builder = self.request(Method::POST, "/Auth/login").json(request);
        let response: LoginResponse = decode(&self.execute(builder).await?)?;
        Ok(Session::from_login(&response))
    }

    /// Registrar usuario (`POST /Auth/register`)
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<serde_json::Value> {
        request.validate()?;
        info!("📝 Registrando usuario {}", request.email);

        let builder = self.request(Method::POST, "/Auth/register").json(request);
        decode_or_default(&self.execute(builder).await?)
    }

    /// Cerrar sesión: el backend no tiene endpoint, se descarta el token local
    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("👋 Sesión cerrada");
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("➡️ {} {}", method, path);
        self.client
            .request(method, self.url(path))
            .header("Accept", "application/json")
    }

    /// Request con bearer token; sin sesión vigente no sale nada
    fn authorized(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("No authentication token found".to_string()))?;

        if session.is_expired() {
            warn!("⏰ Token expirado, no se envía {} {}", method, path);
            return Err(AppError::Unauthorized("Authentication token expired".to_string()));
        }

        Ok(self
            .request(method, path)
            .header("Authorization", session.bearer()))
    }

    /// Enviar y devolver el cuerpo si la respuesta es 2xx
    async fn execute(&self, builder: RequestBuilder) -> AppResult<String> {
        let response = builder.send().await.map_err(|e| {
            error!("❌ Error de red: {}", e);
            AppError::Network(e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!("❌ {} respondió {}: {}", url, status, body);
            return Err(AppError::from_response(status.as_u16(), &body));
        }

        debug!("📡 {} respondió {}", url, status);
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let builder = self.authorized(Method::GET, path)?;
        decode(&self.execute(builder).await?)
    }

    async fn mutate<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
        B: serde::Serialize + ?Sized + Sync,
    {
        let mut builder = self.authorized(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        decode_or_default(&self.execute(builder).await?)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| {
        error!("❌ Respuesta inválida del backend: {}", e);
        AppError::Decode(e)
    })
}

/// Las mutaciones a veces responden sin cuerpo
fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> AppResult<T> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    decode(body)
}

#[async_trait]
impl FleetBackend for FleetApiClient {
    async fn list_trucks(&self, page: u32, per_page: u32) -> AppResult<Page<Truck>> {
        let path = format!("/Trucks/all?page={}&per_page={}", page, per_page);
        let response: TruckListResponse = self.get_json(&path).await?;
        let trucks = response
            .trucks
            .ok_or_else(|| unexpected_shape("{ trucks: Truck[] }"))?;

        info!("🚚 {} camiones recibidos (página {})", trucks.len(), page);
        Ok(match (response.total, response.pages) {
            (Some(total), Some(pages)) => Page {
                items: trucks,
                total,
                page,
                pages,
            },
            _ => Page::single(trucks, page),
        })
    }

    async fn get_truck(&self, truck_id: TruckId) -> AppResult<Truck> {
        let response: SingleTruckResponse = self.get_json(&format!("/Trucks/{}", truck_id)).await?;
        Ok(response.truck)
    }

    async fn create_truck(&self, request: &CreateTruckRequest) -> AppResult<TruckMutationResponse> {
        request.validate()?;
        info!("🆕 Creando camión {}", request.plate);
        self.mutate(Method::POST, "/Trucks/new", Some(request)).await
    }

    async fn edit_truck(
        &self,
        truck_id: TruckId,
        request: &UpdateTruckRequest,
    ) -> AppResult<TruckMutationResponse> {
        request.validate()?;
        self.mutate(Method::PUT, &format!("/Trucks/{}", truck_id), Some(request))
            .await
    }

    async fn assign_driver(
        &self,
        truck_id: TruckId,
        driver_id: DriverId,
    ) -> AppResult<TruckMutationResponse> {
        let body = AssignDriverRequest { driver_id };
        self.mutate(Method::PUT, &format!("/Trucks/{}/assign", truck_id), Some(&body))
            .await
    }

    async fn unassign_driver(&self, truck_id: TruckId) -> AppResult<TruckMutationResponse> {
        self.mutate::<_, ()>(Method::PUT, &format!("/Trucks/{}/unassign", truck_id), None)
            .await
    }

    async fn drivers_without_truck(&self) -> AppResult<Vec<Driver>> {
        let response: DriversWithoutTruckResponse =
            self.get_json("/Trucks/drivers_without_truck").await?;
        response
            .drivers
            .ok_or_else(|| unexpected_shape("{ drivers: Driver[] }"))
    }

    async fn list_trips(&self, page: u32, per_page: u32) -> AppResult<Page<Trip>> {
        let path = format!("/Trips/all?page={}&per_page={}", page, per_page);
        let response: TripListResponse = self.get_json(&path).await?;
        let trips = response
            .trips
            .ok_or_else(|| unexpected_shape("{ trips: Trip[] }"))?;

        info!(
            "🧭 {} viajes recibidos (página {} de {}, total {})",
            trips.len(),
            response.page,
            response.pages,
            response.total
        );
        Ok(Page {
            items: trips,
            total: response.total,
            page: if response.page == 0 { page } else { response.page },
            pages: response.pages,
        })
    }

    async fn get_trip(&self, trip_id: TripId) -> AppResult<Trip> {
        let response: SingleTripResponse = self.get_json(&format!("/Trips/{}", trip_id)).await?;
        Ok(response.trip)
    }

    async fn create_trip(&self, request: &CreateTripRequest) -> AppResult<TripMutationResponse> {
        request.validate()?;
        info!("🆕 Creando viaje {} → {}", request.origin, request.destination);
        self.mutate(Method::POST, "/Trips/new", Some(request)).await
    }

    async fn activate_trip(&self, trip_id: TripId) -> AppResult<TripMutationResponse> {
        self.mutate::<_, ()>(Method::PATCH, &format!("/Trips/activate/{}", trip_id), None)
            .await
    }

    async fn complete_trip(&self, trip_id: TripId) -> AppResult<TripMutationResponse> {
        self.mutate::<_, ()>(Method::PATCH, &format!("/Trips/complete/{}", trip_id), None)
            .await
    }

    async fn delete_trip(&self, trip_id: TripId) -> AppResult<TripMutationResponse> {
        self.mutate::<_, ()>(Method::DELETE, &format!("/Trips/delete/{}", trip_id), None)
            .await
    }

    async fn component_status(&self, truck_id: TruckId) -> AppResult<TruckComponentsStatus> {
        self.get_json(&format!("/components/{}/status", truck_id)).await
    }

    async fn bulk_component_status(&self, truck_ids: &[TruckId]) -> AppResult<BulkComponentsResponse> {
        if truck_ids.is_empty() {
            return Err(validation_error("truck_ids", "truck_ids es requerido y no puede estar vacío"));
        }
        if truck_ids.len() > BULK_STATUS_LIMIT {
            return Err(validation_error("truck_ids", "Máximo 50 camiones por request"));
        }

        let body = BulkComponentsRequest {
            truck_ids: truck_ids.to_vec(),
        };
        let builder = self
            .authorized(Method::POST, "/components/bulk/status")?
            .json(&body);
        let response: BulkComponentsResponse = decode(&self.execute(builder).await?)?;

        if response.total_failed > 0 {
            warn!(
                "⚠️ Estado bulk: {} de {} camiones fallaron",
                response.total_failed, response.total_requested
            );
        }
        Ok(response)
    }

    async fn maintenance_history(&self, truck_id: TruckId) -> AppResult<Vec<MaintenanceRecord>> {
        let response: MaintenanceHistoryResponse = self
            .get_json(&format!("/Maintenance/truck/{}", truck_id))
            .await?;
        Ok(response.maintenances)
    }

    async fn create_maintenance(
        &self,
        request: &CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceMutationResponse> {
        request.validate()?;
        info!(
            "🔧 Creando orden de mantenimiento de {} para camión {}",
            request.component, request.truck_id
        );
        self.mutate(Method::POST, "/Maintenance/new", Some(request)).await
    }

    async fn pending_maintenances(&self) -> AppResult<PendingMaintenancesResponse> {
        self.get_json("/Maintenance/pending").await
    }

    async fn review_maintenance(
        &self,
        maintenance_id: MaintenanceId,
        decision: ApprovalStatus,
    ) -> AppResult<MaintenanceMutationResponse> {
        let body = ApprovalRequest {
            approval_status: decision,
        };
        self.mutate(
            Method::POST,
            &format!("/Maintenance/{}/approve", maintenance_id),
            Some(&body),
        )
        .await
    }

    async fn fleet_analytics(&self) -> AppResult<FleetAnalytics> {
        let value: serde_json::Value = self.get_json("/Fleetanalytics/analytics").await?;
        analytics_from_value(value)
    }

    async fn refresh_fleet_analytics(&self) -> AppResult<FleetAnalytics> {
        info!("🔄 Refrescando analytics de flota");
        let value: serde_json::Value = self
            .mutate::<_, ()>(Method::PUT, "/Fleetanalytics/analytics/refresh", None)
            .await?;
        analytics_from_value(value)
    }
}

/// Las métricas pueden venir en la raíz o bajo `analytics`
fn analytics_from_value(value: serde_json::Value) -> AppResult<FleetAnalytics> {
    let payload = match value.get("analytics") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => value,
    };
    if payload.is_null() {
        return Ok(FleetAnalytics::default());
    }
    Ok(serde_json::from_value(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analytics_wrapped_and_flat() {
        let wrapped = analytics_from_value(json!({ "analytics": { "active_trucks": 4 } })).unwrap();
        assert_eq!(wrapped.active_trucks, Some(4));

        let flat = analytics_from_value(json!({ "fleet_health_score": 77.0 })).unwrap();
        assert_eq!(flat.fleet_health_score, Some(77.0));

        let empty = analytics_from_value(serde_json::Value::Null).unwrap();
        assert_eq!(empty, FleetAnalytics::default());
    }

    #[tokio::test]
    async fn test_requests_without_session_are_not_sent() {
        let client = FleetApiClient::new(&EnvironmentConfig::for_backend("http://127.0.0.1:9")).unwrap();
        let err = client.list_trucks(1, 5).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_logout_drops_session() {
        let mut client = FleetApiClient::new(&EnvironmentConfig::for_backend("http://127.0.0.1:9/"))
            .unwrap()
            .with_session(Session::from_token("t"));
        assert_eq!(client.base_url(), "http://127.0.0.1:9");

        client.logout();
        assert!(client.session().is_none());
    }

    #[tokio::test]
    async fn test_bulk_limits_are_checked_locally() {
        let client = FleetApiClient::new(&EnvironmentConfig::for_backend("http://127.0.0.1:9"))
            .unwrap()
            .with_session(Session::from_token("t"));

        assert!(matches!(
            client.bulk_component_status(&[]).await.unwrap_err(),
            AppError::Validation(_)
        ));

        let too_many: Vec<TruckId> = (1..=51).collect();
        assert!(matches!(
            client.bulk_component_status(&too_many).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }
}

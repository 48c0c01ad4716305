//! Tablero de viajes
//!
//! Página de viajes pedida al backend, filtros locales sobre esa página y las
//! acciones de avance de estado. Los filtros no viajan al servidor, así que
//! `filtered_count()` puede no coincidir con `server_total()`.

use std::sync::Arc;

use chrono::{Days, Months, NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::dto::CreateTripRequest;
use crate::models::trip::{CreatedTripSummary, Trip, TripAction, TripId, TripStatus};
use crate::models::truck::Truck;
use crate::services::backend::FleetBackend;
use crate::services::pagination::Pager;
use crate::services::store::{Collection, Optimistic};
use crate::state::TripHandoff;
use crate::utils::errors::{forbidden_error, not_found_error, AppResult};

/// Filtro de fecha relativo a "hoy"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Yesterday,
    LastWeek,
    LastMonth,
}

impl DateFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(DateFilter::All),
            "today" => Some(DateFilter::Today),
            "yesterday" => Some(DateFilter::Yesterday),
            "lastWeek" | "last-week" => Some(DateFilter::LastWeek),
            "lastMonth" | "last-month" => Some(DateFilter::LastMonth),
            _ => None,
        }
    }

    pub fn matches(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        let date = match (self, date) {
            (DateFilter::All, _) => return true,
            (_, None) => return false,
            (_, Some(date)) => date,
        };

        match self {
            DateFilter::All => true,
            DateFilter::Today => date == today,
            DateFilter::Yesterday => today.checked_sub_days(Days::new(1)) == Some(date),
            DateFilter::LastWeek => today
                .checked_sub_days(Days::new(7))
                .map_or(false, |since| date >= since),
            DateFilter::LastMonth => today
                .checked_sub_months(Months::new(1))
                .map_or(false, |since| date >= since),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFilter {
    pub search: String,
    pub status: Option<TripStatus>,
    pub date: DateFilter,
}

impl TripFilter {
    pub fn matches(&self, trip: &Trip, today: NaiveDate) -> bool {
        trip.matches_search(&self.search)
            && self.status.as_ref().map_or(true, |status| trip.status == *status)
            && self.date.matches(trip.trip_date(), today)
    }
}

pub struct TripBoard<B: FleetBackend> {
    backend: Arc<B>,
    trips: Collection<Trip>,
    pager: Pager,
    delete_enabled: bool,
    handoff: TripHandoff,
    pub filter: TripFilter,
}

impl<B: FleetBackend> TripBoard<B> {
    pub fn new(backend: Arc<B>, per_page: u32, delete_enabled: bool) -> Self {
        Self {
            backend,
            trips: Collection::default(),
            pager: Pager::new(per_page),
            delete_enabled,
            handoff: TripHandoff::default(),
            filter: TripFilter::default(),
        }
    }

    /// Pedir la página actual al backend
    ///
    /// Si la página quedó fuera de rango (por ejemplo tras borrar la última
    /// fila de la última página) se vuelve a pedir la última que existe.
    pub async fn load(&mut self) -> AppResult<()> {
        loop {
            let page = self
                .backend
                .list_trips(self.pager.page(), self.pager.per_page())
                .await
                .map_err(|e| {
                    error!("❌ Error cargando viajes: {}", e);
                    e
                })?;

            self.pager.record(page.total, page.pages);
            if self.pager.set_page(self.pager.page()) {
                debug!(
                    "📄 Página {} fuera de rango, pidiendo la {}",
                    page.page,
                    self.pager.page()
                );
                continue;
            }

            self.trips.replace_all(page.items);
            return Ok(());
        }
    }

    /// Cargar un solo viaje (vista de detalle)
    pub async fn load_single(&mut self, trip_id: TripId) -> AppResult<()> {
        let trip = self.backend.get_trip(trip_id).await?;
        self.pager.record(1, 1);
        self.trips.replace_all(vec![trip]);
        Ok(())
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

    /// Acciones que la UI debe ofrecer para un viaje
    pub fn actions_for(&self, trip: &Trip) -> Vec<TripAction> {
        trip.status.available_actions(self.delete_enabled)
    }

    pub async fn activate(&mut self, trip_id: TripId) -> AppResult<()> {
        self.perform(trip_id, TripAction::Activate).await
    }

    pub async fn complete(&mut self, trip_id: TripId) -> AppResult<()> {
        self.perform(trip_id, TripAction::Complete).await
    }

    pub async fn delete(&mut self, trip_id: TripId) -> AppResult<()> {
        self.perform(trip_id, TripAction::Delete).await
    }

    /// Ejecutar una acción (optimista) y refrescar la página si salió bien
    pub async fn perform(&mut self, trip_id: TripId, action: TripAction) -> AppResult<()> {
        let current = self
            .trips
            .get(trip_id)
            .map(|trip| trip.status.clone())
            .ok_or_else(|| not_found_error("Trip", trip_id))?;

        if !current.available_actions(self.delete_enabled).contains(&action) {
            warn!(
                "🚫 Acción {} no permitida para viaje {} en estado {}",
                action.label(),
                trip_id,
                current
            );
            return Err(forbidden_error(action.label(), &format!("trip is {}", current)));
        }

        let mut trips = Optimistic::begin(&mut self.trips, action.label());
        let request = match action {
            TripAction::Delete => {
                trips.remove(trip_id);
                self.backend.delete_trip(trip_id)
            }
            TripAction::Activate | TripAction::Complete => {
                if let Some(next) = current.after(action) {
                    trips.update(trip_id, |trip| trip.status = next);
                }
                match action {
                    TripAction::Activate => self.backend.activate_trip(trip_id),
                    _ => self.backend.complete_trip(trip_id),
                }
            }
        };

        match request.await {
            Ok(response) => {
                if let Some(confirmed) = response.confirmed_trip() {
                    trips.replace(confirmed);
                }
                trips.commit();
                info!("✅ Viaje {}: {}", trip_id, action.label());
            }
            Err(e) => {
                trips.rollback();
                error!("❌ Error en '{}' del viaje {}: {}", action.label(), trip_id, e);
                return Err(e);
            }
        }

        if let Err(e) = self.load().await {
            warn!("⚠️ No se pudo refrescar la página de viajes: {}", e);
        }
        Ok(())
    }

    /// Crear un viaje con el camión elegido y dejar el resumen para la confirmación
    ///
    /// Un rechazo por componentes llega como `AppError::TripBlocked`; el banner
    /// se arma con [`TripBlockBanner::from_error`](crate::formatters::TripBlockBanner::from_error).
    pub async fn create_trip(
        &mut self,
        truck: &Truck,
        origin: &str,
        destination: &str,
        date: &str,
    ) -> AppResult<CreatedTripSummary> {
        let request = CreateTripRequest::for_truck(truck, origin, destination, date)?;

        let response = self.backend.create_trip(&request).await.map_err(|e| {
            error!("❌ Error al crear el viaje: {}", e);
            e
        })?;

        let summary = CreatedTripSummary {
            trip_id: response.trip_id(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            status: request.status.clone(),
            driver_name: truck
                .driver
                .as_ref()
                .map(|driver| driver.full_name())
                .unwrap_or_default(),
            driver_email: truck
                .driver
                .as_ref()
                .map(|driver| driver.email.clone())
                .unwrap_or_default(),
            driver_phone: truck
                .driver
                .as_ref()
                .map(|driver| driver.phone.clone())
                .unwrap_or_default(),
            truck_brand: truck.brand.clone(),
            truck_model: truck.model.clone(),
            truck_plate: truck.plate.clone(),
            truck_year: truck.year.clone(),
            created_at: Utc::now().to_rfc3339(),
        };

        info!(
            "🆕 Viaje creado {} → {} con camión {}",
            summary.origin, summary.destination, summary.truck_plate
        );
        self.handoff.store(summary.clone());
        Ok(summary)
    }

    /// Resumen del último viaje creado; se consume al leerlo
    pub fn take_created(&mut self) -> Option<CreatedTripSummary> {
        self.handoff.take()
    }

    pub fn trips(&self) -> &[Trip] {
        self.trips.as_slice()
    }

    pub fn trip(&self, trip_id: TripId) -> Option<&Trip> {
        self.trips.get(trip_id)
    }

    /// Viajes de la página actual que pasan los filtros
    pub fn visible_trips(&self, today: NaiveDate) -> Vec<&Trip> {
        self.pager
            .visible(self.trips.as_slice())
            .iter()
            .filter(|trip| self.filter.matches(trip, today))
            .collect()
    }

    pub fn filtered_count(&self, today: NaiveDate) -> usize {
        self.visible_trips(today).len()
    }

    /// Total informado por el backend, sin filtros locales
    pub fn server_total(&self) -> u64 {
        self.pager.total()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn delete_enabled(&self) -> bool {
        self.delete_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_date_filters() {
        let today = date("2025-06-15");
        assert!(DateFilter::Today.matches(Some(date("2025-06-15")), today));
        assert!(DateFilter::Yesterday.matches(Some(date("2025-06-14")), today));
        assert!(!DateFilter::Yesterday.matches(Some(date("2025-06-15")), today));
        assert!(DateFilter::LastWeek.matches(Some(date("2025-06-08")), today));
        assert!(!DateFilter::LastWeek.matches(Some(date("2025-06-07")), today));
        assert!(DateFilter::LastMonth.matches(Some(date("2025-05-15")), today));
        assert!(!DateFilter::LastMonth.matches(Some(date("2025-05-14")), today));
        assert!(DateFilter::All.matches(None, today));
        assert!(!DateFilter::Today.matches(None, today));
    }

    #[test]
    fn test_date_filter_parse() {
        assert_eq!(DateFilter::parse("lastWeek"), Some(DateFilter::LastWeek));
        assert_eq!(DateFilter::parse("siempre"), None);
    }
}

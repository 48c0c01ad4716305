//! Modelo de Trip
//!
//! Un viaje guarda una copia desnormalizada del camión y del conductor,
//! no referencias vivas. El estado avanza solo por acciones explícitas:
//! `Pending` → `Active` → `Completed`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::truck::TruckId;
use super::driver::DriverId;
use crate::utils::validation::parse_backend_date;

pub type TripId = i64;

/// Estado del viaje
///
/// `Active` también llega como "In Course" en algunas versiones del backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TripStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Other(String),
}

/// Acciones que el operador puede disparar sobre un viaje
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripAction {
    Activate,
    Complete,
    Delete,
}

impl TripAction {
    pub fn label(&self) -> &'static str {
        match self {
            TripAction::Activate => "Activar",
            TripAction::Complete => "Completar",
            TripAction::Delete => "Eliminar",
        }
    }
}

impl TripStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TripStatus::Pending => "Pending",
            TripStatus::Active => "Active",
            TripStatus::Completed => "Completed",
            TripStatus::Other(raw) => raw,
        }
    }

    /// Etiqueta en español para badges
    pub fn label(&self) -> &str {
        match self {
            TripStatus::Pending => "Pendiente",
            TripStatus::Active => "Activo",
            TripStatus::Completed => "Completado",
            TripStatus::Other(raw) => raw,
        }
    }

    /// Acción de avance disponible para el estado actual
    pub fn forward_action(&self) -> Option<TripAction> {
        match self {
            TripStatus::Pending => Some(TripAction::Activate),
            TripStatus::Active => Some(TripAction::Complete),
            TripStatus::Completed | TripStatus::Other(_) => None,
        }
    }

    /// Todas las acciones visibles; borrar depende del feature flag
    pub fn available_actions(&self, delete_enabled: bool) -> Vec<TripAction> {
        let mut actions: Vec<TripAction> = self.forward_action().into_iter().collect();
        if delete_enabled && *self == TripStatus::Completed {
            actions.push(TripAction::Delete);
        }
        actions
    }

    /// Estado resultante de aplicar la acción, si está permitida
    pub fn after(&self, action: TripAction) -> Option<TripStatus> {
        match (self, action) {
            (TripStatus::Pending, TripAction::Activate) => Some(TripStatus::Active),
            (TripStatus::Active, TripAction::Complete) => Some(TripStatus::Completed),
            _ => None,
        }
    }
}

impl From<String> for TripStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => TripStatus::Pending,
            "Active" | "In Course" | "InCourse" => TripStatus::Active,
            "Completed" => TripStatus::Completed,
            _ => TripStatus::Other(value),
        }
    }
}

impl From<TripStatus> for String {
    fn from(status: TripStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copia del camión dentro del viaje
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripTruck {
    pub truck_id: TruckId,
    pub plate: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub brand: String,
}

/// Copia del conductor dentro del viaje
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDriver {
    pub id: DriverId,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: TripId,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
    pub date: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub truck: TripTruck,
    pub driver: TripDriver,
}

impl Trip {
    pub fn trip_date(&self) -> Option<NaiveDate> {
        parse_backend_date(&self.date)
    }

    /// Búsqueda local por origen, destino, conductor o placa
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.origin.to_lowercase().contains(&term)
            || self.destination.to_lowercase().contains(&term)
            || self.driver.name.to_lowercase().contains(&term)
            || self.driver.surname.to_lowercase().contains(&term)
            || self.truck.plate.to_lowercase().contains(&term)
    }
}

/// Response paginada de `GET /Trips/all`
#[derive(Debug, Clone, Deserialize)]
pub struct TripListResponse {
    #[serde(default)]
    pub trips: Option<Vec<Trip>>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}

/// Response de `GET /Trips/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SingleTripResponse {
    pub trip: Trip,
}

/// Response de crear, activar, completar y borrar
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripMutationResponse {
    #[serde(default)]
    pub trip: Option<serde_json::Value>,
    #[serde(default)]
    pub trip_id: Option<TripId>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TripMutationResponse {
    pub fn confirmed_trip(&self) -> Option<Trip> {
        self.trip
            .as_ref()
            .filter(|value| value.is_object())
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn trip_id(&self) -> Option<TripId> {
        self.trip
            .as_ref()
            .and_then(|trip| trip.as_i64().or_else(|| trip.get("trip_id").and_then(|v| v.as_i64())))
            .or(self.trip_id)
    }
}

/// Datos mínimos que la pantalla de confirmación muestra tras crear un viaje
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTripSummary {
    pub trip_id: Option<TripId>,
    pub origin: String,
    pub destination: String,
    pub status: TripStatus,
    pub driver_name: String,
    pub driver_email: String,
    pub driver_phone: String,
    pub truck_brand: String,
    pub truck_model: String,
    pub truck_plate: String,
    pub truck_year: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forward_action_lookup() {
        assert_eq!(TripStatus::Pending.forward_action(), Some(TripAction::Activate));
        assert_eq!(TripStatus::Active.forward_action(), Some(TripAction::Complete));
        assert_eq!(TripStatus::Completed.forward_action(), None);
    }

    #[test]
    fn test_delete_only_for_completed_and_flag() {
        assert_eq!(
            TripStatus::Completed.available_actions(true),
            vec![TripAction::Delete]
        );
        assert!(TripStatus::Completed.available_actions(false).is_empty());
        assert_eq!(
            TripStatus::Pending.available_actions(true),
            vec![TripAction::Activate]
        );
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        assert_eq!(TripStatus::Pending.after(TripAction::Complete), None);
        assert_eq!(TripStatus::Completed.after(TripAction::Activate), None);
        assert_eq!(
            TripStatus::Pending.after(TripAction::Activate),
            Some(TripStatus::Active)
        );
    }

    #[test]
    fn test_in_course_alias() {
        let status: TripStatus = serde_json::from_value(json!("In Course")).unwrap();
        assert_eq!(status, TripStatus::Active);
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Active"));
    }

    #[test]
    fn test_mutation_response_trip_id() {
        let response: TripMutationResponse =
            serde_json::from_value(json!({ "trip": { "trip_id": 41 }, "message": "ok" })).unwrap();
        assert_eq!(response.trip_id(), Some(41));
    }
}

//! Modelo de Driver
//!
//! Un conductor existe de forma independiente al camión: la única relación
//! es `Truck.driver`, el conductor no referencia su camión.

use serde::{Deserialize, Serialize};

pub type DriverId = i64;

/// Conductor tal como lo devuelve el backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: String,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Búsqueda local por nombre, apellido o email
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.surname.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

/// Response de `GET /Trucks/drivers_without_truck`
#[derive(Debug, Clone, Deserialize)]
pub struct DriversWithoutTruckResponse {
    #[serde(default)]
    pub drivers: Option<Vec<Driver>>,
}

//! Modelo de Truck
//!
//! Este módulo contiene el struct Truck, su estado de ciclo de vida y las
//! respuestas del backend para listados y mutaciones.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::driver::Driver;

pub type TruckId = i64;

/// Estado del camión - etiquetas fijas que maneja el backend
///
/// Las etiquetas desconocidas se conservan tal cual en `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TruckStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
    Other(String),
}

impl TruckStatus {
    pub const ALL: [TruckStatus; 3] = [
        TruckStatus::Active,
        TruckStatus::Maintenance,
        TruckStatus::Inactive,
    ];

    pub fn label(&self) -> &str {
        match self {
            TruckStatus::Active => "Activo",
            TruckStatus::Maintenance => "Mantenimiento",
            TruckStatus::Inactive => "Inactivo",
            TruckStatus::Other(label) => label,
        }
    }
}

impl From<String> for TruckStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Activo" => TruckStatus::Active,
            "Mantenimiento" => TruckStatus::Maintenance,
            "Inactivo" => TruckStatus::Inactive,
            _ => TruckStatus::Other(value),
        }
    }
}

impl From<TruckStatus> for String {
    fn from(status: TruckStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Camión principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub truck_id: TruckId,
    pub plate: String,
    pub brand: String,
    pub model: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default)]
    pub mileage: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub status: TruckStatus,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub driver: Option<Driver>,
}

impl Truck {
    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    /// Nombre del conductor para mostrar, o "—" si no tiene
    pub fn driver_display_name(&self) -> String {
        self.driver
            .as_ref()
            .map(Driver::full_name)
            .unwrap_or_else(|| "—".to_string())
    }

    /// Búsqueda local por placa, marca o modelo
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.plate.to_lowercase().contains(&term)
            || self.brand.to_lowercase().contains(&term)
            || self.model.to_lowercase().contains(&term)
    }
}

/// Response de listado `GET /Trucks/all`
#[derive(Debug, Clone, Deserialize)]
pub struct TruckListResponse {
    #[serde(default)]
    pub trucks: Option<Vec<Truck>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub pages: Option<u32>,
}

/// Response de `GET /Trucks/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SingleTruckResponse {
    pub truck: Truck,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response de crear, editar y asignar
///
/// El backend no es consistente: `truck` puede ser el objeto completo o
/// solo el id, y el id también puede venir en `data.truck_id`, `truck_id` o `id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TruckMutationResponse {
    #[serde(default)]
    pub truck: Option<serde_json::Value>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub truck_id: Option<TruckId>,
    #[serde(default)]
    pub id: Option<TruckId>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl TruckMutationResponse {
    /// Camión confirmado por el servidor, si vino completo
    pub fn confirmed_truck(&self) -> Option<Truck> {
        self.truck
            .as_ref()
            .filter(|value| value.is_object())
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Camión local con los campos que devolvió el servidor encima
    ///
    /// Solo se pisan las claves presentes en `truck`; una respuesta parcial
    /// no borra conductor, kilometraje ni color.
    pub fn merged_into(&self, current: &Truck) -> Option<Truck> {
        let fields = self.truck.as_ref()?.as_object()?;
        let mut merged = serde_json::to_value(current).ok()?;
        let target = merged.as_object_mut()?;
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
        serde_json::from_value(merged).ok()
    }

    /// Id del camión, buscando en todas las formas conocidas
    pub fn truck_id(&self) -> Option<TruckId> {
        if let Some(truck) = &self.truck {
            if let Some(id) = truck.as_i64() {
                return Some(id);
            }
            if let Some(id) = truck.get("truck_id").and_then(|v| v.as_i64()) {
                return Some(id);
            }
        }
        self.data
            .as_ref()
            .and_then(|data| data.get("truck_id"))
            .and_then(|v| v.as_i64())
            .or(self.truck_id)
            .or(self.id)
    }
}

/// El año llega como texto en listados y como número al crear
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

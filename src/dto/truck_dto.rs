use serde::Serialize;
use validator::Validate;

use crate::models::component::HealthStatus;
use crate::models::driver::DriverId;
use crate::models::truck::{Truck, TruckId, TruckStatus};
use crate::utils::validation::validate_not_blank;

// Componente opcional al dar de alta un camión
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewTruckComponent {
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[validate(range(min = 1))]
    pub interval: i64,

    pub status: HealthStatus,

    #[validate(range(min = 0.0))]
    pub last_maintenance_mileage: f64,

    #[validate(range(min = 0.0))]
    pub next_maintenance_mileage: f64,
}

// Request para crear un camión (POST /Trucks/new)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateTruckRequest {
    #[validate(custom = "validate_not_blank")]
    pub plate: String,

    #[validate(custom = "validate_not_blank")]
    pub model: String,

    #[validate(custom = "validate_not_blank")]
    pub brand: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[validate(custom = "validate_not_blank")]
    pub color: String,

    #[validate(range(min = 0.0))]
    pub mileage: f64,

    pub health_status: HealthStatus,

    pub status: TruckStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleetanalytics_id: Option<i64>,

    // Los componentes son opcionales, el backend crea uno por defecto
    #[validate]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<NewTruckComponent>,
}

impl CreateTruckRequest {
    /// Camión local cuando el backend solo devuelve el id
    pub fn to_truck(&self, truck_id: TruckId) -> Truck {
        Truck {
            truck_id,
            plate: self.plate.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            year: self.year.to_string(),
            mileage: self.mileage,
            color: self.color.clone(),
            status: self.status.clone(),
            updated_at: None,
            driver: None,
        }
    }
}

// Request para editar un camión (PUT /Trucks/{id})
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateTruckRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_not_blank")]
    pub plate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub mileage: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TruckStatus>,
}

impl UpdateTruckRequest {
    pub fn status(status: TruckStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Aplicar los cambios sobre la copia local (actualización optimista)
    pub fn apply_to(&self, truck: &mut Truck) {
        if let Some(plate) = &self.plate {
            truck.plate = plate.clone();
        }
        if let Some(brand) = &self.brand {
            truck.brand = brand.clone();
        }
        if let Some(model) = &self.model {
            truck.model = model.clone();
        }
        if let Some(color) = &self.color {
            truck.color = color.clone();
        }
        if let Some(mileage) = self.mileage {
            truck.mileage = mileage;
        }
        if let Some(status) = &self.status {
            truck.status = status.clone();
        }
    }
}

// Request para asignar conductor (PUT /Trucks/{id}/assign)
#[derive(Debug, Clone, Serialize)]
pub struct AssignDriverRequest {
    pub driver_id: DriverId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateTruckRequest {
        CreateTruckRequest {
            plate: "AB123CD".to_string(),
            model: "R450".to_string(),
            brand: "Scania".to_string(),
            year: 2024,
            color: "Blanco".to_string(),
            mileage: 0.0,
            health_status: HealthStatus::Good,
            status: TruckStatus::Active,
            fleetanalytics_id: Some(1),
            components: vec![],
        }
    }

    #[test]
    fn test_create_truck_validation() {
        assert!(valid_request().validate().is_ok());

        let mut missing_plate = valid_request();
        missing_plate.plate = "  ".to_string();
        let errors = missing_plate.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("plate"));
    }

    #[test]
    fn test_nested_component_validation() {
        let mut request = valid_request();
        request.components.push(NewTruckComponent {
            name: String::new(),
            interval: 10000,
            status: HealthStatus::Good,
            last_maintenance_mileage: 0.0,
            next_maintenance_mileage: 10000.0,
        });
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_components_omitted_when_empty() {
        let body = serde_json::to_value(valid_request()).unwrap();
        assert!(body.get("components").is_none());
        assert_eq!(body["status"], "Activo");
        assert_eq!(body["health_status"], "Good");
    }
}

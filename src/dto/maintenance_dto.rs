use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::models::component::ComponentStatus;
use crate::models::driver::DriverId;
use crate::models::truck::{Truck, TruckId};
use crate::utils::errors::AppResult;
use crate::utils::validation::{validate_not_blank, validate_positive_amount};

/// Intervalo por defecto cuando el componente no trae uno
pub const DEFAULT_MILEAGE_INTERVAL: i64 = 5000;

// Request para crear orden de mantenimiento (POST /Maintenance/new)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateMaintenanceRequest {
    #[validate(custom = "validate_not_blank")]
    pub description: String,

    #[validate(custom = "validate_not_blank")]
    pub component: String,

    pub truck_id: TruckId,

    pub driver_id: Option<DriverId>,

    #[validate(custom = "validate_positive_amount")]
    pub cost: Decimal,

    #[validate(range(min = 1))]
    pub mileage_interval: i64,

    pub maintenance_interval: i64,
}

/// Formulario del modal de mantenimiento, atado a un componente
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceOrderForm {
    pub truck_id: TruckId,
    pub driver_id: Option<DriverId>,
    pub description: String,
    pub component: String,
    pub cost: Option<Decimal>,
    pub mileage_interval: i64,
}

impl MaintenanceOrderForm {
    /// Valores iniciales a partir del camión y del componente elegido
    pub fn for_component(truck: &Truck, component: &ComponentStatus) -> Self {
        Self {
            truck_id: truck.truck_id,
            driver_id: truck.driver.as_ref().map(|d| d.id),
            description: format!("Mantenimiento de {}", component.component_name),
            component: component.component_name.clone(),
            cost: None,
            mileage_interval: component
                .maintenance_interval
                .map(|interval| interval.round() as i64)
                .unwrap_or(DEFAULT_MILEAGE_INTERVAL),
        }
    }

    pub fn into_request(self) -> AppResult<CreateMaintenanceRequest> {
        let request = CreateMaintenanceRequest {
            description: self.description,
            component: self.component,
            truck_id: self.truck_id,
            driver_id: self.driver_id,
            cost: self.cost.unwrap_or(Decimal::ZERO),
            mileage_interval: self.mileage_interval,
            maintenance_interval: self.mileage_interval,
        };
        request.validate()?;
        Ok(request)
    }
}

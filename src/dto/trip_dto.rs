use serde::Serialize;
use validator::Validate;

use crate::models::driver::DriverId;
use crate::models::trip::TripStatus;
use crate::models::truck::{Truck, TruckId};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{validate_not_blank, validate_trip_date};

// Request para crear un viaje (POST /Trips/new)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateTripRequest {
    #[validate(custom = "validate_not_blank")]
    pub origin: String,

    #[validate(custom = "validate_not_blank")]
    pub destination: String,

    #[validate(range(min = 1))]
    pub truck_id: i64, // = TruckId; validator_derive needs the primitive name for `range`

    #[validate(range(min = 1))]
    pub driver_id: i64, // = DriverId; validator_derive needs the primitive name for `range`

    pub status: TripStatus,

    #[validate(custom = "validate_trip_date")]
    pub date: String,
}

impl CreateTripRequest {
    /// Armar el request desde el camión elegido; el conductor sale del camión
    pub fn for_truck(truck: &Truck, origin: &str, destination: &str, date: &str) -> AppResult<Self> {
        let driver = truck
            .driver
            .as_ref()
            .ok_or_else(|| validation_error("truck_id", "Debes seleccionar un camión válido"))?;

        let request = Self {
            origin: origin.trim().to_string(),
            destination: destination.trim().to_string(),
            truck_id: truck.truck_id,
            driver_id: driver.id,
            status: TripStatus::Pending,
            date: date.trim().to_string(),
        };
        request.validate()?;
        Ok(request)
    }
}

/// Camiones elegibles para un viaje: solo los que tienen conductor
pub fn eligible_trucks(trucks: &[Truck]) -> Vec<&Truck> {
    trucks.iter().filter(|t| t.has_driver()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::driver::Driver;
    use crate::models::truck::TruckStatus;
    use crate::utils::errors::AppError;

    fn truck(id: TruckId, driver: Option<Driver>) -> Truck {
        Truck {
            truck_id: id,
            plate: format!("PLT{}", id),
            brand: "Volvo".to_string(),
            model: "FH".to_string(),
            year: "2020".to_string(),
            mileage: 1000.0,
            color: "Rojo".to_string(),
            status: TruckStatus::Active,
            updated_at: None,
            driver,
        }
    }

    fn driver(id: DriverId) -> Driver {
        Driver {
            id,
            name: "Juan".to_string(),
            surname: "Pérez".to_string(),
            email: "juan@truckguard.io".to_string(),
            phone: "1155551234".to_string(),
            role: "driver".to_string(),
        }
    }

    #[test]
    fn test_driver_comes_from_truck() {
        let request = CreateTripRequest::for_truck(&truck(3, Some(driver(7))), "A", "B", "2025-06-01").unwrap();
        assert_eq!(request.truck_id, 3);
        assert_eq!(request.driver_id, 7);
        assert_eq!(request.status, TripStatus::Pending);
    }

    #[test]
    fn test_truck_without_driver_is_rejected() {
        let err = CreateTripRequest::for_truck(&truck(3, None), "A", "B", "2025-06-01").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_bad_date_and_blank_origin() {
        assert!(CreateTripRequest::for_truck(&truck(3, Some(driver(7))), "A", "B", "01/06/2025").is_err());
        assert!(CreateTripRequest::for_truck(&truck(3, Some(driver(7))), " ", "B", "2025-06-01").is_err());
    }

    #[test]
    fn test_eligible_trucks() {
        let trucks = vec![truck(1, None), truck(2, Some(driver(8)))];
        let eligible = eligible_trucks(&trucks);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].truck_id, 2);
    }
}

//! DTOs de requests hacia el backend
//!
//! Cada request se valida del lado del cliente antes de enviarse: si falla
//! la validación no sale ningún request.

pub mod auth_dto;
pub mod maintenance_dto;
pub mod trip_dto;
pub mod truck_dto;

pub use auth_dto::{LoginRequest, RegisterRequest};
pub use maintenance_dto::{CreateMaintenanceRequest, MaintenanceOrderForm};
pub use trip_dto::CreateTripRequest;
pub use truck_dto::{AssignDriverRequest, CreateTruckRequest, NewTruckComponent, UpdateTruckRequest};

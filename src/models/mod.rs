//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! a las respuestas JSON del backend de TruckGuard.

pub mod analytics;
pub mod auth;
pub mod component;
pub mod driver;
pub mod maintenance;
pub mod trip;
pub mod truck;

pub use analytics::{FleetAnalytics, FleetKpis};
pub use component::{
    BulkComponentsResponse, ComponentStatus, HealthStatus, TruckComponentsStatus,
};
pub use driver::{Driver, DriverId};
pub use maintenance::{ApprovalStatus, MaintenanceId, MaintenanceRecord};
pub use trip::{CreatedTripSummary, Trip, TripAction, TripId, TripStatus};
pub use truck::{Truck, TruckId, TruckStatus};

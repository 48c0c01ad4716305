//! Services module
//!
//! Este módulo contiene la lógica de los tableros (estado local + mutaciones
//! optimistas) y el contrato con el backend de flota.

pub mod analytics_service;
pub mod backend;
pub mod maintenance_board;
pub mod pagination;
pub mod store;
pub mod trip_board;
pub mod truck_board;
pub mod truck_detail;

pub use analytics_service::{AnalyticsService, FleetOverview};
pub use backend::{FleetBackend, Page};
pub use maintenance_board::MaintenanceBoard;
pub use pagination::Pager;
pub use store::{Collection, Entity, Optimistic};
pub use trip_board::{DateFilter, TripBoard, TripFilter};
pub use truck_board::{FleetState, TruckBoard, TruckFilter};
pub use truck_detail::{load_truck_detail, TruckDetail};

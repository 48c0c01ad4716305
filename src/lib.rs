//! TruckGuard
//!
//! Cliente tipado del backend de flota de TruckGuard: camiones, conductores,
//! viajes, mantenimiento, estado de componentes y analytics. Los tableros de
//! `services` guardan el estado de cada pantalla y aplican las mutaciones de
//! forma optimista con rollback.

pub mod client;
pub mod config;
pub mod dto;
pub mod formatters;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use client::FleetApiClient;
pub use config::EnvironmentConfig;
pub use services::FleetBackend;
pub use state::Session;
pub use utils::errors::{AppError, AppResult};

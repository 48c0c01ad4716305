//! Formateadores de mensajes para el operador

pub mod trip_block;

pub use trip_block::{format_trip_block_error, BannerSeverity, TripBlockBanner};

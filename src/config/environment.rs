//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del cliente y sus valores por defecto.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use crate::utils::errors::{AppError, AppResult};

/// Timeout por defecto de cada request al backend
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Tamaño de página por defecto en los listados
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub default_page_size: u32,
    // Feature flag: borrar viajes completados
    pub trips_delete_enabled: bool,
    pub log_level: Option<String>,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables del proceso
    pub fn from_env() -> AppResult<Self> {
        Self::from_vars(&env::vars().collect())
    }

    /// Leer la configuración desde un mapa de variables
    pub fn from_vars(vars: &HashMap<String, String>) -> AppResult<Self> {
        let backend_url = vars
            .get("BACKENDURL")
            .or_else(|| vars.get("BACKEND_URL"))
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::Config("BACKENDURL must be set".to_string()))?;

        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "BACKENDURL must be an http(s) URL, got '{}'",
                backend_url
            )));
        }

        let default_page_size = parse_var(vars, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if default_page_size == 0 {
            return Err(AppError::Config("DEFAULT_PAGE_SIZE must be greater than 0".to_string()));
        }

        Ok(Self {
            environment: vars
                .get("ENVIRONMENT")
                .cloned()
                .unwrap_or_else(|| "development".to_string()),
            backend_url,
            request_timeout_secs: parse_var(vars, "REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            default_page_size,
            trips_delete_enabled: parse_flag(vars, "TRIPS_DELETE_ENABLED")?,
            log_level: vars.get("LOG_LEVEL").cloned(),
        })
    }

    /// Configuración mínima apuntando a una URL (tests y overrides de CLI)
    pub fn for_backend(backend_url: &str) -> Self {
        Self {
            environment: "development".to_string(),
            backend_url: backend_url.trim_end_matches('/').to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_page_size: DEFAULT_PAGE_SIZE,
            trips_delete_enabled: false,
            log_level: None,
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Nivel de log efectivo: LOG_LEVEL o DEBUG en desarrollo, INFO en el resto
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .as_deref()
            .and_then(|level| tracing::Level::from_str(level).ok())
            .unwrap_or(if self.is_development() {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            })
    }
}

fn parse_var<T: FromStr>(vars: &HashMap<String, String>, key: &str, default: T) -> AppResult<T> {
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number, got '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_flag(vars: &HashMap<String, String>, key: &str) -> AppResult<bool> {
    match vars.get(key).map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off" | "") => Ok(false),
        Some(v) => Err(AppError::Config(format!("{} must be a boolean, got '{}'", key, v))),
    }
}

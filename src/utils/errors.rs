//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del cliente de flota
//! y su conversión a mensajes visibles para el operador.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Código que usa el backend cuando bloquea la creación de un viaje
pub const TRIP_BLOCKED_CODE: &str = "TRIP_BLOCKED_COMPONENTS";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Trip blocked: {0}")]
    TripBlocked(BackendErrorBody),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected API shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Cuerpo de error estructurado que devuelve el backend
///
/// Puede llegar en la raíz del JSON o anidado bajo `detail`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

impl fmt::Display for BackendErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{} ({})", message, code),
            (None, Some(message)) => write!(f, "{}", message),
            (Some(code), None) => write!(f, "{}", code),
            (None, None) => write!(f, "backend error"),
        }
    }
}

impl AppError {
    /// Construir el error a partir de una respuesta no exitosa del backend
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

        // FastAPI anida el cuerpo bajo `detail`, que puede ser objeto o texto
        let payload = match &parsed {
            Some(value) => match value.get("detail") {
                Some(detail) => detail.clone(),
                None => value.clone(),
            },
            None => serde_json::Value::Null,
        };

        let error_body = match &payload {
            serde_json::Value::Object(_) => {
                serde_json::from_value::<BackendErrorBody>(payload.clone()).unwrap_or_default()
            }
            serde_json::Value::String(text) => BackendErrorBody {
                message: Some(text.clone()),
                ..Default::default()
            },
            _ => BackendErrorBody::default(),
        };

        if error_body.code.as_deref() == Some(TRIP_BLOCKED_CODE) {
            return AppError::TripBlocked(error_body);
        }

        let message = error_body
            .message
            .clone()
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && parsed.is_none()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            401 => AppError::Unauthorized(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            _ => AppError::Http { status, message },
        }
    }

    /// Código HTTP asociado, si el error vino del backend
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            AppError::Unauthorized(_) => Some(401),
            AppError::Forbidden(_) => Some(403),
            AppError::NotFound(_) => Some(404),
            AppError::TripBlocked(_) => Some(409),
            AppError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Mensaje para mostrar al operador (toast, banner o mensaje en línea)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => format!("Datos inválidos: {}", e),
            AppError::Unauthorized(_) => "Tu sesión expiró, vuelve a iniciar sesión".to_string(),
            AppError::Forbidden(msg) => format!("Acción no permitida: {}", msg),
            AppError::NotFound(msg) => format!("No encontrado: {}", msg),
            AppError::TripBlocked(body) => body
                .message
                .clone()
                .unwrap_or_else(|| "No se puede crear el viaje".to_string()),
            AppError::Http { status, message } => {
                format!("El servidor respondió con error ({}): {}", status, message)
            }
            AppError::Network(_) => "No se pudo conectar con el servidor".to_string(),
            AppError::Decode(_) | AppError::UnexpectedShape(_) => {
                "Respuesta inesperada del servidor".to_string()
            }
            AppError::Config(msg) => format!("Configuración inválida: {}", msg),
        }
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de acción prohibida
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

/// Función helper para respuestas con forma inesperada
pub fn unexpected_shape(expected: &str) -> AppError {
    AppError::UnexpectedShape(format!("se esperaba {}", expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_blocked_body_at_root() {
        let body = r#"{"code":"TRIP_BLOCKED_COMPONENTS","reason":"components_requiring_maintenance","components":["Aceite"]}"#;
        match AppError::from_response(409, body) {
            AppError::TripBlocked(err) => {
                assert_eq!(err.reason.as_deref(), Some("components_requiring_maintenance"));
                assert_eq!(err.components, vec!["Aceite".to_string()]);
            }
            other => panic!("esperaba TripBlocked, obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_trip_blocked_body_nested_in_detail() {
        let body = r#"{"detail":{"code":"TRIP_BLOCKED_COMPONENTS","reason":"components_fair_condition","components":["Frenos","Filtros"]}}"#;
        let err = AppError::from_response(409, body);
        assert!(matches!(err, AppError::TripBlocked(_)));
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_plain_detail_message() {
        let err = AppError::from_response(400, r#"{"detail":"Truck already has a driver"}"#);
        match err {
            AppError::Http { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Truck already has a driver");
            }
            other => panic!("esperaba Http, obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(AppError::from_response(401, ""), AppError::Unauthorized(_)));
        assert!(matches!(AppError::from_response(404, "{}"), AppError::NotFound(_)));

        match AppError::from_response(500, "Internal Server Error") {
            AppError::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("esperaba Http, obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_helper() {
        let err = validation_error("plate", "La placa es requerida");
        match err {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("plate"));
            }
            other => panic!("esperaba Validation, obtuvo {:?}", other),
        }
    }
}

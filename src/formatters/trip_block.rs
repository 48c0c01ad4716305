//! Banner de viaje bloqueado por mantenimiento
//!
//! Cuando el backend rechaza la creación de un viaje con
//! `TRIP_BLOCKED_COMPONENTS`, la severidad del banner sale del `reason`:
//! componentes que requieren mantenimiento son críticos, componentes en
//! estado regular son una advertencia. Cualquier otro error usa la severidad
//! que mande el backend o `error`.

use colored::Colorize;
use serde::Serialize;
use std::fmt;

use crate::utils::errors::{AppError, BackendErrorBody, TRIP_BLOCKED_CODE};

pub const REASON_REQUIRING_MAINTENANCE: &str = "components_requiring_maintenance";
pub const REASON_FAIR_CONDITION: &str = "components_fair_condition";

const TITLE: &str = "No se puede crear el viaje";
const DEFAULT_DESCRIPTION: &str = "Ocurrió un error al crear el viaje.";
const PENDING_MAINTENANCE_HREF: &str = "/maintenance/pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerSeverity {
    Critical,
    Warning,
    Error,
}

impl BannerSeverity {
    fn from_backend(severity: Option<&str>) -> Self {
        match severity {
            Some("critical") => BannerSeverity::Critical,
            Some("warning") => BannerSeverity::Warning,
            _ => BannerSeverity::Error,
        }
    }
}

impl fmt::Display for BannerSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BannerSeverity::Critical => f.write_str("critical"),
            BannerSeverity::Warning => f.write_str("warning"),
            BannerSeverity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripBlockBanner {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub components: Vec<String>,
    pub severity: BannerSeverity,
    pub cta_href: String,
}

/// Armar el banner a partir del cuerpo de error del backend
pub fn format_trip_block_error(err: &BackendErrorBody) -> TripBlockBanner {
    let list = err.components.join(", ");

    let blocked = err.code.as_deref() == Some(TRIP_BLOCKED_CODE);
    let (subtitle, description, severity) = match err.reason.as_deref() {
        Some(REASON_REQUIRING_MAINTENANCE) if blocked => (
            "Mantenimiento requerido".to_string(),
            format!("Los siguientes componentes requieren mantenimiento: {}.", list),
            BannerSeverity::Critical,
        ),
        Some(REASON_FAIR_CONDITION) if blocked => (
            "Estado regular".to_string(),
            format!(
                "Los siguientes componentes necesitan atención (estado regular): {}.",
                list
            ),
            BannerSeverity::Warning,
        ),
        _ => (
            "Error".to_string(),
            err.message
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            BannerSeverity::from_backend(err.severity.as_deref()),
        ),
    };

    TripBlockBanner {
        title: TITLE.to_string(),
        subtitle,
        description,
        components: err.components.clone(),
        severity,
        cta_href: PENDING_MAINTENANCE_HREF.to_string(),
    }
}

impl TripBlockBanner {
    /// Banner para cualquier error al crear un viaje
    pub fn from_error(error: &AppError) -> Self {
        match error {
            AppError::TripBlocked(body) => format_trip_block_error(body),
            other => format_trip_block_error(&BackendErrorBody {
                message: Some(other.user_message()),
                ..Default::default()
            }),
        }
    }

    /// Versión de texto para la terminal
    pub fn render(&self) -> String {
        let title = match self.severity {
            BannerSeverity::Critical => self.title.red().bold(),
            BannerSeverity::Warning => self.title.yellow().bold(),
            BannerSeverity::Error => self.title.magenta().bold(),
        };

        let mut out = format!("{}\n  {}\n  {}", title, self.subtitle.dimmed(), self.description);
        if !self.components.is_empty() {
            out.push_str(&format!("\n  Componentes: {}", self.components.join(", ")));
        }
        out.push_str(&format!("\n  Ver mantenimientos pendientes: {}", self.cta_href));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocked(reason: &str, components: &[&str]) -> BackendErrorBody {
        BackendErrorBody {
            code: Some(TRIP_BLOCKED_CODE.to_string()),
            reason: Some(reason.to_string()),
            components: components.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_requiring_maintenance_is_critical() {
        let banner = format_trip_block_error(&blocked(REASON_REQUIRING_MAINTENANCE, &["Aceite"]));
        assert_eq!(banner.severity, BannerSeverity::Critical);
        assert_eq!(banner.subtitle, "Mantenimiento requerido");
        assert_eq!(
            banner.description,
            "Los siguientes componentes requieren mantenimiento: Aceite."
        );
        assert_eq!(banner.components, vec!["Aceite".to_string()]);
        assert_eq!(banner.cta_href, "/maintenance/pending");
    }

    #[test]
    fn test_fair_condition_is_warning() {
        let banner = format_trip_block_error(&blocked(REASON_FAIR_CONDITION, &["Frenos", "Filtros"]));
        assert_eq!(banner.severity, BannerSeverity::Warning);
        assert!(banner.description.ends_with("Frenos, Filtros."));
    }

    #[test]
    fn test_other_errors_use_backend_severity_or_default() {
        let unknown_reason = BackendErrorBody {
            severity: Some("warning".to_string()),
            ..blocked("otra_cosa", &[])
        };
        let banner = format_trip_block_error(&unknown_reason);
        assert_eq!(banner.subtitle, "Error");
        assert_eq!(banner.description, "Ocurrió un error al crear el viaje.");
        assert_eq!(banner.severity, BannerSeverity::Warning);

        let plain = format_trip_block_error(&BackendErrorBody {
            message: Some("Truck not found".to_string()),
            ..Default::default()
        });
        assert_eq!(plain.severity, BannerSeverity::Error);
        assert_eq!(plain.description, "Truck not found");
        assert_eq!(plain.title, "No se puede crear el viaje");
    }

    #[test]
    fn test_reason_without_blocked_code_is_generic() {
        let body = BackendErrorBody {
            reason: Some(REASON_REQUIRING_MAINTENANCE.to_string()),
            ..Default::default()
        };
        assert_eq!(format_trip_block_error(&body).severity, BannerSeverity::Error);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(BannerSeverity::Critical).unwrap(),
            serde_json::json!("critical")
        );
    }
}

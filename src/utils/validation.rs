//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de formularios
//! y conversión de fechas que llegan del backend.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("El campo es requerido".into());
        return Err(error);
    }
    Ok(())
}

/// Validar y convertir string a fecha
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar fecha de viaje (formato YYYY-MM-DD)
pub fn validate_trip_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value).map(|_| ())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar montos estrictamente positivos
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.message = Some("El costo debe ser mayor a 0".into());
        return Err(error);
    }
    Ok(())
}

/// Interpretar una fecha del backend en cualquiera de los formatos observados
///
/// Acepta `YYYY-MM-DD`, RFC3339 y `YYYY-MM-DDTHH:MM:SS[.fff]` sin zona.
pub fn parse_backend_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|datetime| datetime.date())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("ABC123").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(validate_positive_amount(&Decimal::from_str("150.5").unwrap()).is_ok());
        assert!(validate_positive_amount(&Decimal::ZERO).is_err());
    }

    #[test]
    fn test_parse_backend_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_backend_date("2025-03-14"), Some(expected));
        assert_eq!(parse_backend_date("2025-03-14T10:30:00Z"), Some(expected));
        assert_eq!(parse_backend_date("2025-03-14T10:30:00.123456"), Some(expected));
        assert_eq!(parse_backend_date("not a date"), None);
    }
}

//! Estado de sesión del cliente
//!
//! La sesión (token + usuario) es un valor explícito que se le pasa al
//! cliente HTTP; ninguna llamada lee credenciales de un estado global.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, info};

use crate::models::auth::{LoginResponse, TokenClaims, UserInfo};
use crate::models::trip::CreatedTripSummary;

/// Sesión autenticada contra el backend
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserInfo>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(token: String, user: Option<UserInfo>) -> Self {
        let expires_at = token_expiry(&token);
        Self {
            token,
            user,
            expires_at,
        }
    }

    /// Sesión a partir de un token ya emitido (por ejemplo desde la CLI)
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(token.into(), None)
    }

    pub fn from_login(response: &LoginResponse) -> Self {
        let session = Self::new(response.access_token.clone(), Some(UserInfo::from(response)));
        info!(
            "🔐 Sesión iniciada para '{}' (expira: {:?})",
            response.email, session.expires_at
        );
        session
    }

    /// Un token sin `exp` legible se considera vigente; el backend decide
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Utc::now() > expires_at)
            .unwrap_or(false)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Leer `exp` del JWT sin verificar la firma (la verificación es del backend)
fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data
            .claims
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
        Err(e) => {
            debug!("Token sin claims legibles: {}", e);
            None
        }
    }
}

/// Traspaso de un solo uso entre la creación de un viaje y su confirmación
#[derive(Debug, Default)]
pub struct TripHandoff {
    slot: Option<CreatedTripSummary>,
}

impl TripHandoff {
    pub fn store(&mut self, summary: CreatedTripSummary) {
        self.slot = Some(summary);
    }

    /// Devuelve el viaje guardado y vacía el slot
    pub fn take(&mut self) -> Option<CreatedTripSummary> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::TripStatus;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_with_exp(exp: i64) -> String {
        encode(
            &Header::default(),
            &json!({ "sub": "1", "exp": exp }),
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_expiry_is_read_without_secret() {
        let exp = Utc::now().timestamp() + 3600;
        let session = Session::from_token(token_with_exp(exp));
        assert_eq!(session.expires_at.map(|e| e.timestamp()), Some(exp));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expired_token() {
        let session = Session::from_token(token_with_exp(Utc::now().timestamp() - 60));
        assert!(session.is_expired());
    }

    #[test]
    fn test_opaque_token_is_not_expired() {
        let session = Session::from_token("opaque-token");
        assert_eq!(session.expires_at, None);
        assert!(!session.is_expired());
        assert_eq!(session.bearer(), "Bearer opaque-token");
    }

    #[test]
    fn test_handoff_is_consumed_once() {
        let mut handoff = TripHandoff::default();
        handoff.store(CreatedTripSummary {
            trip_id: Some(1),
            origin: "A".to_string(),
            destination: "B".to_string(),
            status: TripStatus::Pending,
            driver_name: "Juan".to_string(),
            driver_email: String::new(),
            driver_phone: String::new(),
            truck_brand: "Volvo".to_string(),
            truck_model: "FH".to_string(),
            truck_plate: "AA000AA".to_string(),
            truck_year: "2020".to_string(),
            created_at: "2025-06-01T10:00:00Z".to_string(),
        });

        assert!(handoff.take().is_some());
        assert!(handoff.take().is_none());
        assert!(handoff.is_empty());
    }
}

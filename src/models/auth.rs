use serde::{Deserialize, Serialize};

/// Response de `POST /Auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
}

/// Usuario autenticado que viaja con la sesión
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
}

impl From<&LoginResponse> for UserInfo {
    fn from(response: &LoginResponse) -> Self {
        Self {
            id: response.id,
            name: response.name.clone(),
            surname: response.surname.clone(),
            email: response.email.clone(),
        }
    }
}

/// Claims que el cliente lee del token (sin verificar la firma)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub exp: Option<i64>,
}

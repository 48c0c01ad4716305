use serde::Serialize;
use validator::Validate;

use crate::utils::validation::{validate_not_blank, validate_phone};

// Login request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(custom = "validate_not_blank")]
    pub password: String,
}

// Register request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 100))]
    pub surname: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(custom = "validate_phone")]
    pub phone: String,
}

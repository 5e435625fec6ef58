use serde::{Deserialize, Serialize};

/// Request body for registration. Fields default to empty strings so a
/// missing key and an empty value hit the same validation path.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Success envelope returned by register and login.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Response for the balance endpoint.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// Response for the current-user endpoint.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub username: String,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::users;

// ============================================================================
// DTOs - API request/response shapes
// ============================================================================
//
// Request bodies are validated with the validator derive before the service
// layer is invoked; CPF checksum and password complexity have dedicated
// checks in the user service. Responses expose formatted CPF/phone/birth
// date, never the password hash.
//
// ============================================================================

/// Body for POST /api/users (registration).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    pub cpf: String,
    #[validate(length(min = 5, max = 50, message = "name must have 5 to 50 characters"))]
    pub name: String,
    #[validate(length(min = 5, max = 50, message = "surname must have 5 to 50 characters"))]
    pub surname: String,
    #[validate(email(message = "invalid email address"))]
    #[validate(length(min = 6, max = 45, message = "email must have 6 to 45 characters"))]
    pub email: String,
    /// Accepted as dd/mm/yyyy or digits-only.
    pub birth_date: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: Option<String>,
    pub password: String,
    #[serde(default)]
    pub role_id: Option<i64>,
}

/// Body for PUT /api/users. `version` must match the stored row.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id: i64,
    #[validate(length(min = 5, max = 50, message = "name must have 5 to 50 characters"))]
    pub name: String,
    #[validate(length(min = 5, max = 50, message = "surname must have 5 to 50 characters"))]
    pub surname: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub birth_date: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
    pub version: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 5, max = 50, message = "role name must have 5 to 50 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    pub id: i64,
    #[validate(length(min = 5, max = 50, message = "role name must have 5 to 50 characters"))]
    pub name: String,
    pub version: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ManufacturerRequest {
    #[validate(length(min = 2, max = 50, message = "manufacturer name must have 2 to 50 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateManufacturerRequest {
    pub id: i64,
    #[validate(length(min = 2, max = 50, message = "manufacturer name must have 2 to 50 characters"))]
    pub name: String,
    pub version: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VehicleModelRequest {
    #[validate(length(min = 2, max = 50, message = "model name must have 2 to 50 characters"))]
    pub name: String,
    #[serde(default)]
    pub manufacturer_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleModelRequest {
    pub id: i64,
    #[validate(length(min = 2, max = 50, message = "model name must have 2 to 50 characters"))]
    pub name: String,
    #[serde(default)]
    pub manufacturer_id: Option<i64>,
    pub version: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VehicleRequest {
    #[validate(length(min = 5, max = 7, message = "plate must have 5 to 7 characters"))]
    pub plate: String,
    #[validate(length(equal = 4, message = "year must have 4 characters"))]
    pub year: String,
    #[serde(default)]
    pub model_id: Option<i64>,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    pub id: i64,
    #[validate(length(min = 5, max = 7, message = "plate must have 5 to 7 characters"))]
    pub plate: String,
    #[validate(length(equal = 4, message = "year must have 4 characters"))]
    pub year: String,
    #[serde(default)]
    pub model_id: Option<i64>,
    pub version: i64,
}

/// Plain confirmation payload for write operations.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// User as exposed over the API: display-formatted CPF, phone and birth
/// date, no password hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub cpf: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub birth_date: String,
    pub phone: String,
    pub gender: Option<String>,
    pub active: bool,
    pub version: i64,
    pub role_id: Option<i64>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            cpf: user.formatted_cpf(),
            birth_date: user.formatted_birth_date(),
            phone: user.formatted_phone(),
            id: user.id,
            name: user.name,
            surname: user.surname,
            email: user.email,
            gender: user.gender,
            active: user.active,
            version: user.version,
            role_id: user.role_id,
        }
    }
}

/// Registration outcome. `notification_sent` is false when the user row was
/// saved but the activation email could not be delivered.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub notification_sent: bool,
    pub message: String,
}

use chrono::{NaiveDateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use uuid::Uuid;

use fleetcare_backend::models::dto::RegisterUserRequest;
use fleetcare_backend::models::users;
use fleetcare_backend::services::user_service::UserService;

// Two distinct CPFs with valid check digits, for fixtures that need more
// than one registered user.
pub const CPF_PRIMARY: &str = "52998224725";
pub const CPF_SECONDARY: &str = "11144477735";

pub const STRONG_PASSWORD: &str = "Segura@123";

const SCHEMA: &str = r#"
CREATE TABLE roles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    version INTEGER NOT NULL
);

CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cpf TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    surname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    birth_date TEXT NOT NULL,
    phone TEXT NOT NULL,
    gender TEXT,
    password_hash TEXT NOT NULL,
    active INTEGER NOT NULL,
    version INTEGER NOT NULL,
    role_id INTEGER
);

CREATE TABLE manufacturers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    version INTEGER NOT NULL
);

CREATE TABLE vehicle_models (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    version INTEGER NOT NULL,
    manufacturer_id INTEGER
);

CREATE TABLE vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plate TEXT NOT NULL,
    year TEXT NOT NULL,
    version INTEGER NOT NULL,
    model_id INTEGER,
    user_id INTEGER NOT NULL
);

CREATE TABLE verification_tokens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    token TEXT NOT NULL UNIQUE,
    expires_at DATETIME NOT NULL,
    user_id INTEGER NOT NULL UNIQUE
);
"#;

/// Fresh in-memory SQLite database with the full schema. A single pooled
/// connection keeps every statement on the same memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    let db = Database::connect(options).await.expect("in-memory sqlite");
    db.execute_unprepared(SCHEMA).await.expect("schema creation");
    db
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn registration(cpf: &str, email: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        cpf: cpf.to_string(),
        name: "fulano".to_string(),
        surname: "de tal".to_string(),
        email: email.to_string(),
        birth_date: "01/01/1990".to_string(),
        phone: "21998765432".to_string(),
        gender: None,
        password: STRONG_PASSWORD.to_string(),
        role_id: None,
    }
}

/// Registers an inactive user and returns the row plus the activation token.
pub async fn register_user(
    db: &DatabaseConnection,
    cpf: &str,
    email: &str,
) -> (users::Model, String) {
    UserService::register(db, registration(cpf, email), Uuid::new_v4(), now())
        .await
        .expect("registration should succeed")
}

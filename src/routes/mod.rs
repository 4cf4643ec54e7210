pub mod auth;
pub mod health;
pub mod manufacturers;
pub mod roles;
pub mod users;
pub mod vehicle_models;
pub mod vehicles;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(users::user_routes)
            .configure(roles::role_routes)
            .configure(manufacturers::manufacturer_routes)
            .configure(vehicle_models::vehicle_model_routes)
            .configure(vehicles::vehicle_routes),
    )
    // The activation link emailed to users resolves outside /api.
    .service(users::activate_by_token);
}

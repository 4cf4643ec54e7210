pub mod bootstrap;
pub mod catalog_service;
pub mod mail_service;
pub mod role_service;
pub mod user_service;
pub mod vehicle_service;
pub mod verification_service;

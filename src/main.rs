use actix_web::{App, HttpServer, middleware::Logger, web};

use fleetcare_backend::services::mail_service::MailService;
use fleetcare_backend::{db, routes, services};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    log::info!("Database connected");

    services::bootstrap::seed(&db)
        .await
        .expect("Failed to seed roles and default administrator");

    let mailer = MailService::from_env();

    log::info!("Starting server on http://127.0.0.1:8080");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .configure(routes::configure_routes)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}

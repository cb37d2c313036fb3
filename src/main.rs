use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use chowhub_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::StorageClient,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let storage_client = StorageClient::new(config.storage.clone());

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let profile_service = ProfileService::new(pool.clone());
    let restaurant_service = RestaurantService::new(pool.clone());
    let dish_service = DishService::new(pool.clone());
    let order_service = OrderService::new(pool.clone());
    let delivery_service = DeliveryService::new(pool.clone());
    let favorite_service = FavoriteService::new(pool.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .app_data(web::Data::new(restaurant_service.clone()))
            .app_data(web::Data::new(dish_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(delivery_service.clone()))
            .app_data(web::Data::new(favorite_service.clone()))
            .app_data(web::Data::new(storage_client.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::profile_config)
                    .configure(handlers::restaurant_config)
                    .configure(handlers::dish_config)
                    .configure(handlers::order_config)
                    .configure(handlers::delivery_config)
                    .configure(handlers::favorite_config)
                    .configure(handlers::admin_config)
                    .configure(handlers::upload_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

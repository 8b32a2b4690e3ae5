//! referral rewards backend service

#[macro_use]
extern crate lazy_static;

pub mod account_manager;
pub mod admin;
pub mod rewards;
pub mod utils;

use actix_cors::Cors;
use actix_web::{http, middleware, web, App, HttpServer};
use common::constants::MAX_UPLOAD_SIZE;
use common::env::CONF;
use tracing::info;

use crate::utils::respond::json_error_handler;

/// Json extractor config shared by the server and the route tests.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn cors() -> Cors {
    //cookies only travel cross origin to explicitly listed origins
    CONF.allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .supports_credentials()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![http::header::ACCEPT, http::header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    common::log::init_logger();
    let service: String = format!("0.0.0.0:{}", CONF.api_port);
    info!("listening on {}", service);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors())
            .app_data(json_config())
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_SIZE))
            .configure(account_manager::configure_routes)
            .configure(rewards::configure_routes)
            .configure(admin::configure_routes)
    })
    .bind(service)?
    .run()
    .await
}

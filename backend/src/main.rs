mod classifier;
mod config;
mod normalize;
mod orchestrator;
mod prompt;
mod routes;
mod synthesis;
mod upload;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use classifier::RecognizerClient;
use config::AppConfig;
use orchestrator::Orchestrator;
use routes::configure_routes;
use synthesis::{CohereChat, Synthesizer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let classifier = RecognizerClient::new(&config)
        .map_err(|e| std::io::Error::other(format!("HTTP client error: {}", e)))?;
    let chat = CohereChat::new(&config)
        .map_err(|e| std::io::Error::other(format!("HTTP client error: {}", e)))?;

    let orchestrator = web::Data::new(Orchestrator::new(
        Arc::new(classifier),
        Synthesizer::new(Arc::new(chat)),
    ));

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Classifier endpoint: {}", config.classifier_url);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(orchestrator.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

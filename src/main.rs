use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use booking_admin::api::ApiClient;
use booking_admin::cache::QueryCache;
use booking_admin::config::Config;
use booking_admin::contracts::ContractService;
use booking_admin::handlers::{self, AppState};
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let api = ApiClient::from_config(&config).map_err(std::io::Error::other)?;
    let cache = QueryCache::new(config.cache.clone());
    let state = web::Data::new(
        AppState::new(ContractService::new(api, cache))
            .with_trusted_proxy(config.trust_forwarded_for),
    );
    tracing::info!("Booking backend at {}", config.api_base_url);
    if config.trust_forwarded_for {
        tracing::info!("Responder IPs taken from forwarded headers");
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}

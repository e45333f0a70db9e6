use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use payment_method_contract::{
    config::{self, ServerConfig},
    routes,
    services::memory::store::PaymentMethodStore,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    config::load_dotenv();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = web::Data::new(PaymentMethodStore::new());

    if config.api_key.is_none() {
        log::info!("MOCK_API_KEY not set, accepting any sk_ key");
    }
    log::info!("Mock payment API listening on {}:{}", config.host, config.port);

    let api_key = config.api_key.clone();
    HttpServer::new(move || {
        let store = store.clone();
        let api_key = api_key.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .configure(move |cfg| routes::configure(cfg, store, api_key))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

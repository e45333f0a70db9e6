use std::process::ExitCode;

use env_logger::Env;

use payment_method_contract::{
    config::{self, ClientConfig},
    contract::PaymentMethodContract,
    services::stripe::provider::StripeProvider,
};

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Verifying {} ({:?})", config.api_base, config.mode);
    let provider = StripeProvider::from_config(&config);
    let report = PaymentMethodContract::new(&provider, config.mode).run().await;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Failed to render report: {}", err),
    }

    for failure in report.failures() {
        log::error!("{:?}", failure);
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

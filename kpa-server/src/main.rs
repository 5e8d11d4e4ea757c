use kpa_server::{logging, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_tracing(config.log_json);
    kpa_server::run(config).await
}

use parley_infrastructure::ConfigService;
use parley_server::logging::init_logging;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional first argument: path to config.toml
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ConfigService::load(config_path.as_deref())?;

    init_logging(&config.logging.level, &config.logging.format);

    parley_server::start_server(config).await
}

use std::sync::Arc;

use predictron::config::{load_config, print_schema};
use predictron::startup;
use predictron::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    // `predictron --schema` dumps the config JSON schema and exits.
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = Arc::new(load_config());
    init_logging(&config.logging);

    if let Err(e) = startup::run(config).await {
        tracing::error!("Startup failed: {}", e);
        std::process::exit(1);
    }
}

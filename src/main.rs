use tracing::{error, info};
use wagerbook::app::App;
use wagerbook::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = match Config::load_or_default("config.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("wagerbook starting");

    if let Err(e) = App::run(config).await {
        error!(error = %e, "Fatal error");
        std::process::exit(1);
    }

    info!("wagerbook stopped");
}

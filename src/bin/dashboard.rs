use dashboard::prelude::*;
use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the YAML config file
const ENV_CONFIG: &str = "DASHBOARD_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match env::var(ENV_CONFIG) {
        Ok(path) => {
            tracing::info!(path = %path, "loading config");
            DashboardConfig::from_yaml_file(&path)?
        }
        Err(_) => {
            tracing::info!("{} not set, using default config", ENV_CONFIG);
            DashboardConfig::default()
        }
    }
    .apply_env_overrides();

    ServerBuilder::new()
        .with_config(config)
        .with_store_from_config()
        .await?
        .serve()
        .await
}

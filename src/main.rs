use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tripsmith::config::PlannerConfig;
use tripsmith::planner::TripPlanner;
use tripsmith::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PlannerConfig::load()?;
    let planner = Arc::new(TripPlanner::from_config(&config)?);

    web::run(config.server.port, planner).await
}

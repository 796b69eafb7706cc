use chrono::Local;
use tracing::error;

use liftday::commands::today_plan;
use liftday::config::AppConfig;
use liftday::{logging, AppState, SessionSettings};

#[tokio::main]
async fn main() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = match AppConfig::from_env() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("Invalid configuration: {}", e);
      std::process::exit(2);
    }
  };
  logging::init(&config.logging);

  let state = match AppState::open(&config.database_url).await {
    Ok(state) => state,
    Err(e) => {
      error!(error = %e, "Failed to initialize database");
      std::process::exit(1);
    }
  };

  let today = Local::now().date_naive();
  let plan = today_plan(state.store.as_ref(), &SessionSettings::from(&config), today).await;

  match serde_json::to_string_pretty(&plan) {
    Ok(json) => println!("{}", json),
    Err(e) => {
      error!(error = %e, "Failed to serialize plan");
      std::process::exit(1);
    }
  }
}

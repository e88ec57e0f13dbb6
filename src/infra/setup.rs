use crate::{
    adapters::http::app_state::AppState,
    infra::{config::AppConfig, db::DbPool, waitlist_persistence},
    use_cases::waitlist::WaitlistUseCases,
};
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_app_state(config: AppConfig, pool: &DbPool) -> AppState {
    let waitlist_repo = waitlist_persistence(pool);
    let waitlist_use_cases = WaitlistUseCases::new(waitlist_repo);

    AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
    }
}

pub fn init_tracing(log_file: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "waitlist=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs), only when LOG_FILE is set
    let (file, file_error) = match log_file.map(File::create) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(err)) => (None, Some(err)),
        None => (None, None),
    };
    let json_layer = file.map(|file| {
        fmt::layer()
            .json()
            .with_writer(Mutex::new(file))
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    if let Some(err) = file_error {
        tracing::warn!(error = %err, path = ?log_file, "Cannot create log file, JSON file logging disabled");
    }
}

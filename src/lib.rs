pub mod accessibility; // Font size, contrast, keyboard mode, live region
pub mod api; // Backend client: autocomplete, search, interactions
pub mod config;
pub mod driver; // Async event loop around a page
pub mod interactions; // Interaction checker
pub mod models;
pub mod page;
pub mod render; // HTML fragments
pub mod selection; // Selection set + observers
pub mod suggestions; // Suggestion fetcher + dropdown
pub mod views;
pub mod widget;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// built-in filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}

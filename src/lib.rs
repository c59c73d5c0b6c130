pub mod analysis;
pub mod catalog;
pub mod config;
pub mod db;
pub mod models;
pub mod session;
pub mod store;

pub use analysis::{AnalysisError, SymptomAnalyzer};
pub use config::AnalysisConfig;
pub use models::AnalysisResult;
pub use session::{AnalysisRefusal, Session, SessionError};
pub use store::RecordStore;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` wins over
/// [`config::default_log_filter`]. Safe to call more than once.
pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}

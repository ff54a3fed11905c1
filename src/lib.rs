pub mod aggregator;
pub mod app;
pub mod catalog;
pub mod config;
mod error;
pub mod gpa;
pub mod http_client;
pub mod instructor;
pub mod planetterp;
pub mod search;
pub mod session;
pub mod view;

pub use aggregator::{InstructorCard, RatingAggregator};
pub use app::App;
pub use catalog::{CatalogIndex, CatalogSource, CourseRecord};
pub use config::Config;
pub use error::{DrTerpError, Result};
pub use gpa::{compute_gpa, GpaStatistic};
pub use instructor::{resolve, InstructorDisplayMode};
pub use search::{Direction, Key, SearchPhase, SuggestionEngine};
pub use session::{LookupRequest, SearchSession, SelectionToken};

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

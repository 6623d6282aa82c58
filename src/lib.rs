pub mod controller;
pub mod errors;
pub mod grouping;
pub mod list_store;
pub mod models;
pub mod pagination;
pub mod source;

pub use controller::{HistoryListController, ListListener};
pub use errors::{HistoryError, HistoryResult};
pub use list_store::OrderedListStore;
pub use models::{
    HistoryEntry, HistoryListConfig, ListSnapshot, PageResponse, PageRow, QueryOptions,
    RawRecord, RecordChange,
};
pub use pagination::PaginationCursor;
pub use source::{RecordStore, SourceFuture};

/// Installs a stderr `tracing` subscriber honoring `RUST_LOG`. Intended for
/// host applications that do not bring their own subscriber.
pub fn init_tracing() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| error.to_string())
}

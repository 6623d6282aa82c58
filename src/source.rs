use crate::models::{PageResponse, QueryOptions, RawRecord};
use std::future::Future;
use std::pin::Pin;

pub type SourceFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// The external record store collaborator.
///
/// Precondition on implementations: `list_page` must order records
/// descending by their sort key and break equal-key ties stably across
/// pages, so that at most one record straddles a page boundary for a given
/// `start_key`/`skip` pair.
pub trait RecordStore: Send + Sync {
    fn list_page(&self, options: QueryOptions) -> SourceFuture<PageResponse>;
    fn search(&self, query: String) -> SourceFuture<Vec<RawRecord>>;
}

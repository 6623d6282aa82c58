use crate::errors::{HistoryError, HistoryResult};
use crate::grouping;
use crate::list_store::OrderedListStore;
use crate::models::{
    is_tracked_kind, HistoryEntry, HistoryListConfig, ListSnapshot, RawRecord, RecordChange,
};
use crate::pagination::PaginationCursor;
use crate::source::RecordStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

pub type ListListener = Arc<dyn Fn(&ListSnapshot) + Send + Sync>;

/// Orchestrates the history list: page loads through the pagination cursor,
/// ad-hoc search, and single-record change events, all funneled into the
/// ordered sequence. Observers receive a full snapshot after every mutation.
///
/// A page or search response that resolves after a `reset` is discarded:
/// every dispatch captures the generation counter and `reset` bumps it, so
/// stale data can never resurrect a cleared list.
pub struct HistoryListController {
    config: HistoryListConfig,
    cursor: Mutex<PaginationCursor>,
    entries: Mutex<OrderedListStore>,
    source: RwLock<Option<Arc<dyn RecordStore>>>,
    listeners: RwLock<Vec<ListListener>>,
    generation: AtomicU64,
}

impl HistoryListController {
    pub fn new(config: HistoryListConfig) -> HistoryResult<Arc<Self>> {
        if config.page_size == 0 {
            return Err(HistoryError::Config(
                "pageSize must be a positive integer".to_string(),
            ));
        }
        Ok(Arc::new(Self {
            cursor: Mutex::new(PaginationCursor::new(config.page_size)),
            entries: Mutex::new(OrderedListStore::new()),
            source: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
            config,
        }))
    }

    pub fn set_source(&self, source: Arc<dyn RecordStore>) {
        let mut slot = self.source.write().expect("source write lock");
        *slot = Some(source);
    }

    pub fn clear_source(&self) {
        let mut slot = self.source.write().expect("source write lock");
        *slot = None;
    }

    pub fn subscribe(&self, listener: ListListener) {
        self.listeners
            .write()
            .expect("listeners write lock")
            .push(listener);
    }

    /// Explicit lifecycle entry point; the hosting application calls this
    /// once the list is mounted. Triggers the initial page load unless
    /// auto-load is disabled or data is already present or in flight.
    pub async fn attach(&self) -> HistoryResult<bool> {
        if !self.config.auto_load {
            return Ok(false);
        }
        if self.cursor.lock().await.is_loading() {
            return Ok(false);
        }
        if !self.entries.lock().await.is_empty() {
            return Ok(false);
        }
        self.load_next().await
    }

    /// Loads the next page of results. A call while a page is already in
    /// flight, or while in search mode, is a silent no-op (`Ok(false)`).
    /// Returns `Ok(true)` when a non-empty page was merged.
    pub async fn load_next(&self) -> HistoryResult<bool> {
        {
            let cursor = self.cursor.lock().await;
            if cursor.is_search() || cursor.is_loading() {
                return Ok(false);
            }
        }
        let Some(source) = self.source() else {
            tracing::warn!("record source not found");
            return Err(HistoryError::SourceUnavailable(
                "record source not found".to_string(),
            ));
        };

        let options = {
            let mut cursor = self.cursor.lock().await;
            if cursor.is_search() || cursor.is_loading() {
                return Ok(false);
            }
            cursor.set_loading(true);
            cursor.next_query_options()
        };
        let generation = self.generation.load(Ordering::SeqCst);

        let result = source.list_page(options).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            // A reset happened underneath this request; its flags are
            // already clear and its data belongs to a discarded view.
            tracing::debug!("discarding stale history page response");
            return Ok(false);
        }

        match result {
            Ok(response) => {
                self.cursor.lock().await.set_loading(false);
                let Some(last_key) = response.rows.last().map(|row| row.key) else {
                    return Ok(false);
                };
                let docs: Vec<RawRecord> =
                    response.rows.into_iter().map(|row| row.doc).collect();
                let today = grouping::today_key();
                let yesterday = grouping::yesterday_key(today);
                self.cursor.lock().await.advance(last_key);
                self.entries.lock().await.bulk_append(docs, today, yesterday);
                self.notify().await;
                Ok(true)
            }
            Err(message) => {
                self.cursor.lock().await.set_loading(false);
                tracing::error!(error = %message, "history page query failed");
                Err(HistoryError::QueryFailed(message))
            }
        }
    }

    /// Clears all state and reloads the first page.
    pub async fn refresh(&self) -> HistoryResult<bool> {
        self.reset().await;
        self.load_next().await
    }

    /// Drops the sequence, the pagination cursor, and the search/loading
    /// flags, and invalidates any in-flight request.
    pub async fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cursor.lock().await.reset();
        self.entries.lock().await.clear();
        self.notify().await;
    }

    /// Runs an ad-hoc search, replacing the paginated sequence with the
    /// results. An empty query while in search mode leaves search mode via
    /// `refresh`; an empty query otherwise is a no-op.
    pub async fn query(&self, query: &str) -> HistoryResult<bool> {
        if query.is_empty() {
            if self.cursor.lock().await.is_search() {
                return self.refresh().await;
            }
            return Ok(false);
        }

        let Some(source) = self.source() else {
            tracing::warn!("record source not found");
            return Err(HistoryError::SourceUnavailable(
                "record source not found".to_string(),
            ));
        };

        {
            let mut cursor = self.cursor.lock().await;
            cursor.set_search(true);
            cursor.set_loading(true);
        }
        self.entries.lock().await.clear();
        self.notify().await;
        // Entering search mode invalidates any page response still in
        // flight; its rows belong to the browsing view just cleared.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let result = source.search(query.to_string()).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding stale history search response");
            return Ok(false);
        }

        match result {
            Ok(records) => {
                let today = grouping::today_key();
                let yesterday = grouping::yesterday_key(today);
                {
                    let mut entries = self.entries.lock().await;
                    entries.clear();
                    entries.bulk_append(records, today, yesterday);
                }
                self.cursor.lock().await.set_loading(false);
                self.notify().await;
                Ok(true)
            }
            Err(message) => {
                {
                    let mut cursor = self.cursor.lock().await;
                    cursor.set_search(false);
                    cursor.set_loading(false);
                }
                tracing::error!(error = %message, "history search query failed");
                Err(HistoryError::QueryFailed(message))
            }
        }
    }

    /// Inserts or replaces a single record at its sort position. Rejected
    /// while in search mode: the displayed sequence is query results, not
    /// the browsable history.
    pub async fn apply_upsert(&self, record: RawRecord) -> bool {
        if self.cursor.lock().await.is_search() {
            return false;
        }
        let today = grouping::today_key();
        let yesterday = grouping::yesterday_key(today);
        self.entries.lock().await.upsert(record, today, yesterday);
        self.notify().await;
        true
    }

    /// Removes a single record by id. Rejected while in search mode.
    pub async fn apply_removal(&self, id: &str) -> bool {
        if self.cursor.lock().await.is_search() {
            return false;
        }
        let removed = self.entries.lock().await.remove(id).is_some();
        if removed {
            self.notify().await;
        }
        removed
    }

    /// "Record changed" notification from the record source. Only records
    /// tagged with a tracked history kind are applied.
    pub async fn handle_record_change(&self, change: RecordChange) -> bool {
        if !is_tracked_kind(&change.kind) {
            return false;
        }
        self.apply_upsert(change.record).await
    }

    /// "Data imported" notification. An import can touch any number of
    /// history records, so the whole list reloads from scratch.
    pub async fn handle_data_imported(&self) -> HistoryResult<bool> {
        self.refresh().await
    }

    /// "Store destroyed" notification. Refreshes when the destroyed store
    /// names intersect the tracked kinds or contain the "all" sentinel.
    pub async fn handle_store_destroyed(&self, stores: &[String]) -> HistoryResult<bool> {
        let affected = stores
            .iter()
            .any(|name| name == "all" || is_tracked_kind(name));
        if !affected {
            return Ok(false);
        }
        self.refresh().await
    }

    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.snapshot()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn is_loading(&self) -> bool {
        self.cursor.lock().await.is_loading()
    }

    pub async fn is_search(&self) -> bool {
        self.cursor.lock().await.is_search()
    }

    /// True when normal browsing ended with nothing to show.
    pub async fn data_unavailable(&self) -> bool {
        !self.is_search().await && !self.is_loading().await && self.is_empty().await
    }

    /// True when a search ran and returned nothing.
    pub async fn search_list_empty(&self) -> bool {
        self.is_search().await && !self.is_loading().await && self.is_empty().await
    }

    fn source(&self) -> Option<Arc<dyn RecordStore>> {
        self.source.read().expect("source read lock").clone()
    }

    async fn notify(&self) {
        let snapshot = {
            let cursor = self.cursor.lock().await;
            let entries = self.entries.lock().await;
            ListSnapshot {
                entries: entries.snapshot(),
                loading: cursor.is_loading(),
                searching: cursor.is_search(),
            }
        };
        let listeners = self.listeners.read().expect("listeners read lock").clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

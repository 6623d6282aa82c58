use crate::models::QueryOptions;

/// Pagination cursor for the page-by-page history query.
///
/// `start_key` is the `updated_at` of the last record of the previous page;
/// `skip` steps past the boundary record that `start_key` re-selects. The
/// skip stays fixed at one: the record source must order equal keys stably,
/// and merge-time id dedupe absorbs the single boundary duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCursor {
    start_key: Option<i64>,
    skip: Option<u32>,
    page_size: u32,
    loading: bool,
    search_mode: bool,
}

impl PaginationCursor {
    pub fn new(page_size: u32) -> Self {
        Self {
            start_key: None,
            skip: None,
            page_size,
            loading: false,
            search_mode: false,
        }
    }

    pub fn next_query_options(&self) -> QueryOptions {
        QueryOptions {
            limit: self.page_size,
            descending: true,
            start_key: self.start_key,
            skip: self.skip,
        }
    }

    /// Records the boundary of a completed page.
    pub fn advance(&mut self, last_key: i64) {
        self.start_key = Some(last_key);
        if self.skip.is_none() {
            self.skip = Some(1);
        }
    }

    pub fn reset(&mut self) {
        self.start_key = None;
        self.skip = None;
        self.search_mode = false;
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_search(&self) -> bool {
        self.search_mode
    }

    pub fn set_search(&mut self, search_mode: bool) {
        self.search_mode = search_mode;
    }
}

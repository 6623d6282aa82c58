use crate::grouping;
use crate::models::{HistoryEntry, RawRecord};
use std::collections::HashSet;

/// The canonical in-memory sequence of history entries, sorted strictly
/// descending by `updated_at` (stable for ties). Every structural mutation
/// repairs header metadata at the mutation seam so that each day run keeps
/// exactly one header on its first entry.
#[derive(Debug, Default)]
pub struct OrderedListStore {
    entries: Vec<HistoryEntry>,
}

impl OrderedListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merges a freshly loaded page into the sequence. Pagination guarantees
    /// the page is strictly older than the existing tail, so the batch is
    /// sorted and annotated on its own and appended; the only cross-batch
    /// work is id dedupe (the skip-of-one boundary duplicate) and clearing
    /// the batch head's header when it continues the tail's day run.
    pub fn bulk_append(&mut self, raw: Vec<RawRecord>, today: i64, yesterday: i64) -> usize {
        let now = grouping::now_millis();
        let mut seen: HashSet<String> =
            self.entries.iter().map(|entry| entry.id.clone()).collect();
        let mut batch: Vec<HistoryEntry> = Vec::with_capacity(raw.len());
        for record in raw {
            if !seen.insert(record.id.clone()) {
                continue;
            }
            batch.push(entry_from_raw(record, now));
        }
        if batch.is_empty() {
            return 0;
        }

        batch.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        grouping::annotate(&mut batch, today, yesterday);

        if let Some(tail) = self.entries.last() {
            if batch[0].day_key == tail.day_key {
                batch[0].clear_header();
            }
        }

        let appended = batch.len();
        self.entries.extend(batch);
        appended
    }

    /// Inserts a single record at its sort position, replacing any existing
    /// entry with the same id. Returns the insertion index.
    pub fn upsert(&mut self, raw: RawRecord, today: i64, yesterday: i64) -> usize {
        let now = grouping::now_millis();
        let mut entry = entry_from_raw(raw, now);
        self.remove(&entry.id);

        let info = grouping::classify(entry.updated_at);
        entry.day_key = info.day_key;
        entry.time_label = info.time_label;

        let index = self.insert_position(entry.updated_at);

        // If the follower opened the day run, the inserted entry takes over.
        if let Some(follower) = self.entries.get_mut(index) {
            if follower.has_header && follower.day_key == entry.day_key {
                follower.clear_header();
            }
        }

        let opens_run = match index.checked_sub(1).and_then(|i| self.entries.get(i)) {
            Some(previous) => previous.day_key != entry.day_key,
            None => true,
        };
        if opens_run {
            let (label, today_flag) =
                grouping::header_label_for(entry.day_key, today, yesterday, &info.date_label);
            entry.has_header = true;
            entry.header_label = Some(label);
            entry.today = today_flag;
        }

        self.entries.insert(index, entry);
        index
    }

    /// Removes the entry with the given id. When the removed entry headed
    /// its day run, the header moves to the next entry of the run before
    /// the removal.
    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let transfer = self.entries[index].has_header
            && self
                .entries
                .get(index + 1)
                .is_some_and(|next| !next.has_header);
        if transfer {
            let header_label = self.entries[index].header_label.clone();
            let today = self.entries[index].today;
            let next = &mut self.entries[index + 1];
            next.has_header = true;
            next.header_label = header_label;
            next.today = today;
        }
        Some(self.entries.remove(index))
    }

    // First position whose entry is strictly older than `time`; end of the
    // sequence when every entry is at least as new (ties stay stable).
    fn insert_position(&self, time: i64) -> usize {
        self.entries
            .iter()
            .position(|entry| entry.updated_at < time)
            .unwrap_or(self.entries.len())
    }
}

fn entry_from_raw(record: RawRecord, now: i64) -> HistoryEntry {
    let created_at = valid_timestamp(record.created).unwrap_or(now);
    let updated_at = valid_timestamp(record.updated).unwrap_or(created_at);
    HistoryEntry {
        id: record.id,
        created_at,
        updated_at,
        day_key: 0,
        time_label: String::new(),
        has_header: false,
        header_label: None,
        today: false,
        payload: record.payload,
    }
}

fn valid_timestamp(value: Option<i64>) -> Option<i64> {
    value.filter(|timestamp| *timestamp > 0)
}

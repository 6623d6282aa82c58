use crate::models::HistoryEntry;
use chrono::{DateTime, Local, LocalResult, TimeZone, Utc};

pub const DAY_MS: i64 = 86_400_000;

/// Time metadata derived from a record's sort timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInfo {
    /// Millisecond timestamp of the record's local day at midnight.
    pub day_key: i64,
    pub time_label: String,
    pub date_label: String,
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Classifies a millisecond timestamp into its local day bucket and
/// display labels. Today/Yesterday resolution is the caller's concern:
/// compare `day_key` against [`today_key`] / [`yesterday_key`] values
/// captured at the moment of the call.
pub fn classify(timestamp_ms: i64) -> TimeInfo {
    let Some(moment) = local_datetime(timestamp_ms) else {
        // Outside chrono's representable range; keep the raw value as its
        // own bucket so grouping still terminates.
        return TimeInfo {
            day_key: timestamp_ms,
            time_label: String::new(),
            date_label: String::new(),
        };
    };
    TimeInfo {
        day_key: day_start(&moment),
        time_label: moment.format("%-H:%M:%S").to_string(),
        date_label: moment.format("%A, %B %-d, %Y").to_string(),
    }
}

pub fn today_key() -> i64 {
    day_start(&Local::now())
}

pub fn yesterday_key(today: i64) -> i64 {
    today - DAY_MS
}

/// Header label and today-flag for a day bucket.
pub fn header_label_for(
    day_key: i64,
    today: i64,
    yesterday: i64,
    date_label: &str,
) -> (String, bool) {
    if day_key == today {
        ("Today".to_string(), true)
    } else if day_key == yesterday {
        ("Yesterday".to_string(), false)
    } else {
        (date_label.to_string(), false)
    }
}

/// Single pass over a sequence already sorted descending by `updated_at`:
/// recompute `day_key`/`time_label` for every entry and give exactly the
/// first entry of each day run a header. Does not sort.
pub fn annotate(entries: &mut [HistoryEntry], today: i64, yesterday: i64) {
    let mut last_day: Option<i64> = None;
    for entry in entries.iter_mut() {
        let info = classify(entry.updated_at);
        entry.day_key = info.day_key;
        entry.time_label = info.time_label;
        if last_day != Some(info.day_key) {
            last_day = Some(info.day_key);
            let (label, today_flag) =
                header_label_for(info.day_key, today, yesterday, &info.date_label);
            entry.has_header = true;
            entry.header_label = Some(label);
            entry.today = today_flag;
        } else {
            entry.clear_header();
        }
    }
}

fn local_datetime(timestamp_ms: i64) -> Option<DateTime<Local>> {
    match Local.timestamp_millis_opt(timestamp_ms) {
        LocalResult::Single(moment) => Some(moment),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

fn day_start(moment: &DateTime<Local>) -> i64 {
    moment
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.timestamp_millis())
        // Midnight skipped by a DST transition; fall back to the moment itself.
        .unwrap_or_else(|| moment.timestamp_millis())
}

//! Merged activity timeline.
//!
//! Analysis runs and assistant consultations interleave into one
//! newest-first feed for the history view.

use crate::store::{HistoryStore, StoreResult};

/// How many entries of each kind feed the merged timeline.
const TIMELINE_FETCH_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineKind {
    Forecast,
    Chat,
}

#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub id: i64,
    pub kind: TimelineKind,
    pub title: String,
    pub description: String,
    pub timestamp: String,
}

/// Fetch both histories and merge them, newest first.
pub fn combined_timeline(store: &HistoryStore) -> StoreResult<Vec<TimelineEntry>> {
    let mut timeline = Vec::new();

    for stored in store.recent_reports(TIMELINE_FETCH_LIMIT)? {
        let product_count = stored.report.best_sellers.len();
        timeline.push(TimelineEntry {
            id: stored.id,
            kind: TimelineKind::Forecast,
            title: format!("Stock analysis: {}", stored.filename),
            description: format!("Forecast covering {product_count} ranked products"),
            timestamp: stored.created_at,
        });
    }

    for chat in store.recent_chats(TIMELINE_FETCH_LIMIT)? {
        timeline.push(TimelineEntry {
            id: chat.id,
            kind: TimelineKind::Chat,
            title: "Assistant consultation".to_string(),
            description: preview(&chat.question, 50),
            timestamp: chat.created_at,
        });
    }

    // RFC 3339 timestamps sort correctly as strings.
    timeline.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(timeline)
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

//! Alert selection: ordering and presentation bounds.
//!
//! Selectors sort the signal list by an urgency key and truncate it to a
//! display bound. The 10-entry cap on stock alerts is a presentation bound,
//! not data loss: the dashboard and the assistant both consume "the most
//! urgent few", and anything beyond that is noise at reorder time.

/// Selectors sort and truncate a candidate list by an urgency key.
pub trait Selector<C> {
    /// Extract the sort key from a candidate. Lower keys are more urgent.
    fn key(&self, candidate: &C) -> f64;

    /// Optional maximum number of candidates to keep.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Sort ascending by key and truncate to the configured size.
    ///
    /// NaN keys are pushed to the end so they can never crowd out real
    /// signals at the top of the list. The sort is stable: candidates with
    /// equal keys keep their input order.
    fn select(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            let ka = self.key(a);
            let kb = self.key(b);
            match (ka.is_nan(), kb.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal),
            }
        });
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }
}

/// Maximum stock alerts surfaced to the dashboard and the assistant.
pub const MAX_STOCK_ALERTS: usize = 10;

/// Orders stock signals by projected runway, most urgent first.
pub struct UrgencySelector {
    pub max: usize,
}

impl Default for UrgencySelector {
    fn default() -> Self {
        Self { max: MAX_STOCK_ALERTS }
    }
}

impl Selector<crate::risk::StockSignal> for UrgencySelector {
    fn key(&self, signal: &crate::risk::StockSignal) -> f64 {
        signal.days_left
    }

    fn size(&self) -> Option<usize> {
        Some(self.max)
    }
}

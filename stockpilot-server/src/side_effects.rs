//! Concrete side effects wired into the analysis pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use stockpilot_engine::side_effect::{ReportSideEffect, SideEffectInput};

use crate::store::HistoryStore;

/// Persists each completed report to the history store.
///
/// Runs after report assembly and can never abort the analysis: a store
/// failure is logged by the side-effect runner and swallowed.
pub struct SaveHistorySideEffect {
    store: Arc<HistoryStore>,
}

impl SaveHistorySideEffect {
    pub fn new(store: Arc<HistoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReportSideEffect for SaveHistorySideEffect {
    async fn run(&self, input: &SideEffectInput) -> Result<(), String> {
        let id = self
            .store
            .save_report(&input.filename, &input.report)
            .map_err(|e| e.to_string())?;
        log::info!("saved report history id={id} for {}", input.filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpilot_engine::report::{Summary, ACCURACY_PLACEHOLDER};
    use stockpilot_engine::side_effect::run_side_effects;
    use stockpilot_engine::IntelligenceReport;

    #[tokio::test]
    async fn completed_report_lands_in_the_store() {
        let store = Arc::new(HistoryStore::open_in_memory().unwrap());
        let effects: Vec<Box<dyn ReportSideEffect>> =
            vec![Box::new(SaveHistorySideEffect::new(store.clone()))];

        let input = SideEffectInput {
            filename: "sales.csv".into(),
            report: IntelligenceReport {
                summary: Summary {
                    total_stock: 7,
                    stockout_count: 0,
                    accuracy: ACCURACY_PLACEHOLDER.into(),
                },
                best_sellers: vec![],
                worst_sellers: vec![],
                stock_alerts: vec![],
                forecast_chart: vec![],
            },
        };

        run_side_effects(&effects, &input).await;

        let latest = store.latest_report().unwrap().unwrap();
        assert_eq!(latest.filename, "sales.csv");
        assert_eq!(latest.report.summary.total_stock, 7);
    }
}

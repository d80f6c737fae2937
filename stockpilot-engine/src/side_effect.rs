//! Post-pipeline side effects.
//!
//! A side effect runs after a report has been computed and can never change
//! or abort the result: the caller's value is the report itself, not the
//! audit trail. A failing side effect is logged and swallowed. Persistence
//! of report history is the canonical example.

use async_trait::async_trait;

use crate::report::IntelligenceReport;

/// Input handed to side effects after the pipeline completes.
#[derive(Clone, Debug)]
pub struct SideEffectInput {
    pub filename: String,
    pub report: IntelligenceReport,
}

/// An action run after report assembly that does not affect the result.
#[async_trait]
pub trait ReportSideEffect: Send + Sync {
    /// Decide if this side effect should run for the given input.
    fn enable(&self, _input: &SideEffectInput) -> bool {
        true
    }

    /// Execute the side effect.
    async fn run(&self, input: &SideEffectInput) -> Result<(), String>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Run every enabled side effect, logging failures instead of surfacing
/// them. This function cannot fail by design.
pub async fn run_side_effects(effects: &[Box<dyn ReportSideEffect>], input: &SideEffectInput) {
    for effect in effects {
        if !effect.enable(input) {
            continue;
        }
        match effect.run(input).await {
            Ok(()) => log::debug!("side effect {} completed", effect.name()),
            Err(reason) => {
                log::warn!("side effect {} failed (ignored): {}", effect.name(), reason)
            }
        }
    }
}

/// Extract a short type name from the full module path.
fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

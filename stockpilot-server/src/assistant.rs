//! The supply-chain assistant.
//!
//! Answers are grounded in the most recent stored report: CRITICAL and
//! WARNING products are pulled from its stock alerts into a short warehouse
//! summary. Grounding is strictly best-effort: any persistence failure
//! degrades to a neutral fallback text, because a raw error string fed into
//! a prompt produces a confused model, not a useful answer.

use stockpilot_engine::StockStatus;

use crate::llm::{LlmClient, LlmError};
use crate::store::HistoryStore;

/// Fallback grounding when no usable report exists.
const NO_FORECAST_CONTEXT: &str =
    "Forecast data is not yet available. If the user asks about stock levels, \
     direct them to upload a sales CSV first.";

/// Build the warehouse-condition summary from the latest stored report.
///
/// Never fails: persistence problems are logged and replaced with the
/// fallback context.
pub fn grounding_summary(store: &HistoryStore) -> String {
    let report = match store.latest_report() {
        Ok(Some(stored)) => stored.report,
        Ok(None) => return NO_FORECAST_CONTEXT.to_string(),
        Err(e) => {
            log::warn!("grounding fetch failed (using fallback context): {e}");
            return NO_FORECAST_CONTEXT.to_string();
        }
    };

    let critical: Vec<&str> = report
        .stock_alerts
        .iter()
        .filter(|a| a.status == StockStatus::Critical)
        .map(|a| a.product.as_str())
        .collect();
    let warning: Vec<&str> = report
        .stock_alerts
        .iter()
        .filter(|a| a.status == StockStatus::Warning)
        .map(|a| a.product.as_str())
        .collect();

    let mut summary = String::from("Current warehouse condition (live forecast):\n");
    if critical.is_empty() {
        summary.push_str("- No products in critical condition.\n");
    } else {
        summary.push_str(&format!("- CRITICAL (reorder now): {}\n", critical.join(", ")));
    }
    if !warning.is_empty() {
        summary.push_str(&format!("- WARNING (plan a reorder): {}\n", warning.join(", ")));
    }
    summary
}

/// Assemble the user message from grounding, optional document, and question.
fn build_user_message(warehouse: &str, document: Option<&str>, question: &str) -> String {
    let mut message = format!("CURRENT WAREHOUSE DATA (LIVE FORECAST):\n{warehouse}\n");
    if let Some(doc) = document {
        message.push_str(&format!("\nUPLOADED DOCUMENT / CONTRACT CONTENT:\n{doc}\n"));
    }
    message.push_str(&format!("\nUSER QUESTION:\n{question}\n"));
    message
}

const SYSTEM_PROMPT: &str = "\
You are a professional supply-chain operations assistant for a merchant's \
warehouse. Answer concisely and decisively, like a consultant. Combine the \
live forecast data with the uploaded document when both are relevant (for \
example, cross-reference contract lead times against projected stockouts). \
If conditions look healthy, say operations are running smoothly.";

/// Answer a question, grounded in the latest forecast and an optional
/// document excerpt. The exchange is logged best-effort.
pub async fn ask(
    llm: &LlmClient,
    store: &HistoryStore,
    question: &str,
    document: Option<&str>,
) -> Result<String, LlmError> {
    let warehouse = grounding_summary(store);
    let user_message = build_user_message(&warehouse, document, question);

    let answer = llm.complete(SYSTEM_PROMPT, &user_message).await?;

    if let Err(e) = store.log_chat(question, &answer) {
        log::warn!("failed to log chat (ignored): {e}");
    }

    Ok(answer)
}

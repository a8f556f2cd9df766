//! Workflow and transaction counters.
//!
//! # Metrics
//! - `market_workflow_steps_total` (counter): step outcomes by `step`, `outcome`
//! - `market_transaction_stage_failures_total` (counter): submitter failures by `stage`, `class`
//! - `market_transactions_confirmed_total` (counter): transactions confirmed

use metrics::counter;

/// Record the outcome of one workflow step.
pub fn record_step(step: &'static str, outcome: &'static str) {
    counter!("market_workflow_steps_total", "step" => step, "outcome" => outcome).increment(1);
}

/// Record a failed stage of the sign-and-submit protocol.
pub fn record_stage_failure(stage: &'static str, class: &'static str) {
    counter!(
        "market_transaction_stage_failures_total",
        "stage" => stage,
        "class" => class
    )
    .increment(1);
}

/// Record a transaction observed as committed.
pub fn record_confirmed() {
    counter!("market_transactions_confirmed_total").increment(1);
}

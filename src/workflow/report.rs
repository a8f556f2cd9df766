//! Typed per-step results of a workflow run.

use std::fmt;
use uuid::Uuid;

use crate::blockchain::transaction::SubmitError;
use crate::blockchain::types::TransactionRecord;

/// The four business steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CreateCollection,
    CreateToken,
    ListNft,
    BuyToken,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::CreateCollection,
        Step::CreateToken,
        Step::ListNft,
        Step::BuyToken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::CreateCollection => "create_collection",
            Step::CreateToken => "create_token",
            Step::ListNft => "list_nft",
            Step::BuyToken => "buy_token",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum StepOutcome {
    Confirmed(TransactionRecord),
    Failed(SubmitError),
    /// Not attempted because an earlier step failed under fail-fast.
    Skipped,
}

impl StepOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Confirmed(_) => "confirmed",
            StepOutcome::Failed(_) => "failed",
            StepOutcome::Skipped => "skipped",
        }
    }

    pub fn record(&self) -> Option<&TransactionRecord> {
        match self {
            StepOutcome::Confirmed(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

#[derive(Debug)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

/// Result of one workflow run.
#[derive(Debug)]
pub struct WorkflowReport {
    pub run_id: Uuid,
    /// Buyer balance seen before the steps ran, if the query succeeded.
    pub buyer_balance: Option<u64>,
    pub steps: Vec<StepReport>,
}

impl WorkflowReport {
    pub fn new(run_id: Uuid, buyer_balance: Option<u64>) -> Self {
        Self {
            run_id,
            buyer_balance,
            steps: Vec::with_capacity(Step::ALL.len()),
        }
    }

    pub fn push(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push(StepReport { step, outcome });
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.outcome)
    }

    pub fn has_failure(&self) -> bool {
        self.steps.iter().any(|r| r.outcome.is_failed())
    }

    fn count(&self, label: &str) -> usize {
        self.steps.iter().filter(|r| r.outcome.label() == label).count()
    }

    pub fn confirmed(&self) -> usize {
        self.count("confirmed")
    }

    pub fn failed(&self) -> usize {
        self.count("failed")
    }

    pub fn skipped(&self) -> usize {
        self.count("skipped")
    }

    /// True when every step confirmed.
    pub fn is_success(&self) -> bool {
        self.steps.len() == Step::ALL.len() && self.confirmed() == Step::ALL.len()
    }
}

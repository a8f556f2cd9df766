//! The four-step marketplace workflow.
//!
//! Runs create collection → create token → list → buy, strictly in that
//! order, after an informational buyer balance query. Steps depend on each
//! other on-chain, but nothing checks that locally: under
//! [`FailurePolicy::BestEffort`] every step is attempted and the node is left
//! to reject the ones whose prerequisites failed.
//!
//! Collection and token creation must execute successfully. List and buy
//! count as confirmed once committed; the record keeps the execution status.

use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::client::NodeApi;
use crate::blockchain::transaction::{self, Stage, SubmitError, TransactionSubmitter};
use crate::blockchain::types::{ConfirmationStatus, PendingTransaction, TransactionRecord, WaitOptions};
use crate::config::schema::FailurePolicy;
use crate::marketplace::calls::{BuyToken, ListNft};
use crate::observability::metrics;
use crate::workflow::context::WorkflowContext;
use crate::workflow::report::{Step, StepOutcome, WorkflowReport};

pub struct WorkflowOrchestrator<'a, N: NodeApi + ?Sized> {
    node: &'a N,
    context: &'a WorkflowContext,
    policy: FailurePolicy,
}

impl<'a, N: NodeApi + ?Sized> WorkflowOrchestrator<'a, N> {
    pub fn new(node: &'a N, context: &'a WorkflowContext, policy: FailurePolicy) -> Self {
        Self {
            node,
            context,
            policy,
        }
    }

    /// Run the workflow once. Never fails; per-step results are in the report.
    pub async fn run(&self) -> WorkflowReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow", run_id = %run_id);
        self.run_steps(run_id).instrument(span).await
    }

    async fn run_steps(&self, run_id: Uuid) -> WorkflowReport {
        let buyer = self.context.buyer.address();
        let buyer_balance = match self.node.query_balance(buyer).await {
            Ok(balance) => {
                tracing::info!(address = %buyer, balance, "Buyer balance");
                Some(balance)
            }
            Err(e) => {
                tracing::warn!(address = %buyer, error = %e, "Balance query failed");
                None
            }
        };

        let mut report = WorkflowReport::new(run_id, buyer_balance);

        for step in Step::ALL {
            if self.policy == FailurePolicy::FailFast && report.has_failure() {
                tracing::warn!(step = %step, "Skipping step after earlier failure");
                metrics::record_step(step.as_str(), "skipped");
                report.push(step, StepOutcome::Skipped);
                continue;
            }

            let outcome = match self.run_step(step).await {
                Ok(record) => {
                    match &record.status {
                        ConfirmationStatus::Confirmed { version } => {
                            tracing::info!(step = %step, hash = %record.hash, ?version, "Step confirmed");
                        }
                        ConfirmationStatus::Failed(vm_status) => {
                            tracing::warn!(step = %step, hash = %record.hash, vm_status = %vm_status, "Step committed but execution failed");
                        }
                    }
                    StepOutcome::Confirmed(record)
                }
                Err(e) => {
                    tracing::error!(step = %step, stage = %e.stage, error = %e.source, "Step failed");
                    StepOutcome::Failed(e)
                }
            };
            metrics::record_step(step.as_str(), outcome.label());
            report.push(step, outcome);
        }

        report
    }

    async fn run_step(&self, step: Step) -> Result<TransactionRecord, SubmitError> {
        let ctx = self.context;
        match step {
            Step::CreateCollection => {
                let pending = self.node.create_collection(&ctx.seller, &ctx.collection).await?;
                self.confirm_helper(step, pending).await
            }
            Step::CreateToken => {
                let pending = self
                    .node
                    .create_token(&ctx.seller, ctx.collection.name(), &ctx.token)
                    .await?;
                self.confirm_helper(step, pending).await
            }
            Step::ListNft => {
                let payload = ListNft::new(&ctx.seller, &ctx.collection, &ctx.token, ctx.listing)
                    .into_payload(&ctx.module);
                TransactionSubmitter::new(self.node).submit(&ctx.seller, &payload).await
            }
            Step::BuyToken => {
                let payload = BuyToken::new(
                    &ctx.seller,
                    &ctx.buyer,
                    &ctx.collection,
                    &ctx.token,
                    ctx.listing.property_version,
                )
                .into_payload(&ctx.module);
                TransactionSubmitter::new(self.node).submit(&ctx.buyer, &payload).await
            }
        }
    }

    /// Wait on a helper-submitted transaction, requiring success.
    async fn confirm_helper(
        &self,
        step: Step,
        pending: PendingTransaction,
    ) -> Result<TransactionRecord, SubmitError> {
        let receipt = self
            .node
            .wait_for_transaction(&pending.hash, WaitOptions { check_success: true })
            .await
            .map_err(|e| transaction::fail(Stage::Confirm, step.as_str(), e))?;

        metrics::record_confirmed();
        Ok(TransactionRecord {
            hash: pending.hash,
            status: ConfirmationStatus::from(&receipt),
        })
    }
}

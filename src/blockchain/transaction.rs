//! Sign-and-submit protocol.
//!
//! # State machine
//! ```text
//! Built → Generated → Signed → Submitted → Confirmed
//!    \________\__________\_________\______→ Failed(stage, cause)
//! ```
//!
//! Every failure is logged at the stage it happened and returned to the
//! caller as a [`SubmitError`]. Nothing is retried or deduplicated: calling
//! [`TransactionSubmitter::submit`] twice with the same payload produces two
//! transactions.

use std::fmt;
use thiserror::Error;

use crate::blockchain::client::NodeApi;
use crate::blockchain::payload::EntryFunctionPayload;
use crate::blockchain::types::{BlockchainError, ConfirmationStatus, TransactionRecord, WaitOptions};
use crate::blockchain::wallet::WalletIdentity;
use crate::observability::metrics;

/// Protocol stage, used to report where a submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Sign,
    Submit,
    Confirm,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Generate => "generate",
            Stage::Sign => "sign",
            Stage::Submit => "submit",
            Stage::Confirm => "confirm",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submission that stopped before confirmation.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct SubmitError {
    pub stage: Stage,
    #[source]
    pub source: BlockchainError,
}

/// Runs payloads through generate → sign → submit → confirm.
pub struct TransactionSubmitter<'a, N: NodeApi + ?Sized> {
    node: &'a N,
    wait: WaitOptions,
}

impl<'a, N: NodeApi + ?Sized> TransactionSubmitter<'a, N> {
    /// Create a submitter that accepts any committed transaction; the record's
    /// status says whether it executed successfully.
    pub fn new(node: &'a N) -> Self {
        Self {
            node,
            wait: WaitOptions::default(),
        }
    }

    /// Override the confirmation options.
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Sign `payload` as `sender`, submit it and wait for it to commit.
    ///
    /// On success the record carries the hash the node returned at submission.
    pub async fn submit(
        &self,
        sender: &WalletIdentity,
        payload: &EntryFunctionPayload,
    ) -> Result<TransactionRecord, SubmitError> {
        let function = payload.function().to_string();

        let raw = self
            .node
            .generate_transaction(sender.address(), payload)
            .await
            .map_err(|e| fail(Stage::Generate, &function, e))?;
        tracing::debug!(
            function = %function,
            sender = %sender.address(),
            sequence_number = raw.sequence_number,
            "Transaction generated"
        );

        let signed = self
            .node
            .sign_transaction(sender, raw)
            .await
            .map_err(|e| fail(Stage::Sign, &function, e))?;

        let pending = self
            .node
            .submit_transaction(&signed)
            .await
            .map_err(|e| fail(Stage::Submit, &function, e))?;
        tracing::debug!(function = %function, tx_hash = %pending.hash, "Transaction submitted");

        let receipt = self
            .node
            .wait_for_transaction(&pending.hash, self.wait)
            .await
            .map_err(|e| fail(Stage::Confirm, &function, e))?;

        metrics::record_confirmed();
        tracing::info!(function = %function, hash = %pending.hash, "Transaction confirmed");

        Ok(TransactionRecord {
            hash: pending.hash,
            status: ConfirmationStatus::from(&receipt),
        })
    }
}

/// Log and count a stage failure.
pub(crate) fn fail(stage: Stage, function: &str, source: BlockchainError) -> SubmitError {
    metrics::record_stage_failure(stage.as_str(), source.class().as_str());
    tracing::error!(
        stage = %stage,
        function = %function,
        class = source.class().as_str(),
        error = %source,
        "Sign and submit failed"
    );
    SubmitError { stage, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_display() {
        let err = SubmitError {
            stage: Stage::Sign,
            source: BlockchainError::Signing("bad key".into()),
        };
        assert_eq!(err.to_string(), "sign stage failed: Signing error: bad key");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_stage_names() {
        let names: Vec<_> = [Stage::Generate, Stage::Sign, Stage::Submit, Stage::Confirm]
            .iter()
            .map(Stage::as_str)
            .collect();
        assert_eq!(names, ["generate", "sign", "submit", "confirm"]);
    }
}

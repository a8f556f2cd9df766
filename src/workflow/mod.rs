//! Workflow subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig + SecretProvider
//!     → context.rs (WorkflowContext: identities, descriptors, terms)
//!     → orchestrator.rs (balance query, then the four steps in order)
//!         → NodeApi helpers (collection, token)
//!         → marketplace::calls + TransactionSubmitter (list, buy)
//!     → report.rs (typed outcome per step)
//! ```

pub mod context;
pub mod orchestrator;
pub mod report;

pub use context::{ContextError, WorkflowContext};
pub use orchestrator::WorkflowOrchestrator;
pub use report::{Step, StepOutcome, StepReport, WorkflowReport};

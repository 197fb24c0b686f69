// Staffing matrix: the optimization run and the reconciliation views derived from it.

pub mod handlers;
pub mod optimizer;
pub mod prompts;
pub mod reconciler;

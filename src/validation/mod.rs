//! Hook-based record validation.
//!
//! The [`Dispatcher`] walks every loaded file and feeds each record, and the
//! entities nested inside it, to a list of [`Rule`]s. Rules write their
//! findings to a shared [`Report`].

mod context;
mod dispatcher;
mod report;
mod rule;
pub mod rules;

pub use context::Context;
pub use dispatcher::{DispatchError, Dispatcher};
pub use report::{Finding, Report};
pub use rule::{Rule, RuleError, RuleResult};

#[cfg(test)]
mod tests;

use thiserror::Error;

use super::context::Context;
use super::report::Report;
use crate::markup::MarkupError;
use crate::models::{Cell, CellReference, Dialogue, Info, InventoryEntry, LevelledEntry, Record};
use crate::script::ScriptLine;

pub type RuleResult = Result<(), RuleError>;

/// Failure raised by a rule hook.
///
/// Every variant except [`RuleError::Contract`] is recovered by the
/// dispatcher and reported against the record being processed.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("contains malformed markup ({0})")]
    Markup(#[from] MarkupError),

    /// Free-form failure for rules registered outside the default set. The
    /// message becomes the finding text.
    #[error("{0}")]
    Invalid(String),

    #[error("hook contract violated: {0}")]
    Contract(String),
}

/// A stateful check fed by the dispatcher.
///
/// Hooks are called in stream order: `on_record` first, then the record's
/// nested entries, then `on_info` and finally its script lines. `on_end` is
/// called exactly once after the last file.
#[allow(unused_variables)]
pub trait Rule {
    /// Name used in logs and contract violation reports.
    fn name(&self) -> &'static str;

    fn on_record(
        &mut self,
        ctx: &Context<'_>,
        report: &mut Report,
        record: &Record,
        id: &str,
    ) -> RuleResult {
        Ok(())
    }

    fn on_cell_ref(
        &mut self,
        ctx: &Context<'_>,
        report: &mut Report,
        cell: &Cell,
        reference: &CellReference,
        id: &str,
        index: usize,
    ) -> RuleResult {
        Ok(())
    }

    fn on_levelled_entry(
        &mut self,
        ctx: &Context<'_>,
        report: &mut Report,
        record: &Record,
        entry: &LevelledEntry,
        id: &str,
        index: usize,
    ) -> RuleResult {
        Ok(())
    }

    fn on_inventory_entry(
        &mut self,
        ctx: &Context<'_>,
        report: &mut Report,
        record: &Record,
        entry: &InventoryEntry,
        id: &str,
        index: usize,
    ) -> RuleResult {
        Ok(())
    }

    /// `topic` is the most recent dialogue of the current file.
    fn on_info(
        &mut self,
        ctx: &Context<'_>,
        report: &mut Report,
        info: &Info,
        topic: Option<&Dialogue>,
    ) -> RuleResult {
        Ok(())
    }

    /// `owner` is the Script or Info carrying the body. `topic` is only set
    /// for Info owners.
    fn on_script_line(
        &mut self,
        ctx: &Context<'_>,
        report: &mut Report,
        owner: &Record,
        line: &ScriptLine<'_>,
        topic: Option<&Dialogue>,
    ) -> RuleResult {
        Ok(())
    }

    fn on_end(&mut self, ctx: &Context<'_>, report: &mut Report) -> RuleResult {
        Ok(())
    }
}

use crate::defaults::TODO_COMMENT;
use crate::models::{Dialogue, Record};
use crate::script::ScriptLine;
use crate::validation::{Context, Finding, Report, Rule, RuleResult};

/// Flags script comments left behind as work notes.
#[derive(Debug, Default)]
pub struct CommentRule;

impl Rule for CommentRule {
    fn name(&self) -> &'static str {
        "comments"
    }

    fn on_script_line(
        &mut self,
        _ctx: &Context<'_>,
        report: &mut Report,
        owner: &Record,
        line: &ScriptLine<'_>,
        topic: Option<&Dialogue>,
    ) -> RuleResult {
        if line.comment.is_empty() || !TODO_COMMENT.is_match(line.comment) {
            return Ok(());
        }
        let message = format!("contains comment {}", line.comment);
        match (owner, topic) {
            (Record::Info(info), Some(topic)) => {
                report.add("Info", format!("{} in topic {}", info.id, topic.id), message);
            }
            _ => report.push(Finding::about(owner, message)),
        }
        Ok(())
    }
}

use crate::defaults::DOUBLE_SPACES;
use crate::models::{Dialogue, DialogueType, Info};
use crate::validation::{Context, Report, Rule, RuleResult};

/// Typography checks on dialogue text.
#[derive(Debug, Default)]
pub struct DialogueTextRule;

impl Rule for DialogueTextRule {
    fn name(&self) -> &'static str {
        "dialogue"
    }

    fn on_info(
        &mut self,
        _ctx: &Context<'_>,
        report: &mut Report,
        info: &Info,
        topic: Option<&Dialogue>,
    ) -> RuleResult {
        let subject = match topic {
            Some(topic) => format!("{} in topic {}", info.id, topic.id),
            None => info.id.clone(),
        };
        let text = info.text.as_deref().unwrap_or_default();

        if text.is_empty() {
            let dialogue_type = info
                .data
                .dialogue_type
                .or(topic.map(|t| t.dialogue_type))
                .unwrap_or_default();
            if !matches!(dialogue_type, DialogueType::Journal | DialogueType::Voice) {
                report.add("Info", subject, "has no text");
            }
            return Ok(());
        }

        if DOUBLE_SPACES.is_match(text) {
            report.add("Info", subject.as_str(), "contains double spaces");
        }
        if text.contains(" - ") {
            report.add("Info", subject.as_str(), "contains a single hyphen");
        }
        if text.contains("....") {
            report.add("Info", subject.as_str(), "contains an overlong ellipsis");
        }
        Ok(())
    }
}

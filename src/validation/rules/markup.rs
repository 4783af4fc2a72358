use crate::defaults::BOOK_TAGS;
use crate::markup::{self, MarkupVisitor};
use crate::models::Record;
use crate::validation::{Context, Finding, Report, Rule, RuleResult};

/// Checks book text against what the in-game renderer can display.
#[derive(Debug, Default)]
pub struct MarkupRule;

impl MarkupRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MarkupRule {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn on_record(
        &mut self,
        _ctx: &Context<'_>,
        report: &mut Report,
        record: &Record,
        _id: &str,
    ) -> RuleResult {
        let Record::Book(book) = record else {
            return Ok(());
        };
        let Some(text) = book.text.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        let mut visitor = BookVisitor::default();
        markup::tokenize(text, &mut visitor)?;

        for message in visitor.problems {
            report.push(Finding::about(record, message));
        }
        if !visitor.invisible.is_empty() {
            report.push(Finding::about(
                record,
                format!("contains invisible text {}", visitor.invisible),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct BookVisitor<'a> {
    problems: Vec<String>,
    in_img: bool,
    /// Text after the most recent opening tag.
    invisible: &'a str,
}

fn is_known(tag: &str) -> bool {
    BOOK_TAGS.contains(tag.to_ascii_lowercase().as_str())
}

impl<'a> MarkupVisitor<'a> for BookVisitor<'a> {
    fn on_open(&mut self, tag: &'a str) {
        self.invisible = "";
        if !is_known(tag) {
            self.problems
                .push(format!("contains invalid HTML opening tag <{tag}>"));
        }
        self.in_img = tag.eq_ignore_ascii_case("img");
    }

    fn on_attribute(&mut self, name: &'a str, value: &'a str) {
        if self.in_img && name.eq_ignore_ascii_case("src") && value.contains('/') {
            self.problems.push(format!("contains invalid IMG SRC {value}"));
        }
    }

    fn on_text(&mut self, text: &'a str) {
        self.invisible = text.trim();
    }

    fn on_close(&mut self, tag: &'a str) {
        if !is_known(tag) {
            self.problems
                .push(format!("contains invalid HTML closing tag </{tag}>"));
        }
        self.in_img = false;
    }
}

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::context::Context;
use super::report::{Finding, Report};
use super::rule::{Rule, RuleError, RuleResult};
use super::rules::default_rules;
use crate::config::Settings;
use crate::loader::LoadedFile;
use crate::models::{Dialogue, Record};
use crate::script;

#[derive(Error, Debug, Diagnostic)]
pub enum DispatchError {
    #[error("Rule {rule} violated the hook contract: {reason}")]
    #[diagnostic(code(recordlint::dispatch::contract))]
    ContractViolation { rule: &'static str, reason: String },
}

/// Streams records from every file through the registered rules.
pub struct Dispatcher {
    settings: Settings,
    rules: Vec<Box<dyn Rule>>,
}

impl Dispatcher {
    /// A dispatcher with no rules registered.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            rules: Vec::new(),
        }
    }

    /// A dispatcher carrying the standard rule set for `settings`.
    pub fn with_default_rules(settings: Settings) -> Self {
        let rules = default_rules(&settings);
        Self { settings, rules }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Dispatch every record of `files`, in order, then finish every rule.
    ///
    /// Consumes the dispatcher so rule state never leaks into another run.
    pub fn run(self, files: &[LoadedFile]) -> Result<Report, DispatchError> {
        let Dispatcher {
            settings,
            mut rules,
        } = self;
        let mut report = Report::new();
        let mut dispatched = 0usize;

        for (index, file) in files.iter().enumerate() {
            let ctx = Context::new(&settings, &file.path, index + 1 == files.len());
            debug!("Dispatching {} ({} records)", file.path.display(), file.records.len());

            // Infos belong to the latest dialogue of the same file
            let mut topic: Option<&Dialogue> = None;
            for record in &file.records {
                if let Record::Dialogue(dialogue) = record {
                    topic = Some(dialogue);
                }
                dispatch_record(&mut rules, &ctx, &mut report, record, topic)?;
                dispatched += 1;
            }
        }

        let last = files.last().map_or(Path::new(""), |file| file.path.as_path());
        let ctx = Context::new(&settings, last, true);
        for rule in rules.iter_mut() {
            let result = rule.on_end(&ctx, &mut report);
            recover(&**rule, &mut report, result, || {
                Finding::new("Rule", rule.name(), "")
            })?;
        }

        info!(
            "Dispatched {dispatched} records to {} rules: {} findings",
            rules.len(),
            report.len()
        );
        Ok(report)
    }
}

fn dispatch_record(
    rules: &mut [Box<dyn Rule>],
    ctx: &Context<'_>,
    report: &mut Report,
    record: &Record,
    topic: Option<&Dialogue>,
) -> Result<(), DispatchError> {
    let id = record.id().unwrap_or_default().to_lowercase();
    let about = || Finding::about(record, "");
    // A rule that failed is skipped for the rest of this record
    let mut failed = vec![false; rules.len()];

    each_rule(rules, &mut failed, report, about, |rule, report| {
        rule.on_record(ctx, report, record, &id)
    })?;

    match record {
        Record::Cell(cell) => {
            for (index, reference) in cell.references.iter().enumerate() {
                let ref_id = reference.id.to_lowercase();
                each_rule(rules, &mut failed, report, about, |rule, report| {
                    rule.on_cell_ref(ctx, report, cell, reference, &ref_id, index)
                })?;
            }
        }
        Record::LevelledCreature(list) | Record::LevelledItem(list) => {
            for (index, entry) in list.entries.iter().enumerate() {
                let entry_id = entry.id.to_lowercase();
                each_rule(rules, &mut failed, report, about, |rule, report| {
                    rule.on_levelled_entry(ctx, report, record, entry, &entry_id, index)
                })?;
            }
        }
        Record::Container(actor) | Record::Creature(actor) | Record::Npc(actor) => {
            for (index, entry) in actor.inventory.iter().enumerate() {
                let item_id = entry.id.to_lowercase();
                each_rule(rules, &mut failed, report, about, |rule, report| {
                    rule.on_inventory_entry(ctx, report, record, entry, &item_id, index)
                })?;
            }
        }
        _ => {}
    }

    let (body, line_topic) = match record {
        Record::Info(info) => {
            each_rule(rules, &mut failed, report, about, |rule, report| {
                rule.on_info(ctx, report, info, topic)
            })?;
            (info.result.as_deref(), topic)
        }
        Record::Script(script) => (Some(script.text.as_str()), None),
        _ => (None, None),
    };

    if let Some(body) = body {
        for line in script::lines(body) {
            each_rule(rules, &mut failed, report, about, |rule, report| {
                rule.on_script_line(ctx, report, record, &line, line_topic)
            })?;
        }
    }

    Ok(())
}

/// Call `hook` on every rule that has not failed yet, marking new failures.
fn each_rule<F>(
    rules: &mut [Box<dyn Rule>],
    failed: &mut [bool],
    report: &mut Report,
    about: impl Fn() -> Finding,
    mut hook: F,
) -> Result<(), DispatchError>
where
    F: FnMut(&mut Box<dyn Rule>, &mut Report) -> RuleResult,
{
    for (rule, failed) in rules.iter_mut().zip(failed.iter_mut()) {
        if *failed {
            continue;
        }
        let result = hook(rule, report);
        *failed = recover(&**rule, report, result, &about)?;
    }
    Ok(())
}

/// Turn a recoverable hook error into a finding; contract violations abort.
///
/// Returns whether an error was recovered.
fn recover(
    rule: &dyn Rule,
    report: &mut Report,
    result: RuleResult,
    about: impl FnOnce() -> Finding,
) -> Result<bool, DispatchError> {
    match result {
        Ok(()) => Ok(false),
        Err(RuleError::Contract(reason)) => Err(DispatchError::ContractViolation {
            rule: rule.name(),
            reason,
        }),
        Err(error) => {
            let mut finding = about();
            finding.message = error.to_string();
            warn!(rule = rule.name(), "{finding}");
            report.push(finding);
            Ok(true)
        }
    }
}

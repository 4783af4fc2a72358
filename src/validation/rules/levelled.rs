use std::collections::HashMap;

use crate::models::{LevelledEntry, LevelledList, Record, RecordKind};
use crate::validation::{Context, Finding, Report, Rule, RuleResult};

const FLAG_ALL_LEVELS_CREATURE: u32 = 0x1;
const FLAG_ALL_LEVELS_ITEM: u32 = 0x2;

#[derive(Debug)]
struct PendingEntry {
    kind: RecordKind,
    list: String,
    entry: String,
    id: String,
    level: u16,
}

/// Levelled list sanity: level calculation flags and nested lists that
/// cannot produce anything at the level they are listed at.
#[derive(Debug, Default)]
pub struct LevelledListRule {
    minimum_levels: HashMap<String, u16>,
    pending: Vec<PendingEntry>,
}

fn all_levels_flag(kind: RecordKind) -> u32 {
    if kind == RecordKind::LevelledCreature {
        FLAG_ALL_LEVELS_CREATURE
    } else {
        FLAG_ALL_LEVELS_ITEM
    }
}

fn levelled_list(record: &Record) -> Option<&LevelledList> {
    match record {
        Record::LevelledCreature(list) | Record::LevelledItem(list) => Some(list),
        _ => None,
    }
}

impl Rule for LevelledListRule {
    fn name(&self) -> &'static str {
        "levelled"
    }

    fn on_record(
        &mut self,
        _ctx: &Context<'_>,
        report: &mut Report,
        record: &Record,
        id: &str,
    ) -> RuleResult {
        let Some(list) = levelled_list(record) else {
            return Ok(());
        };

        if list.list_flags & all_levels_flag(record.kind()) == 0
            && let Some((first, rest)) = list.entries.split_first()
            && rest.iter().any(|entry| entry.level != first.level)
        {
            report.push(Finding::about(record, "is not calculated for all levels"));
        }

        if let Some(first) = list.entries.first() {
            self.minimum_levels.insert(id.to_string(), first.level);
        }
        Ok(())
    }

    fn on_levelled_entry(
        &mut self,
        _ctx: &Context<'_>,
        _report: &mut Report,
        record: &Record,
        entry: &LevelledEntry,
        id: &str,
        _index: usize,
    ) -> RuleResult {
        self.pending.push(PendingEntry {
            kind: record.kind(),
            list: record.id().unwrap_or_default().to_string(),
            entry: entry.id.clone(),
            id: id.to_string(),
            level: entry.level,
        });
        Ok(())
    }

    fn on_end(&mut self, _ctx: &Context<'_>, report: &mut Report) -> RuleResult {
        for pending in &self.pending {
            let Some(&minimum) = self.minimum_levels.get(&pending.id) else {
                continue;
            };
            if minimum > pending.level {
                report.add(
                    pending.kind,
                    pending.list.as_str(),
                    format!(
                        "contains {} at level {} which will not resolve to anything at that level",
                        pending.entry, pending.level
                    ),
                );
            }
        }
        Ok(())
    }
}

//! Orphan detection across the whole override chain.
//!
//! Declarations and usages are gathered independently while records stream
//! past. Only once every file has been dispatched does `on_end` subtract the
//! used identifiers from the declared ones, so a usage in a later file clears
//! a declaration from an earlier one and the other way around.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{
    CellReference, Dialogue, Info, InventoryEntry, LevelledEntry, Mode, QuestState, Record,
    RecordKind,
};
use crate::script::{ScriptEvent, ScriptLine, tokenize_line};
use crate::validation::{Context, Report, Rule, RuleError, RuleResult};

#[derive(Debug, Clone, PartialEq, Eq)]
struct JournalTopic {
    id: String,
    indices: BTreeSet<i32>,
}

/// Reports scripts, enchantments, objects and journal entries that nothing
/// refers to. All maps are keyed by lower-cased id.
#[derive(Debug, Default)]
pub struct ReachabilityTracker {
    declared_scripts: BTreeMap<String, String>,
    declared_enchantments: BTreeMap<String, String>,
    declared_objects: BTreeMap<String, (RecordKind, String)>,
    declared_journals: BTreeMap<String, JournalTopic>,
    used_scripts: HashSet<String>,
    used_enchantments: HashSet<String>,
    used_objects: HashSet<String>,
    used_journal_indices: HashMap<String, HashSet<i32>>,
    finished: bool,
}

impl ReachabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self, hook: &str) -> RuleResult {
        if self.finished {
            return Err(RuleError::Contract(format!("{hook} called after on_end")));
        }
        Ok(())
    }

    fn declare(&mut self, record: &Record, id: &str) {
        let Some(display) = record.id() else {
            return;
        };
        let kind = record.kind();
        match record {
            Record::Script(_) => {
                self.declared_scripts.insert(id.to_string(), display.to_string());
            }
            Record::Enchantment(_) => {
                self.declared_enchantments
                    .insert(id.to_string(), display.to_string());
            }
            Record::Dialogue(dialogue) if dialogue.is_journal() => {
                self.declared_journals
                    .entry(id.to_string())
                    .or_insert_with(|| JournalTopic {
                        id: display.to_string(),
                        indices: BTreeSet::new(),
                    });
            }
            _ if kind.is_placeable() => {
                self.declared_objects
                    .insert(id.to_string(), (kind, display.to_string()));
            }
            _ => {}
        }
    }

    fn apply(&mut self, event: ScriptEvent) {
        match event {
            ScriptEvent::ScriptStarted(id) => {
                self.used_scripts.insert(id);
            }
            ScriptEvent::ResourceUsed(id) => {
                self.used_objects.insert(id);
            }
            ScriptEvent::JournalIndexUsed { topic, index } => {
                self.used_journal_indices
                    .entry(topic)
                    .or_default()
                    .insert(index);
            }
        }
    }
}

impl Rule for ReachabilityTracker {
    fn name(&self) -> &'static str {
        "reachability"
    }

    fn on_record(
        &mut self,
        ctx: &Context<'_>,
        _report: &mut Report,
        record: &Record,
        id: &str,
    ) -> RuleResult {
        self.ensure_open("on_record")?;
        if ctx.mode() == Some(Mode::TD) {
            return Ok(());
        }

        self.declare(record, id);
        if let Some(script) = record.script() {
            self.used_scripts.insert(script.to_lowercase());
        }
        if let Some(enchantment) = record.enchanting() {
            self.used_enchantments.insert(enchantment.to_lowercase());
        }
        Ok(())
    }

    fn on_cell_ref(
        &mut self,
        _ctx: &Context<'_>,
        _report: &mut Report,
        _cell: &crate::models::Cell,
        reference: &CellReference,
        id: &str,
        _index: usize,
    ) -> RuleResult {
        self.ensure_open("on_cell_ref")?;
        if !reference.is_deleted() {
            self.used_objects.insert(id.to_string());
        }
        Ok(())
    }

    fn on_levelled_entry(
        &mut self,
        _ctx: &Context<'_>,
        _report: &mut Report,
        _record: &Record,
        _entry: &LevelledEntry,
        id: &str,
        _index: usize,
    ) -> RuleResult {
        self.ensure_open("on_levelled_entry")?;
        self.used_objects.insert(id.to_string());
        Ok(())
    }

    fn on_inventory_entry(
        &mut self,
        _ctx: &Context<'_>,
        _report: &mut Report,
        _record: &Record,
        _entry: &InventoryEntry,
        id: &str,
        _index: usize,
    ) -> RuleResult {
        self.ensure_open("on_inventory_entry")?;
        self.used_objects.insert(id.to_string());
        Ok(())
    }

    fn on_info(
        &mut self,
        _ctx: &Context<'_>,
        _report: &mut Report,
        info: &Info,
        topic: Option<&Dialogue>,
    ) -> RuleResult {
        self.ensure_open("on_info")?;
        let Some(topic) = topic.filter(|t| t.is_journal()) else {
            return Ok(());
        };
        if info.quest_state == Some(QuestState::Name) {
            return Ok(());
        }
        // Undeclared topics stay untracked, which is always the case in TD mode
        if let Some(journal) = self.declared_journals.get_mut(&topic.id.to_lowercase()) {
            journal.indices.insert(info.data.disposition);
        }
        Ok(())
    }

    fn on_script_line(
        &mut self,
        _ctx: &Context<'_>,
        _report: &mut Report,
        _owner: &Record,
        line: &ScriptLine<'_>,
        _topic: Option<&Dialogue>,
    ) -> RuleResult {
        self.ensure_open("on_script_line")?;
        if let Some(event) = tokenize_line(&line.code) {
            self.apply(event);
        }
        Ok(())
    }

    fn on_end(&mut self, _ctx: &Context<'_>, report: &mut Report) -> RuleResult {
        self.ensure_open("on_end")?;
        self.finished = true;

        for (id, display) in &self.declared_scripts {
            if !self.used_scripts.contains(id) {
                report.add("Script", display.as_str(), "is never started");
            }
        }
        for (id, display) in &self.declared_enchantments {
            if !self.used_enchantments.contains(id) {
                report.add("Enchantment", display.as_str(), "is not used");
            }
        }
        for (id, (kind, display)) in &self.declared_objects {
            if !self.used_objects.contains(id) {
                report.add(kind, display.as_str(), "is not used");
            }
        }
        for (id, journal) in &self.declared_journals {
            match self.used_journal_indices.get(id) {
                None => report.add("Journal", journal.id.as_str(), "is not used"),
                Some(used) => {
                    for index in journal.indices.iter().filter(|i| !used.contains(*i)) {
                        report.add(
                            "Journal",
                            journal.id.as_str(),
                            format!("has unused index {index}"),
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

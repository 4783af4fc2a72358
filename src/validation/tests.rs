use super::*;
use crate::config::Settings;
use crate::loader::LoadedFile;
use crate::models::{
    Cell, CellReference, Dialogue, Info, InventoryEntry, LevelledEntry, Mode, Record,
};
use crate::script::ScriptLine;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every hook call as a line of text.
struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }

    fn push(&self, line: String) {
        self.log.borrow_mut().push(line);
    }
}

impl Rule for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn on_record(&mut self, ctx: &Context<'_>, _: &mut Report, record: &Record, id: &str) -> RuleResult {
        self.push(format!(
            "record {} {id} last={} mode={:?}",
            record.kind(),
            ctx.is_last,
            ctx.mode()
        ));
        Ok(())
    }

    fn on_cell_ref(
        &mut self,
        _: &Context<'_>,
        _: &mut Report,
        cell: &Cell,
        _: &CellReference,
        id: &str,
        index: usize,
    ) -> RuleResult {
        self.push(format!("ref {} {id} {index}", cell.id));
        Ok(())
    }

    fn on_levelled_entry(
        &mut self,
        _: &Context<'_>,
        _: &mut Report,
        _: &Record,
        entry: &LevelledEntry,
        id: &str,
        index: usize,
    ) -> RuleResult {
        self.push(format!("levelled {id} {} {index}", entry.level));
        Ok(())
    }

    fn on_inventory_entry(
        &mut self,
        _: &Context<'_>,
        _: &mut Report,
        _: &Record,
        entry: &InventoryEntry,
        id: &str,
        index: usize,
    ) -> RuleResult {
        self.push(format!("inventory {id} {} {index}", entry.count));
        Ok(())
    }

    fn on_info(
        &mut self,
        _: &Context<'_>,
        _: &mut Report,
        info: &Info,
        topic: Option<&Dialogue>,
    ) -> RuleResult {
        self.push(format!(
            "info {} topic={}",
            info.id,
            topic.map_or("-", |t| t.id.as_str())
        ));
        Ok(())
    }

    fn on_script_line(
        &mut self,
        _: &Context<'_>,
        _: &mut Report,
        owner: &Record,
        line: &ScriptLine<'_>,
        topic: Option<&Dialogue>,
    ) -> RuleResult {
        self.push(format!(
            "line {} [{}] [{}] topic={}",
            owner.id().unwrap_or_default(),
            line.code,
            line.comment,
            topic.map_or("-", |t| t.id.as_str())
        ));
        Ok(())
    }

    fn on_end(&mut self, ctx: &Context<'_>, _: &mut Report) -> RuleResult {
        self.push(format!("end {}", ctx.file.display()));
        Ok(())
    }
}

fn file(name: &str, json: &str) -> LoadedFile {
    LoadedFile::new(name, serde_json::from_str(json).unwrap())
}

#[test]
fn test_hook_order_within_and_across_files() {
    let (recorder, log) = Recorder::new();
    let mut dispatcher = Dispatcher::new(Settings::default().with_mode(Mode::PT));
    dispatcher.register(Box::new(recorder));

    let files = [
        file(
            "base.json",
            r#"[
                {"type": "Header"},
                {"type": "Cell", "id": "Vault", "data": {"flags": 1}, "references": [{"id": "Chest"}, {"id": "Rat"}]},
                {"type": "Container", "id": "Chest", "inventory": [[2, "Gold_001"]]},
                {"type": "LevelledItem", "id": "li_loot", "entries": [["Gold_001", 1], ["ring", 4]]},
                {"type": "Script", "id": "Trap", "text": "Begin Trap\n\nPlaceAtMe Rat 1 ; spawn\nEnd"}
            ]"#,
        ),
        file(
            "patch.json",
            r#"[
                {"type": "Dialogue", "id": "Rumors"},
                {"type": "Info", "id": "100", "text": "Heard?", "result": "Journal MQ 10"}
            ]"#,
        ),
    ];

    let report = dispatcher.run(&files).unwrap();
    assert!(report.is_empty());

    let log = log.borrow();
    assert_eq!(
        *log,
        vec![
            "record Header  last=false mode=Some(PT)",
            "record Cell vault last=false mode=Some(PT)",
            "ref Vault chest 0",
            "ref Vault rat 1",
            "record Container chest last=false mode=Some(PT)",
            "inventory gold_001 2 0",
            "record LevelledItem li_loot last=false mode=Some(PT)",
            "levelled gold_001 1 0",
            "levelled ring 4 1",
            "record Script trap last=false mode=Some(PT)",
            "line Trap [begin trap] [] topic=-",
            "line Trap [placeatme rat 1] [spawn] topic=-",
            "line Trap [end] [] topic=-",
            "record Dialogue rumors last=true mode=Some(PT)",
            "record Info 100 last=true mode=Some(PT)",
            "info 100 topic=Rumors",
            "line 100 [journal mq 10] [] topic=Rumors",
            "end patch.json",
        ]
    );
}

#[test]
fn test_topic_is_reset_for_each_file() {
    let (recorder, log) = Recorder::new();
    let mut dispatcher = Dispatcher::new(Settings::default());
    dispatcher.register(Box::new(recorder));

    let files = [
        file(
            "a.json",
            r#"[
                {"type": "Dialogue", "id": "First"},
                {"type": "Info", "id": "1"},
                {"type": "Dialogue", "id": "Second"},
                {"type": "Info", "id": "2"}
            ]"#,
        ),
        file("b.json", r#"[{"type": "Info", "id": "3"}]"#),
    ];
    dispatcher.run(&files).unwrap();

    let infos: Vec<String> = log
        .borrow()
        .iter()
        .filter(|line| line.starts_with("info"))
        .cloned()
        .collect();
    assert_eq!(
        infos,
        vec!["info 1 topic=First", "info 2 topic=Second", "info 3 topic=-"]
    );
}

/// Fails on every book and counts how often it was called.
struct Fussy {
    calls: Rc<RefCell<usize>>,
}

impl Rule for Fussy {
    fn name(&self) -> &'static str {
        "fussy"
    }

    fn on_record(&mut self, _: &Context<'_>, report: &mut Report, record: &Record, _: &str) -> RuleResult {
        *self.calls.borrow_mut() += 1;
        if let Record::Book(book) = record {
            return Err(RuleError::Invalid(format!("cannot read {}", book.id)));
        }
        report.add(record.kind(), record.id().unwrap_or_default(), "was seen");
        Ok(())
    }
}

#[test]
fn test_rule_errors_become_findings() {
    let calls = Rc::new(RefCell::new(0));
    let (recorder, log) = Recorder::new();
    let mut dispatcher = Dispatcher::new(Settings::default());
    dispatcher
        .register(Box::new(Fussy {
            calls: calls.clone(),
        }))
        .register(Box::new(recorder));

    let files = [file(
        "a.json",
        r#"[
            {"type": "Book", "id": "bk_a"},
            {"type": "Static", "id": "rock"}
        ]"#,
    )];
    let report = dispatcher.run(&files).unwrap();

    assert_eq!(
        report.lines(),
        vec!["Book bk_a cannot read bk_a", "Static rock was seen"]
    );
    assert_eq!(*calls.borrow(), 2);
    // Later rules still see the failing record
    assert!(log.borrow().iter().any(|line| line == "record Book bk_a last=true mode=None"));
}

/// Fails on every script line and cell reference it is handed.
struct Brittle {
    calls: Rc<RefCell<usize>>,
}

impl Rule for Brittle {
    fn name(&self) -> &'static str {
        "brittle"
    }

    fn on_cell_ref(
        &mut self,
        _: &Context<'_>,
        _: &mut Report,
        _: &Cell,
        _: &CellReference,
        id: &str,
        _: usize,
    ) -> RuleResult {
        *self.calls.borrow_mut() += 1;
        Err(RuleError::Invalid(format!("cannot place {id}")))
    }

    fn on_script_line(
        &mut self,
        _: &Context<'_>,
        _: &mut Report,
        _: &Record,
        line: &ScriptLine<'_>,
        _: Option<&Dialogue>,
    ) -> RuleResult {
        *self.calls.borrow_mut() += 1;
        Err(RuleError::Invalid(format!("cannot read {}", line.code)))
    }
}

#[test]
fn test_failed_rule_is_skipped_for_rest_of_record() {
    let calls = Rc::new(RefCell::new(0));
    let (recorder, log) = Recorder::new();
    let mut dispatcher = Dispatcher::new(Settings::default());
    dispatcher
        .register(Box::new(Brittle {
            calls: calls.clone(),
        }))
        .register(Box::new(recorder));

    let files = [file(
        "a.json",
        r#"[
            {"type": "Script", "id": "S", "text": "begin s\nset a to 1\nend"},
            {"type": "Cell", "id": "Vault", "data": {"flags": 1}, "references": [{"id": "Chest"}, {"id": "Rat"}]},
            {"type": "Script", "id": "T", "text": "begin t\nend"}
        ]"#,
    )];
    let report = dispatcher.run(&files).unwrap();

    assert_eq!(
        report.lines(),
        vec![
            "Script S cannot read begin s",
            "Cell Vault cannot place chest",
            "Script T cannot read begin t",
        ]
    );
    assert_eq!(*calls.borrow(), 3);
    // Other rules keep receiving every sub-entity
    let log = log.borrow();
    assert_eq!(log.iter().filter(|line| line.starts_with("line S")).count(), 3);
    assert_eq!(log.iter().filter(|line| line.starts_with("ref Vault")).count(), 2);
}

#[test]
fn test_malformed_book_does_not_stop_other_rules() {
    let settings = Settings::default();
    let dispatcher = Dispatcher::with_default_rules(settings);
    let files = [file(
        "a.json",
        r#"[
            {"type": "Book", "id": "bk_broken", "text": "<div>oops</p>"},
            {"type": "Book", "id": "bk_fine", "text": "<div>fine</div><br>"},
            {"type": "Cell", "id": "Library", "data": {"flags": 1}, "references": [{"id": "bk_broken"}, {"id": "bk_fine"}]}
        ]"#,
    )];

    let report = dispatcher.run(&files).unwrap();
    assert_eq!(
        report.lines(),
        vec!["Book bk_broken contains malformed markup (Unexpected </p> expected </div> at index 12)"]
    );
}

#[test]
fn test_default_rules_respect_settings() {
    let names = Dispatcher::with_default_rules(Settings::default()).rule_names();
    assert!(!names.contains(&"population"));
    assert_eq!(names.last(), Some(&"reachability"));

    let settings = Settings {
        min_inhabitants: Some(3),
        ..Settings::default()
    };
    let names = Dispatcher::with_default_rules(settings).rule_names();
    assert!(names.contains(&"population"));

    let settings = Settings {
        similar_names: true,
        ..Settings::default()
    };
    assert_eq!(Dispatcher::with_default_rules(settings).rule_names(), vec!["names"]);
}

#[test]
fn test_identical_runs_give_identical_reports() {
    let json = r#"[
        {"type": "Script", "id": "Orphan", "text": "; todo: wire up"},
        {"type": "Enchantment", "id": "glyph"},
        {"type": "Dialogue", "id": "MQ", "dialogue_type": "Journal"},
        {"type": "Info", "id": "1", "text": "", "data": {"disposition": 10}},
        {"type": "Weapon", "id": "blade"},
        {"type": "Static", "id": "rock"}
    ]"#;
    let run = || {
        Dispatcher::with_default_rules(Settings::default())
            .run(&[file("a.json", json)])
            .unwrap()
    };

    let first = run();
    assert_eq!(
        first.lines(),
        vec![
            "Script Orphan contains comment todo: wire up",
            "Script Orphan is never started",
            "Enchantment glyph is not used",
            "Weapon blade is not used",
            "Static rock is not used",
            "Journal MQ is not used",
        ]
    );
    assert_eq!(run(), first);
}

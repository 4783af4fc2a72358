use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A reference to another record extracted from one script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    ScriptStarted(String),
    ResourceUsed(String),
    JournalIndexUsed { topic: String, index: i32 },
}

// Every shape may be preceded by a remote call, `<expr> ->`.
static START_SCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([,\s]*|.*?->[,\s]*)startscript[,\s]+("[^"]+"|[^,\s]+)[,\s]*$"#)
        .expect("valid startscript pattern")
});

static FIRST_ARGUMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^([,\s]*|.*?->[,\s]*)(placeatme|addsoulgem|additem|equip|drop|placeatpc|placeitemcell|placeitem)[,\s]+(?:("[^"]+"?)(?:.*)|([^,\s"]+)(?:[,\s]+|$))"#,
    )
    .expect("valid placement pattern")
});

static JOURNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^([,\s]*|.*?->[,\s]*)(journal|setjournalindex)[,\s]+(?:("[^"]+"?)|([^,\s"]+))[,\s]+(\d+)"#,
    )
    .expect("valid journal pattern")
});

static SECOND_ARGUMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^([,\s]*|.*?->[,\s]*)(addtolevcreature|addtolevitem)[,\s]+("[^"]+"|[^,\s]+)[,\s]+("[^"]+"|[^,\s]+)([,\s]+|$)"#,
    )
    .expect("valid levelled list pattern")
});

/// Recognise the command on a comment-stripped, lower-cased line.
///
/// Shapes are tried in a fixed order and the first match wins. Lines that
/// match none of them yield `None`.
pub fn tokenize_line(line: &str) -> Option<ScriptEvent> {
    if line.is_empty() {
        return None;
    }
    if let Some(captures) = START_SCRIPT.captures(line) {
        return Some(ScriptEvent::ScriptStarted(unquote(&captures[2])));
    }
    if let Some(captures) = FIRST_ARGUMENT.captures(line) {
        return either_argument(&captures, 3, 4).map(ScriptEvent::ResourceUsed);
    }
    if let Some(captures) = JOURNAL.captures(line) {
        let topic = either_argument(&captures, 3, 4)?;
        let index = captures[5].parse().ok()?;
        return Some(ScriptEvent::JournalIndexUsed { topic, index });
    }
    if let Some(captures) = SECOND_ARGUMENT.captures(line) {
        return Some(ScriptEvent::ResourceUsed(unquote(&captures[4])));
    }
    None
}

fn either_argument(captures: &Captures<'_>, quoted: usize, bare: usize) -> Option<String> {
    if let Some(value) = captures.get(quoted) {
        Some(unquote(value.as_str()))
    } else {
        captures.get(bare).map(|value| value.as_str().to_string())
    }
}

fn unquote(value: &str) -> String {
    value.replace('"', "")
}

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Tags the in-game book renderer understands, lower-cased.
pub static BOOK_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["div", "font", "br", "p", "img", "b"].into_iter().collect());

/// Comments that mark unfinished work.
pub static TODO_COMMENT: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"(^(todo|fixme|fillmein|to do|fix me|fill me in))|(^|\s)merge")
        .case_insensitive(true)
        .build()
        .expect("Failed to compile todo pattern - this is a bug")
});

/// Runs of two or more spaces or tabs, not counting line breaks.
pub static DOUBLE_SPACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\S\r\n]{2,}").expect("Failed to compile double space pattern - this is a bug")
});

use std::path::Path;

use crate::config::Settings;
use crate::models::Mode;

/// Per-call view of the run handed to every hook.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub settings: &'a Settings,
    /// File currently being dispatched. During `on_end` this is the last file.
    pub file: &'a Path,
    /// Whether `file` is the last layer of the override chain.
    pub is_last: bool,
}

impl<'a> Context<'a> {
    pub fn new(settings: &'a Settings, file: &'a Path, is_last: bool) -> Self {
        Self {
            settings,
            file,
            is_last,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.settings.mode
    }
}

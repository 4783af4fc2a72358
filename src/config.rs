use crate::models::Mode;

/// Run-wide settings collected from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Project the records belong to, if any.
    pub mode: Option<Mode>,
    /// Minimum number of inhabitants an interior cell needs. `None` disables
    /// the population check.
    pub min_inhabitants: Option<usize>,
    /// Squared distance under which two identical references count as
    /// duplicates. Zero only matches exact positions.
    pub duplicate_threshold: f32,
    /// Report similar NPC names instead of running the standard checks.
    pub similar_names: bool,
}

impl Settings {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }
}

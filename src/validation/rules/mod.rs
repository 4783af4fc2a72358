//! The rule set run over every record stream.

mod comments;
mod dialogue;
mod duplicates;
mod levelled;
mod markup;
mod names;
mod population;
mod reachability;

pub use comments::CommentRule;
pub use dialogue::DialogueTextRule;
pub use duplicates::DuplicateReferenceRule;
pub use levelled::LevelledListRule;
pub use markup::MarkupRule;
pub use names::SimilarNameRule;
pub use population::PopulationRule;
pub use reachability::ReachabilityTracker;

use super::Rule;
use crate::config::Settings;

/// Fresh instances of every rule enabled by `settings`, in dispatch order.
pub fn default_rules(settings: &Settings) -> Vec<Box<dyn Rule>> {
    if settings.similar_names {
        return vec![Box::new(SimilarNameRule::default())];
    }

    let mut rules: Vec<Box<dyn Rule>> = vec![
        Box::new(MarkupRule::new()),
        Box::new(CommentRule),
        Box::new(DialogueTextRule),
        Box::new(DuplicateReferenceRule::new(settings.duplicate_threshold)),
        Box::new(LevelledListRule::default()),
    ];
    if let Some(min_inhabitants) = settings.min_inhabitants {
        rules.push(Box::new(PopulationRule::new(min_inhabitants)));
    }
    rules.push(Box::new(ReachabilityTracker::new()));
    rules
}

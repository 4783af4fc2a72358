use levenshtein::levenshtein;

use crate::models::Record;
use crate::validation::{Context, Finding, Report, Rule, RuleResult};

/// One edit is tolerated per this many characters of a name.
const DISTANCE_DIV: f32 = 7.0;

#[derive(Debug)]
struct SeenName {
    lower: String,
    id: String,
    name: String,
}

/// NPCs whose name is a few edits away from an earlier NPC's name.
///
/// Identical names are not reported. Short names that would tolerate no edits
/// are neither checked nor remembered.
#[derive(Debug, Default)]
pub struct SimilarNameRule {
    seen: Vec<SeenName>,
}

impl Rule for SimilarNameRule {
    fn name(&self) -> &'static str {
        "names"
    }

    fn on_record(
        &mut self,
        _ctx: &Context<'_>,
        report: &mut Report,
        record: &Record,
        _id: &str,
    ) -> RuleResult {
        let Record::Npc(npc) = record else {
            return Ok(());
        };
        let Some(name) = npc.name.as_deref().filter(|name| !name.is_empty()) else {
            return Ok(());
        };

        let max_distance = (name.chars().count() as f32 / DISTANCE_DIV).round() as usize;
        if max_distance < 1 {
            return Ok(());
        }

        let lower = name.to_lowercase();
        let similar = self
            .seen
            .iter()
            .filter(|other| other.lower != lower)
            .find_map(|other| {
                let distance = levenshtein(&lower, &other.lower);
                (distance <= max_distance).then_some((other, distance))
            });
        if let Some((other, distance)) = similar {
            report.push(Finding::about(
                record,
                format!(
                    "({name}) has a name similar to {} ({}) {distance}",
                    other.id, other.name
                ),
            ));
        }

        self.seen.push(SeenName {
            lower,
            id: npc.id.clone(),
            name: name.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::loader::LoadedFile;
    use crate::validation::Dispatcher;

    fn run(json: &str) -> Vec<String> {
        let records = serde_json::from_str(json).unwrap();
        let mut dispatcher = Dispatcher::new(Settings::default());
        dispatcher.register(Box::new(SimilarNameRule::default()));
        dispatcher
            .run(&[LoadedFile::new("a.json", records)])
            .unwrap()
            .lines()
    }

    #[test]
    fn test_similar_names_are_reported_against_earlier_npcs() {
        let lines = run(r#"[
            {"type": "Npc", "id": "fargoth", "name": "Fargoth"},
            {"type": "Npc", "id": "fargoth_double", "name": "FARGOTH"},
            {"type": "Creature", "id": "fargot_rat", "name": "Fargot"},
            {"type": "Npc", "id": "impostor", "name": "Fargot"},
            {"type": "Npc", "id": "caius", "name": "Caius Cosades"}
        ]"#);

        assert_eq!(
            lines,
            vec!["Npc impostor (Fargot) has a name similar to fargoth (Fargoth) 1"]
        );
    }

    #[test]
    fn test_short_names_are_ignored() {
        let lines = run(r#"[
            {"type": "Npc", "id": "a", "name": "Bo"},
            {"type": "Npc", "id": "b", "name": "Jo"},
            {"type": "Npc", "id": "c"}
        ]"#);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_longer_names_tolerate_more_edits() {
        // 14 characters allow two edits
        let lines = run(r#"[
            {"type": "Npc", "id": "one", "name": "Ajira Ashfalls"},
            {"type": "Npc", "id": "two", "name": "Ajiro Ashfells"}
        ]"#);
        assert_eq!(
            lines,
            vec!["Npc two (Ajiro Ashfells) has a name similar to one (Ajira Ashfalls) 2"]
        );
    }
}

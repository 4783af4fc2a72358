use crate::models::{Cell, CellReference};
use crate::validation::{Context, Report, Rule, RuleResult};

/// Finds identical objects stacked on top of each other in one cell.
#[derive(Debug)]
pub struct DuplicateReferenceRule {
    threshold: f32,
}

impl DuplicateReferenceRule {
    /// `threshold` is a squared distance; negative values count as zero.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(0.0),
        }
    }

    fn same_position(&self, a: [f32; 3], b: [f32; 3]) -> bool {
        if self.threshold == 0.0 {
            return a == b;
        }
        let distance: f32 = a.iter().zip(b).map(|(a, b)| (a - b) * (a - b)).sum();
        distance <= self.threshold
    }

    fn is_duplicate(&self, a: &CellReference, b: &CellReference) -> bool {
        a.id.eq_ignore_ascii_case(&b.id)
            && a.rotation == b.rotation
            && a.scale.unwrap_or(1.0) == b.scale.unwrap_or(1.0)
            && self.same_position(a.translation, b.translation)
    }
}

impl Rule for DuplicateReferenceRule {
    fn name(&self) -> &'static str {
        "duplicates"
    }

    fn on_cell_ref(
        &mut self,
        _ctx: &Context<'_>,
        report: &mut Report,
        cell: &Cell,
        reference: &CellReference,
        _id: &str,
        index: usize,
    ) -> RuleResult {
        if reference.is_deleted() {
            return Ok(());
        }
        for other in cell.references.iter().skip(index + 1) {
            if !other.is_deleted() && self.is_duplicate(reference, other) {
                report.add(
                    "Cell",
                    cell.display_name(),
                    format!(
                        "contains duplicate reference {} at position {:?} {:?}",
                        reference.id, reference.translation, other.translation
                    ),
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::loader::LoadedFile;
    use crate::validation::Dispatcher;

    fn run(threshold: f32, references: &str) -> Vec<String> {
        let json = format!(
            r#"[{{"type": "Cell", "id": "Balmora, Guild", "data": {{"flags": 1}}, "references": {references}}}]"#
        );
        let mut dispatcher = Dispatcher::new(Settings::default());
        dispatcher.register(Box::new(DuplicateReferenceRule::new(threshold)));
        dispatcher
            .run(&[LoadedFile::new("a.json", serde_json::from_str(&json).unwrap())])
            .unwrap()
            .lines()
    }

    #[test]
    fn test_exact_duplicates() {
        let lines = run(
            0.0,
            r#"[
                {"id": "barrel_01", "translation": [1, 2, 3]},
                {"id": "Barrel_01", "translation": [1, 2, 3], "scale": 1.0},
                {"id": "barrel_01", "translation": [1, 2, 4]}
            ]"#,
        );
        assert_eq!(
            lines,
            vec![
                "Cell Balmora, Guild contains duplicate reference barrel_01 at position [1.0, 2.0, 3.0] [1.0, 2.0, 3.0]"
            ]
        );
    }

    #[test]
    fn test_threshold_and_differences() {
        let references = r#"[
            {"id": "crate", "translation": [0, 0, 0]},
            {"id": "crate", "translation": [1, 0, 0]},
            {"id": "crate", "translation": [0, 0, 0], "rotation": [0, 0, 1]},
            {"id": "crate", "translation": [0, 0, 0], "scale": 2.0},
            {"id": "crate", "translation": [0, 0, 0], "deleted": true}
        ]"#;
        assert!(run(0.0, references).is_empty());
        assert_eq!(run(1.5, references).len(), 1);
    }
}

use std::collections::HashSet;

use crate::models::Record;
use crate::validation::{Context, Report, Rule, RuleResult};

#[derive(Debug)]
struct CheckedCell {
    id: String,
    name: String,
}

/// Interior cells of the last file that feel empty or cannot be navigated.
///
/// Inhabitants must be declared before the cells that place them.
#[derive(Debug)]
pub struct PopulationRule {
    min_inhabitants: usize,
    inhabitants: HashSet<String>,
    path_grids: HashSet<String>,
    cells: Vec<CheckedCell>,
}

impl PopulationRule {
    pub fn new(min_inhabitants: usize) -> Self {
        Self {
            min_inhabitants,
            inhabitants: HashSet::new(),
            path_grids: HashSet::new(),
            cells: Vec::new(),
        }
    }
}

impl Rule for PopulationRule {
    fn name(&self) -> &'static str {
        "population"
    }

    fn on_record(
        &mut self,
        ctx: &Context<'_>,
        report: &mut Report,
        record: &Record,
        id: &str,
    ) -> RuleResult {
        match record {
            Record::PathGrid(grid) => {
                if let Some(cell) = &grid.cell {
                    self.path_grids.insert(cell.to_lowercase());
                }
            }
            Record::LevelledCreature(_) => {
                self.inhabitants.insert(id.to_string());
            }
            Record::Creature(actor) | Record::Npc(actor) if !actor.is_dead() => {
                self.inhabitants.insert(id.to_string());
            }
            Record::Cell(cell)
                if ctx.is_last && cell.is_interior() && cell.references.len() > 1 =>
            {
                let name = cell.display_name();
                let count = cell
                    .references
                    .iter()
                    .filter(|r| !r.is_deleted() && self.inhabitants.contains(&r.id.to_lowercase()))
                    .count();
                if count < self.min_inhabitants {
                    report.add(
                        "Cell",
                        name.as_str(),
                        format!("contains {count} NPCs or creatures"),
                    );
                }
                self.cells.push(CheckedCell {
                    id: id.to_string(),
                    name,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn on_end(&mut self, _ctx: &Context<'_>, report: &mut Report) -> RuleResult {
        for cell in &self.cells {
            if !self.path_grids.contains(&cell.id) {
                report.add("Cell", cell.name.as_str(), "is missing a path grid");
            }
        }
        Ok(())
    }
}

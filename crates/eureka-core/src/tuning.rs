//! Parameter sweep for the external tuning harness.
//!
//! The harness replays one battle per combination; this module only
//! enumerates combinations and keeps the best-scoring one.

use crate::params::ParameterTable;

/// Iterator over every combination of the range parameters of a table.
///
/// Constants keep their value. Combinations are produced with the first
/// range parameter (in name order) varying fastest.
pub struct ParameterGrid {
    base: ParameterTable,
    names: Vec<String>,
    values: Vec<Vec<f64>>,
    cursor: Option<Vec<usize>>,
}

impl ParameterGrid {
    pub fn new(base: &ParameterTable) -> Self {
        let (names, values): (Vec<String>, Vec<Vec<f64>>) = base
            .iter()
            .filter(|(_, p)| p.is_range())
            .map(|(name, p)| (name.to_string(), p.steps()))
            .unzip();
        let cursor = if values.iter().any(|v| v.is_empty()) {
            None
        } else {
            Some(vec![0; names.len()])
        };
        Self {
            base: base.clone(),
            names,
            values,
            cursor,
        }
    }

    /// Total number of combinations.
    pub fn combinations(&self) -> usize {
        self.values.iter().map(Vec::len).product()
    }

    /// Names of the swept parameters, in sweep order.
    pub fn dimensions(&self) -> &[String] {
        &self.names
    }

    fn advance(&mut self) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        for (i, index) in cursor.iter_mut().enumerate() {
            *index += 1;
            if *index < self.values[i].len() {
                return;
            }
            *index = 0;
        }
        // Wrapped around every dimension.
        self.cursor = None;
    }
}

impl Iterator for ParameterGrid {
    type Item = ParameterTable;

    fn next(&mut self) -> Option<ParameterTable> {
        let cursor = self.cursor.clone()?;
        let mut table = self.base.clone();
        for (i, index) in cursor.iter().enumerate() {
            table.set_value(&self.names[i], self.values[i][*index]);
        }
        self.advance();
        Some(table)
    }
}

/// Best table found by a sweep.
#[derive(Debug, Clone)]
pub struct TrainingResult {
    pub table: ParameterTable,
    pub score: u64,
    /// Number of battles actually run.
    pub battles: usize,
}

/// Run `run_battle` for every valid combination and keep the highest score.
///
/// Combinations rejected by `is_valid` are skipped without a battle. Returns
/// `None` when no combination was run.
pub fn optimize<V, F>(default: &ParameterTable, is_valid: V, mut run_battle: F) -> Option<TrainingResult>
where
    V: Fn(&ParameterTable) -> bool,
    F: FnMut(&ParameterTable) -> u64,
{
    let mut best: Option<TrainingResult> = None;
    let mut battles = 0;
    for table in ParameterGrid::new(default) {
        if !is_valid(&table) {
            continue;
        }
        let score = run_battle(&table);
        battles += 1;
        log::debug!("sweep #{battles}: score {score}");
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(TrainingResult {
                table,
                score,
                battles: 0,
            });
        }
    }
    best.map(|mut result| {
        result.battles = battles;
        result
    })
}

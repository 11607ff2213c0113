//! Metrics collection for estimation batches

use crate::{Action, EvidenceSource};
use std::collections::BTreeMap;

/// Counters collected while planning, applying and removing estimates
#[derive(Debug, Clone, Default)]
pub struct EstimatorMetrics {
    /// People considered for estimation
    pub people_examined: usize,

    /// Planned rows per action
    pub rows: BTreeMap<Action, usize>,

    /// Estimation results per evidence source
    pub sources: BTreeMap<EvidenceSource, usize>,

    /// People for whom a cycle was detected
    pub cycles: usize,

    /// Events written by `apply_rows`
    pub events_added: usize,

    /// Events deleted by `remove_estimates`
    pub events_removed: usize,
}

impl EstimatorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one person being examined
    pub fn record_examined(&mut self) {
        self.people_examined += 1;
    }

    /// Record the evidence source of one estimation
    pub fn record_source(&mut self, source: EvidenceSource) {
        *self.sources.entry(source).or_insert(0) += 1;
    }

    /// Record a planned row
    pub fn record_row(&mut self, action: Action) {
        *self.rows.entry(action).or_insert(0) += 1;
    }

    /// Record a detected cycle
    pub fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    /// Total planned rows
    pub fn total_rows(&self) -> usize {
        self.rows.values().sum()
    }

    /// People for whom no evidence was found
    pub fn without_evidence(&self) -> usize {
        self.sources.get(&EvidenceSource::None).copied().unwrap_or(0)
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Estimation Summary".to_string(),
            "==================".to_string(),
            format!("People examined: {}", self.people_examined),
            format!("Without evidence: {}", self.without_evidence()),
            format!("Cycles: {}", self.cycles),
        ];

        if !self.sources.is_empty() {
            lines.push(String::new());
            lines.push("Results by evidence:".to_string());
            for (source, count) in &self.sources {
                lines.push(format!("  {}: {}", source, count));
            }
        }

        if !self.rows.is_empty() {
            lines.push(String::new());
            lines.push("Planned rows:".to_string());
            for (action, count) in &self.rows {
                lines.push(format!("  {}: {}", action, count));
            }
            lines.push(format!("  Total: {}", self.total_rows()));
        }

        if self.events_added > 0 || self.events_removed > 0 {
            lines.push(String::new());
            lines.push(format!("Events added: {}", self.events_added));
            lines.push(format!("Events removed: {}", self.events_removed));
        }

        lines.join("\n")
    }
}

//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lifespan_estimator::{BatchPlan, EstimateRow, EstimatorMetrics, RemovalReport};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

#[derive(Serialize)]
struct RowView<'a> {
    person: &'a str,
    name: &'a str,
    action: &'static str,
    birth: String,
    death: String,
    evidence: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    related: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    related_name: Option<&'a str>,
}

#[derive(Serialize)]
struct MetricsView {
    people_examined: usize,
    without_evidence: usize,
    cycles: usize,
    rows: usize,
    events_added: usize,
    events_removed: usize,
}

#[derive(Serialize)]
struct PlanView<'a> {
    rows: Vec<RowView<'a>>,
    cycles: Vec<&'a str>,
    metrics: MetricsView,
}

impl<'a> From<&'a EstimateRow> for RowView<'a> {
    fn from(row: &'a EstimateRow) -> Self {
        Self {
            person: row.person.as_str(),
            name: &row.name,
            action: row.action.as_str(),
            birth: row.birth.to_string(),
            death: row.death.to_string(),
            evidence: &row.evidence,
            related: row.related.as_ref().map(|r| r.as_str()),
            related_name: row.related_name.as_deref(),
        }
    }
}

impl From<&EstimatorMetrics> for MetricsView {
    fn from(metrics: &EstimatorMetrics) -> Self {
        Self {
            people_examined: metrics.people_examined,
            without_evidence: metrics.without_evidence(),
            cycles: metrics.cycles,
            rows: metrics.total_rows(),
            events_added: metrics.events_added,
            events_removed: metrics.events_removed,
        }
    }
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a planned batch.
    pub fn format_plan(&self, plan: &BatchPlan) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_plan_json(plan),
            OutputFormat::Table => Ok(self.format_plan_table(plan)),
            OutputFormat::Quiet => Ok(Self::format_plan_quiet(plan)),
        }
    }

    fn format_plan_json(&self, plan: &BatchPlan) -> Result<String> {
        let view = PlanView {
            rows: plan.rows.iter().map(RowView::from).collect(),
            cycles: plan.cycles.iter().map(|id| id.as_str()).collect(),
            metrics: MetricsView::from(&plan.metrics),
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }

    fn format_plan_table(&self, plan: &BatchPlan) -> String {
        let mut sections = Vec::new();

        if plan.rows.is_empty() {
            sections.push(self.colorize("No estimates to add.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Action", "Birth", "Death", "Evidence", "Related"]);
            for row in &plan.rows {
                let related = match (&row.related_name, &row.related) {
                    (Some(name), Some(id)) => format!("{} [{}]", name, id),
                    (None, Some(id)) => id.to_string(),
                    _ => String::new(),
                };
                builder.push_record([
                    row.person.to_string(),
                    row.name.clone(),
                    row.action.to_string(),
                    row.birth.to_string(),
                    row.death.to_string(),
                    row.evidence.clone(),
                    related,
                ]);
            }
            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            sections.push(table.to_string());
        }

        for id in &plan.cycles {
            sections.push(self.warning(&format!(
                "Skipped {}: recorded as their own ancestor",
                id
            )));
        }

        sections.push(plan.metrics.summary());
        sections.join("\n")
    }

    fn format_plan_quiet(plan: &BatchPlan) -> String {
        let ids: Vec<&str> = plan.rows.iter().map(|r| r.person.as_str()).collect();
        ids.join("\n")
    }

    /// Format the outcome of a removal.
    pub fn format_removal(&self, report: &RemovalReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "events_removed": report.events_removed,
                "source_removed": report.source_removed,
            }))?),
            OutputFormat::Quiet => Ok(report.events_removed.to_string()),
            OutputFormat::Table => {
                if report.events_removed > 0 || report.source_removed {
                    Ok(self.success(&format!("Removed {} estimated event(s)", report.events_removed)))
                } else {
                    Ok(self.info("No previous estimates found"))
                }
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// True when messages beyond the main output should be printed.
    pub fn is_table(&self) -> bool {
        self.format == OutputFormat::Table
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

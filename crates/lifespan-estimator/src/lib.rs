//! Lifespan Estimator
//!
//! Infers plausible birth and death windows for people whose dates are
//! unknown, from the dates recorded for their relatives.
//!
//! # Overview
//!
//! - **Estimation**: [`BoundEstimator`] searches the person, siblings,
//!   spouses, descendants and ancestors in that order and returns the first
//!   window it can derive
//! - **Cycle detection**: loops in parent/child links surface as
//!   [`EstimatorError::GraphCycle`] instead of unbounded recursion
//! - **Batches**: [`plan_batch`] turns estimates into proposed events,
//!   [`apply_rows`] writes them, [`remove_estimates`] takes them out again
//!
//! # Windows
//!
//! With `L` = max plausible lifespan, `S` = max sibling age spread and
//! `G` = average generation gap, evidence year `Y` found `n` generations
//! away gives:
//!
//! | Evidence | Lower | Upper |
//! |----------|-------|-------|
//! | Sibling birth | `Y - S` | `Y + S + L` |
//! | Sibling death | `Y - S - L` | `Y + S` |
//! | Descendant birth | `Y - nG` | `Y - nG + L` |
//! | Descendant death | `Y - G` | `Y - G + L` |
//! | Ancestor birth | `Y + nG` | `Y + nG + L` |
//! | Ancestor death | `Y + nG - L` | `Y + nG` |
//!
//! # Usage
//!
//! ```
//! use lifespan_domain::{Date, GraphAccessor};
//! use lifespan_estimator::{plan_batch, apply_rows, BatchOptions, EstimatorConfig};
//! use lifespan_store::TreeBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = TreeBuilder::new();
//! let ann = tree.person("Ann");
//! tree.death(&ann, Date::from_year(1950));
//! let mut store = tree.build();
//!
//! let people = store.person_ids()?;
//! let options = BatchOptions::default();
//! let today = Date::from_year(2026);
//! let plan = plan_batch(&store, &people, &EstimatorConfig::default(), &options, &today)?;
//! let added = apply_rows(&mut store, &plan.rows, &options)?;
//! assert_eq!(added, 1);
//! println!("{}", plan.metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! max_plausible_lifespan = 100
//! max_sibling_age_spread = 20
//! average_generation_gap = 20
//! # max_generations = 8
//! ```

#![warn(missing_docs)]

mod apply;
mod config;
mod error;
mod estimator;
mod evidence;
mod guard;
mod metrics;
mod plan;

pub use apply::{apply_rows, remove_estimates, RemovalReport};
pub use config::{BatchOptions, DateStyle, EstimatorConfig, EventMode, DEFAULT_SOURCE_TEXT};
pub use error::EstimatorError;
pub use estimator::{BoundEstimator, EstimationResult, EvidenceSource};
pub use evidence::{EvidenceCollector, Tier};
pub use guard::{CycleGuard, Visit};
pub use metrics::EstimatorMetrics;
pub use plan::{plan_batch, Action, BatchPlan, EstimateRow};

//! Turning estimates into proposed birth/death events

use crate::{
    BatchOptions, BoundEstimator, EstimatorConfig, EstimatorError, EstimatorMetrics, EventMode,
};
use lifespan_domain::{Date, EventId, GraphAccessor, PersonId};
use std::fmt::{self, Display};

/// Which events a row proposes to add
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// A birth event only
    AddBirth,
    /// A death event only
    AddDeath,
    /// Both events
    AddBoth,
}

impl Action {
    fn from_flags(birth: bool, death: bool) -> Option<Self> {
        match (birth, death) {
            (true, true) => Some(Action::AddBoth),
            (true, false) => Some(Action::AddBirth),
            (false, true) => Some(Action::AddDeath),
            (false, false) => None,
        }
    }

    /// True when a birth event is added
    pub fn adds_birth(self) -> bool {
        matches!(self, Action::AddBirth | Action::AddBoth)
    }

    /// True when a death event is added
    pub fn adds_death(self) -> bool {
        matches!(self, Action::AddDeath | Action::AddBoth)
    }

    /// Short name
    pub fn as_str(self) -> &'static str {
        match self {
            Action::AddBirth => "add-birth",
            Action::AddDeath => "add-death",
            Action::AddBoth => "add-both",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposed change, for review before it is applied
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateRow {
    /// Person the events are for
    pub person: PersonId,
    /// Person's display name
    pub name: String,
    /// Events to add
    pub action: Action,
    /// Recorded birth, or the proposed one
    pub birth: Date,
    /// Recorded death, or the proposed one
    pub death: Date,
    /// Evidence phrase
    pub evidence: String,
    /// Relative whose record supplied the evidence
    pub related: Option<PersonId>,
    /// Relative's display name
    pub related_name: Option<String>,
}

/// Outcome of planning a batch
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    /// Proposed rows, in input order
    pub rows: Vec<EstimateRow>,
    /// People skipped because their family graph loops
    pub cycles: Vec<PersonId>,
    /// Counters for the run
    pub metrics: EstimatorMetrics,
}

/// Estimate every person missing a birth or death event
///
/// A proposed date is kept only when it lies strictly before `today`; it is
/// then reduced to its year. People with nothing to add produce no row. A
/// cycle in one person's family graph is recorded and the batch continues.
pub fn plan_batch<G>(
    graph: &G,
    people: &[PersonId],
    config: &EstimatorConfig,
    options: &BatchOptions,
    today: &Date,
) -> Result<BatchPlan, EstimatorError>
where
    G: GraphAccessor,
    G::Error: Display,
{
    config.validate()?;
    let estimator = BoundEstimator::new(graph, config);
    let mut plan = BatchPlan::default();

    for id in people {
        let person = match graph.get_person(id) {
            Ok(Some(person)) => person,
            Ok(None) => {
                tracing::debug!(person = %id, "skipping unknown person");
                continue;
            }
            Err(e) => {
                tracing::debug!(person = %id, error = %e, "skipping unreadable person");
                continue;
            }
        };
        if person.birth_ref.is_some() && person.death_ref.is_some() {
            continue;
        }
        plan.metrics.record_examined();

        let estimate = match estimator.estimate(id) {
            Ok(estimate) => estimate,
            Err(EstimatorError::GraphCycle { person: at }) => {
                tracing::warn!(person = %id, cycle_at = %at, "skipping person in a cycle");
                plan.metrics.record_cycle();
                plan.cycles.push(id.clone());
                continue;
            }
            Err(e) => return Err(e),
        };
        plan.metrics.record_source(estimate.source);

        let (birth, add_birth) = column(
            graph,
            person.birth_ref.as_ref().map(|r| &r.event),
            estimate.lower,
            options.add_birth,
            today,
        );
        let (death, add_death) = column(
            graph,
            person.death_ref.as_ref().map(|r| &r.event),
            estimate.upper,
            options.add_death,
            today,
        );
        let Some(action) = Action::from_flags(add_birth, add_death) else {
            continue;
        };
        plan.metrics.record_row(action);

        let related = estimate.related.filter(|r| r != id);
        let related_name = related
            .as_ref()
            .and_then(|r| graph.get_person(r).ok().flatten())
            .map(|p| p.name);

        plan.rows.push(EstimateRow {
            person: id.clone(),
            name: person.name,
            action,
            birth,
            death,
            evidence: estimate.evidence,
            related,
            related_name,
        });
    }

    tracing::info!(
        examined = plan.metrics.people_examined,
        rows = plan.rows.len(),
        cycles = plan.cycles.len(),
        "planned estimates"
    );
    Ok(plan)
}

/// One date column of a row and whether an event is added for it
fn column<G>(
    graph: &G,
    recorded: Option<&EventId>,
    mut estimate: Date,
    mode: EventMode,
    today: &Date,
) -> (Date, bool)
where
    G: GraphAccessor,
{
    if let Some(event) = recorded {
        let date = graph
            .get_event(event)
            .ok()
            .flatten()
            .map(|e| e.date)
            .unwrap_or_default();
        return (date, false);
    }
    if !mode.adds_event() || !estimate.is_before(today) {
        return (Date::empty(), false);
    }
    if mode == EventMode::WithoutDate {
        return (Date::empty(), true);
    }
    estimate.make_vague();
    (estimate, true)
}

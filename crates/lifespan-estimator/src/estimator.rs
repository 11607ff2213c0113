//! The bound estimator
//!
//! Evidence is searched in strict priority order and the first hit wins:
//!
//! 1. the person's own birth and death
//! 2. siblings (primary evidence of every sibling before any fallback)
//! 3. spouses, one hop only
//! 4. descendants, depth first in child order
//! 5. ancestors through the main parent family, father before mother
//!
//! Each window is widened by the generation gap for every generation
//! between the person and the relative that supplied the evidence.

use crate::evidence::{EvidenceCollector, Tier};
use crate::guard::{CycleGuard, Visit};
use crate::{EstimatorConfig, EstimatorError};
use lifespan_domain::{Date, GraphAccessor, Person, PersonId};
use std::fmt::{self, Display};

/// Which step of the search produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvidenceSource {
    /// Both dates are recorded; nothing was inferred
    Recorded,
    /// One of the person's own dates
    SelfEvidence,
    /// A sibling's dates
    Sibling,
    /// A spouse's estimate
    Spouse,
    /// A descendant's dates
    Descendant,
    /// An ancestor's dates
    Ancestor,
    /// Nothing found
    None,
}

impl EvidenceSource {
    /// Short lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceSource::Recorded => "recorded",
            EvidenceSource::SelfEvidence => "self",
            EvidenceSource::Sibling => "sibling",
            EvidenceSource::Spouse => "spouse",
            EvidenceSource::Descendant => "descendant",
            EvidenceSource::Ancestor => "ancestor",
            EvidenceSource::None => "none",
        }
    }
}

impl Display for EvidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plausible birth and death window for one person
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    /// Earliest plausible birth
    pub lower: Date,
    /// Latest plausible death
    pub upper: Date,
    /// Human-readable evidence, e.g. "sibling birth date"
    pub evidence: String,
    /// Relative whose record supplied the evidence
    pub related: Option<PersonId>,
    /// Search step that produced the result
    pub source: EvidenceSource,
}

impl EstimationResult {
    /// The "no estimate possible" result
    pub fn empty() -> Self {
        Self {
            lower: Date::empty(),
            upper: Date::empty(),
            evidence: String::new(),
            related: None,
            source: EvidenceSource::None,
        }
    }

    /// True when neither bound is known
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty() && self.upper.is_empty()
    }

    /// True when both bounds are known
    pub fn is_complete(&self) -> bool {
        !self.lower.is_empty() && !self.upper.is_empty()
    }

    fn window(
        lower_year: i32,
        upper_year: i32,
        evidence: String,
        related: &PersonId,
        source: EvidenceSource,
    ) -> Self {
        Self {
            lower: Date::estimated_year(lower_year),
            upper: Date::estimated_year(upper_year),
            evidence,
            related: Some(related.clone()),
            source,
        }
    }
}

/// Infers birth/death windows from surrounding relatives
///
/// The estimator is a pure query: it only reads the graph, and repeated
/// calls with the same graph and configuration give the same result.
///
/// # Examples
///
/// ```
/// use lifespan_domain::Date;
/// use lifespan_estimator::{BoundEstimator, EstimatorConfig};
/// use lifespan_store::TreeBuilder;
///
/// let mut tree = TreeBuilder::new();
/// let s1 = tree.person("S1");
/// let s2 = tree.person("S2");
/// tree.birth(&s1, Date::from_year(1900));
/// tree.family(None, None, &[&s1, &s2]);
/// let store = tree.build();
///
/// let config = EstimatorConfig { max_sibling_age_spread: 5, ..EstimatorConfig::default() };
/// let result = BoundEstimator::new(&store, &config).estimate(&s2).unwrap();
/// assert_eq!(result.lower.year(), Some(1895));
/// assert_eq!(result.upper.year(), Some(2005));
/// assert_eq!(result.evidence, "sibling birth date");
/// ```
pub struct BoundEstimator<'a, G> {
    config: &'a EstimatorConfig,
    evidence: EvidenceCollector<'a, G>,
}

impl<'a, G> BoundEstimator<'a, G>
where
    G: GraphAccessor,
    G::Error: Display,
{
    /// Create an estimator over `graph`
    pub fn new(graph: &'a G, config: &'a EstimatorConfig) -> Self {
        Self {
            config,
            evidence: EvidenceCollector::new(graph),
        }
    }

    /// Estimate the birth/death window of one person
    ///
    /// Returns [`EstimationResult::empty`] when no evidence exists anywhere,
    /// [`EstimatorError::GraphCycle`] when a generational walk loops and
    /// [`EstimatorError::Config`] when the configuration is out of range.
    /// Year arithmetic saturates instead of overflowing.
    pub fn estimate(&self, id: &PersonId) -> Result<EstimationResult, EstimatorError> {
        self.config.validate()?;
        self.estimate_person(id, false)
    }

    fn estimate_person(
        &self,
        id: &PersonId,
        is_spouse_pass: bool,
    ) -> Result<EstimationResult, EstimatorError> {
        let Some(person) = self.evidence.person(id) else {
            return Ok(EstimationResult::empty());
        };

        if let Some(result) = self.from_self(&person) {
            return Ok(result);
        }
        if let Some(result) = self.from_siblings(&person) {
            return Ok(result);
        }
        if !is_spouse_pass {
            if let Some(result) = self.from_spouses(&person)? {
                return Ok(result);
            }
        }

        let memoize = self.config.max_generations.is_none();

        let mut guard = CycleGuard::new(&person.id, memoize);
        let gap = self.config.average_generation_gap;
        if let Some(result) = self.from_descendants(&person, gap, 1, &mut guard)? {
            return Ok(result);
        }

        let mut guard = CycleGuard::new(&person.id, memoize);
        if let Some(result) = self.from_ancestors(&person, gap, 1, &mut guard)? {
            return Ok(result);
        }

        tracing::debug!(person = %person.id, "no evidence found");
        Ok(EstimationResult::empty())
    }

    fn from_self(&self, person: &Person) -> Option<EstimationResult> {
        let lifespan = self.config.max_plausible_lifespan;
        let birth = self.evidence.birth(person).map(|(date, _)| date);
        let death = self.evidence.death(person).map(|(date, _)| date);

        let (lower, upper, evidence, source) = match (birth, death) {
            (Some(birth), Some(death)) => {
                if death.is_before(&birth) {
                    tracing::warn!(
                        person = %person.id,
                        birth = %birth,
                        death = %death,
                        "recorded death precedes recorded birth"
                    );
                }
                (birth, death, "", EvidenceSource::Recorded)
            }
            (None, Some(death)) => (
                death.copy_offset_years(-lifespan),
                death,
                "death date",
                EvidenceSource::SelfEvidence,
            ),
            (Some(birth), None) => {
                let upper = birth.copy_offset_years(lifespan);
                (birth, upper, "birth date", EvidenceSource::SelfEvidence)
            }
            (None, None) => return None,
        };

        tracing::debug!(person = %person.id, evidence, "own dates");
        Some(EstimationResult {
            lower,
            upper,
            evidence: evidence.to_string(),
            related: None,
            source,
        })
    }

    fn from_siblings(&self, person: &Person) -> Option<EstimationResult> {
        let siblings: Vec<Person> = person
            .parent_families
            .iter()
            .filter_map(|id| self.evidence.family(id))
            .flat_map(|family| family.children)
            .filter_map(|id| self.evidence.person(&id))
            .collect();

        let spread = self.config.max_sibling_age_spread;
        let lifespan = self.config.max_plausible_lifespan;

        for tier in [Tier::Primary, Tier::Fallback] {
            for sibling in &siblings {
                if let Some(year) = self.evidence.birth_in(sibling, tier).and_then(|d| d.year()) {
                    tracing::debug!(person = %person.id, sibling = %sibling.id, year, "sibling birth");
                    return Some(EstimationResult::window(
                        year.saturating_sub(spread),
                        year.saturating_add(spread).saturating_add(lifespan),
                        format!("sibling {}", tier.birth_label()),
                        &sibling.id,
                        EvidenceSource::Sibling,
                    ));
                }
                if let Some(year) = self.evidence.death_in(sibling, tier).and_then(|d| d.year()) {
                    tracing::debug!(person = %person.id, sibling = %sibling.id, year, "sibling death");
                    return Some(EstimationResult::window(
                        year.saturating_sub(spread).saturating_sub(lifespan),
                        year.saturating_add(spread),
                        format!("sibling {}", tier.death_label()),
                        &sibling.id,
                        EvidenceSource::Sibling,
                    ));
                }
            }
        }
        None
    }

    fn from_spouses(&self, person: &Person) -> Result<Option<EstimationResult>, EstimatorError> {
        for family_id in &person.families {
            let Some(family) = self.evidence.family(family_id) else {
                continue;
            };
            let Some(spouse) = family.spouse_of(&person.id) else {
                continue;
            };
            let inner = self.estimate_person(spouse, true)?;
            if !inner.is_complete() {
                continue;
            }
            tracing::debug!(person = %person.id, spouse = %spouse, "spouse estimate");
            let evidence = if inner.evidence.is_empty() {
                "a spouse, recorded dates".to_string()
            } else {
                format!("a spouse, {}", inner.evidence)
            };
            return Ok(Some(EstimationResult {
                lower: inner.lower,
                upper: inner.upper,
                evidence,
                related: inner.related.or_else(|| Some(spouse.clone())),
                source: EvidenceSource::Spouse,
            }));
        }
        Ok(None)
    }

    fn generation_allowed(&self, generation: u32) -> bool {
        self.config
            .max_generations
            .is_none_or(|max| generation <= max)
    }

    fn from_descendants(
        &self,
        person: &Person,
        years_back: i32,
        generation: u32,
        guard: &mut CycleGuard,
    ) -> Result<Option<EstimationResult>, EstimatorError> {
        if !self.generation_allowed(generation) {
            return Ok(None);
        }
        let gap = self.config.average_generation_gap;
        let lifespan = self.config.max_plausible_lifespan;

        for family_id in &person.families {
            let Some(family) = self.evidence.family(family_id) else {
                continue;
            };
            for child_id in &family.children {
                if guard.enter(child_id)? == Visit::Exhausted {
                    continue;
                }
                let Some(child) = self.evidence.person(child_id) else {
                    guard.leave(child_id, true);
                    continue;
                };

                if let Some((date, tier)) = self.evidence.birth(&child) {
                    if let Some(year) = date.year() {
                        let lower = year.saturating_sub(years_back);
                        return Ok(Some(EstimationResult::window(
                            lower,
                            lower.saturating_add(lifespan),
                            format!("descendent {}", tier.birth_label()),
                            child_id,
                            EvidenceSource::Descendant,
                        )));
                    }
                }
                if let Some((date, tier)) = self.evidence.death(&child) {
                    if let Some(year) = date.year() {
                        let lower = year.saturating_sub(gap);
                        return Ok(Some(EstimationResult::window(
                            lower,
                            lower.saturating_add(lifespan),
                            format!("descendent {}", tier.death_label()),
                            child_id,
                            EvidenceSource::Descendant,
                        )));
                    }
                }

                let found = self.from_descendants(
                    &child,
                    years_back.saturating_add(gap),
                    generation + 1,
                    guard,
                )?;
                guard.leave(child_id, found.is_none());
                if found.is_some() {
                    return Ok(found);
                }
            }
        }
        Ok(None)
    }

    fn from_ancestors(
        &self,
        person: &Person,
        years_forward: i32,
        generation: u32,
        guard: &mut CycleGuard,
    ) -> Result<Option<EstimationResult>, EstimatorError> {
        if !self.generation_allowed(generation) {
            return Ok(None);
        }
        let Some(family) = person
            .main_parent_family()
            .and_then(|id| self.evidence.family(id))
        else {
            return Ok(None);
        };
        let gap = self.config.average_generation_gap;
        let lifespan = self.config.max_plausible_lifespan;

        for parent_id in family.parents() {
            if guard.enter(parent_id)? == Visit::Exhausted {
                continue;
            }
            let Some(parent) = self.evidence.person(parent_id) else {
                guard.leave(parent_id, true);
                continue;
            };

            if let Some((date, tier)) = self.evidence.birth(&parent) {
                if let Some(year) = date.year() {
                    let lower = year.saturating_add(years_forward);
                    return Ok(Some(EstimationResult::window(
                        lower,
                        lower.saturating_add(lifespan),
                        format!("ancestor {}", tier.birth_label()),
                        parent_id,
                        EvidenceSource::Ancestor,
                    )));
                }
            }
            if let Some((date, tier)) = self.evidence.death(&parent) {
                if let Some(year) = date.year() {
                    let upper = year.saturating_add(years_forward);
                    return Ok(Some(EstimationResult::window(
                        upper.saturating_sub(lifespan),
                        upper,
                        format!("ancestor {}", tier.death_label()),
                        parent_id,
                        EvidenceSource::Ancestor,
                    )));
                }
            }

            let found = self.from_ancestors(
                &parent,
                years_forward.saturating_add(gap),
                generation + 1,
                guard,
            )?;
            guard.leave(parent_id, found.is_none());
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifespan_domain::{EventType, Quality};
    use lifespan_store::TreeBuilder;

    fn config() -> EstimatorConfig {
        EstimatorConfig::default()
    }

    #[test]
    fn test_unknown_person_is_empty() {
        let store = TreeBuilder::new().build();
        let config = config();
        let result = BoundEstimator::new(&store, &config)
            .estimate(&PersonId::from("I404"))
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.source, EvidenceSource::None);
        assert_eq!(result.evidence, "");
    }

    #[test]
    fn test_death_only() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.death(&ann, Date::from_ymd(1950, 3, 2));
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&ann).unwrap();
        assert_eq!(result.lower.year(), Some(1850));
        assert_eq!(result.lower.start_date().month, None);
        assert_eq!(result.lower.quality(), Quality::Estimated);
        assert_eq!(result.upper, Date::from_ymd(1950, 3, 2));
        assert_eq!(result.evidence, "death date");
        assert_eq!(result.related, None);
    }

    #[test]
    fn test_birth_only_from_baptism() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.event(&ann, EventType::Baptism, Date::from_year(1880));
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&ann).unwrap();
        assert_eq!(result.lower.year(), Some(1880));
        assert_eq!(result.upper.year(), Some(1980));
        assert_eq!(result.evidence, "birth date");
        assert_eq!(result.source, EvidenceSource::SelfEvidence);
    }

    #[test]
    fn test_sibling_death() {
        let mut tree = TreeBuilder::new();
        let a = tree.person("A");
        let b = tree.person("B");
        tree.death(&a, Date::from_year(1950));
        tree.family(None, None, &[&a, &b]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&b).unwrap();
        assert_eq!(result.lower.year(), Some(1950 - 20 - 100));
        assert_eq!(result.upper.year(), Some(1970));
        assert_eq!(result.evidence, "sibling death date");
        assert_eq!(result.related, Some(a));
    }

    #[test]
    fn test_sibling_primary_pass_before_fallback() {
        let mut tree = TreeBuilder::new();
        let first = tree.person("First");
        let second = tree.person("Second");
        let target = tree.person("Target");
        tree.event(&first, EventType::Baptism, Date::from_year(1890));
        tree.birth(&second, Date::from_year(1895));
        tree.family(None, None, &[&first, &second, &target]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&target).unwrap();
        assert_eq!(result.evidence, "sibling birth date");
        assert_eq!(result.related, Some(second));
        assert_eq!(result.lower.year(), Some(1875));
    }

    #[test]
    fn test_sibling_fallback_label() {
        let mut tree = TreeBuilder::new();
        let first = tree.person("First");
        let target = tree.person("Target");
        tree.event(&first, EventType::Burial, Date::from_year(1960));
        tree.family(None, None, &[&first, &target]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&target).unwrap();
        assert_eq!(result.evidence, "sibling death-related date");
    }

    #[test]
    fn test_spouse_pass() {
        let mut tree = TreeBuilder::new();
        let husband = tree.person("Husband");
        let wife = tree.person("Wife");
        tree.birth(&wife, Date::from_year(1870));
        tree.family(Some(&husband), Some(&wife), &[]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&husband).unwrap();
        assert_eq!(result.evidence, "a spouse, birth date");
        assert_eq!(result.lower.year(), Some(1870));
        assert_eq!(result.upper.year(), Some(1970));
        assert_eq!(result.related, Some(wife));
        assert_eq!(result.source, EvidenceSource::Spouse);
    }

    #[test]
    fn test_spouse_pass_takes_one_hop() {
        // The second spouse's dates are two marriages away
        let mut tree = TreeBuilder::new();
        let a = tree.person("A");
        let b = tree.person("B");
        let c = tree.person("C");
        tree.birth(&c, Date::from_year(1870));
        tree.family(Some(&a), Some(&b), &[]);
        tree.family(Some(&c), Some(&b), &[]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&a).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_descendant_birth() {
        let mut tree = TreeBuilder::new();
        let parent = tree.person("Parent");
        let child = tree.person("Child");
        tree.birth(&child, Date::from_year(1900));
        tree.family(Some(&parent), None, &[&child]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&parent).unwrap();
        assert_eq!(result.lower.year(), Some(1880));
        assert_eq!(result.upper.year(), Some(1980));
        assert_eq!(result.evidence, "descendent birth date");
    }

    #[test]
    fn test_descendant_death_uses_single_gap() {
        let mut tree = TreeBuilder::new();
        let parent = tree.person("Parent");
        let child = tree.person("Child");
        let grandchild = tree.person("Grandchild");
        tree.death(&grandchild, Date::from_year(1990));
        tree.family(Some(&parent), None, &[&child]);
        tree.family(Some(&child), None, &[&grandchild]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&parent).unwrap();
        assert_eq!(result.lower.year(), Some(1970));
        assert_eq!(result.upper.year(), Some(2070));
        assert_eq!(result.evidence, "descendent death date");
        assert_eq!(result.related, Some(grandchild));
    }

    #[test]
    fn test_ancestor_death() {
        let mut tree = TreeBuilder::new();
        let father = tree.person("Father");
        let child = tree.person("Child");
        tree.death(&father, Date::from_year(1900));
        tree.family(Some(&father), None, &[&child]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&child).unwrap();
        assert_eq!(result.lower.year(), Some(1820));
        assert_eq!(result.upper.year(), Some(1920));
        assert_eq!(result.evidence, "ancestor death date");
    }

    #[test]
    fn test_max_generations_stops_walk() {
        let mut tree = TreeBuilder::new();
        let grandfather = tree.person("Grandfather");
        let father = tree.person("Father");
        let child = tree.person("Child");
        tree.birth(&grandfather, Date::from_year(1850));
        tree.family(Some(&grandfather), None, &[&father]);
        tree.family(Some(&father), None, &[&child]);
        let store = tree.build();

        let config = EstimatorConfig {
            max_generations: Some(1),
            ..EstimatorConfig::default()
        };
        let result = BoundEstimator::new(&store, &config).estimate(&child).unwrap();
        assert!(result.is_empty());

        let config = EstimatorConfig {
            max_generations: Some(2),
            ..EstimatorConfig::default()
        };
        let result = BoundEstimator::new(&store, &config).estimate(&child).unwrap();
        assert_eq!(result.lower.year(), Some(1890));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut tree = TreeBuilder::new();
        let ann = tree.person("Ann");
        tree.birth(&ann, Date::from_year(1900));
        let store = tree.build();

        let config = EstimatorConfig {
            max_plausible_lifespan: -5,
            ..EstimatorConfig::default()
        };
        let result = BoundEstimator::new(&store, &config).estimate(&ann);
        assert!(matches!(result, Err(EstimatorError::Config(_))));
    }

    #[test]
    fn test_extreme_years_saturate() {
        let mut tree = TreeBuilder::new();
        let late = tree.person("Late");
        tree.birth(&late, Date::from_year(i32::MAX - 10));
        let early = tree.person("Early");
        let sibling = tree.person("Sibling");
        tree.birth(&early, Date::from_year(i32::MIN + 3));
        tree.family(None, None, &[&early, &sibling]);
        let store = tree.build();
        let config = config();
        let estimator = BoundEstimator::new(&store, &config);

        let result = estimator.estimate(&late).unwrap();
        assert_eq!(result.lower.year(), Some(i32::MAX - 10));
        assert_eq!(result.upper.year(), Some(i32::MAX));

        let result = estimator.estimate(&sibling).unwrap();
        assert_eq!(result.lower.year(), Some(i32::MIN));
        assert_eq!(result.evidence, "sibling birth date");
    }

    #[test]
    fn test_descendant_baptism_before_recorded_death() {
        let mut tree = TreeBuilder::new();
        let parent = tree.person("Parent");
        let child = tree.person("Child");
        tree.event(&child, EventType::Baptism, Date::from_year(1900));
        tree.death(&child, Date::from_year(1950));
        tree.family(Some(&parent), None, &[&child]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&parent).unwrap();
        assert_eq!(result.evidence, "descendent birth-related date");
        assert_eq!(result.lower.year(), Some(1880));
        assert_eq!(result.upper.year(), Some(1980));
        assert_eq!(result.related, Some(child));
    }

    #[test]
    fn test_ancestor_baptism_before_recorded_death() {
        let mut tree = TreeBuilder::new();
        let father = tree.person("Father");
        let child = tree.person("Child");
        tree.event(&father, EventType::Baptism, Date::from_year(1850));
        tree.death(&father, Date::from_year(1900));
        tree.family(Some(&father), None, &[&child]);
        let store = tree.build();
        let config = config();

        let result = BoundEstimator::new(&store, &config).estimate(&child).unwrap();
        assert_eq!(result.evidence, "ancestor birth-related date");
        assert_eq!(result.lower.year(), Some(1870));
        assert_eq!(result.upper.year(), Some(1970));
    }
}

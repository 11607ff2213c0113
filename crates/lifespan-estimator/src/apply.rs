//! Writing planned estimates into the tree, and taking them out again
//!
//! Every generated event cites a source with a well-known title. Removal
//! finds estimates by that citation, so a plan can be removed and applied
//! again without leaving duplicates.

use crate::{BatchOptions, DateStyle, EstimateRow, EstimatorError};
use lifespan_domain::{
    Date, Event, EventId, EventRef, EventType, GraphWriter, Modifier, PersonId, Quality,
    Source, SourceId,
};
use std::fmt::Display;

/// Counts reported by [`remove_estimates`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalReport {
    /// Birth and death events deleted
    pub events_removed: usize,
    /// Whether the citing source itself was deleted; it is kept while any
    /// event still cites it
    pub source_removed: bool,
}

fn store_error<E: Display>(e: E) -> EstimatorError {
    EstimatorError::Store(e.to_string())
}

/// Run `body` inside one writer batch, rolling back when it fails
fn in_batch<W, T>(
    writer: &mut W,
    body: impl FnOnce(&mut W) -> Result<T, EstimatorError>,
) -> Result<T, EstimatorError>
where
    W: GraphWriter,
    W::Error: Display,
{
    writer.begin_batch().map_err(store_error)?;
    match body(writer) {
        Ok(value) => {
            writer.commit_batch().map_err(store_error)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = writer.rollback_batch() {
                tracing::error!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

/// Add the events proposed by `rows`; returns the number of events added
///
/// A person who gained a birth or death event since planning keeps it; no
/// second event is added.
pub fn apply_rows<W>(
    writer: &mut W,
    rows: &[EstimateRow],
    options: &BatchOptions,
) -> Result<usize, EstimatorError>
where
    W: GraphWriter,
    W::Error: Display,
{
    if rows.is_empty() {
        return Ok(0);
    }
    let count = in_batch(writer, |w| {
        let source = find_or_create_source(w, &options.source_text)?;
        let mut count = 0;

        for row in rows {
            let Some(mut person) = w.get_person(&row.person).map_err(store_error)? else {
                tracing::debug!(person = %row.person, "planned person no longer exists");
                continue;
            };
            let mut changed = false;

            if row.action.adds_birth() && person.birth_ref.is_none() {
                let modifier = match options.date_style {
                    DateStyle::About => Modifier::About,
                    DateStyle::Extremes => Modifier::After,
                };
                let event = estimated_event(
                    EventType::Birth,
                    "Estimated birth date",
                    &row.birth,
                    modifier,
                    &source,
                    note("birth", row),
                );
                let id = w.add_event(event).map_err(store_error)?;
                person.birth_ref = Some(EventRef::primary(id));
                changed = true;
                count += 1;
            }
            if row.action.adds_death() && person.death_ref.is_none() {
                let modifier = match options.date_style {
                    DateStyle::About => Modifier::About,
                    DateStyle::Extremes => Modifier::Before,
                };
                let event = estimated_event(
                    EventType::Death,
                    "Estimated death date",
                    &row.death,
                    modifier,
                    &source,
                    note("death", row),
                );
                let id = w.add_event(event).map_err(store_error)?;
                person.death_ref = Some(EventRef::primary(id));
                changed = true;
                count += 1;
            }
            if changed {
                w.commit_person(person).map_err(store_error)?;
            }
        }
        Ok(count)
    })?;

    tracing::info!(added = count, source = %options.source_text, "applied estimates");
    Ok(count)
}

/// Delete estimates citing the source titled `source_text`
///
/// Only the birth and death references of `people` are inspected. The source
/// is deleted afterwards unless events outside `people` still cite it.
pub fn remove_estimates<W>(
    writer: &mut W,
    people: &[PersonId],
    source_text: &str,
) -> Result<RemovalReport, EstimatorError>
where
    W: GraphWriter,
    W::Error: Display,
{
    let Some(source) = writer
        .find_source_by_title(source_text)
        .map_err(store_error)?
    else {
        return Ok(RemovalReport::default());
    };

    let report = in_batch(writer, |w| {
        let mut report = RemovalReport::default();
        for id in people {
            let Some(mut person) = w.get_person(id).map_err(store_error)? else {
                continue;
            };
            let birth = take_estimate(w, &mut person.birth_ref, &source.id)?;
            let death = take_estimate(w, &mut person.death_ref, &source.id)?;
            if birth || death {
                report.events_removed += usize::from(birth) + usize::from(death);
                w.commit_person(person).map_err(store_error)?;
            }
        }
        let remaining = w.count_citations(&source.id).map_err(store_error)?;
        if remaining == 0 {
            w.remove_source(&source.id).map_err(store_error)?;
            report.source_removed = true;
        } else {
            tracing::debug!(remaining, source = source_text, "source still cited, kept");
        }
        Ok(report)
    })?;

    tracing::info!(
        removed = report.events_removed,
        source = source_text,
        "removed previous estimates"
    );
    Ok(report)
}

/// Delete the referenced event when it cites `source`, clearing the reference
fn take_estimate<W>(
    writer: &mut W,
    slot: &mut Option<EventRef>,
    source: &SourceId,
) -> Result<bool, EstimatorError>
where
    W: GraphWriter,
    W::Error: Display,
{
    let Some(event_ref) = slot.as_ref() else {
        return Ok(false);
    };
    let cites = writer
        .get_event(&event_ref.event)
        .map_err(store_error)?
        .is_some_and(|event| event.cites(source));
    if !cites {
        return Ok(false);
    }
    writer.remove_event(&event_ref.event).map_err(store_error)?;
    *slot = None;
    Ok(true)
}

fn find_or_create_source<W>(writer: &mut W, title: &str) -> Result<SourceId, EstimatorError>
where
    W: GraphWriter,
    W::Error: Display,
{
    if let Some(source) = writer.find_source_by_title(title).map_err(store_error)? {
        return Ok(source.id);
    }
    writer
        .add_source(Source::new(SourceId::generate(), title))
        .map_err(store_error)
}

fn estimated_event(
    event_type: EventType,
    description: &str,
    date: &Date,
    modifier: Modifier,
    source: &SourceId,
    note: String,
) -> Event {
    let date = match date.year() {
        Some(year) if !date.is_empty() => Date::from_year(year)
            .with_modifier(modifier)
            .with_quality(Quality::Estimated),
        _ => Date::empty(),
    };
    Event::new(EventId::generate(), event_type, date)
        .with_description(description)
        .cite(source.clone())
        .with_note(note)
}

fn note(kind: &str, row: &EstimateRow) -> String {
    match &row.related_name {
        Some(name) => format!(
            "Added {} event based on {}, from {}",
            kind, row.evidence, name
        ),
        None => format!("Added {} event based on {}", kind, row.evidence),
    }
}

//! Calendar date values with partial precision
//!
//! Genealogical dates are rarely complete: a record may give only a year, a
//! year and month, or carry a qualifier such as "about" or "before". A
//! [`Date`] keeps each component independently known or unknown and tags
//! derived values with a [`Quality`] so they are never mistaken for recorded
//! ones.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest year magnitude accepted when parsing
pub const MAX_YEAR: i32 = 9999;

/// How the date relates to the actual moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    /// Exact (to the stated precision)
    #[default]
    None,
    /// Sometime before the start point
    Before,
    /// Sometime after the start point
    After,
    /// Approximately the start point
    About,
    /// Sometime between the start and stop points
    Range,
    /// Lasting from the start point to the stop point
    Span,
    /// Only free text could be recorded
    TextOnly,
}

/// Whether the date was recorded or derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    /// Taken from a record
    #[default]
    Regular,
    /// Inferred from circumstantial evidence
    Estimated,
    /// Computed from other dates
    Calculated,
}

/// A single calendar point
///
/// Each component is independently known (`Some`) or unknown (`None`).
/// A point without a year is empty, whatever else it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DateValue {
    /// Gregorian year
    pub year: Option<i32>,
    /// Month, 1-12
    pub month: Option<u8>,
    /// Day of month, 1-31
    pub day: Option<u8>,
}

impl DateValue {
    /// Create a point from independently optional components
    pub fn new(year: Option<i32>, month: Option<u8>, day: Option<u8>) -> Self {
        Self { year, month, day }
    }

    /// A year-only point
    pub fn from_year(year: i32) -> Self {
        Self::new(Some(year), None, None)
    }

    /// A fully specified point
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Self {
        Self::new(Some(year), Some(month), Some(day))
    }

    /// True when the year is unknown
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
    }

    /// Shift by whole years, dropping month and day precision
    ///
    /// The year saturates at the `i32` limits.
    pub fn offset_years(&self, delta: i32) -> Self {
        Self::new(self.year.map(|y| y.saturating_add(delta)), None, None)
    }

    fn sort_key(&self) -> Option<(i32, u8, u8)> {
        self.year
            .map(|y| (y, self.month.unwrap_or(0), self.day.unwrap_or(0)))
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(year) = self.year else {
            return Ok(());
        };
        write!(f, "{:04}", year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
            if let Some(day) = self.day {
                write!(f, "-{:02}", day)?;
            }
        }
        Ok(())
    }
}

/// A possibly partial, possibly qualified point or span in time
///
/// # Examples
///
/// ```
/// use lifespan_domain::{Date, Quality};
///
/// let death: Date = "1950-03-02".parse().unwrap();
/// let birth = death.copy_offset_years(-100);
/// assert_eq!(birth.year(), Some(1850));
/// assert_eq!(birth.start_date().month, None);
/// assert_eq!(birth.quality(), Quality::Estimated);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Date {
    modifier: Modifier,
    quality: Quality,
    start: DateValue,
    stop: Option<DateValue>,
    text: Option<String>,
}

impl Date {
    /// The empty (unknown) date
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a date from a single calendar point
    pub fn from_value(start: DateValue) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    /// A recorded year-only date
    pub fn from_year(year: i32) -> Self {
        Self::from_value(DateValue::from_year(year))
    }

    /// A recorded full date
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Self {
        Self::from_value(DateValue::from_ymd(year, month, day))
    }

    /// A year-only date marked as an estimate
    pub fn estimated_year(year: i32) -> Self {
        Self::from_year(year).with_quality(Quality::Estimated)
    }

    /// A "between start and stop" date
    pub fn range(start: DateValue, stop: DateValue) -> Self {
        Self {
            modifier: Modifier::Range,
            start,
            stop: Some(stop),
            ..Self::default()
        }
    }

    /// A "from start to stop" date
    pub fn span(start: DateValue, stop: DateValue) -> Self {
        Self {
            modifier: Modifier::Span,
            start,
            stop: Some(stop),
            ..Self::default()
        }
    }

    /// A date that could only be recorded as free text
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            modifier: Modifier::TextOnly,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Replace the modifier
    ///
    /// Compound modifiers (range, span) are only kept when a stop point exists.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.set_modifier(modifier);
        self
    }

    /// Replace the quality
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the modifier in place
    pub fn set_modifier(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Range | Modifier::Span if self.stop.is_none() => {}
            Modifier::Range | Modifier::Span => self.modifier = modifier,
            _ => {
                self.stop = None;
                self.modifier = modifier;
            }
        }
    }

    /// Set the quality in place
    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// The modifier
    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    /// The quality
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// The first (or only) calendar point
    pub fn start_date(&self) -> DateValue {
        self.start
    }

    /// The second point of a range or span
    pub fn stop_date(&self) -> Option<DateValue> {
        self.stop
    }

    /// Year of the start point
    pub fn year(&self) -> Option<i32> {
        self.start.year
    }

    /// Free text of a text-only date
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True when no usable year is known
    pub fn is_empty(&self) -> bool {
        self.modifier == Modifier::TextOnly || self.start.is_empty()
    }

    /// Return a copy shifted by whole years
    ///
    /// The copy carries year-only precision and [`Quality::Estimated`], so an
    /// offset value never claims a month or day it cannot know. An empty date
    /// stays empty.
    pub fn copy_offset_years(&self, delta: i32) -> Date {
        if self.is_empty() {
            return self.clone();
        }
        Date {
            modifier: self.modifier,
            quality: Quality::Estimated,
            start: self.start.offset_years(delta),
            stop: self.stop.map(|stop| stop.offset_years(delta)),
            text: None,
        }
    }

    /// Remove month and day details, making the date approximate
    pub fn make_vague(&mut self) {
        self.start.month = None;
        self.start.day = None;
        if let Some(stop) = self.stop.as_mut() {
            stop.month = None;
            stop.day = None;
        }
    }

    /// Compare start points; `None` when either date is empty
    pub fn cmp_chronological(&self, other: &Date) -> Option<Ordering> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        Some(self.start.sort_key()?.cmp(&other.start.sort_key()?))
    }

    /// True when both dates are known and this one starts strictly earlier
    pub fn is_before(&self, other: &Date) -> bool {
        self.cmp_chronological(other) == Some(Ordering::Less)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier == Modifier::TextOnly {
            return write!(f, "{}", self.text.as_deref().unwrap_or_default());
        }
        if self.start.is_empty() {
            return Ok(());
        }
        match self.quality {
            Quality::Regular => {}
            Quality::Estimated => write!(f, "est ")?,
            Quality::Calculated => write!(f, "calc ")?,
        }
        match (self.modifier, self.stop) {
            (Modifier::Range, Some(stop)) => write!(f, "between {} and {}", self.start, stop),
            (Modifier::Span, Some(stop)) => write!(f, "from {} to {}", self.start, stop),
            (Modifier::Before, _) => write!(f, "bef {}", self.start),
            (Modifier::After, _) => write!(f, "aft {}", self.start),
            (Modifier::About, _) => write!(f, "abt {}", self.start),
            _ => write!(f, "{}", self.start),
        }
    }
}

fn parse_value(s: &str) -> Result<DateValue, String> {
    // a leading '-' is the sign of the year, not a separator
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s),
    };
    let mut parts = unsigned.split('-');
    let year = parts
        .next()
        .filter(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
        .and_then(|p| p.parse::<i32>().ok())
        .filter(|y| *y <= MAX_YEAR)
        .map(|y| sign * y)
        .ok_or_else(|| format!("Invalid year in date: {}", s))?;
    let month = match parts.next() {
        Some(p) => match p.parse::<u8>() {
            Ok(m) if (1..=12).contains(&m) => Some(m),
            _ => return Err(format!("Invalid month in date: {}", s)),
        },
        None => None,
    };
    let day = match parts.next() {
        Some(p) => match p.parse::<u8>() {
            Ok(d) if (1..=31).contains(&d) => Some(d),
            _ => return Err(format!("Invalid day in date: {}", s)),
        },
        None => None,
    };
    if parts.next().is_some() {
        return Err(format!("Too many components in date: {}", s));
    }
    Ok(DateValue::new(Some(year), month, day))
}

fn split_pair<'a>(rest: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let (first, second) = rest.split_once(separator)?;
    Some((first.trim(), second.trim()))
}

impl FromStr for Date {
    type Err = String;

    /// Parse `YYYY[-MM[-DD]]` with optional quality (`est`, `calc`) and
    /// modifier (`abt`, `bef`, `aft`, `between .. and ..`, `from .. to ..`)
    /// prefixes. The empty string parses to the empty date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let mut rest = lowered.as_str();
        if rest.is_empty() {
            return Ok(Date::empty());
        }

        let mut quality = Quality::Regular;
        if let Some((word, tail)) = rest.split_once(' ') {
            match word {
                "est" | "estimated" => {
                    quality = Quality::Estimated;
                    rest = tail.trim_start();
                }
                "calc" | "calculated" => {
                    quality = Quality::Calculated;
                    rest = tail.trim_start();
                }
                _ => {}
            }
        }

        let date = if let Some(tail) = rest
            .strip_prefix("between ")
            .or_else(|| rest.strip_prefix("bet "))
        {
            let (a, b) = split_pair(tail, " and ")
                .ok_or_else(|| format!("Range without 'and': {}", s))?;
            Date::range(parse_value(a)?, parse_value(b)?)
        } else if let Some(tail) = rest.strip_prefix("from ") {
            let (a, b) = split_pair(tail, " to ")
                .ok_or_else(|| format!("Span without 'to': {}", s))?;
            Date::span(parse_value(a)?, parse_value(b)?)
        } else {
            let (modifier, point) = match rest.split_once(' ') {
                Some(("bef" | "before", p)) => (Modifier::Before, p),
                Some(("aft" | "after", p)) => (Modifier::After, p),
                Some(("abt" | "about" | "circa", p)) => (Modifier::About, p),
                Some(_) => return Err(format!("Unrecognized date: {}", s)),
                None => (Modifier::None, rest),
            };
            Date::from_value(parse_value(point.trim())?).with_modifier(modifier)
        };

        Ok(date.with_quality(quality))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_point() -> impl Strategy<Value = Date> {
        (-MAX_YEAR..=MAX_YEAR, proptest::option::of(1u8..=12), 1u8..=28).prop_map(|(y, m, d)| {
            let day = m.map(|_| d);
            Date::from_value(DateValue::new(Some(y), m, day))
        })
    }

    proptest! {
        /// Property: offset dates are year-only and marked as estimates
        #[test]
        fn test_offset_is_year_only(date in any_point(), delta in -300i32..300) {
            let shifted = date.copy_offset_years(delta);
            prop_assert_eq!(shifted.year(), date.year().map(|y| y + delta));
            prop_assert_eq!(shifted.start_date().month, None);
            prop_assert_eq!(shifted.start_date().day, None);
            prop_assert_eq!(shifted.quality(), Quality::Estimated);
        }

        /// Property: shifting forward never moves a date earlier
        #[test]
        fn test_offset_preserves_order(date in any_point(), delta in 1i32..300) {
            let shifted = date.copy_offset_years(delta);
            prop_assert!(date.is_before(&shifted));
        }

        /// Property: the textual form parses back to the same date
        #[test]
        fn test_display_parses_back(date in any_point()) {
            let parsed: Date = date.to_string().parse().unwrap();
            prop_assert_eq!(parsed, date);
        }
    }
}

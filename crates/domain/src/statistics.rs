use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use chrono::{Days, NaiveDate};
use derive_more::Display;

use crate::Workout;

#[derive(Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum DateRange {
    #[display("week")]
    Week,
    #[display("month")]
    Month,
    #[display("year")]
    Year,
    #[default]
    #[display("all")]
    All,
}

impl DateRange {
    #[must_use]
    pub fn days(self) -> Option<u64> {
        match self {
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::Year => Some(365),
            DateRange::All => None,
        }
    }

    /// First day included in the range, if the range is bounded.
    #[must_use]
    pub fn first_day(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days()
            .map(|days| today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN))
    }
}

impl FromStr for DateRange {
    type Err = DateRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            "all" => Ok(DateRange::All),
            _ => Err(DateRangeError::Unknown(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Unknown date range: {0:?}")]
    Unknown(String),
}

#[must_use]
pub fn filter_by_exercise(workouts: &[Workout], term: &str) -> Vec<Workout> {
    let term = term.trim().to_lowercase();

    if term.is_empty() {
        return workouts.to_vec();
    }

    workouts
        .iter()
        .filter(|w| w.exercise.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

#[must_use]
pub fn filter_by_date_range(
    workouts: &[Workout],
    range: DateRange,
    today: NaiveDate,
) -> Vec<Workout> {
    let Some(first_day) = range.first_day(today) else {
        return workouts.to_vec();
    };

    workouts
        .iter()
        .filter(|w| w.date >= first_day)
        .cloned()
        .collect()
}

#[must_use]
pub fn sort_by_date_desc(workouts: &[Workout]) -> Vec<Workout> {
    let mut sorted = workouts.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

#[must_use]
pub fn sort_by_date_asc(workouts: &[Workout]) -> Vec<Workout> {
    let mut sorted = workouts.to_vec();
    sorted.sort_by_key(|w| w.date);
    sorted
}

#[must_use]
pub fn volume(workout: &Workout) -> f32 {
    workout.volume()
}

#[must_use]
pub fn total_volume(workouts: &[Workout]) -> f32 {
    workouts.iter().map(Workout::volume).sum()
}

#[must_use]
pub fn unique_exercises(workouts: &[Workout]) -> Vec<String> {
    workouts
        .iter()
        .map(|w| w.exercise.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of consecutive days with at least one workout.
///
/// The streak ends at the most recent workout day, which must be today or yesterday. Otherwise
/// the streak is broken and zero is returned. Multiple workouts on the same day count once.
#[must_use]
pub fn streak(workouts: &[Workout], today: NaiveDate) -> u32 {
    let days = workouts
        .iter()
        .map(|w| w.date)
        .filter(|date| *date <= today)
        .collect::<BTreeSet<_>>();

    let Some(&latest) = days.last() else {
        return 0;
    };

    if (today - latest).num_days() > 1 {
        return 0;
    }

    let mut count = 0;
    let mut expected = latest;

    for &day in days.iter().rev() {
        if day != expected {
            break;
        }
        count += 1;
        match day.pred_opt() {
            Some(previous) => expected = previous,
            None => break,
        }
    }

    count
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub this_week: usize,
    pub last_workout: Option<NaiveDate>,
    pub streak: u32,
    pub total_volume: f32,
}

#[must_use]
pub fn summary(workouts: &[Workout], today: NaiveDate) -> Summary {
    Summary {
        total: workouts.len(),
        this_week: filter_by_date_range(workouts, DateRange::Week, today).len(),
        last_workout: workouts.iter().map(|w| w.date).max(),
        streak: streak(workouts, today),
        total_volume: total_volume(workouts),
    }
}

/// The newest `n` workouts, newest first.
#[must_use]
pub fn recent(workouts: &[Workout], n: usize) -> Vec<Workout> {
    let mut sorted = sort_by_date_desc(workouts);
    sorted.truncate(n);
    sorted
}

#[must_use]
pub fn volume_series(workouts: &[Workout]) -> Vec<(NaiveDate, f32)> {
    sort_by_date_asc(workouts)
        .iter()
        .map(|w| (w.date, w.volume()))
        .collect()
}

#[must_use]
pub fn weight_series(workouts: &[Workout]) -> Vec<(NaiveDate, f32)> {
    sort_by_date_asc(workouts)
        .iter()
        .map(|w| (w.date, *w.weight))
        .collect()
}

#[must_use]
pub fn sets_reps_series(workouts: &[Workout]) -> Vec<(NaiveDate, u32, u32)> {
    sort_by_date_asc(workouts)
        .iter()
        .map(|w| (w.date, *w.sets, *w.reps))
        .collect()
}

/// Number of workouts per exercise, ordered by exercise name.
#[must_use]
pub fn exercise_distribution(workouts: &[Workout]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for workout in workouts {
        *counts.entry(workout.exercise.to_string()).or_default() += 1;
    }

    counts.into_iter().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl From<std::ops::RangeInclusive<NaiveDate>> for Interval {
    fn from(value: std::ops::RangeInclusive<NaiveDate>) -> Self {
        Interval {
            first: *value.start(),
            last: *value.end(),
        }
    }
}

/// Determine the x domain of a chart.
///
/// The interval always ends today. It starts at the beginning of the selected range, or at the
/// earliest date if the range is unbounded or no date falls into the range.
#[must_use]
pub fn init_interval(dates: &[NaiveDate], range: DateRange, today: NaiveDate) -> Interval {
    let mut first = dates.iter().copied().min().unwrap_or(today);
    let last = dates.iter().copied().max().unwrap_or(today);

    if let Some(first_day) = range.first_day(today) {
        if last >= first_day {
            first = first_day;
        }
    }

    Interval {
        first: first.min(today),
        last: today,
    }
}

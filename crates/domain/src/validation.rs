use std::{collections::BTreeMap, fmt};

use chrono::{Months, NaiveDate};
use derive_more::Display;

use crate::{ExerciseName, NewWorkout, Reps, Sets, Weight};

#[derive(Display, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    #[display("exercise")]
    Exercise,
    #[display("date")]
    Date,
    #[display("sets")]
    Sets,
    #[display("reps")]
    Reps,
    #[display("weight")]
    Weight,
    #[display("height")]
    Height,
}

/// Per-field messages of a failed validation.
///
/// An empty set of errors is never returned as the error case of a validation, so a value of this
/// type always describes an invalid input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: Field, message: impl fmt::Display) {
        self.0.insert(field, message.to_string());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// The message shown in a notification when a form is rejected.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    /// Record the error of a field check and pass through its value.
    pub fn check<T, E: fmt::Display>(&mut self, field: Field, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.insert(field, err);
                None
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw form input for a workout, as entered by the user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkoutForm {
    pub exercise: String,
    pub date: String,
    pub sets: String,
    pub reps: String,
    pub weight: String,
}

pub fn validate_workout(form: &WorkoutForm, today: NaiveDate) -> Result<NewWorkout, FieldErrors> {
    let mut errors = FieldErrors::default();

    let exercise = errors.check(Field::Exercise, ExerciseName::new(&form.exercise));
    let date = errors.check(Field::Date, validate_date(&form.date, today));
    let sets = errors.check(Field::Sets, Sets::try_from(form.sets.as_str()));
    let reps = errors.check(Field::Reps, Reps::try_from(form.reps.as_str()));
    let weight = errors.check(Field::Weight, Weight::try_from(form.weight.as_str()));

    match (exercise, date, sets, reps, weight) {
        (Some(exercise), Some(date), Some(sets), Some(reps), Some(weight)) => Ok(NewWorkout {
            exercise,
            date,
            sets,
            reps,
            weight,
        }),
        _ => Err(errors),
    }
}

pub fn validate_date(date: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let date = date.trim();

    if date.is_empty() {
        return Err(DateError::Required);
    }

    let parsed_date =
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| DateError::Invalid)?;

    if parsed_date > today {
        return Err(DateError::InFuture);
    }

    if today
        .checked_sub_months(Months::new(12 * 10))
        .is_some_and(|limit| parsed_date < limit)
    {
        return Err(DateError::TooOld);
    }

    Ok(parsed_date)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DateError {
    #[error("Date is required")]
    Required,
    #[error("Invalid date format")]
    Invalid,
    #[error("Date cannot be in the future")]
    InFuture,
    #[error("Date seems too old. Please check.")]
    TooOld,
}

pub(crate) enum NumberIssue {
    Missing,
    NotANumber,
}

/// Parse a decimal number as entered in a form field.
///
/// Surrounding whitespace is ignored and a comma is accepted as decimal separator.
pub(crate) fn parse_number(value: &str) -> Result<f64, NumberIssue> {
    let value = value.trim();

    if value.is_empty() {
        return Err(NumberIssue::Missing);
    }

    match value.replace(',', ".").parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(NumberIssue::NotANumber),
    }
}

use chrono::{DateTime, Local, NaiveDate, Utc};
use derive_more::{AsRef, Deref, Display, Into};
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, FieldErrors, ReadError, StorageError, Summary, UpdateError,
    WorkoutForm, statistics, validation,
};

pub trait WorkoutService {
    fn get_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    fn get_workout(&self, id: &WorkoutID) -> Result<Option<Workout>, ReadError>;
    fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError>;
    fn update_workout(&self, id: &WorkoutID, patch: WorkoutPatch) -> Result<Workout, UpdateError>;
    fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError>;
    fn clear_workouts(&self) -> Result<(), DeleteError>;

    fn get_summary(&self) -> Result<Summary, ReadError> {
        Ok(statistics::summary(
            &self.get_workouts()?,
            Local::now().date_naive(),
        ))
    }

    fn get_streak(&self) -> Result<u32, ReadError> {
        Ok(statistics::streak(
            &self.get_workouts()?,
            Local::now().date_naive(),
        ))
    }

    fn validate_workout(&self, form: &WorkoutForm) -> Result<NewWorkout, FieldErrors> {
        validation::validate_workout(form, Local::now().date_naive())
    }
}

pub trait WorkoutRepository {
    fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    fn write_workouts(&self, workouts: &[Workout]) -> Result<(), StorageError>;
    fn create_workout(&self, workout: Workout) -> Result<Workout, CreateError>;
    fn modify_workout(&self, id: &WorkoutID, patch: WorkoutPatch) -> Result<Workout, UpdateError>;
    fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError>;
    fn delete_all_workouts(&self) -> Result<(), DeleteError>;

    fn read_workout(&self, id: &WorkoutID) -> Result<Option<Workout>, ReadError> {
        Ok(self
            .read_workouts()?
            .into_iter()
            .find(|workout| workout.id == *id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub exercise: ExerciseName,
    pub date: NaiveDate,
    pub sets: Sets,
    pub reps: Reps,
    pub weight: Weight,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workout {
    #[must_use]
    pub fn new(workout: NewWorkout, now: DateTime<Utc>) -> Self {
        Self {
            id: WorkoutID::random(),
            exercise: workout.exercise,
            date: workout.date,
            sets: workout.sets,
            reps: workout.reps,
            weight: workout.weight,
            created_at: Some(now),
            updated_at: None,
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let count = (*self.sets * *self.reps) as f32;
        count * *self.weight
    }

    /// Merge the given fields into the record.
    ///
    /// The identifier is never touched. The update timestamp is set to `now`, but never earlier
    /// than a timestamp the record already carries.
    pub fn apply(&mut self, patch: WorkoutPatch, now: DateTime<Utc>) {
        if let Some(exercise) = patch.exercise {
            self.exercise = exercise;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(sets) = patch.sets {
            self.sets = sets;
        }
        if let Some(reps) = patch.reps {
            self.reps = reps;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        self.updated_at = [self.updated_at, self.created_at]
            .into_iter()
            .flatten()
            .fold(Some(now), |latest, t| latest.max(Some(t)));
    }
}

/// Validated user input for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub exercise: ExerciseName,
    pub date: NaiveDate,
    pub sets: Sets,
    pub reps: Reps,
    pub weight: Weight,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WorkoutPatch {
    pub exercise: Option<ExerciseName>,
    pub date: Option<NaiveDate>,
    pub sets: Option<Sets>,
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
}

impl From<NewWorkout> for WorkoutPatch {
    fn from(value: NewWorkout) -> Self {
        Self {
            exercise: Some(value.exercise),
            date: Some(value.date),
            sets: Some(value.sets),
            reps: Some(value.reps),
            weight: Some(value.weight),
        }
    }
}

#[derive(AsRef, Deref, Display, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(String);

impl WorkoutID {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<String> for WorkoutID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WorkoutID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(AsRef, Deref, Display, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseName(String);

impl ExerciseName {
    pub fn new(name: &str) -> Result<Self, ExerciseNameError> {
        let trimmed_name = name.trim();

        if trimmed_name.is_empty() {
            return Err(ExerciseNameError::Empty);
        }

        let len = trimmed_name.chars().count();

        if len < 2 {
            return Err(ExerciseNameError::TooShort);
        }

        if len > 50 {
            return Err(ExerciseNameError::TooLong(len));
        }

        if !trimmed_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c == '\'')
        {
            return Err(ExerciseNameError::InvalidCharacters);
        }

        Ok(Self(trimmed_name.to_string()))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExerciseNameError {
    #[error("Exercise name is required")]
    Empty,
    #[error("Exercise name must be at least 2 characters")]
    TooShort,
    #[error("Exercise name must be less than 50 characters")]
    TooLong(usize),
    #[error("Exercise name can only contain letters, numbers, spaces, hyphens and apostrophes")]
    InvalidCharacters,
}

#[derive(Deref, Display, Into, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub fn new(value: u32) -> Result<Self, SetsError> {
        match value {
            0 => Err(SetsError::TooLow),
            21.. => Err(SetsError::TooHigh),
            _ => Ok(Self(value)),
        }
    }
}

impl TryFrom<&str> for Sets {
    type Error = SetsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let number = validation::parse_number(value).map_err(|issue| match issue {
            validation::NumberIssue::Missing => SetsError::Required,
            validation::NumberIssue::NotANumber => SetsError::ParseError,
        })?;

        if number < 1.0 {
            return Err(SetsError::TooLow);
        }
        if number > 20.0 {
            return Err(SetsError::TooHigh);
        }
        if number.fract() != 0.0 {
            return Err(SetsError::NotWhole);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Sets::new(number as u32)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SetsError {
    #[error("Sets is required")]
    Required,
    #[error("Sets must be a number")]
    ParseError,
    #[error("Sets must be at least 1")]
    TooLow,
    #[error("Sets must be 20 or less")]
    TooHigh,
    #[error("Sets must be a whole number")]
    NotWhole,
}

#[derive(Deref, Display, Into, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        match value {
            0 => Err(RepsError::TooLow),
            101.. => Err(RepsError::TooHigh),
            _ => Ok(Self(value)),
        }
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let number = validation::parse_number(value).map_err(|issue| match issue {
            validation::NumberIssue::Missing => RepsError::Required,
            validation::NumberIssue::NotANumber => RepsError::ParseError,
        })?;

        if number < 1.0 {
            return Err(RepsError::TooLow);
        }
        if number > 100.0 {
            return Err(RepsError::TooHigh);
        }
        if number.fract() != 0.0 {
            return Err(RepsError::NotWhole);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Reps::new(number as u32)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RepsError {
    #[error("Reps is required")]
    Required,
    #[error("Reps must be a number")]
    ParseError,
    #[error("Reps must be at least 1")]
    TooLow,
    #[error("Reps must be 100 or less")]
    TooHigh,
    #[error("Reps must be a whole number")]
    NotWhole,
}

#[derive(Deref, Display, Into, Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() {
            return Err(WeightError::ParseError);
        }

        if value < 0.5 {
            return Err(WeightError::TooLow);
        }

        if value > 500.0 {
            return Err(WeightError::TooHigh);
        }

        if (value * 2.0).fract().abs() > f32::EPSILON {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match validation::parse_number(value) {
            #[allow(clippy::cast_possible_truncation)]
            Ok(parsed_value) => Weight::new(parsed_value as f32),
            Err(validation::NumberIssue::Missing) => Err(WeightError::Required),
            Err(validation::NumberIssue::NotANumber) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WeightError {
    #[error("Weight is required")]
    Required,
    #[error("Weight must be a number")]
    ParseError,
    #[error("Weight must be at least 0.5kg")]
    TooLow,
    #[error("Weight must be 500kg or less")]
    TooHigh,
    #[error("Weight must be in 0.5kg increments")]
    InvalidResolution,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Bench Press", Ok(ExerciseName("Bench Press".to_string())))]
    #[case("  Farmer's Walk  ", Ok(ExerciseName("Farmer's Walk".to_string())))]
    #[case("T-Bar Row 2", Ok(ExerciseName("T-Bar Row 2".to_string())))]
    #[case("", Err(ExerciseNameError::Empty))]
    #[case("   ", Err(ExerciseNameError::Empty))]
    #[case("A", Err(ExerciseNameError::TooShort))]
    #[case("Squat!", Err(ExerciseNameError::InvalidCharacters))]
    #[case("<b>Curl</b>", Err(ExerciseNameError::InvalidCharacters))]
    fn test_exercise_name_new(
        #[case] name: &str,
        #[case] expected: Result<ExerciseName, ExerciseNameError>,
    ) {
        assert_eq!(ExerciseName::new(name), expected);
    }

    #[test]
    fn test_exercise_name_length_limit() {
        assert!(ExerciseName::new(&"A".repeat(50)).is_ok());
        assert_eq!(
            ExerciseName::new(&"A".repeat(51)),
            Err(ExerciseNameError::TooLong(51))
        );
        assert_eq!(
            ExerciseNameError::TooLong(51).to_string(),
            "Exercise name must be less than 50 characters"
        );
    }

    #[rstest]
    #[case(0, Err(SetsError::TooLow))]
    #[case(1, Ok(Sets(1)))]
    #[case(20, Ok(Sets(20)))]
    #[case(21, Err(SetsError::TooHigh))]
    fn test_sets_new(#[case] input: u32, #[case] expected: Result<Sets, SetsError>) {
        assert_eq!(Sets::new(input), expected);
    }

    #[rstest]
    #[case("3", Ok(Sets(3)))]
    #[case(" 20 ", Ok(Sets(20)))]
    #[case("", Err(SetsError::Required))]
    #[case("three", Err(SetsError::ParseError))]
    #[case("0", Err(SetsError::TooLow))]
    #[case("21", Err(SetsError::TooHigh))]
    #[case("2.5", Err(SetsError::NotWhole))]
    fn test_sets_from_str(#[case] input: &str, #[case] expected: Result<Sets, SetsError>) {
        assert_eq!(Sets::try_from(input), expected);
    }

    #[rstest]
    #[case("10", Ok(Reps(10)))]
    #[case("100", Ok(Reps(100)))]
    #[case("", Err(RepsError::Required))]
    #[case("x", Err(RepsError::ParseError))]
    #[case("-1", Err(RepsError::TooLow))]
    #[case("101", Err(RepsError::TooHigh))]
    #[case("7.5", Err(RepsError::NotWhole))]
    fn test_reps_from_str(#[case] input: &str, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::try_from(input), expected);
    }

    #[rstest]
    #[case(0.5, Ok(Weight(0.5)))]
    #[case(500.0, Ok(Weight(500.0)))]
    #[case(82.5, Ok(Weight(82.5)))]
    #[case(0.0, Err(WeightError::TooLow))]
    #[case(500.5, Err(WeightError::TooHigh))]
    #[case(80.25, Err(WeightError::InvalidResolution))]
    #[case(f32::NAN, Err(WeightError::ParseError))]
    fn test_weight_new(#[case] input: f32, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::new(input), expected);
    }

    #[rstest]
    #[case("80", Ok(Weight(80.0)))]
    #[case("62,5", Ok(Weight(62.5)))]
    #[case("", Err(WeightError::Required))]
    #[case("heavy", Err(WeightError::ParseError))]
    #[case("inf", Err(WeightError::ParseError))]
    #[case("0.4", Err(WeightError::TooLow))]
    #[case("60.3", Err(WeightError::InvalidResolution))]
    fn test_weight_from_str(#[case] input: &str, #[case] expected: Result<Weight, WeightError>) {
        assert_eq!(Weight::try_from(input), expected);
    }

    #[test]
    fn test_workout_volume() {
        assert_eq!(workout(3, 10, 80.0).volume(), 2400.0);
        assert_eq!(workout(5, 5, 102.5).volume(), 2562.5);
    }

    #[test]
    fn test_workout_new() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let new_workout = NewWorkout {
            exercise: ExerciseName::new("Squat").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            sets: Sets(5),
            reps: Reps(5),
            weight: Weight(100.0),
        };

        let a = Workout::new(new_workout.clone(), now);
        let b = Workout::new(new_workout, now);

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, Some(now));
        assert_eq!(a.updated_at, None);
        assert_eq!(a.exercise.as_str(), "Squat");
    }

    #[test]
    fn test_workout_apply() {
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
        let mut w = workout(3, 10, 80.0);
        let id = w.id.clone();

        w.apply(
            WorkoutPatch {
                weight: Some(Weight(100.0)),
                ..WorkoutPatch::default()
            },
            now,
        );

        assert_eq!(w.id, id);
        assert_eq!(w.weight, Weight(100.0));
        assert_eq!(w.sets, Sets(3));
        assert_eq!(w.updated_at, Some(now));
    }

    #[test]
    fn test_workout_apply_does_not_move_timestamp_backwards() {
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let mut w = workout(3, 10, 80.0);
        let previous = w.created_at;

        w.apply(WorkoutPatch::default(), earlier);

        assert_eq!(w.updated_at, previous);
        assert!(w.updated_at >= previous);
    }

    #[test]
    fn test_workout_patch_from_new_workout() {
        let new_workout = NewWorkout {
            exercise: ExerciseName::new("Deadlift").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            sets: Sets(1),
            reps: Reps(5),
            weight: Weight(140.0),
        };

        let patch = WorkoutPatch::from(new_workout);

        assert_eq!(patch.sets, Some(Sets(1)));
        assert_eq!(patch.weight, Some(Weight(140.0)));
    }

    fn workout(sets: u32, reps: u32, weight: f32) -> Workout {
        Workout {
            id: WorkoutID::from("1"),
            exercise: ExerciseName::new("Bench Press").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            sets: Sets(sets),
            reps: Reps(reps),
            weight: Weight(weight),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            updated_at: None,
        }
    }
}

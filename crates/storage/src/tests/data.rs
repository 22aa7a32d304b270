use chrono::{DateTime, NaiveDate, Utc};
use fittrack_domain as domain;

pub static WORKOUTS: std::sync::LazyLock<Vec<domain::Workout>> =
    std::sync::LazyLock::new(|| vec![WORKOUT.clone(), WORKOUT_2.clone()]);

pub static WORKOUT: std::sync::LazyLock<domain::Workout> =
    std::sync::LazyLock::new(|| domain::Workout {
        id: "1718390000000_abc123def".into(),
        exercise: domain::ExerciseName::new("Bench Press").unwrap(),
        date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
        sets: domain::Sets::new(3).unwrap(),
        reps: domain::Reps::new(10).unwrap(),
        weight: domain::Weight::new(80.0).unwrap(),
        created_at: Some(timestamp("2024-06-14T18:30:00Z")),
        updated_at: None,
    });

pub static WORKOUT_2: std::sync::LazyLock<domain::Workout> =
    std::sync::LazyLock::new(|| domain::Workout {
        id: "1718480000000_fed321cba".into(),
        exercise: domain::ExerciseName::new("Squat").unwrap(),
        date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        sets: domain::Sets::new(5).unwrap(),
        reps: domain::Reps::new(5).unwrap(),
        weight: domain::Weight::new(102.5).unwrap(),
        created_at: Some(timestamp("2024-06-15T07:45:00Z")),
        updated_at: Some(timestamp("2024-06-15T08:00:00Z")),
    });

fn timestamp(value: &str) -> DateTime<Utc> {
    value.parse().unwrap()
}

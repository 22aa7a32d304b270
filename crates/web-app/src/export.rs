use chrono::NaiveDate;
use fittrack_domain::{self as domain, statistics};

const HEADER: [&str; 6] = ["Date", "Exercise", "Sets", "Reps", "Weight (kg)", "Volume"];

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render workouts as CSV, newest first.
///
/// Fields which are not numbers are quoted.
pub fn workouts_csv(workouts: &[domain::Workout]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(HEADER)?;

    for workout in statistics::sort_by_date_desc(workouts) {
        writer.write_record([
            workout.date.format("%Y-%m-%d").to_string(),
            workout.exercise.to_string(),
            workout.sets.to_string(),
            workout.reps.to_string(),
            workout.weight.to_string(),
            workout.volume().to_string(),
        ])?;
    }

    let data = writer.into_inner().map_err(|err| err.into_error())?;

    Ok(String::from_utf8(data)?)
}

#[must_use]
pub fn filename(today: NaiveDate) -> String {
    format!("fittrack-workouts-{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn workout(id: &str, exercise: &str, date: NaiveDate, weight: f32) -> domain::Workout {
        domain::Workout {
            id: id.into(),
            exercise: domain::ExerciseName::new(exercise).unwrap(),
            date,
            sets: domain::Sets::new(3).unwrap(),
            reps: domain::Reps::new(10).unwrap(),
            weight: domain::Weight::new(weight).unwrap(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_workouts_csv() {
        let workouts = vec![
            workout(
                "1",
                "Bench Press",
                NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
                80.0,
            ),
            workout(
                "2",
                "Farmer's Walk",
                NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
                32.5,
            ),
        ];

        assert_eq!(
            workouts_csv(&workouts).unwrap(),
            concat!(
                "\"Date\",\"Exercise\",\"Sets\",\"Reps\",\"Weight (kg)\",\"Volume\"\n",
                "\"2024-06-15\",\"Farmer's Walk\",3,10,32.5,975\n",
                "\"2024-06-14\",\"Bench Press\",3,10,80,2400\n",
            )
        );
    }

    #[test]
    fn test_workouts_csv_empty() {
        assert_eq!(
            workouts_csv(&[]).unwrap(),
            "\"Date\",\"Exercise\",\"Sets\",\"Reps\",\"Weight (kg)\",\"Volume\"\n"
        );
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            filename(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
            "fittrack-workouts-2024-06-15.csv"
        );
    }
}

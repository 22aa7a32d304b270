use chrono::{Local, NaiveDate};
use fittrack_domain::{
    self as domain, DateRange, FieldErrors, StorageError, ThemeService, WorkoutService,
    statistics,
};
use log::{error, info};

use crate::export;

pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Storage is full. Export your workouts or delete some entries to free up space.";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    #[default]
    Dashboard,
    AddWorkout,
    History,
    Charts,
    Calculators,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Filters {
    pub exercise: String,
    pub range: DateRange,
}

/// State of the user interface which is not persisted.
///
/// The history shows all workouts initially, the charts the last month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub page: Page,
    pub history: Filters,
    pub charts: Filters,
    pub theme: domain::Theme,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: Page::default(),
            history: Filters::default(),
            charts: Filters {
                exercise: String::new(),
                range: DateRange::Month,
            },
            theme: domain::Theme::default(),
        }
    }
}

impl ViewState {
    /// Initial state on page load, using the stored theme preference.
    pub fn load(service: &impl ThemeService) -> Self {
        Self {
            theme: service.get_theme().unwrap_or_default(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddWorkout(domain::WorkoutForm),
    UpdateWorkout(domain::WorkoutID, domain::WorkoutForm),
    DeleteWorkout(domain::WorkoutID),
    ClearWorkouts,
    ToggleTheme,
    SetTheme(domain::Theme),
    SearchHistory(String),
    SetHistoryRange(DateRange),
    ClearHistoryFilters,
    SetChartExercise(String),
    SetChartRange(DateRange),
    Navigate(Page),
    CalculateBmi(domain::BmiForm),
    CalculateOneRepMax(domain::OneRepMaxForm),
    ExportCsv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notification {
    fn success(message: &str) -> Self {
        Self::Success(message.to_string())
    }

    fn info(message: &str) -> Self {
        Self::Info(message.to_string())
    }

    fn warning(message: &str) -> Self {
        Self::Warning(message.to_string())
    }

    fn error(message: &str) -> Self {
        Self::Error(message.to_string())
    }

    fn storage_error(err: &StorageError, message: &str) -> Self {
        if err.is_quota_exceeded() {
            Self::warning(QUOTA_EXCEEDED_MESSAGE)
        } else {
            Self::error(message)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The view has to be rendered again.
    Render,
    Notify(Notification),
    Invalid {
        notification: Notification,
        errors: FieldErrors,
    },
    Bmi(domain::Bmi),
    OneRepMax {
        value: f32,
        zones: Vec<domain::TrainingZone>,
    },
    Export {
        filename: String,
        content: String,
        notification: Notification,
    },
}

/// Perform a user command.
///
/// Filter, navigation and theme changes are applied to `state`. Everything else is delegated to
/// the service, whose result is turned into an outcome for the user.
pub fn dispatch<S: WorkoutService + ThemeService>(
    service: &S,
    state: &mut ViewState,
    action: Action,
) -> Outcome {
    match action {
        Action::AddWorkout(form) => add_workout(service, &form),
        Action::UpdateWorkout(id, form) => update_workout(service, &id, &form),
        Action::DeleteWorkout(id) => delete_workout(service, &id),
        Action::ClearWorkouts => clear_workouts(service),
        Action::ToggleTheme => {
            let theme = state.theme.toggled();
            set_theme(service, state, theme)
        }
        Action::SetTheme(theme) => set_theme(service, state, theme),
        Action::SearchHistory(term) => {
            state.history.exercise = term;
            Outcome::Render
        }
        Action::SetHistoryRange(range) => {
            state.history.range = range;
            Outcome::Render
        }
        Action::ClearHistoryFilters => {
            state.history = Filters::default();
            Outcome::Render
        }
        Action::SetChartExercise(exercise) => {
            state.charts.exercise = exercise;
            Outcome::Render
        }
        Action::SetChartRange(range) => {
            state.charts.range = range;
            Outcome::Render
        }
        Action::Navigate(page) => {
            state.page = page;
            Outcome::Render
        }
        Action::CalculateBmi(form) => match domain::validate_bmi(&form) {
            Ok(input) => Outcome::Bmi(domain::Bmi::calculate(input)),
            Err(errors) => invalid_calculation(errors),
        },
        Action::CalculateOneRepMax(form) => match domain::validate_one_rep_max(&form) {
            Ok(input) => {
                let value = domain::one_rep_max(input);
                Outcome::OneRepMax {
                    value,
                    zones: domain::training_zones(value),
                }
            }
            Err(errors) => invalid_calculation(errors),
        },
        Action::ExportCsv => export_csv(service),
    }
}

fn add_workout(service: &impl WorkoutService, form: &domain::WorkoutForm) -> Outcome {
    let workout = match service.validate_workout(form) {
        Ok(workout) => workout,
        Err(errors) => {
            return Outcome::Invalid {
                notification: Notification::error("Please fix the errors before submitting"),
                errors,
            };
        }
    };

    match service.create_workout(workout) {
        Ok(workout) => {
            info!("added workout {}", workout.id);
            Outcome::Notify(Notification::success("Workout added successfully!"))
        }
        Err(domain::CreateError::Storage(err)) => Outcome::Notify(Notification::storage_error(
            &err,
            "Failed to save workout. Please try again.",
        )),
        Err(_) => Outcome::Notify(Notification::error(
            "Failed to save workout. Please try again.",
        )),
    }
}

fn update_workout(
    service: &impl WorkoutService,
    id: &domain::WorkoutID,
    form: &domain::WorkoutForm,
) -> Outcome {
    let workout = match service.validate_workout(form) {
        Ok(workout) => workout,
        Err(errors) => {
            return Outcome::Invalid {
                notification: Notification::error("Please fix the errors before updating"),
                errors,
            };
        }
    };

    match service.update_workout(id, workout.into()) {
        Ok(_) => Outcome::Notify(Notification::success("Workout updated successfully!")),
        Err(domain::UpdateError::NotFound) => {
            Outcome::Notify(Notification::error("Workout not found"))
        }
        Err(domain::UpdateError::Storage(err)) => Outcome::Notify(Notification::storage_error(
            &err,
            "Failed to update workout",
        )),
        Err(domain::UpdateError::Other(_)) => {
            Outcome::Notify(Notification::error("Failed to update workout"))
        }
    }
}

fn delete_workout(service: &impl WorkoutService, id: &domain::WorkoutID) -> Outcome {
    match service.delete_workout(id) {
        Ok(_) => Outcome::Notify(Notification::success("Workout deleted successfully!")),
        Err(domain::DeleteError::NotFound) => {
            Outcome::Notify(Notification::error("Workout not found"))
        }
        Err(domain::DeleteError::Storage(err)) => Outcome::Notify(Notification::storage_error(
            &err,
            "Failed to delete workout",
        )),
        Err(domain::DeleteError::Other(_)) => {
            Outcome::Notify(Notification::error("Failed to delete workout"))
        }
    }
}

fn clear_workouts(service: &impl WorkoutService) -> Outcome {
    match service.get_workouts() {
        Ok(workouts) if workouts.is_empty() => {
            return Outcome::Notify(Notification::info("No workouts to clear"));
        }
        Ok(_) => {}
        Err(_) => return Outcome::Notify(Notification::error("Failed to clear workouts")),
    }

    match service.clear_workouts() {
        Ok(()) => Outcome::Notify(Notification::success("All workouts cleared")),
        Err(_) => Outcome::Notify(Notification::error("Failed to clear workouts")),
    }
}

fn set_theme(service: &impl ThemeService, state: &mut ViewState, theme: domain::Theme) -> Outcome {
    state.theme = theme;

    match service.set_theme(theme) {
        Ok(()) => Outcome::Render,
        Err(err) => Outcome::Notify(Notification::storage_error(
            &err,
            "Failed to save theme preference",
        )),
    }
}

fn invalid_calculation(errors: FieldErrors) -> Outcome {
    Outcome::Invalid {
        notification: Notification::error(
            errors
                .first_message()
                .unwrap_or("Please fix the errors before calculating"),
        ),
        errors,
    }
}

fn export_csv(service: &impl WorkoutService) -> Outcome {
    let workouts = match service.get_workouts() {
        Ok(workouts) => workouts,
        Err(_) => return Outcome::Notify(Notification::error("Failed to export workouts")),
    };

    if workouts.is_empty() {
        return Outcome::Notify(Notification::warning("No workouts to export"));
    }

    match export::workouts_csv(&workouts) {
        Ok(content) => Outcome::Export {
            filename: export::filename(Local::now().date_naive()),
            content,
            notification: Notification::success("Workouts exported successfully!"),
        },
        Err(err) => {
            error!("failed to export workouts: {err}");
            Outcome::Notify(Notification::error("Failed to export workouts"))
        }
    }
}

/// Workouts shown in the history, filtered by the history filters and sorted newest first.
#[must_use]
pub fn history(
    state: &ViewState,
    workouts: &[domain::Workout],
    today: NaiveDate,
) -> Vec<domain::Workout> {
    statistics::sort_by_date_desc(&filtered(&state.history, workouts, today))
}

/// Workouts shown in the charts, filtered by the chart filters and sorted oldest first.
#[must_use]
pub fn chart_records(
    state: &ViewState,
    workouts: &[domain::Workout],
    today: NaiveDate,
) -> Vec<domain::Workout> {
    statistics::sort_by_date_asc(&filtered(&state.charts, workouts, today))
}

fn filtered(
    filters: &Filters,
    workouts: &[domain::Workout],
    today: NaiveDate,
) -> Vec<domain::Workout> {
    let workouts = statistics::filter_by_date_range(workouts, filters.range, today);
    statistics::filter_by_exercise(&workouts, &filters.exercise)
}

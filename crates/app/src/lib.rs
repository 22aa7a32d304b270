#![warn(clippy::pedantic)]

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use log::{LevelFilter, info, warn};

use fittrack_domain::{self as domain, WorkoutService, statistics};
use fittrack_storage::{KeyValueStore, adapter::Adapter, local_storage};
use fittrack_web_app::{self as web_app, Action, Outcome, ViewState, chart};

/// Service, view state and charts of a running application.
pub struct App<S> {
    service: domain::Service<Adapter<S>>,
    state: ViewState,
}

/// Rendered SVG charts. A chart is `None` if there is nothing to show.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Charts {
    pub volume: Option<String>,
    pub weight: Option<String>,
    pub sets_reps: Option<String>,
    pub exercises: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: S) -> Self {
        let service = domain::Service::new(Adapter::new(store));
        let state = ViewState::load(&service);
        Self { service, state }
    }

    pub fn service(&self) -> &domain::Service<Adapter<S>> {
        &self.service
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        web_app::dispatch(&self.service, &mut self.state, action)
    }

    /// Render all charts for the workouts selected by the chart filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the workouts cannot be read or a chart cannot be drawn.
    pub fn charts(
        &self,
        today: NaiveDate,
        viewport_width: f64,
    ) -> Result<Charts, Box<dyn std::error::Error>> {
        let workouts = self.service.get_workouts()?;
        let workouts = web_app::view::chart_records(&self.state, &workouts, today);
        let dates = workouts.iter().map(|w| w.date).collect::<Vec<_>>();
        let interval = statistics::init_interval(&dates, self.state.charts.range, today);
        let theme = self.state.theme;
        let width = chart::chart_width(viewport_width);

        Ok(Charts {
            volume: chart::plot_volume(&workouts, &interval, theme, width)?,
            weight: chart::plot_weight(&workouts, &interval, theme, width)?,
            sets_reps: chart::plot_sets_reps(&workouts, &interval, theme, width)?,
            exercises: chart::plot_exercise_distribution(&workouts, theme, width)?,
        })
    }
}

/// Set up logging and load the application backed by the browser's local storage.
pub fn start() -> App<local_storage::LocalStorage> {
    if let Err(err) =
        web_app::log::init(Arc::new(Mutex::new(local_storage::Log)), LevelFilter::Debug)
    {
        warn!("logger already initialized: {err}");
    }

    let app = App::new(local_storage::LocalStorage);
    info!("started on {}", Local::now().date_naive());
    app
}

#[cfg(target_arch = "wasm32")]
mod entry {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::wasm_bindgen;

    use super::{App, local_storage, start};

    thread_local! {
        static APP: RefCell<Option<App<local_storage::LocalStorage>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        APP.with(|app| *app.borrow_mut() = Some(start()));
    }
}

#[cfg(test)]
mod tests {
    use fittrack_domain::DateRange;
    use fittrack_storage::memory::MemoryStore;
    use fittrack_web_app::{Notification, Page};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn form(exercise: &str, date: NaiveDate) -> domain::WorkoutForm {
        domain::WorkoutForm {
            exercise: exercise.to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            sets: "3".to_string(),
            reps: "10".to_string(),
            weight: "80".to_string(),
        }
    }

    #[test]
    fn test_new() {
        let app = App::new(MemoryStore::new());

        assert_eq!(app.state(), &ViewState::default());
        assert_eq!(app.service().get_workouts().unwrap(), vec![]);
    }

    #[test]
    fn test_new_with_stored_theme() {
        let store = MemoryStore::new();
        store.set_item("fittrack_theme", "dark").unwrap();

        let app = App::new(store);

        assert_eq!(app.state().theme, domain::Theme::Dark);
    }

    #[test]
    fn test_dispatch() {
        let mut app = App::new(MemoryStore::new());

        assert_eq!(
            app.dispatch(Action::AddWorkout(form("Squat", today()))),
            Outcome::Notify(Notification::Success(
                "Workout added successfully!".to_string()
            ))
        );
        assert_eq!(app.dispatch(Action::Navigate(Page::Charts)), Outcome::Render);

        assert_eq!(app.state().page, Page::Charts);
        assert_eq!(app.service().get_workouts().unwrap().len(), 1);
    }

    #[rstest]
    #[case::all(DateRange::All)]
    #[case::week(DateRange::Week)]
    #[case::month(DateRange::Month)]
    fn test_charts_single_workout_today(#[case] range: DateRange) {
        let mut app = App::new(MemoryStore::new());
        app.dispatch(Action::AddWorkout(form("Bench Press", today())));
        app.dispatch(Action::SetChartRange(range));

        let charts = app.charts(today(), 1024.0).unwrap();

        assert!(charts.volume.is_some());
        assert!(charts.weight.is_some());
        assert!(charts.sets_reps.is_some());
        assert!(charts.exercises.is_some());
    }

    #[test]
    fn test_charts_empty() {
        let app = App::new(MemoryStore::new());

        assert_eq!(app.charts(today(), 1024.0).unwrap(), Charts::default());
    }
}

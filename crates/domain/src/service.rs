use chrono::Utc;
use log::{error, warn};

use crate::{
    CreateError, DeleteError, NewWorkout, ReadError, StorageError, Theme, ThemeRepository,
    ThemeService, UpdateError, Workout, WorkoutID, WorkoutPatch, WorkoutRepository,
    WorkoutService,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(StorageError::QuotaExceeded) => {
                    warn!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: WorkoutRepository> WorkoutService for Service<R> {
    fn get_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(),
            ReadError,
            "get",
            "workouts"
        )
    }

    fn get_workout(&self, id: &WorkoutID) -> Result<Option<Workout>, ReadError> {
        log_on_error!(
            self.repository.read_workout(id),
            ReadError,
            "get",
            "workout"
        )
    }

    fn create_workout(&self, workout: NewWorkout) -> Result<Workout, CreateError> {
        log_on_error!(
            self.repository
                .create_workout(Workout::new(workout, Utc::now())),
            CreateError,
            "create",
            "workout"
        )
    }

    fn update_workout(&self, id: &WorkoutID, patch: WorkoutPatch) -> Result<Workout, UpdateError> {
        log_on_error!(
            self.repository.modify_workout(id, patch),
            UpdateError,
            "update",
            "workout"
        )
    }

    fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }

    fn clear_workouts(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_all_workouts(),
            DeleteError,
            "clear",
            "workouts"
        )
    }
}

impl<R: ThemeRepository> ThemeService for Service<R> {
    fn get_theme(&self) -> Result<Theme, ReadError> {
        log_on_error!(self.repository.read_theme(), ReadError, "get", "theme")
    }

    fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        let result = self.repository.write_theme(theme);
        if let Err(ref err) = result {
            error!("failed to set theme: {err}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::{ExerciseName, Reps, Sets, Weight};

    use super::*;

    #[derive(Default)]
    struct Repository {
        workouts: RefCell<Vec<Workout>>,
        theme: RefCell<Theme>,
        full: bool,
    }

    impl WorkoutRepository for Repository {
        fn read_workouts(&self) -> Result<Vec<Workout>, ReadError> {
            Ok(self.workouts.borrow().clone())
        }

        fn write_workouts(&self, workouts: &[Workout]) -> Result<(), StorageError> {
            if self.full {
                return Err(StorageError::QuotaExceeded);
            }
            *self.workouts.borrow_mut() = workouts.to_vec();
            Ok(())
        }

        fn create_workout(&self, workout: Workout) -> Result<Workout, CreateError> {
            let mut workouts = self.read_workouts()?;
            if workouts.iter().any(|w| w.id == workout.id) {
                return Err(CreateError::Conflict);
            }
            workouts.push(workout.clone());
            self.write_workouts(&workouts)?;
            Ok(workout)
        }

        fn modify_workout(
            &self,
            id: &WorkoutID,
            patch: WorkoutPatch,
        ) -> Result<Workout, UpdateError> {
            let mut workouts = self.read_workouts()?;
            let workout = workouts
                .iter_mut()
                .find(|w| w.id == *id)
                .ok_or(UpdateError::NotFound)?;
            workout.apply(patch, Utc::now());
            let workout = workout.clone();
            self.write_workouts(&workouts)?;
            Ok(workout)
        }

        fn delete_workout(&self, id: &WorkoutID) -> Result<WorkoutID, DeleteError> {
            let mut workouts = self.read_workouts()?;
            let len = workouts.len();
            workouts.retain(|w| w.id != *id);
            if workouts.len() == len {
                return Err(DeleteError::NotFound);
            }
            self.write_workouts(&workouts)?;
            Ok(id.clone())
        }

        fn delete_all_workouts(&self) -> Result<(), DeleteError> {
            self.workouts.borrow_mut().clear();
            Ok(())
        }
    }

    impl ThemeRepository for Repository {
        fn read_theme(&self) -> Result<Theme, ReadError> {
            Ok(*self.theme.borrow())
        }

        fn write_theme(&self, theme: Theme) -> Result<(), StorageError> {
            *self.theme.borrow_mut() = theme;
            Ok(())
        }
    }

    fn new_workout() -> NewWorkout {
        NewWorkout {
            exercise: ExerciseName::new("Squat").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            sets: Sets::new(5).unwrap(),
            reps: Reps::new(5).unwrap(),
            weight: Weight::new(100.0).unwrap(),
        }
    }

    #[test]
    fn test_create_workout() {
        let service = Service::new(Repository::default());

        let workout = service.create_workout(new_workout()).unwrap();

        assert!(workout.created_at.is_some());
        assert_eq!(service.get_workouts().unwrap(), vec![workout.clone()]);
        assert_eq!(service.get_workout(&workout.id).unwrap(), Some(workout));
        assert_eq!(service.get_workout(&WorkoutID::from("unknown")).unwrap(), None);
    }

    #[test]
    fn test_create_workout_quota_exceeded() {
        let service = Service::new(Repository {
            full: true,
            ..Repository::default()
        });

        assert!(matches!(
            service.create_workout(new_workout()),
            Err(CreateError::Storage(StorageError::QuotaExceeded))
        ));
        assert_eq!(service.get_workouts().unwrap(), vec![]);
    }

    #[test]
    fn test_update_workout() {
        let service = Service::new(Repository::default());
        let workout = service.create_workout(new_workout()).unwrap();

        let updated = service
            .update_workout(
                &workout.id,
                WorkoutPatch {
                    weight: Some(Weight::new(100.5).unwrap()),
                    ..WorkoutPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, workout.id);
        assert_eq!(*updated.weight, 100.5);
        assert!(updated.updated_at >= workout.created_at);
        assert!(matches!(
            service.update_workout(&WorkoutID::from("unknown"), WorkoutPatch::default()),
            Err(UpdateError::NotFound)
        ));
    }

    #[test]
    fn test_delete_workout() {
        let service = Service::new(Repository::default());
        let workout = service.create_workout(new_workout()).unwrap();

        assert!(matches!(
            service.delete_workout(&WorkoutID::from("unknown")),
            Err(DeleteError::NotFound)
        ));
        assert_eq!(service.get_workouts().unwrap().len(), 1);
        assert_eq!(service.delete_workout(&workout.id).unwrap(), workout.id);
        assert_eq!(service.get_workouts().unwrap(), vec![]);
    }

    #[test]
    fn test_clear_workouts() {
        let service = Service::new(Repository::default());
        service.create_workout(new_workout()).unwrap();
        service.create_workout(new_workout()).unwrap();

        service.clear_workouts().unwrap();

        assert_eq!(service.get_workouts().unwrap(), vec![]);
        assert_eq!(service.get_summary().unwrap().total, 0);
        assert_eq!(service.get_streak().unwrap(), 0);
    }

    #[test]
    fn test_theme() {
        let service = Service::new(Repository::default());

        assert_eq!(service.get_theme().unwrap(), Theme::Light);
        service.set_theme(Theme::Dark).unwrap();
        assert_eq!(service.get_theme().unwrap(), Theme::Dark);
    }
}

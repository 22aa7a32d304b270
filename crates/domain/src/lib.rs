#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod calculator;
mod error;
mod service;
pub mod statistics;
mod theme;
mod validation;
mod workout;

pub use calculator::*;
pub use error::*;
pub use service::*;
pub use statistics::{DateRange, DateRangeError, Interval, Summary};
pub use theme::*;
pub use validation::{DateError, Field, FieldErrors, WorkoutForm, validate_date, validate_workout};
pub use workout::*;

#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

pub mod chart;
pub mod export;
pub mod log;
pub mod view;

pub use view::{Action, Filters, Notification, Outcome, Page, ViewState, dispatch};

use std::{borrow::BorrowMut, collections::BTreeMap, ops::Range};

use chrono::NaiveDate;
use fittrack_domain::{self as domain, statistics};
use plotters::{
    chart::ChartBuilder,
    prelude::{Circle, IntoDrawingArea, IntoSegmentedCoord, SVGBackend, SegmentValue},
    series::{AreaSeries, Histogram, LineSeries},
    style::{Color, IntoFont, Palette, Palette99, RGBColor, TextStyle, WHITE},
};

pub const COLOR_VOLUME: usize = 1;
pub const COLOR_WEIGHT: usize = 8;
pub const COLOR_SETS: usize = 4;
pub const COLOR_REPS: usize = 5;
pub const COLOR_EXERCISES: usize = 2;

pub const OPACITY_LINE: f64 = 0.9;
pub const OPACITY_AREA: f64 = 0.3;
pub const OPACITY_BAR: f64 = 0.7;

pub const WIDTH_LINE: u32 = 2;
pub const SIZE_POINT: u32 = 3;

pub const HEIGHT: u32 = 200;

pub const FONT: (&str, u32) = ("Roboto", 11);

#[derive(Clone)]
pub enum PlotType {
    Circle(usize, f64, u32),
    Line(usize, f64, u32),
    Histogram(usize, f64),
    Area(usize, f64),
}

#[derive(Default, Clone, Copy)]
pub struct PlotParams {
    pub y_min_opt: Option<f32>,
    pub secondary: bool,
}

impl PlotParams {
    pub const ZERO_BASED: Self = Self {
        y_min_opt: Some(0.0),
        secondary: false,
    };

    pub const SECONDARY: Self = Self {
        y_min_opt: Some(0.0),
        secondary: true,
    };
}

#[derive(Clone)]
pub struct PlotData {
    pub values: Vec<(NaiveDate, f32)>,
    pub plots: Vec<PlotType>,
    pub params: PlotParams,
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
struct Bounds {
    min: f32,
    max: f32,
}

impl Bounds {
    fn min_with_margin(self) -> f32 {
        if self.min <= f32::EPSILON {
            return self.min;
        }
        f32::max(self.min - self.margin(), 0.0)
    }

    fn max_with_margin(self) -> f32 {
        self.max + self.margin()
    }

    fn margin(self) -> f32 {
        if (self.max - self.min).abs() > f32::EPSILON {
            return (self.max - self.min) * 0.1;
        }
        0.1
    }
}

/// Volume of each workout, drawn as a filled line with a point per workout.
#[allow(clippy::missing_errors_doc)]
pub fn plot_volume(
    workouts: &[domain::Workout],
    interval: &domain::Interval,
    theme: domain::Theme,
    width: u32,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    plot(
        &[PlotData {
            values: statistics::volume_series(workouts),
            plots: vec![
                PlotType::Area(COLOR_VOLUME, OPACITY_AREA),
                PlotType::Line(COLOR_VOLUME, OPACITY_LINE, WIDTH_LINE),
                PlotType::Circle(COLOR_VOLUME, OPACITY_LINE, SIZE_POINT),
            ],
            params: PlotParams::ZERO_BASED,
        }],
        interval,
        theme,
        width,
    )
}

/// Weight of each workout. The y axis is fitted to the data instead of starting at zero.
#[allow(clippy::missing_errors_doc)]
pub fn plot_weight(
    workouts: &[domain::Workout],
    interval: &domain::Interval,
    theme: domain::Theme,
    width: u32,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    plot(
        &[PlotData {
            values: statistics::weight_series(workouts),
            plots: vec![
                PlotType::Line(COLOR_WEIGHT, OPACITY_LINE, WIDTH_LINE),
                PlotType::Circle(COLOR_WEIGHT, OPACITY_LINE, SIZE_POINT),
            ],
            params: PlotParams::default(),
        }],
        interval,
        theme,
        width,
    )
}

/// Total sets per day as bars on the primary axis and total reps per day as a line on the
/// secondary axis.
#[allow(clippy::missing_errors_doc)]
pub fn plot_sets_reps(
    workouts: &[domain::Workout],
    interval: &domain::Interval,
    theme: domain::Theme,
    width: u32,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let (sets, reps) = daily_sets_reps(workouts);

    plot(
        &[
            PlotData {
                values: sets,
                plots: vec![PlotType::Histogram(COLOR_SETS, OPACITY_BAR)],
                params: PlotParams::ZERO_BASED,
            },
            PlotData {
                values: reps,
                plots: vec![
                    PlotType::Line(COLOR_REPS, OPACITY_LINE, WIDTH_LINE),
                    PlotType::Circle(COLOR_REPS, OPACITY_LINE, SIZE_POINT),
                ],
                params: PlotParams::SECONDARY,
            },
        ],
        interval,
        theme,
        width,
    )
}

/// Number of workouts per exercise as one bar per exercise, labeled with the exercise name.
#[allow(clippy::missing_errors_doc)]
pub fn plot_exercise_distribution(
    workouts: &[domain::Workout],
    theme: domain::Theme,
    width: u32,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let distribution = statistics::exercise_distribution(workouts)
        .into_iter()
        .map(|(exercise, count)| (exercise, u32::try_from(count).unwrap_or(u32::MAX)))
        .collect::<Vec<_>>();

    let Some(max) = distribution.iter().map(|(_, count)| *count).max() else {
        return Ok(None);
    };
    let exercises = u32::try_from(distribution.len())?;

    let mut result = String::new();

    {
        let root = SVGBackend::with_string(&mut result, (width, HEIGHT)).into_drawing_area();
        let (color, background_color) = colors(theme);

        root.fill(&background_color)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10f32)
            .x_label_area_size(30f32)
            .y_label_area_size(40f32)
            .build_cartesian_2d((0..exercises).into_segmented(), 0..max.saturating_add(1))?;

        let label = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(idx) => usize::try_from(*idx)
                .ok()
                .and_then(|idx| distribution.get(idx))
                .map(|(exercise, _)| exercise.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .set_all_tick_mark_size(3u32)
            .axis_style(color.mix(0.3))
            .bold_line_style(color.mix(0.05))
            .light_line_style(color.mix(0.0))
            .label_style(TextStyle::from(FONT.into_font()).color(&color))
            .x_labels(distribution.len())
            .x_label_formatter(&label)
            .y_labels(usize::try_from(max).unwrap_or(usize::MAX).min(6))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(Palette99::pick(COLOR_EXERCISES).mix(OPACITY_BAR).filled())
                .margin(5)
                .data((0..exercises).zip(distribution.iter().map(|(_, count)| *count))),
        )?;

        root.present()?;
    }

    Ok(Some(result))
}

#[allow(clippy::cast_precision_loss)]
fn daily_sets_reps(workouts: &[domain::Workout]) -> (Vec<(NaiveDate, f32)>, Vec<(NaiveDate, f32)>) {
    let mut days: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();

    for (date, sets, reps) in statistics::sets_reps_series(workouts) {
        let day = days.entry(date).or_default();
        day.0 += sets;
        day.1 += reps;
    }

    days.into_iter()
        .map(|(date, (sets, reps))| ((date, sets as f32), (date, reps as f32)))
        .unzip()
}

/// Plot data onto a chart.
///
/// The x domain of the chart is configured by the interval parameter and the colors are
/// determined by the theme. Every `PlotData` element contains one series, which is drawn by
/// each of its plots in order. Series with `params.secondary` set are drawn against a second
/// y axis on the right. That axis is omitted if no such series exists.
///
/// Returns `None` if there is nothing to draw.
#[allow(clippy::missing_errors_doc)]
pub fn plot(
    data: &[PlotData],
    interval: &domain::Interval,
    theme: domain::Theme,
    width: u32,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if all_zeros(data) {
        return Ok(None);
    }

    let (Some(primary_bounds), secondary_bounds) = determine_y_bounds(data) else {
        return Ok(None);
    };

    let dates = x_range(interval);
    let mut result = String::new();

    {
        let root = SVGBackend::with_string(&mut result, (width, HEIGHT)).into_drawing_area();
        let (color, background_color) = colors(theme);

        root.fill(&background_color)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10f32)
            .x_label_area_size(30f32)
            .y_label_area_size(40f32)
            .right_y_label_area_size(secondary_bounds.map_or_else(|| 0f32, |_| 40f32))
            .build_cartesian_2d(
                dates.clone(),
                primary_bounds.min_with_margin()..primary_bounds.max_with_margin(),
            )?
            .set_secondary_coord(
                dates.clone(),
                secondary_bounds
                    .as_ref()
                    .map_or(0.0..0.0, |b| b.min_with_margin()..b.max_with_margin()),
            );

        chart
            .configure_mesh()
            .disable_x_mesh()
            .set_all_tick_mark_size(3u32)
            .axis_style(color.mix(0.3))
            .bold_line_style(color.mix(0.05))
            .light_line_style(color.mix(0.0))
            .label_style(TextStyle::from(FONT.into_font()).color(&color))
            .x_labels(2)
            .y_labels(6)
            .draw()?;

        if secondary_bounds.is_some() {
            chart
                .configure_secondary_axes()
                .set_all_tick_mark_size(3u32)
                .axis_style(color.mix(0.3))
                .label_style(TextStyle::from(FONT.into_font()).color(&color))
                .draw()?;
        }

        for plot_data in data {
            let mut values = plot_data.values.clone();
            values.sort_by_key(|e| e.0);
            values.retain(|(date, _)| dates.start <= *date && *date <= dates.end);

            for plot in &plot_data.plots {
                match *plot {
                    PlotType::Circle(color, opacity, size) => {
                        let series = values.iter().map(|(x, y)| {
                            Circle::new(
                                (*x, *y),
                                size,
                                Palette99::pick(color).mix(opacity).filled(),
                            )
                        });
                        if plot_data.params.secondary {
                            chart.draw_secondary_series(series)?;
                        } else {
                            chart.draw_series(series)?;
                        }
                    }
                    PlotType::Line(color, opacity, size) => {
                        let series = LineSeries::new(
                            values.iter().copied(),
                            Palette99::pick(color).mix(opacity).stroke_width(size),
                        );
                        if plot_data.params.secondary {
                            chart.draw_secondary_series(series)?;
                        } else {
                            chart.draw_series(series)?;
                        }
                    }
                    PlotType::Histogram(color, opacity) => {
                        let series = Histogram::vertical(&chart)
                            .style(Palette99::pick(color).mix(opacity).filled())
                            .margin(0) // https://github.com/plotters-rs/plotters/issues/300
                            .data(values.iter().copied());
                        if plot_data.params.secondary {
                            chart.draw_secondary_series(series)?;
                        } else {
                            chart.draw_series(series)?;
                        }
                    }
                    PlotType::Area(color, opacity) => {
                        let series = AreaSeries::new(
                            values.iter().copied(),
                            0.0,
                            Palette99::pick(color).mix(opacity),
                        );
                        if plot_data.params.secondary {
                            chart.draw_secondary_series(series)?;
                        } else {
                            chart.draw_series(series)?;
                        }
                    }
                }
            }
        }

        root.present()?;
    }

    Ok(Some(result))
}

/// The x range of a chart. A range covering a single day is extended by the previous day, as
/// the date axis cannot map an empty range.
fn x_range(interval: &domain::Interval) -> Range<NaiveDate> {
    if interval.first < interval.last {
        return interval.first..interval.last;
    }
    interval.last.pred_opt().unwrap_or(interval.last)..interval.last
}

/// Width of a chart for the given viewport width.
#[must_use]
pub fn chart_width(viewport_width: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = (viewport_width.max(0.0) as u32).saturating_sub(20);
    width.clamp(300, 960)
}

fn all_zeros(data: &[PlotData]) -> bool {
    data.iter().all(|plot| plot.values.iter().all(|(_, v)| *v == 0.0))
}

fn colors(theme: domain::Theme) -> (RGBColor, RGBColor) {
    let dark = RGBColor(20, 22, 26);
    match theme {
        domain::Theme::Light => (dark, WHITE),
        domain::Theme::Dark => (WHITE, dark),
    }
}

fn determine_y_bounds(data: &[PlotData]) -> (Option<Bounds>, Option<Bounds>) {
    let mut primary_bounds: Option<Bounds> = None;
    let mut secondary_bounds: Option<Bounds> = None;

    for plot in data.iter().filter(|plot| !plot.values.is_empty()) {
        let min = plot
            .values
            .iter()
            .map(|(_, v)| *v)
            .fold(plot.params.y_min_opt.unwrap_or(f32::MAX), f32::min);
        let max = plot.values.iter().map(|(_, v)| *v).fold(0., f32::max);

        let b = if plot.params.secondary {
            secondary_bounds.borrow_mut()
        } else {
            primary_bounds.borrow_mut()
        }
        .get_or_insert(Bounds { min, max });

        b.min = f32::min(b.min, min);
        b.max = f32::max(b.max, max);
    }

    (primary_bounds, secondary_bounds)
}

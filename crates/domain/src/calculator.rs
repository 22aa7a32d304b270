use derive_more::Display;

use crate::{Field, FieldErrors, validation};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BmiForm {
    pub weight: String,
    pub height: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiInput {
    pub weight: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi {
    pub value: f32,
    pub category: BmiCategory,
}

impl Bmi {
    #[must_use]
    pub fn calculate(input: BmiInput) -> Self {
        let height_in_meters = input.height / 100.0;
        let value = input.weight / (height_in_meters * height_in_meters);
        Self {
            value,
            category: BmiCategory::from(value),
        }
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    #[display("Underweight")]
    Underweight,
    #[display("Normal weight")]
    Normal,
    #[display("Overweight")]
    Overweight,
    #[display("Obese")]
    Obese,
}

impl From<f32> for BmiCategory {
    fn from(value: f32) -> Self {
        if value < 18.5 {
            BmiCategory::Underweight
        } else if value < 25.0 {
            BmiCategory::Normal
        } else if value < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OneRepMaxForm {
    pub weight: String,
    pub reps: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneRepMaxInput {
    pub weight: f32,
    pub reps: u32,
}

/// Estimate the one-repetition maximum using the Epley formula.
#[must_use]
pub fn one_rep_max(input: OneRepMaxInput) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let reps = input.reps as f32;
    input.weight * (1.0 + reps / 30.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingZone {
    pub percent: u8,
    pub reps: &'static str,
    pub weight: f32,
}

const TRAINING_ZONES: [(u8, &str); 8] = [
    (95, "1-2"),
    (90, "2-4"),
    (85, "4-6"),
    (80, "6-8"),
    (75, "8-10"),
    (70, "10-12"),
    (65, "12-15"),
    (60, "15-20"),
];

#[must_use]
pub fn training_zones(one_rep_max: f32) -> Vec<TrainingZone> {
    TRAINING_ZONES
        .iter()
        .map(|&(percent, reps)| TrainingZone {
            percent,
            reps,
            weight: one_rep_max * f32::from(percent) / 100.0,
        })
        .collect()
}

pub fn validate_bmi(form: &BmiForm) -> Result<BmiInput, FieldErrors> {
    let mut errors = FieldErrors::default();

    let weight = errors.check(Field::Weight, BODY_WEIGHT.parse(&form.weight));
    let height = errors.check(Field::Height, HEIGHT.parse(&form.height));

    match (weight, height) {
        (Some(weight), Some(height)) => Ok(BmiInput { weight, height }),
        _ => Err(errors),
    }
}

pub fn validate_one_rep_max(form: &OneRepMaxForm) -> Result<OneRepMaxInput, FieldErrors> {
    let mut errors = FieldErrors::default();

    let weight = errors.check(Field::Weight, LIFT_WEIGHT.parse(&form.weight));
    let reps = errors.check(Field::Reps, LIFT_REPS.parse(&form.reps));

    match (weight, reps) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        (Some(weight), Some(reps)) => Ok(OneRepMaxInput {
            weight,
            reps: reps as u32,
        }),
        _ => Err(errors),
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QuantityError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a number")]
    ParseError(&'static str),
    #[error("{name} must be at least {min}{unit}")]
    TooLow {
        name: &'static str,
        min: f32,
        unit: &'static str,
    },
    #[error("{name} must be {max}{unit} or less{note}")]
    TooHigh {
        name: &'static str,
        max: f32,
        unit: &'static str,
        note: &'static str,
    },
    #[error("{0} must be a whole number")]
    NotWhole(&'static str),
}

struct Quantity {
    name: &'static str,
    unit: &'static str,
    min: f32,
    max: f32,
    note: &'static str,
    whole: bool,
}

const BODY_WEIGHT: Quantity = Quantity {
    name: "Weight",
    unit: "kg",
    min: 20.0,
    max: 300.0,
    note: "",
    whole: false,
};

const HEIGHT: Quantity = Quantity {
    name: "Height",
    unit: "cm",
    min: 50.0,
    max: 250.0,
    note: "",
    whole: false,
};

const LIFT_WEIGHT: Quantity = Quantity {
    name: "Weight",
    unit: "kg",
    min: 1.0,
    max: 500.0,
    note: "",
    whole: false,
};

const LIFT_REPS: Quantity = Quantity {
    name: "Reps",
    unit: "",
    min: 1.0,
    max: 10.0,
    note: " (for accurate 1RM estimation)",
    whole: true,
};

impl Quantity {
    fn parse(&self, value: &str) -> Result<f32, QuantityError> {
        #[allow(clippy::cast_possible_truncation)]
        let number = match validation::parse_number(value) {
            Ok(number) => number as f32,
            Err(validation::NumberIssue::Missing) => {
                return Err(QuantityError::Required(self.name));
            }
            Err(validation::NumberIssue::NotANumber) => {
                return Err(QuantityError::ParseError(self.name));
            }
        };

        if number < self.min {
            return Err(QuantityError::TooLow {
                name: self.name,
                min: self.min,
                unit: self.unit,
            });
        }

        if number > self.max {
            return Err(QuantityError::TooHigh {
                name: self.name,
                max: self.max,
                unit: self.unit,
                note: self.note,
            });
        }

        if self.whole && number.fract() != 0.0 {
            return Err(QuantityError::NotWhole(self.name));
        }

        Ok(number)
    }
}

use std::str::FromStr;

use derive_more::Display;

use crate::{ReadError, StorageError};

pub trait ThemeService {
    fn get_theme(&self) -> Result<Theme, ReadError>;
    fn set_theme(&self, theme: Theme) -> Result<(), StorageError>;
}

pub trait ThemeRepository {
    fn read_theme(&self) -> Result<Theme, ReadError>;
    fn write_theme(&self, theme: Theme) -> Result<(), StorageError>;
}

#[derive(Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Theme {
    #[default]
    #[display("light")]
    Light,
    #[display("dark")]
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ThemeError::Invalid(s.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Invalid theme: {0:?}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("light", Ok(Theme::Light))]
    #[case("dark", Ok(Theme::Dark))]
    #[case("Dark", Err(ThemeError::Invalid("Dark".to_string())))]
    #[case("system", Err(ThemeError::Invalid("system".to_string())))]
    #[case("", Err(ThemeError::Invalid(String::new())))]
    fn test_theme_from_str(#[case] input: &str, #[case] expected: Result<Theme, ThemeError>) {
        assert_eq!(input.parse::<Theme>(), expected);
    }

    #[rstest]
    #[case(Theme::Light, "light")]
    #[case(Theme::Dark, "dark")]
    fn test_theme_display(#[case] theme: Theme, #[case] expected: &str) {
        assert_eq!(theme.to_string(), expected);
        assert_eq!(theme.as_str(), expected);
    }

    #[test]
    fn test_theme_toggled() {
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}

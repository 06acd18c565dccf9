// src/preset.rs
use std::fmt;

use crate::errors::{Result, SubmitError};

/// Output formats offered by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Default,
    Wtc,
    Rus,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Default, Format::Wtc, Format::Rus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Default => "default",
            Format::Wtc => "wtc",
            Format::Rus => "rus",
        }
    }

    /// Option combination selected together with this format.
    pub fn preset(&self) -> Preset {
        match self {
            Format::Wtc => Preset {
                minimize: true,
                secondaries: true,
                costs: false,
                model_count: true,
            },
            Format::Default | Format::Rus => Preset {
                minimize: true,
                secondaries: true,
                costs: false,
                model_count: false,
            },
        }
    }
}

impl std::str::FromStr for Format {
    type Err = SubmitError;

    fn from_str(value: &str) -> Result<Self> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str() == value.trim())
            .ok_or_else(|| SubmitError::UnknownFormat(value.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of the formatter option checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preset {
    /// Hide selections every unit of the kind has anyway.
    pub minimize: bool,
    pub secondaries: bool,
    /// Strip point costs from the output.
    pub costs: bool,
    pub model_count: bool,
}

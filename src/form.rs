// src/form.rs
use std::path::{Path, PathBuf};

use crate::controller::FormSource;
use crate::errors::{Result, SubmitError};
use crate::preset::{Format, Preset};
use crate::snapshot::{FilePart, FormSnapshot};

pub const ROSTER_FIELD: &str = "roster";
pub const FORMAT_FIELD: &str = "format";
pub const HIDE_BASIC_SELECTIONS_FIELD: &str = "hide_basic_selections";
pub const SHOW_SECONDARIES_FIELD: &str = "show_secondaries";
pub const REMOVE_COSTS_FIELD: &str = "remove_costs";
pub const SHOW_MODEL_COUNT_FIELD: &str = "show_model_count";

/// Value a checked checkbox submits.
const CHECKED: &str = "on";

/// The roster upload form: a BattleScribe file, an output format and the
/// formatter options.
#[derive(Debug, Clone)]
pub struct RosterForm {
    roster: PathBuf,
    format: Format,
    options: Preset,
}

impl RosterForm {
    pub fn new(roster: impl Into<PathBuf>) -> Self {
        let format = Format::default();
        Self {
            roster: roster.into(),
            format,
            options: format.preset(),
        }
    }

    pub fn roster(&self) -> &Path {
        &self.roster
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn options(&self) -> Preset {
        self.options
    }

    /// Selects a format and resets the option checkboxes to its preset.
    pub fn select_format(&mut self, format: Format) {
        self.format = format;
        self.options = format.preset();
    }

    pub fn options_mut(&mut self) -> &mut Preset {
        &mut self.options
    }
}

impl FormSource for RosterForm {
    fn snapshot(&self) -> Result<FormSnapshot> {
        if !is_roster_file(&self.roster) {
            return Err(SubmitError::InvalidForm(format!(
                "'{}' doesn't end with .ros or .rosz and therefore couldn't be parsed \
                 as valid BattleScribe file",
                self.roster.display()
            )));
        }

        let mut snapshot = FormSnapshot::new();
        snapshot.push_file(ROSTER_FIELD, FilePart::from_path(&self.roster)?);
        snapshot.push_text(FORMAT_FIELD, self.format.as_str());

        let checkboxes = [
            (HIDE_BASIC_SELECTIONS_FIELD, self.options.minimize),
            (SHOW_SECONDARIES_FIELD, self.options.secondaries),
            (REMOVE_COSTS_FIELD, self.options.costs),
            (SHOW_MODEL_COUNT_FIELD, self.options.model_count),
        ];
        for (name, checked) in checkboxes {
            if checked {
                snapshot.push_text(name, CHECKED);
            }
        }

        Ok(snapshot)
    }
}

fn is_roster_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("ros") | Some("rosz")
    )
}

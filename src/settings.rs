use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::column::DEFAULT_COLUMN_WIDTH;
use crate::error::{Result, SettingsError};
use crate::state::MAX_GROUP_DEPTH;

pub const DEFAULT_ROW_HEIGHT: f32 = 35.0;
pub const DEFAULT_REM_SIZE: f32 = 16.0;

/// Layout preferences kept in a companion file next to a data file
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GridSettings {
    pub column_widths: Option<Vec<f32>>,
    pub row_height: Option<f32>,
    pub rem_size: Option<f32>,
    pub max_group_depth: Option<usize>,
}

impl GridSettings {
    /// Get the settings file path for a given data file
    pub fn settings_path(data_path: &Path) -> PathBuf {
        let mut path = data_path.to_path_buf();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("grid");
        path.set_file_name(format!("{}.gridcells", file_name));
        path
    }

    /// Load settings for a data file. A missing companion file yields defaults.
    pub fn load(data_path: &Path) -> Result<Self> {
        Self::load_file(&Self::settings_path(data_path))
    }

    /// Load settings from the settings file itself.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, data_path: &Path) -> Result<()> {
        let path = Self::settings_path(data_path);
        let content = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Serialize {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, content).map_err(|source| SettingsError::Write { path, source })
    }

    /// Get column widths, filling with defaults if needed
    pub fn column_widths(&self, count: usize) -> Vec<f32> {
        let mut widths = self.column_widths.clone().unwrap_or_default();
        widths.resize(count, DEFAULT_COLUMN_WIDTH);
        widths
    }

    pub fn row_height(&self) -> f32 {
        self.row_height.unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    pub fn rem_size(&self) -> f32 {
        self.rem_size.unwrap_or(DEFAULT_REM_SIZE)
    }

    pub fn max_group_depth(&self) -> usize {
        self.max_group_depth.unwrap_or(MAX_GROUP_DEPTH).min(MAX_GROUP_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gridcells-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("tasks.csv")
    }

    #[test]
    fn companion_path_sits_next_to_the_data() {
        let path = GridSettings::settings_path(Path::new("/data/tasks.csv"));
        assert_eq!(path, PathBuf::from("/data/tasks.csv.gridcells"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = GridSettings::load(&scratch("missing")).unwrap();
        assert_eq!(settings, GridSettings::default());
        assert_eq!(settings.row_height(), DEFAULT_ROW_HEIGHT);
        assert_eq!(settings.max_group_depth(), 3);
    }

    #[test]
    fn save_then_load() {
        let data = scratch("save");
        let settings = GridSettings {
            column_widths: Some(vec![80.0, 200.0]),
            row_height: Some(28.0),
            rem_size: None,
            max_group_depth: Some(2),
        };
        settings.save(&data).unwrap();
        let loaded = GridSettings::load(&data).unwrap();
        assert_eq!(loaded.column_widths(3), vec![80.0, 200.0, DEFAULT_COLUMN_WIDTH]);
        assert_eq!(loaded.row_height(), 28.0);
        assert_eq!(loaded.rem_size(), DEFAULT_REM_SIZE);
        assert_eq!(loaded.max_group_depth(), 2);
    }

    #[test]
    fn group_depth_is_clamped() {
        let settings = GridSettings {
            max_group_depth: Some(7),
            ..Default::default()
        };
        assert_eq!(settings.max_group_depth(), MAX_GROUP_DEPTH);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let data = scratch("garbage");
        std::fs::write(GridSettings::settings_path(&data), "{ not json").unwrap();
        let err = GridSettings::load(&data).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("tasks.csv.gridcells"));
    }
}

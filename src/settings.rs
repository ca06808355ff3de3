//! Game settings and startup options
//!
//! Settings come from an optional JSON file and are then overridden by
//! command-line switches. Only the scroll mode reaches the simulation; the
//! theme and paths are passed on to the frontend untouched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use crate::sim::ScrollMode;

/// Installed theme used when none is requested
pub const DEFAULT_THEME: &str = "jumpnbump";
/// Where installed themes live unless configured otherwise
pub const DEFAULT_THEME_DIR: &str = "/usr/share/falling-tower/themes";

/// Errors from loading settings or parsing options
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is invalid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unrecognized option '{0}'")]
    UnknownOption(String),
    #[error("option '{0}' requires an argument")]
    MissingValue(&'static str),
}

/// Sprite sheet selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    /// A theme shipped with the game, by name
    Installed(String),
    /// A custom sprite sheet
    File(PathBuf),
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Installed(DEFAULT_THEME.to_string())
    }
}

/// What the command line asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRequest {
    Play,
    ShowHelp,
    ShowVersion,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scroll_mode: ScrollMode,
    pub theme: Theme,
    pub theme_dir: PathBuf,
    /// Overrides the per-user highscore location
    pub highscore_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scroll_mode: ScrollMode::Soft,
            theme: Theme::default(),
            theme_dir: PathBuf::from(DEFAULT_THEME_DIR),
            highscore_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`Settings::load`], but any problem falls back to the defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}. Using default settings");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Apply command-line switches (without the program name)
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<LaunchRequest, SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let (name, inline) = match arg.split_once('=') {
                Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
                _ => (arg, None),
            };

            let mut value = |option: &'static str| -> Result<String, SettingsError> {
                inline
                    .clone()
                    .or_else(|| args.next().map(|v| v.as_ref().to_string()))
                    .ok_or(SettingsError::MissingValue(option))
            };

            match name {
                "-h" | "--help" => return Ok(LaunchRequest::ShowHelp),
                "-v" | "--version" => return Ok(LaunchRequest::ShowVersion),
                "--soft-scroll" => self.scroll_mode = ScrollMode::Soft,
                "--hard-scroll" => self.scroll_mode = ScrollMode::Hard,
                "-t" | "--theme" => self.theme = Theme::Installed(value("--theme")?),
                "--graphic" => self.theme = Theme::File(PathBuf::from(value("--graphic")?)),
                other => return Err(SettingsError::UnknownOption(other.to_string())),
            }
        }
        Ok(LaunchRequest::Play)
    }

    /// Path of the sprite sheet to load
    pub fn theme_path(&self) -> PathBuf {
        match &self.theme {
            Theme::Installed(name) => self.theme_dir.join(format!("{name}.bmp")),
            Theme::File(path) => path.clone(),
        }
    }

    /// Usage text for `--help`
    pub fn usage(program: &str) -> String {
        format!(
            "Usage: {program} [OPTIONS]...\n\
             A tower climbing arcade game.\n\
             \n\
             \x20 -h --help        show this help message and exit\n\
             \x20 -v --version     show version information and exit\n\
             \x20 --soft-scroll    smooth, interpolated scrolling (default)\n\
             \x20 --hard-scroll    classic tile-by-tile scrolling\n\
             \x20 --theme NAME     use a pre-installed sprite theme (eg. --theme=classic)\n\
             \x20 --graphic FILE   use a custom sprite theme (path to a bitmap file)\n\
             \n\
             Alternate themes can be found under {DEFAULT_THEME_DIR}.\n"
        )
    }
}

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AppError, Result};
use crate::line::{LineConfig, DEFAULT_API_BASE};
use crate::sheets::DEFAULT_PL_SHEET;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub workbook: Option<String>,
    #[serde(default)]
    pub channel_access_token: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default = "default_pl_sheet")]
    pub pl_sheet: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
}

fn default_pl_sheet() -> String {
    DEFAULT_PL_SHEET.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workbook: None,
            channel_access_token: None,
            group_id: None,
            pl_sheet: default_pl_sheet(),
            api_base: default_api_base(),
            user_name: String::new(),
            data_dir: default_data_dir_string(),
        }
    }
}

impl Settings {
    /// Credentials for the dispatcher; both token and recipient are required.
    pub fn line_config(&self) -> Result<LineConfig> {
        let token = self.channel_access_token.as_deref().filter(|t| !t.is_empty());
        let recipient = self.group_id.as_deref().filter(|g| !g.is_empty());
        match (token, recipient) {
            (Some(token), Some(recipient)) => Ok(LineConfig {
                token: token.to_string(),
                recipient: recipient.to_string(),
                api_base: self.api_base.clone(),
            }),
            _ => Err(AppError::Settings(
                "LINE token or group id not configured. Run `plnotify settings set` first.".into(),
            )),
        }
    }

    /// First 20 characters of the token followed by an ellipsis.
    pub fn token_preview(&self) -> Option<String> {
        self.channel_access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("{}...", t.chars().take(20).collect::<String>()))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("plnotify")
}

pub fn default_settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("plnotify")
}

/// Settings for a read-only run: an unreadable file falls back to defaults.
pub fn load_settings(path: &Path) -> Settings {
    try_load_settings(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
        Settings::default()
    })
}

/// Settings as stored; a missing file is defaults, a malformed one an error.
pub fn try_load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Settings(format!("{} is not valid settings JSON: {e}", path.display())))
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

/// LINE user, group and room ids: a type letter followed by 32 hex digits.
pub fn validate_recipient(id: &str) -> Result<()> {
    let re = Regex::new(r"^[CUR][0-9a-f]{32}$").map_err(|e| AppError::Other(e.to_string()))?;
    if re.is_match(id) {
        Ok(())
    } else {
        Err(AppError::Settings(format!("not a LINE group/user/room id: {id}")))
    }
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            workbook: Some("/tmp/pl.xlsx".into()),
            channel_access_token: Some("tok".into()),
            group_id: Some("C0123456789abcdef0123456789abcdef".into()),
            user_name: "経理部".into(),
            ..Settings::default()
        };
        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path);
        assert_eq!(loaded.workbook.as_deref(), Some("/tmp/pl.xlsx"));
        assert_eq!(loaded.channel_access_token.as_deref(), Some("tok"));
        assert_eq!(loaded.user_name, "経理部");
        assert_eq!(loaded.pl_sheet, "全社PLシート");
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings(&dir.path().join("absent.json"));
        assert!(s.channel_access_token.is_none());
        assert_eq!(s.api_base, "https://api.line.me");
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error_when_loaded_strictly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{\"channel_access_token\": \"tok\",").unwrap();
        assert!(matches!(try_load_settings(&path), Err(AppError::Settings(_))));
        assert!(load_settings(&path).channel_access_token.is_none());
        assert!(try_load_settings(&dir.path().join("absent.json")).is_ok());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"group_id": "Cabc", "pl_sheet": "PL"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.pl_sheet, "PL");
        assert_eq!(s.api_base, "https://api.line.me");
        assert!(s.workbook.is_none());
    }

    #[test]
    fn test_line_config_requires_token_and_group() {
        let mut s = Settings::default();
        assert!(matches!(s.line_config(), Err(AppError::Settings(_))));
        s.channel_access_token = Some("tok".into());
        s.group_id = Some(String::new());
        assert!(s.line_config().is_err());
        s.group_id = Some("Cabc".into());
        let cfg = s.line_config().unwrap();
        assert_eq!(cfg.token, "tok");
        assert_eq!(cfg.recipient, "Cabc");
    }

    #[test]
    fn test_token_preview() {
        let s = Settings {
            channel_access_token: Some("abcdefghijklmnopqrstuvwxyz".into()),
            ..Settings::default()
        };
        assert_eq!(s.token_preview().as_deref(), Some("abcdefghijklmnopqrst..."));
        assert!(Settings::default().token_preview().is_none());
    }

    #[test]
    fn test_validate_recipient() {
        assert!(validate_recipient("C0123456789abcdef0123456789abcdef").is_ok());
        assert!(validate_recipient("U0123456789abcdef0123456789abcdef").is_ok());
        assert!(validate_recipient("X0123456789abcdef0123456789abcdef").is_err());
        assert!(validate_recipient("Cshort").is_err());
    }
}

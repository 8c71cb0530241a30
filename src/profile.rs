//! Operator profile: the display name shown in the dashboard header,
//! persisted locally so it survives restarts.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl OperatorProfile {
    /// `<config dir>/safepath/operator.json`, or a relative fallback when the
    /// platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("safepath")
            .join("operator.json")
    }

    /// Load the profile at `path`. A missing file is an empty profile.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let txt = std::fs::read_to_string(path)?;
        if txt.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&txt)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Set the name, trimmed. A blank name clears it.
    pub fn set_display_name(&mut self, name: &str) {
        let name = name.trim();
        self.display_name = (!name.is_empty()).then(|| name.to_string());
    }

    /// Greeting line for the dashboard header.
    pub fn greeting(&self) -> String {
        match &self.display_name {
            Some(name) => format!("Operator: {name}"),
            None => "Operator: (not set)".to_string(),
        }
    }
}

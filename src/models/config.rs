use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::PLACEHOLDER_NAME;
use crate::utils::AppResult;

/// Måttsättning för rutnätslayouten (pixlar)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub column_spacing: f32,
    pub row_spacing: f32,
    pub padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 64.0,
            column_spacing: 240.0,
            row_spacing: 84.0,
            padding: 40.0,
        }
    }
}

/// Inställningar för trädmotorn, sparas som TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Visningsnamn när namn saknas
    pub placeholder_name: String,
    /// Infix som tyder på man resp. kvinna, t.ex. "bin" / "binti"
    pub male_infixes: Vec<String>,
    pub female_infixes: Vec<String>,
    /// Gissa kön från namn när uppgift saknas
    pub infer_gender: bool,
    pub max_generation_depth: usize,
    pub ancestry_hop_limit: usize,
    pub depth_iteration_limit: usize,
    pub expand_all_budget: usize,
    pub outline_row_limit: usize,
    pub row_height: u32,
    pub overscan: usize,
    pub search_limit: usize,
    /// Relationsord som räknas i statistiken
    pub relation_keywords: Vec<String>,
    pub layout: LayoutConfig,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            placeholder_name: PLACEHOLDER_NAME.to_string(),
            male_infixes: vec!["bin".into()],
            female_infixes: vec!["binti".into()],
            infer_gender: true,
            max_generation_depth: 4,
            ancestry_hop_limit: 12,
            depth_iteration_limit: 200_000,
            expand_all_budget: 500,
            outline_row_limit: 100_000,
            row_height: 56,
            overscan: 8,
            search_limit: 8,
            relation_keywords: vec!["cucu".into(), "cicit".into()],
            layout: LayoutConfig::default(),
        }
    }
}

impl TreeSettings {
    /// Standardsökväg för inställningsfilen
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("se", "genlib", "Genlib")
            .map(|dirs| dirs.config_dir().join("tree.toml"))
            .unwrap_or_else(|| PathBuf::from("tree.toml"))
    }

    /// Ladda från standardsökvägen; faller tillbaka på standardvärden
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Kunde inte läsa {:?}: {}, använder standardvärden", path, e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}

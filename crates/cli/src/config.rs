use anyhow::{Context, Result};
use cadastre_graph::BuildOptions;
use serde::Deserialize;
use std::path::Path;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "cadastre.toml";

const DEFAULT_SUGGESTION_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CadastreConfig {
    pub build: BuildOptions,
    pub suggestion_limit: usize,
}

impl Default for CadastreConfig {
    fn default() -> Self {
        Self {
            build: BuildOptions::default(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    graph: Option<RawGraph>,
    suggestions: Option<RawSuggestions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGraph {
    spatial_index: Option<bool>,
    parallel: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuggestions {
    limit: Option<usize>,
}

impl CadastreConfig {
    /// Load `explicit` if given, else `cadastre.toml` from `workdir` if it
    /// exists, else defaults.
    pub fn load(explicit: Option<&Path>, workdir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = workdir.join(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).context("TOML parse error")?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let defaults = Self::default();
        let graph = raw.graph.unwrap_or_default();
        let suggestions = raw.suggestions.unwrap_or_default();
        Self {
            build: BuildOptions {
                spatial_index: graph.spatial_index.unwrap_or(defaults.build.spatial_index),
                parallel: graph.parallel.unwrap_or(defaults.build.parallel),
            },
            suggestion_limit: suggestions.limit.unwrap_or(defaults.suggestion_limit),
        }
    }
}

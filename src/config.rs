//! `routelens.toml` loading and the dispatcher it configures.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::extract::{Dispatcher, ExpressExtractor, NestJsExtractor};
use crate::parser::ParserProfile;

/// Default config file name, looked up in the scanned root.
pub const CONFIG_FILE: &str = "routelens.toml";

/// Top-level routelens configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLensConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub frameworks: FrameworksConfig,
}

/// Which files the project scanner visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions (without the dot) to parse.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Extra directory names to skip on top of the built-in list.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Honour `.gitignore` and friends.
    #[serde(default = "default_true")]
    pub follow_gitignore: bool,
}

/// Toggles for the registered extractors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworksConfig {
    #[serde(default = "default_true")]
    pub express: bool,
    #[serde(default = "default_true")]
    pub nestjs: bool,
}

fn default_extensions() -> Vec<String> {
    ["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: Vec::new(),
            follow_gitignore: true,
        }
    }
}

impl Default for FrameworksConfig {
    fn default() -> Self {
        Self {
            express: true,
            nestjs: true,
        }
    }
}

impl ScanConfig {
    pub fn accepts_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl RouteLensConfig {
    /// Load config from a TOML file. A missing file yields the defaults,
    /// a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Build a dispatcher holding only the enabled extractors.
    pub fn dispatcher(&self) -> Dispatcher {
        let mut dispatcher = Dispatcher::new(ParserProfile::default());
        if self.frameworks.express {
            dispatcher.register(Box::new(ExpressExtractor::new()));
        }
        if self.frameworks.nestjs {
            dispatcher.register(Box::new(NestJsExtractor::new()));
        }
        dispatcher
    }
}

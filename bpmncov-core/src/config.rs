//! Configuration for bpmncov

use crate::CoverageError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up at the project root
pub const CONFIG_FILE_NAME: &str = "bpmncov.toml";

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# bpmncov Configuration

[document]
# BPMN document, relative to the project root
path = "bpmn/process.bpmn"
# Element types to extract (tag name without namespace prefix).
# Empty extracts every element that carries an id attribute, including
# definitions, process, sequenceFlow and diagram shapes. For a task-only
# report list the types, e.g. ["task", "userTask", "serviceTask"].
node_types = []

[scan]
# Directory holding test files, relative to the project root
root = "tests"
# Test files to scan for [bpmn:<id>] markers (relative to scan root)
glob = "**/*.{spec,test}.{ts,tsx,js,jsx,mjs,cjs}"
# Call names whose first string argument is a test title
label_keywords = ["test", "it", "describe"]
# Read test files concurrently
parallel = true

[ignore]
# Additional patterns to ignore (beyond .gitignore)
patterns = [
    "node_modules",
    ".git",
    "target",
    "dist",
    "coverage",
]

[output]
# Output directory, relative to the project root
dir = "coverage"
json = "bpmn-coverage.json"
csv = "bpmn-coverage.csv"
html = "bpmn-coverage.html"
"#;

/// bpmncov configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_document_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub node_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_scan_root")]
    pub root: PathBuf,
    #[serde(default = "default_glob")]
    pub glob: String,
    #[serde(default = "default_label_keywords")]
    pub label_keywords: Vec<String>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default = "default_ignore_patterns")]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_json_name")]
    pub json: String,
    #[serde(default = "default_csv_name")]
    pub csv: String,
    #[serde(default = "default_html_name")]
    pub html: String,
}

// Default value functions
fn default_document_path() -> PathBuf {
    PathBuf::from("bpmn/process.bpmn")
}
fn default_scan_root() -> PathBuf {
    PathBuf::from("tests")
}
fn default_glob() -> String {
    "**/*.{spec,test}.{ts,tsx,js,jsx,mjs,cjs}".to_string()
}
fn default_label_keywords() -> Vec<String> {
    vec!["test".to_string(), "it".to_string(), "describe".to_string()]
}
fn default_parallel() -> bool {
    true
}
fn default_ignore_patterns() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        ".git".to_string(),
        "target".to_string(),
        "dist".to_string(),
        "coverage".to_string(),
    ]
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("coverage")
}
fn default_json_name() -> String {
    "bpmn-coverage.json".to_string()
}
fn default_csv_name() -> String {
    "bpmn-coverage.csv".to_string()
}
fn default_html_name() -> String {
    "bpmn-coverage.html".to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
            node_types: Vec::new(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: default_scan_root(),
            glob: default_glob(),
            label_keywords: default_label_keywords(),
            parallel: default_parallel(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            patterns: default_ignore_patterns(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            json: default_json_name(),
            csv: default_csv_name(),
            html: default_html_name(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| CoverageError::ConfigParse(e.to_string()))
    }

    /// Load `bpmncov.toml` from the project root, falling back to defaults
    pub fn load_or_default(root: &Path) -> crate::Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Explicit run context: the project root and its configuration.
///
/// Every pipeline stage receives this instead of reading the current
/// directory or fixed paths on its own.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Open a project, reading `bpmncov.toml` from its root if present
    pub fn open(root: impl Into<PathBuf>) -> crate::Result<Self> {
        let root = root.into();
        let config = Config::load_or_default(&root)?;
        Ok(Self { root, config })
    }

    /// Absolute path of the BPMN document
    pub fn document_path(&self) -> PathBuf {
        self.root.join(&self.config.document.path)
    }

    /// Absolute path of the test scan root
    pub fn scan_root(&self) -> PathBuf {
        self.root.join(&self.config.scan.root)
    }

    /// Absolute path of the output directory
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.document.path, PathBuf::from("bpmn/process.bpmn"));
        assert!(config.document.node_types.is_empty());
        assert_eq!(config.scan.label_keywords, vec!["test", "it", "describe"]);
        assert_eq!(config.output.csv, "bpmn-coverage.csv");
    }

    #[test]
    fn test_template_matches_defaults() {
        let parsed = Config::from_toml(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.scan.glob, defaults.scan.glob);
        assert_eq!(parsed.ignore.patterns, defaults.ignore.patterns);
        assert_eq!(parsed.output.dir, defaults.output.dir);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::from_toml(
            r#"
[document]
path = "model/order.bpmn"
node_types = ["task", "userTask"]
"#,
        )
        .unwrap();
        assert_eq!(config.document.path, PathBuf::from("model/order.bpmn"));
        assert_eq!(config.document.node_types, vec!["task", "userTask"]);
        assert_eq!(config.scan.root, PathBuf::from("tests"));
        assert!(config.scan.parallel);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let err = Config::from_toml("[document\npath = 1").unwrap_err();
        assert!(matches!(err, CoverageError::ConfigParse(_)));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(config.output.json, "bpmn-coverage.json");
    }

    #[test]
    fn test_project_paths_are_rooted() {
        let project = Project::new("/repo", Config::default());
        assert_eq!(
            project.document_path(),
            PathBuf::from("/repo/bpmn/process.bpmn")
        );
        assert_eq!(project.scan_root(), PathBuf::from("/repo/tests"));
        assert_eq!(project.output_dir(), PathBuf::from("/repo/coverage"));
    }
}

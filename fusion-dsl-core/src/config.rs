use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{Error, InternalResult};

/// Settings for one run of the explorer.
///
/// `dsl` maps each Fusion-DSL identifier to the transpiler that expands it,
/// the remaining fields tell the package resolver where Fusion files live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DslSettings {
    #[serde(default)]
    pub dsl: BTreeMap<String, TranspilerDescriptor>,

    #[serde(default)]
    pub packages: BTreeMap<String, PathBuf>,

    #[serde(default = "default_package_roots")]
    pub package_roots: Vec<PathBuf>,

    #[serde(default = "default_fusion_path")]
    pub fusion_path: PathBuf,

    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for DslSettings {
    fn default() -> Self {
        Self {
            dsl: BTreeMap::new(),
            packages: BTreeMap::new(),
            package_roots: default_package_roots(),
            fusion_path: default_fusion_path(),
            file_extension: default_file_extension(),
        }
    }
}

/// Describes how a transpiler for one identifier is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranspilerDescriptor {
    Template {
        template: String,
        #[serde(default)]
        escape: Escape,
    },
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default = "default_true")]
        trim_trailing_newline: bool,
    },
}

/// How a code body is escaped before it is placed into a template.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Escape {
    #[default]
    None,
    SingleQuote,
    DoubleQuote,
}

fn default_package_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("Packages")]
}

fn default_fusion_path() -> PathBuf {
    PathBuf::from("Resources/Private/Fusion")
}

fn default_file_extension() -> String {
    "fusion".to_string()
}

fn default_true() -> bool {
    true
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path.as_ref()).map_err(|e| {
        Error::Settings(format!(
            "Failed to open settings file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Settings(format!("Failed to parse settings file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Settings(format!("Failed to parse settings: {}", e)))?;
    Ok(config)
}

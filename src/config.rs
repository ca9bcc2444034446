//! Configuration file parser: describes the dimensions of a histogram and
//! where to store it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Dimension, General, Histogram, Result, Transform, Uniform};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Title of the histogram
    #[serde(default)]
    pub title: String,

    /// Binning of each dimension, in dimension order
    #[serde(rename = "dimension")]
    pub dimensions: Vec<DimensionConfig>,

    /// Location of the stored histogram
    #[serde(default)]
    pub output: Output,
}

/// Binning of one dimension, selected by the `binning` key.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "binning", rename_all = "lowercase", deny_unknown_fields)]
pub enum DimensionConfig {
    General {
        edges: Vec<f64>,
        #[serde(default)]
        label: String,
    },
    Uniform {
        low: f64,
        high: f64,
        bins: usize,
        #[serde(default)]
        transform: Transform,
        #[serde(default)]
        label: String,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Output {
    /// HDF5 file, created if missing
    pub file: PathBuf,

    /// Parent group of the histogram's group
    pub group: String,

    /// Name of the histogram's group
    pub name: String,

    /// Replace an existing group of the same name
    pub overwrite: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            file: "histogram.h5".into(),
            group: "/".into(),
            name: "histogram".into(),
            overwrite: true,
        }
    }
}

impl DimensionConfig {
    pub fn build(&self) -> Result<Dimension> {
        Ok(match self {
            Self::General { edges, label } => General::new(edges, label.as_str())?.into(),
            &Self::Uniform { low, high, bins, transform, ref label } =>
                Uniform::new(low, high, bins, transform, label.as_str())?.into(),
        })
    }
}

impl Config {
    /// An empty histogram with the configured title and dimensions.
    pub fn histogram(&self) -> Result<Histogram> {
        let dimensions = self.dimensions.iter()
            .map(DimensionConfig::build)
            .collect::<Result<Vec<_>>>()?;
        Histogram::new(dimensions, self.title.as_str())
    }
}

pub fn parse_config(text: &str) -> Result<Config> {
    Ok(toml::from_str(text)?)
}

pub fn read_config_file(path: impl AsRef<Path>) -> Result<Config> {
    let text = fs::read_to_string(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "read config");
    parse_config(&text)
}

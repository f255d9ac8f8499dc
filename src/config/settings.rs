use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::template::EscapePolicy;

/// Knobs shared by every template built with them
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateOptions {
    #[serde(default)]
    pub escape: EscapePolicy,
}

impl TemplateOptions {
    pub fn with_escape(mut self, escape: EscapePolicy) -> Self {
        self.escape = escape;
        self
    }

    pub fn from_yaml_str(yml: &str) -> Result<Self> {
        serde_yaml::from_str(yml).context("Invalid template options")
    }
}

/// One named template in a catalog file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct YmlTemplate {
    pub name: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape: Option<EscapePolicy>,
}

/// Top level of a catalog file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct YmlCatalog {
    #[serde(default)]
    pub escape: EscapePolicy,
    pub templates: Vec<YmlTemplate>,
}

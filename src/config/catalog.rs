use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::config::settings::{YmlCatalog, YmlTemplate};
use crate::config::TemplateOptions;
use crate::shape::Argument;
use crate::uri_template::UriTemplate;

/// A catalog entry: the compiled-on-demand template plus its description
#[derive(Debug)]
pub struct CatalogEntry {
    template: UriTemplate,
    description: Option<String>,
}

impl CatalogEntry {
    pub fn template(&self) -> &UriTemplate {
        &self.template
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Named URI templates loaded from YAML.
///
/// ```yaml
/// escape: unreserved
/// templates:
///   - name: user
///     template: /users/{id}
///   - name: file
///     template: /files/{path}
///     escape: reserved
/// ```
#[derive(Debug, Default)]
pub struct TemplateCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl TemplateCatalog {
    pub fn from_yaml_str(yml: &str) -> Result<Self> {
        let settings: YmlCatalog = serde_yaml::from_str(yml).context("Invalid yaml configuration")?;
        Self::from_settings(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read template catalog {}", path.display()))?;
        let catalog = Self::from_yaml_str(&yml)
            .with_context(|| format!("Failed to load template catalog {}", path.display()))?;
        debug!(path = %path.display(), templates = catalog.len(), "loaded template catalog");
        Ok(catalog)
    }

    fn from_settings(settings: YmlCatalog) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for YmlTemplate {
            name,
            template,
            description,
            escape,
        } in settings.templates
        {
            let options = TemplateOptions {
                escape: escape.unwrap_or(settings.escape),
            };
            let template = UriTemplate::with_options(&template, options)
                .with_context(|| format!("Invalid template '{}'", name))?;
            let entry = CatalogEntry {
                template,
                description,
            };
            if entries.insert(name.clone(), entry).is_some() {
                bail!("Duplicate template name: {}", name);
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&UriTemplate> {
        self.entries.get(name).map(CatalogEntry::template)
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Template names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Render the template registered under `name`
    pub fn render(&self, name: &str, argument: &dyn Argument) -> Result<String> {
        let template = self
            .get(name)
            .with_context(|| format!("Unknown template: {}", name))?;
        template
            .render(argument)
            .with_context(|| format!("Failed to render template '{}'", name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Configuration: template options and YAML template catalogs

mod catalog;
mod settings;

pub use catalog::{CatalogEntry, TemplateCatalog};
pub use settings::{TemplateOptions, YmlCatalog, YmlTemplate};

// uri-bind: URI templates bound to typed arguments
//
// Templates such as `/users/{id}/repos/{names[]}` are tokenized once, then
// compiled per argument type into renderers that read members directly and
// percent-encode what they emit.

pub mod config;
pub mod error;
pub mod shape;
pub mod template;
mod uri_template;

pub use config::{TemplateCatalog, TemplateOptions};
pub use error::{Result, TemplateError};
pub use shape::{Argument, Bindable, FormatValue, Shape};
pub use template::EscapePolicy;
pub use uri_template::{BoundTemplate, UriTemplate};

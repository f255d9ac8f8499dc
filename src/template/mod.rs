// Template module: tokenizing, resolving and compiling URI templates
//
// A template string is tokenized once into literal and placeholder segments.
// For every argument shape it is rendered against, the placeholders are
// resolved to member reads and compiled into a renderer that is kept for the
// lifetime of the template.

mod cache;
mod compiler;
mod escape;
mod parser;
mod resolver;
mod token;

pub use cache::RendererCache;
pub use compiler::{compile_template, CompiledRenderer, COLLECTION_SEPARATOR};
pub use escape::EscapePolicy;
pub use parser::TemplateParser;
pub use token::{Kind, ParsedTemplate, Placeholder, Segment};

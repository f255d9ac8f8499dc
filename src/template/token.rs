// Token model for URI templates

use std::fmt;

use crate::error::{Result, TemplateError};

const COLLECTION_MARKER: &str = "[]";
const MEMBER_SEPARATOR: char = '.';

/// Whether a placeholder renders one value or a joined sequence of values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    #[default]
    Single,
    Collection,
}

/// One substitution point in a template.
///
/// Built through [`Placeholder::new`], which normalizes the raw name:
/// `tags[]` becomes a collection over `tags`, `owner.id` reads `id` from the
/// `owner` member. The two forms don't combine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    name: String,
    sub_name: Option<String>,
    default: Option<String>,
    format: Option<String>,
    kind: Kind,
}

impl Placeholder {
    pub fn new(
        kind: Kind,
        name: &str,
        default: Option<String>,
        format: Option<String>,
    ) -> Result<Self> {
        let (name, sub_name, kind) = if let Some(stripped) = name.strip_suffix(COLLECTION_MARKER) {
            (stripped.to_string(), None, Kind::Collection)
        } else if let Some((outer, inner)) = name.split_once(MEMBER_SEPARATOR) {
            (outer.to_string(), Some(inner.to_string()), kind)
        } else {
            (name.to_string(), None, kind)
        };

        let token = Self {
            name,
            sub_name,
            default,
            format,
            kind,
        };

        if token.name.is_empty() {
            return Err(TemplateError::Construction {
                token: token.to_string(),
                reason: "placeholder name is empty".to_string(),
            });
        }
        if token.sub_name.as_deref() == Some("") {
            return Err(TemplateError::Construction {
                token: token.to_string(),
                reason: "nested member name is empty".to_string(),
            });
        }

        Ok(token)
    }

    /// Shorthand for a single-valued placeholder with no default or format
    pub fn single(name: &str) -> Result<Self> {
        Self::new(Kind::Single, name, None, None)
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sub_name(&self) -> Option<&str> {
        self.sub_name.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_collection(&self) -> bool {
        self.kind == Kind::Collection
    }

    /// Member path in dotted form, e.g. `owner.id`
    pub fn path(&self) -> String {
        match &self.sub_name {
            Some(sub) => format!("{}{}{}", self.name, MEMBER_SEPARATOR, sub),
            None => self.name.clone(),
        }
    }
}

/// Renders the token back in template syntax, for error messages
impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.path())?;
        if self.is_collection() {
            f.write_str(COLLECTION_MARKER)?;
        }
        if let Some(default) = &self.default {
            write!(f, "={}", default)?;
        }
        if let Some(format) = &self.format {
            write!(f, "|{}", format)?;
        }
        f.write_str("}")
    }
}

/// A template consists of literal strings and placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A tokenized template together with the text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl ParsedTemplate {
    pub fn new(source: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            source: source.into(),
            segments,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get all placeholders in this template
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(token) => Some(token),
                _ => None,
            })
            .collect()
    }
}

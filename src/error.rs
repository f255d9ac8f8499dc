// Error handling for uri-bind

use thiserror::Error;

/// Everything that can go wrong while building or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template string could not be tokenized
    #[error("Template syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// A placeholder was malformed after normalization
    #[error("Invalid placeholder {token}: {reason}")]
    Construction { token: String, reason: String },

    /// A member named in a placeholder does not exist on the shape
    #[error("Member '{member}' not found on {shape}")]
    MemberNotFound { member: String, shape: String },

    /// A collection placeholder resolved to a member that cannot be iterated
    #[error("Member '{member}' of {shape} is not iterable")]
    NotIterable { member: String, shape: String },

    /// A placeholder resolved to a member with no string form
    #[error("Member '{member}' of type {shape} cannot be rendered into a URI")]
    NotRenderable { member: String, shape: String },

    /// The value rejected the placeholder's format specifier
    #[error("Cannot format {token} on {shape}: value of type {value_type} rejected format '{format}': {reason}")]
    Format {
        token: String,
        shape: String,
        value_type: String,
        format: String,
        reason: String,
    },

    /// render() was given an absent argument
    #[error("An argument is required to render a template")]
    ArgumentRequired,
}

impl TemplateError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        TemplateError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// True for errors raised while resolving members against a shape.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            TemplateError::MemberNotFound { .. }
                | TemplateError::NotIterable { .. }
                | TemplateError::NotRenderable { .. }
        )
    }
}

pub type Result<T, E = TemplateError> = std::result::Result<T, E>;

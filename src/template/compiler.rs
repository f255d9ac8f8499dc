// Builds a specialized renderer for one (template, shape) pair

use std::any::Any;
use std::fmt;

use tracing::debug;

use crate::error::{Result, TemplateError};
use crate::shape::{ReadFn, RenderFn, Shape};

use super::escape::EscapePolicy;
use super::resolver::{self, Binding, BoundAccessor, Leaf};
use super::token::{ParsedTemplate, Placeholder};

/// Separator between rendered collection elements
pub const COLLECTION_SEPARATOR: char = ',';

type Emit = Box<dyn Fn(&dyn Any, &mut String) -> Result<()> + Send + Sync>;

/// A template specialized to one argument shape.
///
/// Built once per shape, then shared between every render call for that
/// shape.
pub struct CompiledRenderer {
    shape: String,
    emits: Vec<Emit>,
    size_hint: usize,
}

impl CompiledRenderer {
    /// Render an instance of the shape this renderer was compiled for
    pub fn render(&self, instance: &dyn Any) -> Result<String> {
        let mut out = String::with_capacity(self.size_hint);
        for emit in &self.emits {
            emit(instance, &mut out)?;
        }
        Ok(out)
    }

    pub fn shape_name(&self) -> &str {
        &self.shape
    }
}

impl fmt::Debug for CompiledRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRenderer")
            .field("shape", &self.shape)
            .field("segments", &self.emits.len())
            .finish()
    }
}

/// Resolve `template` against `shape` and compile the result
pub fn compile_template(
    template: &ParsedTemplate,
    shape: &Shape,
    escape: EscapePolicy,
) -> Result<CompiledRenderer> {
    let bindings = resolver::resolve(template, shape)?;
    let renderer = compile(bindings, escape, shape.display_name());
    debug!(
        template = template.source(),
        shape = renderer.shape_name(),
        segments = renderer.emits.len(),
        escape = escape.name(),
        "compiled template renderer"
    );
    Ok(renderer)
}

pub(crate) fn compile(bindings: Vec<Binding<'_>>, escape: EscapePolicy, shape: String) -> CompiledRenderer {
    let mut size_hint = 0;
    let emits = bindings
        .into_iter()
        .map(|binding| match binding {
            Binding::Literal(text) => {
                size_hint += text.len();
                emit_literal(text.to_string())
            }
            Binding::Placeholder(accessor) => {
                size_hint += 16;
                emit_placeholder(accessor, escape, shape.clone())
            }
        })
        .collect();

    CompiledRenderer {
        shape,
        emits,
        size_hint,
    }
}

fn emit_literal(text: String) -> Emit {
    Box::new(move |_instance: &dyn Any, out: &mut String| -> Result<()> {
        out.push_str(&text);
        Ok(())
    })
}

fn emit_placeholder(accessor: BoundAccessor<'_>, escape: EscapePolicy, shape: String) -> Emit {
    let BoundAccessor { token, steps, leaf } = accessor;
    let token = token.clone();

    match leaf {
        Leaf::Scalar { value_type, render } => {
            Box::new(move |instance: &dyn Any, out: &mut String| -> Result<()> {
                match read(&steps, instance) {
                    Some(value) => {
                        let text = render_value(&token, &shape, &value_type, render, value)?;
                        escape.push_escaped(out, &text);
                    }
                    None => push_default(&token, escape, out),
                }
                Ok(())
            })
        }
        Leaf::Sequence {
            iter,
            element_steps,
            value_type,
            render,
        } => Box::new(move |instance: &dyn Any, out: &mut String| -> Result<()> {
            let Some(collection) = read(&steps, instance) else {
                push_default(&token, escape, out);
                return Ok(());
            };

            let mut first = true;
            for element in iter(collection) {
                let Some(element) = read(&element_steps, element) else {
                    continue;
                };
                let text = render_value(&token, &shape, &value_type, render, element)?;
                if !first {
                    out.push(COLLECTION_SEPARATOR);
                }
                first = false;
                escape.push_escaped_element(out, &text, COLLECTION_SEPARATOR);
            }
            Ok(())
        }),
    }
}

fn read<'a>(steps: &[ReadFn], instance: &'a dyn Any) -> Option<&'a dyn Any> {
    steps.iter().try_fold(instance, |value, step| step(value))
}

fn push_default(token: &Placeholder, escape: EscapePolicy, out: &mut String) {
    if let Some(default) = token.default_value() {
        escape.push_escaped(out, default);
    }
}

fn render_value(
    token: &Placeholder,
    shape: &str,
    value_type: &str,
    render: RenderFn,
    value: &dyn Any,
) -> Result<String> {
    render(value, token.format()).map_err(|reason| TemplateError::Format {
        token: token.to_string(),
        shape: shape.to_string(),
        value_type: value_type.to_string(),
        format: token.format().unwrap_or_default().to_string(),
        reason,
    })
}

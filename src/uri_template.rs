// Call-site facing URI templates

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::config::TemplateOptions;
use crate::error::{Result, TemplateError};
use crate::shape::{Argument, Bindable};
use crate::template::{compile_template, CompiledRenderer, ParsedTemplate, RendererCache, TemplateParser};

/// A URI template that accepts any [`Bindable`] argument.
///
/// The first render with a given argument type resolves and compiles the
/// template for that type; later renders with the same type reuse the
/// compiled renderer.
///
/// ```
/// use uri_bind::{bindable, UriTemplate};
///
/// struct User {
///     id: u64,
///     tags: Vec<String>,
/// }
///
/// bindable! { User { id: u64, tags: Vec<String> } }
///
/// let template = UriTemplate::new("/users/{id}/{tags[]}").unwrap();
/// let user = User { id: 42, tags: vec!["a".into(), "b".into()] };
/// assert_eq!(template.render(&user).unwrap(), "/users/42/a,b");
/// ```
pub struct UriTemplate {
    parsed: ParsedTemplate,
    options: TemplateOptions,
    cache: RendererCache,
}

impl UriTemplate {
    pub fn new(source: &str) -> Result<Self> {
        Self::with_options(source, TemplateOptions::default())
    }

    pub fn with_options(source: &str, options: TemplateOptions) -> Result<Self> {
        let parsed = TemplateParser::parse(source)?;
        Ok(Self::from_parsed(parsed, options))
    }

    /// Build from segments produced elsewhere
    pub fn from_parsed(parsed: ParsedTemplate, options: TemplateOptions) -> Self {
        Self {
            parsed,
            options,
            cache: RendererCache::new(),
        }
    }

    /// The template string this was built from
    pub fn as_str(&self) -> &str {
        self.parsed.source()
    }

    pub fn parsed(&self) -> &ParsedTemplate {
        &self.parsed
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }

    /// Number of argument types compiled so far
    pub fn compiled_shapes(&self) -> usize {
        self.cache.len()
    }

    pub fn render(&self, argument: &dyn Argument) -> Result<String> {
        if !argument.is_present() {
            return Err(TemplateError::ArgumentRequired);
        }

        let instance = argument.as_any();
        let renderer = self.cache.get_or_compile(instance.type_id(), || {
            compile_template(&self.parsed, &argument.argument_shape(), self.options.escape)
        })?;
        renderer.render(instance)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UriTemplate")
            .field("source", &self.as_str())
            .field("options", &self.options)
            .field("cache", &self.cache)
            .finish()
    }
}

impl PartialEq for UriTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str() && self.options == other.options
    }
}

impl Eq for UriTemplate {}

/// A URI template compiled up front for a single argument type
pub struct BoundTemplate<T> {
    parsed: ParsedTemplate,
    options: TemplateOptions,
    renderer: CompiledRenderer,
    _argument: PhantomData<fn(&T)>,
}

impl<T: Bindable> BoundTemplate<T> {
    pub fn new(source: &str) -> Result<Self> {
        Self::with_options(source, TemplateOptions::default())
    }

    pub fn with_options(source: &str, options: TemplateOptions) -> Result<Self> {
        let parsed = TemplateParser::parse(source)?;
        Self::from_parsed(parsed, options)
    }

    pub fn from_parsed(parsed: ParsedTemplate, options: TemplateOptions) -> Result<Self> {
        let renderer = compile_template(&parsed, &T::shape(), options.escape)?;
        Ok(Self {
            parsed,
            options,
            renderer,
            _argument: PhantomData,
        })
    }

    pub fn render(&self, argument: &T) -> Result<String> {
        if Bindable::is_absent(argument) {
            return Err(TemplateError::ArgumentRequired);
        }
        let instance: &dyn Any = argument;
        self.renderer.render(instance)
    }
}

impl<T> BoundTemplate<T> {
    pub fn as_str(&self) -> &str {
        self.parsed.source()
    }

    pub fn parsed(&self) -> &ParsedTemplate {
        &self.parsed
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }
}

impl<T> fmt::Display for BoundTemplate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T> fmt::Debug for BoundTemplate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundTemplate")
            .field("source", &self.as_str())
            .field("options", &self.options)
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl<T> PartialEq for BoundTemplate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str() && self.options == other.options
    }
}

impl<T> Eq for BoundTemplate<T> {}

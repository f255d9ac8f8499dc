// Shape descriptions for template arguments
//
// A shape tells the resolver which members a type exposes and how to read
// them from a type-erased instance. Shapes are plain data built from function
// pointers, so resolving a template against a shape can happen once and the
// result can be reused for every instance of that type.

mod format;
mod impls;
mod macros;

use std::any::Any;
use std::fmt;

pub use format::FormatValue;

/// Reads a member (or unwraps an indirection) from an instance.
/// `None` means the value is absent.
pub type ReadFn = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

/// Iterates the elements of a sequence in their natural order
pub type IterFn = for<'a> fn(&'a dyn Any) -> Box<dyn Iterator<Item = &'a dyn Any> + 'a>;

/// Renders a scalar, optionally with a format specifier.
/// `Err` carries the reason the value rejected the specifier.
pub type RenderFn = fn(&dyn Any, Option<&str>) -> Result<String, String>;

/// Static description of a type that can be bound to a template
#[derive(Clone)]
pub struct Shape {
    type_name: &'static str,
    def: Def,
}

#[derive(Clone)]
pub enum Def {
    /// Leaf value rendered through its [`FormatValue`] contract
    Scalar(RenderFn),
    /// A wrapper that may or may not hold a value (`Option`, `Box`, `Arc`)
    Indirect { inner: fn() -> Shape, get: ReadFn },
    /// An ordered collection
    Sequence { element: fn() -> Shape, iter: IterFn },
    /// A struct with named, readable members
    Record(Vec<Member>),
}

/// A readable member of a record shape
#[derive(Clone, Copy)]
pub struct Member {
    name: &'static str,
    shape: fn() -> Shape,
    get: ReadFn,
}

impl Member {
    pub const fn new(name: &'static str, shape: fn() -> Shape, get: ReadFn) -> Self {
        Self { name, shape, get }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared shape of the member
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    pub fn getter(&self) -> ReadFn {
        self.get
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member").field("name", &self.name).finish()
    }
}

impl Shape {
    pub fn scalar<T: FormatValue + Any>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            def: Def::Scalar(render_scalar::<T>),
        }
    }

    pub fn record(type_name: &'static str, members: Vec<Member>) -> Self {
        Self {
            type_name,
            def: Def::Record(members),
        }
    }

    pub fn indirect(type_name: &'static str, inner: fn() -> Shape, get: ReadFn) -> Self {
        Self {
            type_name,
            def: Def::Indirect { inner, get },
        }
    }

    pub fn sequence(type_name: &'static str, element: fn() -> Shape, iter: IterFn) -> Self {
        Self {
            type_name,
            def: Def::Sequence { element, iter },
        }
    }

    /// Full type name as reported by the type system
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name with module paths stripped, e.g. `Vec<String>`
    pub fn display_name(&self) -> String {
        short_type_name(self.type_name)
    }

    pub fn def(&self) -> &Def {
        &self.def
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        match &self.def {
            Def::Record(members) => members.iter().find(|member| member.name == name),
            _ => None,
        }
    }

    /// Follow indirections down to the underlying shape, collecting the read
    /// steps needed to get there from an instance of `self`.
    pub fn peel(&self) -> (Shape, Vec<ReadFn>) {
        let mut shape = self.clone();
        let mut steps = Vec::new();
        while let Def::Indirect { inner, get } = &shape.def {
            steps.push(*get);
            let next = inner();
            shape = next;
        }
        (shape, steps)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.def {
            Def::Scalar(_) => "scalar",
            Def::Indirect { .. } => "indirect",
            Def::Sequence { .. } => "sequence",
            Def::Record(_) => "record",
        };
        let mut debug = f.debug_struct("Shape");
        debug.field("type_name", &self.type_name).field("kind", &kind);
        if let Def::Record(members) = &self.def {
            debug.field("members", members);
        }
        debug.finish()
    }
}

fn render_scalar<T: FormatValue + Any>(value: &dyn Any, spec: Option<&str>) -> Result<String, String> {
    let value = value
        .downcast_ref::<T>()
        .ok_or_else(|| format!("expected a value of type {}", std::any::type_name::<T>()))?;
    match spec {
        Some(spec) => value.format_with(spec),
        None => Ok(value.to_uri_string()),
    }
}

fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut ident = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            ident.push(ch);
        } else {
            out.push_str(ident.rsplit("::").next().unwrap_or(""));
            ident.clear();
            out.push(ch);
        }
    }
    out.push_str(ident.rsplit("::").next().unwrap_or(""));
    out
}

/// A type whose shape is known statically.
///
/// Usually implemented with the [`bindable!`](crate::bindable) macro.
pub trait Bindable: Any + Send + Sync {
    fn shape() -> Shape
    where
        Self: Sized;

    /// True when the value stands for "nothing", e.g. `None`
    fn is_absent(&self) -> bool {
        false
    }
}

/// Object-safe view of a [`Bindable`] value, used when the argument's type
/// is only known at the call site.
pub trait Argument: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Shape of the concrete type behind this argument
    fn argument_shape(&self) -> Shape;

    fn is_present(&self) -> bool;
}

impl<T: Bindable> Argument for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn argument_shape(&self) -> Shape {
        T::shape()
    }

    fn is_present(&self) -> bool {
        !Bindable::is_absent(self)
    }
}

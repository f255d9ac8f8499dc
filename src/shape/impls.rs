// Bindable implementations for standard and ecosystem types

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use std::any::{type_name, Any};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

use super::{Bindable, Shape};

macro_rules! scalar_bindable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn shape() -> Shape {
                    Shape::scalar::<$ty>()
                }
            }
        )*
    };
}

scalar_bindable!(
    String,
    &'static str,
    char,
    bool,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    DateTime<Utc>,
    DateTime<FixedOffset>,
    NaiveDate,
    NaiveDateTime,
    Uuid,
    Url,
);

fn read_option<T: Bindable>(value: &dyn Any) -> Option<&dyn Any> {
    let inner = value.downcast_ref::<Option<T>>()?.as_ref()?;
    Some(inner)
}

fn read_box<T: Bindable>(value: &dyn Any) -> Option<&dyn Any> {
    let inner: &T = value.downcast_ref::<Box<T>>()?;
    Some(inner)
}

fn read_arc<T: Bindable>(value: &dyn Any) -> Option<&dyn Any> {
    let inner: &T = value.downcast_ref::<Arc<T>>()?;
    Some(inner)
}

impl<T: Bindable> Bindable for Option<T> {
    fn shape() -> Shape {
        Shape::indirect(type_name::<Self>(), T::shape, read_option::<T>)
    }

    fn is_absent(&self) -> bool {
        match self {
            Some(inner) => inner.is_absent(),
            None => true,
        }
    }
}

impl<T: Bindable> Bindable for Box<T> {
    fn shape() -> Shape {
        Shape::indirect(type_name::<Self>(), T::shape, read_box::<T>)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Bindable> Bindable for Arc<T> {
    fn shape() -> Shape {
        Shape::indirect(type_name::<Self>(), T::shape, read_arc::<T>)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

type Elements<'a> = Box<dyn Iterator<Item = &'a dyn Any> + 'a>;

fn iter_vec<T: Bindable>(value: &dyn Any) -> Elements<'_> {
    match value.downcast_ref::<Vec<T>>() {
        Some(items) => Box::new(items.iter().map(|item| item as &dyn Any)),
        None => Box::new(std::iter::empty()),
    }
}

fn iter_deque<T: Bindable>(value: &dyn Any) -> Elements<'_> {
    match value.downcast_ref::<VecDeque<T>>() {
        Some(items) => Box::new(items.iter().map(|item| item as &dyn Any)),
        None => Box::new(std::iter::empty()),
    }
}

fn iter_btree_set<T: Bindable + Ord>(value: &dyn Any) -> Elements<'_> {
    match value.downcast_ref::<BTreeSet<T>>() {
        Some(items) => Box::new(items.iter().map(|item| item as &dyn Any)),
        None => Box::new(std::iter::empty()),
    }
}

fn iter_array<T: Bindable, const N: usize>(value: &dyn Any) -> Elements<'_> {
    match value.downcast_ref::<[T; N]>() {
        Some(items) => Box::new(items.iter().map(|item| item as &dyn Any)),
        None => Box::new(std::iter::empty()),
    }
}

impl<T: Bindable> Bindable for Vec<T> {
    fn shape() -> Shape {
        Shape::sequence(type_name::<Self>(), T::shape, iter_vec::<T>)
    }
}

impl<T: Bindable> Bindable for VecDeque<T> {
    fn shape() -> Shape {
        Shape::sequence(type_name::<Self>(), T::shape, iter_deque::<T>)
    }
}

impl<T: Bindable + Ord> Bindable for BTreeSet<T> {
    fn shape() -> Shape {
        Shape::sequence(type_name::<Self>(), T::shape, iter_btree_set::<T>)
    }
}

impl<T: Bindable, const N: usize> Bindable for [T; N] {
    fn shape() -> Shape {
        Shape::sequence(type_name::<Self>(), T::shape, iter_array::<T, N>)
    }
}

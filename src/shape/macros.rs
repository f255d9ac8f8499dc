// Declarative helpers for describing argument shapes

/// Implement [`Bindable`](crate::shape::Bindable) for a struct or a scalar.
///
/// ```
/// use uri_bind::bindable;
///
/// struct Owner {
///     id: u64,
/// }
///
/// struct Repo {
///     owner: Option<Owner>,
///     name: String,
///     topics: Vec<String>,
/// }
///
/// bindable! { Owner { id: u64 } }
/// bindable! { Repo { owner: Option<Owner>, name: String, topics: Vec<String> } }
/// ```
///
/// Listed members must match the field types exactly. Fields that aren't
/// listed are invisible to templates. `bindable!(scalar Type)` describes a
/// leaf type rendered through its [`FormatValue`](crate::shape::FormatValue)
/// implementation.
#[macro_export]
macro_rules! bindable {
    (scalar $ty:ty) => {
        impl $crate::shape::Bindable for $ty {
            fn shape() -> $crate::shape::Shape {
                $crate::shape::Shape::scalar::<$ty>()
            }
        }
    };
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::shape::Bindable for $ty {
            fn shape() -> $crate::shape::Shape {
                $crate::shape::Shape::record(
                    stringify!($ty),
                    vec![$(
                        $crate::shape::Member::new(
                            stringify!($field),
                            <$fty as $crate::shape::Bindable>::shape,
                            {
                                fn get(value: &dyn ::std::any::Any) -> Option<&dyn ::std::any::Any> {
                                    let record = value.downcast_ref::<$ty>()?;
                                    let field: &$fty = &record.$field;
                                    Some(field)
                                }
                                get
                            },
                        )
                    ),*],
                )
            }
        }
    };
}

//! Record introspection.
//!
//! The engine never inspects caller types directly. Instead each record type
//! registers a static table of [`FieldDef`]s and hands out a [`Value`] for
//! the field at a given position. Filters look fields up by name or alias,
//! the sorter by name only.

use crate::value::Value;

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Declared field name
    pub name: &'static str,
    /// Optional name clients may use in filters instead of `name`
    pub alias: Option<&'static str>,
}

impl FieldDef {
    /// Field without a filter alias
    pub const fn new(name: &'static str) -> Self {
        Self { name, alias: None }
    }

    /// Set the filter alias
    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Whether a filter parameter targets this field
    pub fn matches(&self, param: &str) -> bool {
        self.name == param || self.alias == Some(param)
    }
}

/// A record type the engine can filter and sort.
///
/// # Examples
///
/// ```rust
/// use alfred_core::{FieldDef, IntoValue, Record, Value};
///
/// struct Hero {
///     name: String,
///     age: i64,
/// }
///
/// impl Record for Hero {
///     const FIELDS: &'static [FieldDef] = &[
///         FieldDef::new("Name").with_alias("name"),
///         FieldDef::new("Age").with_alias("age"),
///     ];
///
///     fn value(&self, index: usize) -> Option<Value<'_>> {
///         match index {
///             0 => Some(self.name.to_value()),
///             1 => Some(self.age.to_value()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Field table, in declaration order
    const FIELDS: &'static [FieldDef];

    /// Value of the field at `index` in [`Record::FIELDS`]
    fn value(&self, index: usize) -> Option<Value<'_>>;
}

/// Position of the field declared as `name` (aliases are not considered).
pub fn position_by_name<R: Record>(name: &str) -> Option<usize> {
    R::FIELDS.iter().position(|field| field.name == name)
}

/// Fields of a table a filter parameter targets, by name or alias.
pub fn matching_fields<'a>(
    fields: &'static [FieldDef],
    param: &'a str,
) -> impl Iterator<Item = (usize, &'static FieldDef)> + 'a {
    fields
        .iter()
        .enumerate()
        .filter(move |(_, field)| field.matches(param))
}

/// Implement [`Record`] for a struct from a list of its fields.
///
/// Each field may carry a filter alias with `as "alias"`. Field types must
/// implement [`IntoValue`](crate::IntoValue).
///
/// ```rust
/// use alfred_core::impl_record;
///
/// struct Hero {
///     name: String,
///     age: i32,
/// }
///
/// impl_record!(Hero { name as "n", age });
/// ```
#[macro_export]
macro_rules! impl_record {
    (@def $field:ident) => {
        $crate::FieldDef::new(stringify!($field))
    };
    (@def $field:ident $alias:literal) => {
        $crate::FieldDef::new(stringify!($field)).with_alias($alias)
    };
    ($ty:ty { $($field:ident $(as $alias:literal)?),* $(,)? }) => {
        impl $crate::Record for $ty {
            const FIELDS: &'static [$crate::FieldDef] = &[
                $( $crate::impl_record!(@def $field $($alias)?) ),*
            ];

            #[allow(unused_assignments, unused_mut)]
            fn value(&self, index: usize) -> ::core::option::Option<$crate::Value<'_>> {
                let mut position = 0usize;
                $(
                    if index == position {
                        return ::core::option::Option::Some(
                            $crate::IntoValue::to_value(&self.$field),
                        );
                    }
                    position += 1;
                )*
                ::core::option::Option::None
            }
        }
    };
}

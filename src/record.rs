//! Record model: how a Rust type exposes its fields to CSV sessions.
//!
//! A record type implements [`Record`] by returning a static table of
//! [`FieldDescriptor`]s in declaration order. The table is built once per
//! type and shared by every session. Each descriptor knows the field's name,
//! its [`FieldKind`], how to render the value as text and how to assign it
//! from text.
//!
//! Most types use [`csv_record!`](crate::csv_record), which declares the
//! struct and derives PascalCase field names from its snake_case fields:
//!
//! ```
//! use slashcsv::{csv_record, Record};
//!
//! csv_record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Reply {
//!         pub user_name: String,
//!         pub like_count: u32,
//!     }
//! }
//!
//! let names: Vec<_> = Reply::fields().iter().map(|f| f.name()).collect();
//! assert_eq!(names, ["UserName", "LikeCount"]);
//! ```

use std::fmt;

/// How a reader treats text assigned to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Named variants; blank cells are skipped and names are case-sensitive.
    Enumeration,
    /// Any type that can be converted from cell text.
    Convertible,
    /// Written as text, never populated on read.
    Opaque,
}

/// Text conversion capability of a field type.
///
/// `try_convert` returns `None` when the text cannot be converted. Readers
/// ignore `None` and leave the field at its default.
pub trait FieldValue: Sized {
    /// Reader policy for this type.
    fn kind() -> FieldKind {
        FieldKind::Convertible
    }

    /// Convert cell text into a value.
    fn try_convert(text: &str) -> Option<Self>;

    /// Render the value as raw (unescaped) cell text.
    fn to_text(&self) -> String;
}

impl FieldValue for String {
    fn try_convert(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }

    fn to_text(&self) -> String {
        self.clone()
    }
}

impl FieldValue for char {
    fn try_convert(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for bool {
    fn try_convert(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }
}

macro_rules! numeric_field_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl FieldValue for $t {
                fn try_convert(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_field_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// `None` is written as an empty cell; an empty or whitespace-only cell reads
/// back as `None`.
impl<T: FieldValue> FieldValue for Option<T> {
    fn kind() -> FieldKind {
        T::kind()
    }

    fn try_convert(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return Some(None);
        }
        T::try_convert(text).map(Some)
    }

    fn to_text(&self) -> String {
        self.as_ref().map(T::to_text).unwrap_or_default()
    }
}

type ReadFn<R> = Box<dyn Fn(&R) -> String + Send + Sync>;
type WriteFn<R> = Box<dyn Fn(&mut R, &str) -> bool + Send + Sync>;

/// Named, typed accessor for one field of `R`.
pub struct FieldDescriptor<R> {
    name: &'static str,
    kind: FieldKind,
    read: ReadFn<R>,
    write: WriteFn<R>,
}

impl<R: 'static> FieldDescriptor<R> {
    /// Describe a field through a pair of projections.
    ///
    /// ```
    /// use slashcsv::record::{FieldDescriptor, FieldKind};
    ///
    /// #[derive(Default)]
    /// struct Point { x: i32 }
    ///
    /// let field = FieldDescriptor::<Point>::new("X", |p| &p.x, |p| &mut p.x);
    /// let mut p = Point::default();
    /// assert!(field.set(&mut p, "7"));
    /// assert_eq!(field.get(&p), "7");
    /// assert_eq!(field.kind(), FieldKind::Convertible);
    /// ```
    pub fn new<T: FieldValue + 'static>(
        name: &'static str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        Self {
            name,
            kind: T::kind(),
            read: Box::new(move |record: &R| get(record).to_text()),
            write: Box::new(move |record: &mut R, text: &str| match T::try_convert(text) {
                Some(value) => {
                    *get_mut(record) = value;
                    true
                }
                None => false,
            }),
        }
    }
}

impl<R> FieldDescriptor<R> {
    /// Declared field name, as written in the header.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reader policy for the field's type.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Raw text of the field's current value.
    pub fn get(&self, record: &R) -> String {
        (self.read)(record)
    }

    /// Assign the field from text. Returns `false` and leaves the field
    /// unchanged when the text does not convert.
    pub fn set(&self, record: &mut R, text: &str) -> bool {
        (self.write)(record, text)
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A type whose values map to CSV rows.
///
/// `Default` provides the fresh instance populated for every row.
pub trait Record: Default + 'static {
    /// Readable and writable fields, in declaration order.
    fn fields() -> &'static [FieldDescriptor<Self>];

    /// Look up a field by its exact declared name.
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }
}

/// Check that `R` has a usable field table: at least one field and no
/// repeated names.
pub(crate) fn validate_model<R: Record>() -> Result<(), crate::CsvError> {
    let model = std::any::type_name::<R>();
    let fields = R::fields();
    if fields.is_empty() {
        return Err(crate::CsvError::InvalidModel {
            model,
            reason: "no readable and writable fields".into(),
        });
    }
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.name == field.name) {
            return Err(crate::CsvError::InvalidModel {
                model,
                reason: format!("duplicate field name '{}'", field.name),
            });
        }
    }
    Ok(())
}

/// Declare a struct and implement [`Record`] for it.
///
/// Field names are the PascalCase form of the Rust field identifiers
/// (`user_name` becomes `UserName`). Every field type must implement
/// [`FieldValue`]; the struct must implement `Default`.
///
/// ```
/// use slashcsv::csv_record;
///
/// csv_record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Video {
///         pub bvid: String,
///         pub play_count: u64,
///         pub title: Option<String>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! csv_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            fn fields() -> &'static [$crate::FieldDescriptor<Self>] {
                static FIELDS: ::std::sync::OnceLock<::std::vec::Vec<$crate::FieldDescriptor<$name>>> =
                    ::std::sync::OnceLock::new();
                FIELDS.get_or_init(|| {
                    $crate::__private::paste! {
                        ::std::vec![
                            $(
                                $crate::FieldDescriptor::<$name>::new::<$fty>(
                                    ::std::stringify!([<$field:camel>]),
                                    |record| &record.$field,
                                    |record| &mut record.$field,
                                ),
                            )*
                        ]
                    }
                })
            }
        }
    };
}

/// Declare a fieldless enum and implement [`FieldValue`] for it as an
/// enumeration.
///
/// Variants are parsed by exact, case-sensitive name and written by name.
///
/// ```
/// use slashcsv::{csv_enum, record::{FieldKind, FieldValue}};
///
/// csv_enum! {
///     #[derive(Debug, Clone, Copy, Default, PartialEq)]
///     pub enum Gender {
///         #[default]
///         Unknown,
///         Male,
///         Female,
///     }
/// }
///
/// assert_eq!(Gender::kind(), FieldKind::Enumeration);
/// assert_eq!(Gender::try_convert("Female"), Some(Gender::Female));
/// assert_eq!(Gender::try_convert("female"), None);
/// ```
#[macro_export]
macro_rules! csv_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
        }

        impl $crate::FieldValue for $name {
            fn kind() -> $crate::FieldKind {
                $crate::FieldKind::Enumeration
            }

            fn try_convert(text: &str) -> ::std::option::Option<Self> {
                match text {
                    $(::std::stringify!($variant) => ::std::option::Option::Some(Self::$variant),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn to_text(&self) -> ::std::string::String {
                match self {
                    $(Self::$variant => ::std::stringify!($variant).into(),)*
                }
            }
        }
    };
}

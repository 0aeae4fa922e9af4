//! Conversion from nodes to Rust values.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::arena::ScalarText;
use crate::{AccessError, NodeKind, NodeRef};

/// The node shape a [`Decode`] impl accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    Sequence,
    Mapping,
}

impl Shape {
    fn accepts(self, kind: NodeKind) -> bool {
        matches!(
            (self, kind),
            (Shape::Scalar, NodeKind::Scalar)
                | (Shape::Sequence, NodeKind::Sequence)
                | (Shape::Mapping, NodeKind::Mapping)
        )
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Scalar => write!(f, "a scalar"),
            Shape::Sequence => write!(f, "a sequence"),
            Shape::Mapping => write!(f, "a mapping"),
        }
    }
}

/// Types that can be read out of a node.
///
/// The caller never sees an Empty node or one whose kind disagrees with
/// [`SHAPE`](Decode::SHAPE): Empty resolves to the default (or
/// [`missing`](Decode::missing)) and a shape mismatch fails with
/// [`AccessError::ShapeMismatch`] before `decode` runs.
///
/// ```
/// use stanza_tree::{AccessError, Decode, NodeRef, Shape};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Decode for Point {
///     const SHAPE: Shape = Shape::Mapping;
///
///     fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
///         Ok(Point {
///             x: node.get("x")?.decode_or(0)?,
///             y: node.get("y")?.decode_or(0)?,
///         })
///     }
/// }
///
/// let doc = stanza_tree::parse("p:\n  x: 3\n").unwrap();
/// let p: Point = doc.root().get("p").unwrap().decode().unwrap();
/// assert_eq!((p.x, p.y), (3, 0));
/// ```
pub trait Decode: Sized {
    /// The node kind this type decodes from.
    const SHAPE: Shape;

    /// Build a value from a node of kind [`SHAPE`](Decode::SHAPE).
    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError>;

    /// The value of an Empty node when no default is given.
    fn missing() -> Option<Self> {
        None
    }
}

pub(crate) fn decode_node<T: Decode>(
    node: NodeRef<'_>,
    default: Option<T>,
) -> Result<T, AccessError> {
    let kind = node.kind();
    if kind == NodeKind::Empty {
        return default
            .or_else(T::missing)
            .ok_or(AccessError::MissingValue);
    }
    if !T::SHAPE.accepts(kind) {
        return Err(AccessError::ShapeMismatch {
            expected: T::SHAPE,
            found: kind,
        });
    }
    T::decode(node)
}

fn raw_text<'t>(node: NodeRef<'t>) -> Result<&'t str, AccessError> {
    node.text().ok_or(AccessError::ShapeMismatch {
        expected: Shape::Scalar,
        found: node.kind(),
    })
}

/// Scalar text as a string. Quoted text loses its surrounding quotes and
/// reads `\"` and `\\` as `"` and `\`.
fn string_text<'t>(node: NodeRef<'t>) -> Result<Cow<'t, str>, AccessError> {
    let text = raw_text(node)?;
    let quoted = match node.scalar() {
        Some(ScalarText::Literal { quoted, .. }) => *quoted,
        _ => text.starts_with('"'),
    };
    if !quoted {
        return Ok(Cow::Borrowed(text));
    }
    let text = text.strip_prefix('"').unwrap_or(text);
    Ok(unescape(text.strip_suffix('"').unwrap_or(text)))
}

/// Other backslash sequences are kept as written.
fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('\\') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

impl Decode for String {
    const SHAPE: Shape = Shape::Scalar;

    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
        string_text(node).map(Cow::into_owned)
    }
}

/// `t`, `T` or `1` at the start reads as true; `f`, `F` or `0` as false.
impl Decode for bool {
    const SHAPE: Shape = Shape::Scalar;

    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
        let text = string_text(node)?;
        match text.chars().next() {
            Some('t' | 'T' | '1') => Ok(true),
            Some('f' | 'F' | '0') => Ok(false),
            _ => Err(AccessError::InvalidScalar {
                text: text.to_string(),
                target: "bool",
            }),
        }
    }
}

impl Decode for char {
    const SHAPE: Shape = Shape::Scalar;

    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
        let text = string_text(node)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(AccessError::InvalidScalar {
                text: text.to_string(),
                target: "char",
            }),
        }
    }
}

macro_rules! impl_decode_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            /// Parses the full scalar text; trailing characters fail.
            impl Decode for $ty {
                const SHAPE: Shape = Shape::Scalar;

                fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
                    let text = raw_text(node)?;
                    text.parse().map_err(|_| AccessError::InvalidScalar {
                        text: text.to_string(),
                        target: stringify!($ty),
                    })
                }
            }
        )*
    };
}

impl_decode_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: Decode> Decode for Vec<T> {
    const SHAPE: Shape = Shape::Sequence;

    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
        node.items().map(|item| decode_node(item, None)).collect()
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    const SHAPE: Shape = Shape::Mapping;

    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
        node.entries()
            .map(|(key, value)| Ok((key.to_string(), decode_node(value, None)?)))
            .collect()
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    const SHAPE: Shape = Shape::Mapping;

    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
        node.entries()
            .map(|(key, value)| Ok((key.to_string(), decode_node(value, None)?)))
            .collect()
    }
}

/// Empty decodes to `None`.
impl<T: Decode> Decode for Option<T> {
    const SHAPE: Shape = T::SHAPE;

    fn decode(node: NodeRef<'_>) -> Result<Self, AccessError> {
        T::decode(node).map(Some)
    }

    fn missing() -> Option<Self> {
        Some(None)
    }
}

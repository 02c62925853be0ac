// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static type information of bindable fields.

use std::fmt;

/// The static type of a field slot.
///
/// Tags form a closed set: scalars, sequences, pointer-like wrappers and records.
/// They are used to describe slots in error messages and to find the element type
/// of sequence fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `String`
    String,
    /// `bool`
    Bool,
    /// A signed integer type, by name.
    Int(&'static str),
    /// An unsigned integer type, by name.
    UInt(&'static str),
    /// A floating point type, by name.
    Float(&'static str),
    /// `Vec<T>`
    Seq(Box<TypeTag>),
    /// `Box<T>`, a pointer-like wrapper.
    Pointer(Box<TypeTag>),
    /// A record type, by its full type name.
    Record(&'static str),
}

impl TypeTag {
    /// Returns the tag of a record type.
    pub fn record<R: 'static>() -> TypeTag {
        TypeTag::Record(std::any::type_name::<R>())
    }

    /// Returns `true` for tags that accept default literals.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeTag::String | TypeTag::Bool | TypeTag::Int(_) | TypeTag::UInt(_) | TypeTag::Float(_)
        )
    }

    /// Strips one level of pointer wrapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexbind::schema::TypeTag;
    ///
    /// let boxed = TypeTag::Pointer(Box::new(TypeTag::Bool));
    /// assert_eq!(boxed.pointee(), &TypeTag::Bool);
    /// assert_eq!(TypeTag::Bool.pointee(), &TypeTag::Bool);
    /// ```
    pub fn pointee(&self) -> &TypeTag {
        match self {
            TypeTag::Pointer(inner) => inner,
            other => other,
        }
    }

    /// Returns the element type of a sequence, with one level of pointer
    /// wrapping removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexbind::schema::TypeTag;
    ///
    /// let seq = TypeTag::Seq(Box::new(TypeTag::Pointer(Box::new(TypeTag::Int("i32")))));
    /// assert_eq!(seq.element(), Some(&TypeTag::Int("i32")));
    /// assert_eq!(TypeTag::Bool.element(), None);
    /// ```
    pub fn element(&self) -> Option<&TypeTag> {
        match self {
            TypeTag::Seq(element) => Some(element.pointee()),
            _ => None,
        }
    }

    /// Returns the unqualified type name, used to name the field type in errors.
    pub fn short_name(&self) -> String {
        match self {
            TypeTag::Record(name) => short_type_name(name).to_string(),
            other => other.to_string(),
        }
    }
}

fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::String => f.write_str("String"),
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::Int(name) | TypeTag::UInt(name) | TypeTag::Float(name) => f.write_str(name),
            TypeTag::Seq(element) => write!(f, "Vec<{}>", element),
            TypeTag::Pointer(inner) => write!(f, "Box<{}>", inner),
            TypeTag::Record(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Req;

    #[test]
    fn test_display() {
        let tag = TypeTag::Seq(Box::new(TypeTag::Pointer(Box::new(TypeTag::UInt("u16")))));
        assert_eq!(tag.to_string(), "Vec<Box<u16>>");
        assert_eq!(TypeTag::String.to_string(), "String");
    }

    #[test]
    fn test_record_short_name() {
        let tag = TypeTag::record::<Req>();
        assert!(tag.to_string().ends_with("::Req"));
        assert_eq!(tag.short_name(), "Req");
    }

    #[test]
    fn test_is_scalar() {
        assert!(TypeTag::Float("f32").is_scalar());
        assert!(!TypeTag::Seq(Box::new(TypeTag::Bool)).is_scalar());
        assert!(!TypeTag::record::<Req>().is_scalar());
    }
}

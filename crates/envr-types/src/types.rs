//! Explicit type descriptors and their assignability relation.
//!
//! Paths carry a [`TypeDescriptor`] on their terminal element. Providers
//! declare an upper bound and the engine filters them with
//! [`TypeDescriptor::is_assignable_from`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Bool,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Self::Bool,
        Self::Char,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    /// Get the canonical name of the primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" | "boolean" => Self::Bool,
            "char" => Self::Char,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        })
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime description of the type a path addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeDescriptor {
    /// Only the root element is typed `void`.
    Void,
    /// Top type; accepts everything except `void`.
    Any,
    Primitive(Primitive),
    Named(Arc<str>),
    Parameterized {
        raw: Arc<str>,
        arguments: Arc<[TypeDescriptor]>,
    },
    Array(Arc<TypeDescriptor>),
}

impl TypeDescriptor {
    pub const STRING: &'static str = "string";
    pub const QUALIFIERS: &'static str = "Qualifiers";
    pub const AMBIGUITY_HANDLER: &'static str = "AmbiguityHandler";

    pub fn named(name: impl AsRef<str>) -> Self {
        Self::Named(Arc::from(name.as_ref()))
    }

    pub fn parameterized(raw: impl AsRef<str>, arguments: Vec<TypeDescriptor>) -> Self {
        if arguments.is_empty() {
            return Self::named(raw);
        }
        Self::Parameterized {
            raw: Arc::from(raw.as_ref()),
            arguments: arguments.into(),
        }
    }

    pub fn array(component: TypeDescriptor) -> Self {
        Self::Array(Arc::new(component))
    }

    pub fn string() -> Self {
        Self::named(Self::STRING)
    }

    pub fn qualifiers() -> Self {
        Self::named(Self::QUALIFIERS)
    }

    pub fn ambiguity_handler() -> Self {
        Self::named(Self::AMBIGUITY_HANDLER)
    }

    pub fn int() -> Self {
        Self::Primitive(Primitive::Int)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// `true` if a value of type `other` may stand where `self` is expected.
    pub fn is_assignable_from(&self, other: &TypeDescriptor) -> bool {
        match (self, other) {
            (Self::Void, other) => other.is_void(),
            (_, Self::Void) => false,
            (Self::Any, _) => true,
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Named(a), Self::Parameterized { raw, .. }) => a == raw,
            (
                Self::Parameterized { raw, arguments },
                Self::Parameterized {
                    raw: other_raw,
                    arguments: other_arguments,
                },
            ) => {
                raw == other_raw
                    && arguments.len() == other_arguments.len()
                    && arguments
                        .iter()
                        .zip(other_arguments.iter())
                        .all(|(a, b)| matches!(a, Self::Any) || a == b)
            }
            (Self::Array(a), Self::Array(b)) => a.is_assignable_from(b),
            _ => false,
        }
    }

    /// The raw form of this type with any parameterization removed.
    pub fn erasure(&self) -> TypeDescriptor {
        match self {
            Self::Parameterized { raw, .. } => Self::Named(raw.clone()),
            Self::Array(component) => Self::array(component.erasure()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Any => f.write_str("any"),
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Named(name) => f.write_str(name),
            Self::Parameterized { raw, arguments } => {
                write!(f, "{raw}<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(">")
            }
            Self::Array(component) => write!(f, "{component}[]"),
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = TypeParser {
            input: s,
            chars: s.char_indices().peekable(),
        };
        let parsed = parser.parse_type()?;
        if let Some((column, c)) = parser.chars.next() {
            return Err(Error::parse(s, column, format!("unexpected {c:?} after type")));
        }
        Ok(parsed)
    }
}

struct TypeParser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl TypeParser<'_> {
    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        let start = self.chars.peek().map_or(self.input.len(), |(i, _)| *i);
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if matches!(c, '<' | '>' | ',' | '[' | ']') {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::parse(self.input, start, "expected a type name"));
        }

        let mut parsed = match name {
            "void" => TypeDescriptor::Void,
            "any" | "?" | "*" => TypeDescriptor::Any,
            _ => match Primitive::from_name(name) {
                Some(p) => TypeDescriptor::Primitive(p),
                None => TypeDescriptor::named(name),
            },
        };

        if let Some(&(column, '<')) = self.chars.peek() {
            self.chars.next();
            let raw = match &parsed {
                TypeDescriptor::Named(raw) => raw.clone(),
                _ => {
                    return Err(Error::parse(
                        self.input,
                        column,
                        format!("{name} cannot be parameterized"),
                    ));
                }
            };
            let mut arguments = vec![self.parse_type()?];
            loop {
                match self.chars.next() {
                    Some((_, ',')) => arguments.push(self.parse_type()?),
                    Some((_, '>')) => break,
                    Some((column, c)) => {
                        return Err(Error::parse(self.input, column, format!("unexpected {c:?}")));
                    }
                    None => {
                        return Err(Error::parse(self.input, self.input.len(), "unterminated '<'"));
                    }
                }
            }
            parsed = TypeDescriptor::Parameterized {
                raw,
                arguments: arguments.into(),
            };
        }

        while let Some(&(column, '[')) = self.chars.peek() {
            self.chars.next();
            match self.chars.next() {
                Some((_, ']')) => parsed = TypeDescriptor::array(parsed),
                _ => return Err(Error::parse(self.input, column, "expected \"[]\"")),
            }
        }

        if parsed.is_void() && self.chars.peek().is_some() {
            return Err(Error::InvalidType {
                name: self.input.to_string(),
                message: "void cannot be used as a component".into(),
            });
        }
        Ok(parsed)
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(t("int"), TypeDescriptor::int());
        assert_eq!(t("boolean"), TypeDescriptor::Primitive(Primitive::Bool));
        assert_eq!(t("string").to_string(), "string");
        assert_eq!(t("map<string,int>").to_string(), "map<string,int>");
        assert_eq!(t("int[][]").to_string(), "int[][]");
        assert_eq!(t("?"), TypeDescriptor::Any);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<TypeDescriptor>().is_err());
        assert!("map<string".parse::<TypeDescriptor>().is_err());
        assert!("int<string>".parse::<TypeDescriptor>().is_err());
        assert!("list>".parse::<TypeDescriptor>().is_err());
        assert!("int[".parse::<TypeDescriptor>().is_err());
    }

    #[test]
    fn test_any_accepts_everything_but_void() {
        assert!(TypeDescriptor::Any.is_assignable_from(&t("int")));
        assert!(TypeDescriptor::Any.is_assignable_from(&t("list<string>")));
        assert!(!TypeDescriptor::Any.is_assignable_from(&TypeDescriptor::Void));
        assert!(TypeDescriptor::Void.is_assignable_from(&TypeDescriptor::Void));
    }

    #[test]
    fn test_raw_accepts_parameterized() {
        assert!(t("list").is_assignable_from(&t("list<string>")));
        assert!(!t("list<string>").is_assignable_from(&t("list")));
        assert!(t("list<?>").is_assignable_from(&t("list<int>")));
        assert!(!t("list<string>").is_assignable_from(&t("list<int>")));
    }

    #[test]
    fn test_arrays_are_covariant() {
        assert!(t("any[]").is_assignable_from(&t("string[]")));
        assert!(!t("string[]").is_assignable_from(&t("string")));
    }

    #[test]
    fn test_erasure() {
        assert_eq!(t("map<string,int>").erasure(), t("map"));
        assert_eq!(t("list<int>[]").erasure(), t("list[]"));
    }
}

//! A single segment of a [`Path`](crate::Path)

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use crate::parser::{self, escape_into, escape_type_into, quote_into};
use crate::{Error, Result, TypeDescriptor};

static ROOT: LazyLock<Element> = LazyLock::new(|| Element {
    name: Arc::from(""),
    ty: Some(TypeDescriptor::Void),
    parameters: None,
    arguments: None,
});

/// One named, optionally typed, optionally parameterized path segment.
///
/// An empty name is a wildcard when matching. The type may only be absent
/// on non-terminal segments; [`Path`](crate::Path) enforces that part.
/// Arguments are kept as strings and are informational only: the resolver
/// never compares them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Element {
    name: Arc<str>,
    ty: Option<TypeDescriptor>,
    parameters: Option<Arc<[TypeDescriptor]>>,
    arguments: Option<Arc<[String]>>,
}

impl Element {
    /// The root element: empty name, `void` type.
    pub fn root() -> Self {
        ROOT.clone()
    }

    /// Create an element, validating its invariants.
    ///
    /// An empty name, `void` type and no parameters yields [`Element::root`].
    pub fn new(
        name: impl Into<String>,
        ty: Option<TypeDescriptor>,
        parameters: Option<Vec<TypeDescriptor>>,
        arguments: Option<Vec<String>>,
    ) -> Result<Self> {
        let name = name.into();
        match &ty {
            None if name.is_empty() => {
                return Err(Error::element("an empty name may not be paired with an absent type"));
            }
            Some(TypeDescriptor::Void) if name.is_empty() && parameters.is_none() && arguments.is_none() => {
                return Ok(Self::root());
            }
            Some(TypeDescriptor::Void) => {
                return Err(Error::element(format!(
                    "{name:?}: the void type is reserved for the root element"
                )));
            }
            _ => {}
        }

        let (parameters, arguments) = match (parameters, arguments) {
            (None, None) => (None, None),
            (None, Some(arguments)) => {
                return Err(Error::element(format!(
                    "{name:?}: {} arguments supplied without parameters",
                    arguments.len()
                )));
            }
            (Some(parameters), None) => (Some(parameters), None),
            (Some(parameters), Some(arguments)) if parameters.is_empty() && arguments.is_empty() => {
                (Some(parameters), None)
            }
            (Some(parameters), Some(arguments)) if parameters.len() == arguments.len() => {
                (Some(parameters), Some(arguments))
            }
            (Some(parameters), Some(arguments)) => {
                return Err(Error::element(format!(
                    "{name:?}: {} parameters but {} arguments",
                    parameters.len(),
                    arguments.len()
                )));
            }
        };

        Ok(Self {
            name: Arc::from(name),
            ty,
            parameters: parameters.map(Into::into),
            arguments: arguments.map(Into::into),
        })
    }

    /// A non-terminal element with a name and no type.
    pub fn named(name: impl Into<String>) -> Result<Self> {
        Self::new(name, None, None, None)
    }

    /// A typed element.
    pub fn of(name: impl Into<String>, ty: TypeDescriptor) -> Result<Self> {
        Self::new(name, Some(ty), None, None)
    }

    /// An element with an empty (wildcard) name. `void` yields the root.
    pub fn of_type(ty: TypeDescriptor) -> Self {
        if ty.is_void() {
            return Self::root();
        }
        Self {
            name: Arc::from(""),
            ty: Some(ty),
            parameters: None,
            arguments: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> Option<&TypeDescriptor> {
        self.ty.as_ref()
    }

    pub fn erasure(&self) -> Option<TypeDescriptor> {
        self.ty.as_ref().map(TypeDescriptor::erasure)
    }

    pub fn parameters(&self) -> Option<&[TypeDescriptor]> {
        self.parameters.as_deref()
    }

    pub fn arguments(&self) -> Option<&[String]> {
        self.arguments.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty() && matches!(self.ty, Some(TypeDescriptor::Void))
    }

    /// This element with its type replaced.
    ///
    /// Returns a clone of `self` when the type is unchanged.
    pub fn with(&self, ty: TypeDescriptor) -> Result<Self> {
        if self.ty.as_ref() == Some(&ty) {
            return Ok(self.clone());
        }
        if ty.is_void() && self.name.is_empty() {
            return Ok(Self::root());
        }
        Self::new(
            self.name.to_string(),
            Some(ty),
            self.parameters.as_deref().map(<[_]>::to_vec),
            self.arguments.as_deref().map(<[_]>::to_vec),
        )
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return Ok(());
        }
        let mut out = String::new();
        escape_into(&self.name, &mut out);
        if let Some(parameters) = &self.parameters {
            out.push('(');
            for (i, parameter) in parameters.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                escape_type_into(&parameter.to_string(), &mut out);
                if let Some(argument) = self.arguments.as_ref().and_then(|a| a.get(i)) {
                    out.push('=');
                    quote_into(argument, &mut out);
                }
            }
            out.push(')');
        }
        if let Some(ty) = &self.ty {
            out.push(':');
            escape_type_into(&ty.to_string(), &mut out);
        }
        f.write_str(&out)
    }
}

impl FromStr for Element {
    type Err = Error;

    /// Parses a single element; the empty string is the root element.
    fn from_str(s: &str) -> Result<Self> {
        parser::parse_element(s)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element({self})")
    }
}

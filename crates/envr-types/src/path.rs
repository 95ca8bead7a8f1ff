//! Typed, hierarchical addresses

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Element, Error, Result, TypeDescriptor, parser};

static ROOT: LazyLock<Path> = LazyLock::new(|| Path {
    elements: Arc::from(vec![Element::root()]),
    transliterated: false,
});

static UNTYPED: TypeDescriptor = TypeDescriptor::Any;

/// An immutable, non-empty sequence of [`Element`]s.
///
/// The elements live in one shared allocation, so cloning a `Path` is an
/// atomic increment. A path is absolute when its first element is the root
/// element; only the first element may be root and the last element always
/// carries a type.
///
/// # Example
///
/// ```
/// use envr_types::{Path, TypeDescriptor};
///
/// let path = Path::parse("/db/port:int").unwrap();
/// assert!(path.is_absolute());
/// assert_eq!(path.ty(), &TypeDescriptor::int());
/// assert_eq!(path.to_string(), "/db/port:int");
///
/// let suffix = Path::parse("port:int").unwrap();
/// assert!(path.ends_with(&suffix));
/// assert_eq!(path.index_of(&suffix), Some(2));
/// ```
#[derive(Clone)]
pub struct Path {
    elements: Arc<[Element]>,
    transliterated: bool,
}

/// The structural matching predicate used for provider value selection.
///
/// Names match when either is empty or both are equal. Types match when
/// either is absent or the haystack type accepts the needle type.
/// Parameter lists, when both present, must have the same length and be
/// positionally assignable. Arguments are never compared.
pub fn elements_match(haystack: &Element, needle: &Element) -> bool {
    let names = haystack.name().is_empty() || needle.name().is_empty() || haystack.name() == needle.name();
    if !names {
        return false;
    }

    let types = match (haystack.ty(), needle.ty()) {
        (Some(h), Some(p)) => h.is_assignable_from(p),
        _ => true,
    };
    if !types {
        return false;
    }

    match (haystack.parameters(), needle.parameters()) {
        (Some(h), Some(p)) => h.len() == p.len() && h.iter().zip(p).all(|(h, p)| h.is_assignable_from(p)),
        _ => true,
    }
}

impl Path {
    /// The root path: a single root element.
    pub fn root() -> Self {
        ROOT.clone()
    }

    /// A single-element path. The element must be typed.
    pub fn of(element: Element) -> Result<Self> {
        Self::of_elements(vec![element])
    }

    /// A single wildcard-named element of the given type.
    ///
    /// `void` yields [`Path::root`].
    pub fn of_type(ty: TypeDescriptor) -> Self {
        if ty.is_void() {
            return Self::root();
        }
        Self {
            elements: Arc::from(vec![Element::of_type(ty)]),
            transliterated: false,
        }
    }

    /// Validate and wrap a list of elements.
    pub fn of_elements(elements: Vec<Element>) -> Result<Self> {
        let Some(last) = elements.last() else {
            return Err(Error::path("a path needs at least one element"));
        };
        if last.ty().is_none() {
            return Err(Error::path(format!(
                "the last element {:?} must declare a type",
                last.name()
            )));
        }
        if let Some(position) = elements.iter().skip(1).position(Element::is_root) {
            return Err(Error::path(format!(
                "only the first element may be the root, found one at {}",
                position + 1
            )));
        }
        if elements.len() == 1 && elements[0].is_root() {
            return Ok(Self::root());
        }
        Ok(Self {
            elements: Arc::from(elements),
            transliterated: false,
        })
    }

    /// A relative path of untyped names ending in a typed name.
    ///
    /// An empty list of names yields [`Path::of_type`].
    pub fn of_names<S: AsRef<str>>(names: &[S], ty: TypeDescriptor) -> Result<Self> {
        let Some((last, init)) = names.split_last() else {
            return Ok(Self::of_type(ty));
        };
        let mut elements = init
            .iter()
            .map(|name| Element::named(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        elements.push(Element::of(last.as_ref(), ty)?);
        Self::of_elements(elements)
    }

    /// Parse the text form, e.g. `/db(int="3")/url:string`.
    pub fn parse(input: &str) -> Result<Self> {
        parser::parse_path(input)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false`; paths have at least one element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn first(&self) -> &Element {
        &self.elements[0]
    }

    pub fn last(&self) -> &Element {
        &self.elements[self.elements.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// The type of the last element.
    pub fn ty(&self) -> &TypeDescriptor {
        self.last().ty().unwrap_or(&UNTYPED)
    }

    pub fn erasure(&self) -> TypeDescriptor {
        self.ty().erasure()
    }

    pub fn is_absolute(&self) -> bool {
        self.first().is_root()
    }

    pub fn is_relative(&self) -> bool {
        !self.is_absolute()
    }

    pub fn is_root(&self) -> bool {
        self.elements.len() == 1 && self.is_absolute()
    }

    pub fn is_transliterated(&self) -> bool {
        self.transliterated
    }

    /// Whether both paths share the same element storage.
    pub fn ptr_eq(&self, other: &Path) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements)
    }

    /// This path with the last element's type replaced.
    ///
    /// Shares storage with `self` when the type is unchanged.
    pub fn with(&self, ty: TypeDescriptor) -> Result<Self> {
        if self.last().ty() == Some(&ty) {
            return Ok(self.clone());
        }
        let mut elements = self.elements.to_vec();
        let last = elements.len() - 1;
        elements[last] = elements[last].with(ty)?;
        Self::of_elements(elements)
    }

    pub fn plus(&self, element: Element) -> Result<Self> {
        self.plus_elements(vec![element])
    }

    /// Append all elements of `other`.
    pub fn plus_path(&self, other: &Path) -> Result<Self> {
        self.plus_elements(other.elements.to_vec())
    }

    /// Append `elements`; returns `self` unchanged for an empty list.
    pub fn plus_elements(&self, elements: Vec<Element>) -> Result<Self> {
        if elements.is_empty() {
            return Ok(self.clone());
        }
        let mut joined = Vec::with_capacity(self.len() + elements.len());
        joined.extend(self.elements.iter().cloned());
        joined.extend(elements);
        Self::of_elements(joined)
    }

    pub fn index_of(&self, needle: &Path) -> Option<usize> {
        self.index_of_by(needle, Element::eq)
    }

    /// First offset at which every element of `needle` is accepted by `matches`.
    pub fn index_of_by<F>(&self, needle: &Path, matches: F) -> Option<usize>
    where
        F: Fn(&Element, &Element) -> bool,
    {
        if self.ptr_eq(needle) {
            return Some(0);
        }
        self.offsets(needle).find(|&offset| self.window_matches(offset, needle, &matches))
    }

    pub fn last_index_of(&self, needle: &Path) -> Option<usize> {
        self.last_index_of_by(needle, Element::eq)
    }

    /// Last offset at which every element of `needle` is accepted by `matches`.
    pub fn last_index_of_by<F>(&self, needle: &Path, matches: F) -> Option<usize>
    where
        F: Fn(&Element, &Element) -> bool,
    {
        if self.ptr_eq(needle) {
            return Some(0);
        }
        self.offsets(needle)
            .rev()
            .find(|&offset| self.window_matches(offset, needle, &matches))
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.starts_with_by(prefix, Element::eq)
    }

    pub fn starts_with_by<F>(&self, prefix: &Path, matches: F) -> bool
    where
        F: Fn(&Element, &Element) -> bool,
    {
        self.ptr_eq(prefix) || (prefix.len() <= self.len() && self.window_matches(0, prefix, &matches))
    }

    pub fn ends_with(&self, suffix: &Path) -> bool {
        self.ends_with_by(suffix, Element::eq)
    }

    pub fn ends_with_by<F>(&self, suffix: &Path, matches: F) -> bool
    where
        F: Fn(&Element, &Element) -> bool,
    {
        self.ptr_eq(suffix)
            || (suffix.len() <= self.len() && self.window_matches(self.len() - suffix.len(), suffix, &matches))
    }

    fn offsets(&self, needle: &Path) -> std::ops::Range<usize> {
        match self.len().checked_sub(needle.len()) {
            Some(last) => 0..last + 1,
            None => 0..0,
        }
    }

    fn window_matches<F>(&self, offset: usize, needle: &Path, matches: &F) -> bool
    where
        F: Fn(&Element, &Element) -> bool,
    {
        self.elements[offset..]
            .iter()
            .zip(needle.iter())
            .all(|(haystack, needle)| matches(haystack, needle))
    }

    /// Rewrite every element through `f`, marking the result transliterated.
    ///
    /// A path that is already transliterated is returned as is, so
    /// translation happens at most once per path.
    pub fn transliterate<M, F>(&self, module: &M, f: F) -> Result<Self>
    where
        M: ?Sized,
        F: Fn(&M, &Element) -> Element,
    {
        if self.transliterated {
            return Ok(self.clone());
        }
        let elements = self.elements.iter().map(|element| f(module, element)).collect();
        let mut path = Self::of_elements(elements)?;
        path.transliterated = true;
        Ok(path)
    }

    /// Mark this path transliterated without rewriting it.
    pub fn mark_transliterated(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            transliterated: true,
        }
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.elements == other.elements
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

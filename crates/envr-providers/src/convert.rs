//! Conversion of raw text into the object a path's type calls for.

use std::str::FromStr;

use envr_core::{Supplied, ValueError, object};
use envr_types::{Primitive, TypeDescriptor};

/// Convert `raw` to the Rust type standing for `ty`.
///
/// | type             | Rust type |
/// |------------------|-----------|
/// | `any`, `string`  | `String`  |
/// | `bool`           | `bool`    |
/// | `char`           | `char`    |
/// | `byte`           | `i8`      |
/// | `short`          | `i16`     |
/// | `int`            | `i32`     |
/// | `long`           | `i64`     |
/// | `float`          | `f32`     |
/// | `double`         | `f64`     |
///
/// Other types are [`ValueError::Unsupported`]; text that does not parse is
/// [`ValueError::TypeMismatch`].
pub fn convert(raw: &str, ty: &TypeDescriptor) -> Supplied {
    match ty {
        TypeDescriptor::Any => Ok(Some(object(raw.to_string()))),
        TypeDescriptor::Named(name) if name.as_ref() == TypeDescriptor::STRING => Ok(Some(object(raw.to_string()))),
        TypeDescriptor::Primitive(primitive) => convert_primitive(raw, *primitive, ty),
        _ => Err(ValueError::unsupported(format!("no conversion from text to {ty}"))),
    }
}

fn convert_primitive(raw: &str, primitive: Primitive, ty: &TypeDescriptor) -> Supplied {
    let text = raw.trim();
    match primitive {
        Primitive::Bool => match text.to_ascii_lowercase().as_str() {
            "true" => Ok(Some(object(true))),
            "false" => Ok(Some(object(false))),
            _ => Err(mismatch(raw, ty)),
        },
        Primitive::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Some(object(c))),
                _ => Err(mismatch(raw, ty)),
            }
        }
        Primitive::Byte => parse::<i8>(text, raw, ty),
        Primitive::Short => parse::<i16>(text, raw, ty),
        Primitive::Int => parse::<i32>(text, raw, ty),
        Primitive::Long => parse::<i64>(text, raw, ty),
        Primitive::Float => parse::<f32>(text, raw, ty),
        Primitive::Double => parse::<f64>(text, raw, ty),
    }
}

fn parse<T>(text: &str, raw: &str, ty: &TypeDescriptor) -> Supplied
where
    T: FromStr + Send + Sync + 'static,
{
    text.parse::<T>()
        .map(|parsed| Some(object(parsed)))
        .map_err(|_| mismatch(raw, ty))
}

fn mismatch(raw: &str, ty: &TypeDescriptor) -> ValueError {
    ValueError::TypeMismatch {
        raw: raw.to_string(),
        ty: ty.to_string(),
    }
}

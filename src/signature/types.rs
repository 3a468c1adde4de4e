//! Conversions between JVM descriptors, generic signatures and source-level type names.

use std::collections::BTreeMap;

use crate::Result;

/// Type-variable name to erased bound, e.g. `T -> java.lang.Number`.
pub type GenericsMap = BTreeMap<String, String>;

/// Root of the reference-type hierarchy and the erasure of unbounded type variables.
pub const OBJECT: &str = "java.lang.Object";

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// True for the primitive type names and `void`.
#[must_use]
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// Source name of a primitive descriptor character.
#[must_use]
pub fn primitive_name(code: char) -> Option<&'static str> {
    Some(match code {
        'Z' => "boolean",
        'B' => "byte",
        'C' => "char",
        'S' => "short",
        'I' => "int",
        'J' => "long",
        'F' => "float",
        'D' => "double",
        'V' => "void",
        _ => return None,
    })
}

fn primitive_code(name: &str) -> Option<char> {
    Some(match name {
        "boolean" => 'Z',
        "byte" => 'B',
        "char" => 'C',
        "short" => 'S',
        "int" => 'I',
        "long" => 'J',
        "float" => 'F',
        "double" => 'D',
        "void" => 'V',
        _ => return None,
    })
}

/// Parses one field descriptor at the start of `text`.
///
/// Returns the source-level type name and the number of bytes consumed.
///
/// # Errors
/// Returns [`crate::Error::Signature`] for truncated or unknown descriptors.
pub fn parse_field_descriptor(text: &str) -> Result<(String, usize)> {
    let mut dimensions = 0;
    for c in text.chars() {
        if c == '[' {
            dimensions += 1;
        } else {
            break;
        }
    }

    let rest = &text[dimensions..];
    let (base, consumed) = match rest.chars().next() {
        Some('L') => {
            let end = rest
                .find(';')
                .ok_or_else(|| signature_error!(text, "unterminated class descriptor"))?;
            (rest[1..end].replace('/', "."), end + 1)
        }
        Some(c) => match primitive_name(c) {
            Some(name) => (name.to_string(), 1),
            None => return Err(signature_error!(text, "unknown descriptor character '{}'", c)),
        },
        None => return Err(signature_error!(text, "empty descriptor")),
    };

    let mut name = base;
    for _ in 0..dimensions {
        name.push_str("[]");
    }
    Ok((name, dimensions + consumed))
}

/// Parses a method descriptor such as `(ILjava/lang/String;[J)V` into parameter type names and
/// the return type name.
///
/// # Errors
/// Returns [`crate::Error::Signature`] if the text is not a complete method descriptor.
pub fn parse_method_descriptor(text: &str) -> Result<(Vec<String>, String)> {
    let inner = text
        .strip_prefix('(')
        .ok_or_else(|| signature_error!(text, "method descriptor must start with '('"))?;
    let close = inner
        .find(')')
        .ok_or_else(|| signature_error!(text, "method descriptor lacks ')'"))?;

    let mut parameters = Vec::new();
    let mut params = &inner[..close];
    while !params.is_empty() {
        let (name, consumed) = parse_field_descriptor(params)?;
        parameters.push(name);
        params = &params[consumed..];
    }

    let ret = &inner[close + 1..];
    let (return_type, consumed) = parse_field_descriptor(ret)?;
    if consumed != ret.len() {
        return Err(signature_error!(text, "trailing characters after return type"));
    }

    Ok((parameters, return_type))
}

/// Converts a source-level type name to its descriptor, e.g. `java.lang.String[]` to
/// `[Ljava/lang/String;`. Generic arguments are erased first.
#[must_use]
pub fn to_descriptor(name: &str) -> String {
    let erased = strip_type_arguments(name.trim()).replace("...", "[]");
    let mut base = erased.as_str();
    let mut dimensions = 0;
    while let Some(inner) = base.strip_suffix("[]") {
        base = inner.trim_end();
        dimensions += 1;
    }

    let mut out = "[".repeat(dimensions);
    match primitive_code(base) {
        Some(code) => out.push(code),
        None => {
            out.push('L');
            out.push_str(&base.replace('.', "/"));
            out.push(';');
        }
    }
    out
}

/// Converts a class name as printed in the compiler log (`java/lang/String`,
/// `[Ljava/lang/String;`, `[I`) to its source-level form.
#[must_use]
pub fn class_name_from_internal(name: &str) -> String {
    if name.starts_with('[') {
        if let Ok((java, _)) = parse_field_descriptor(name) {
            return java;
        }
    }
    name.replace('/', ".")
}

/// Removes generic type arguments (`<...>`, nested) from a type name.
#[must_use]
pub fn strip_type_arguments(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Erases a source-level type name.
///
/// Generic arguments are stripped, a variadic `T...` becomes `T[]`, and a type variable is
/// replaced by its bound, looked up in `member` first and `class` second. Inner-class `$`
/// separators are normalized to `.`.
#[must_use]
pub fn erase(name: &str, member: &GenericsMap, class: &GenericsMap) -> String {
    let stripped = strip_type_arguments(name).replace("...", "[]");

    let mut base = stripped.as_str();
    let mut dimensions = 0;
    while let Some(inner) = base.strip_suffix("[]") {
        base = inner.trim_end();
        dimensions += 1;
    }

    let base = match member.get(base).or_else(|| class.get(base)) {
        Some(bound) => strip_type_arguments(bound),
        None if base == "?" => OBJECT.to_string(),
        None => base.to_string(),
    };

    let mut erased = base.replace('$', ".");
    for _ in 0..dimensions {
        erased.push_str("[]");
    }
    erased
}

/// Element type of an array type name, or `None` for non-arrays.
#[must_use]
pub fn component_type(name: &str) -> Option<&str> {
    name.trim()
        .strip_suffix("[]")
        .or_else(|| name.trim().strip_suffix("..."))
        .map(str::trim_end)
}

/// Splits `text` at commas outside `<...>` and `(...)`.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    let last = text[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts.retain(|p| !p.is_empty());
    parts
}

/// Parses a source-level type parameter declaration such as
/// `<T extends java.lang.Number, U, K extends java.lang.Comparable<? super K>>`.
///
/// Each variable maps to its erased first bound; unbounded variables map to
/// `java.lang.Object`.
#[must_use]
pub fn parse_generic_declaration(text: &str) -> GenericsMap {
    let text = text.trim();
    let inner = text
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(text);

    let mut generics = GenericsMap::new();
    for param in split_top_level(inner, ',') {
        let mut words = param.splitn(2, " extends ");
        let name = words.next().unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let bound = words
            .next()
            .and_then(|b| split_top_level(b, '&').first().copied())
            .map(strip_type_arguments)
            .unwrap_or_else(|| OBJECT.to_string());
        generics.insert(name.to_string(), bound);
    }
    generics
}

/// Parses the formal type parameters of a generic signature attribute, e.g.
/// `<T:Ljava/lang/Number;U::Ljava/lang/Comparable<TU;>;>Ljava/lang/Object;`.
///
/// Returns an empty map if the signature declares no type parameters.
#[must_use]
pub fn parse_formal_type_parameters(signature: &str) -> GenericsMap {
    let mut generics = GenericsMap::new();
    let Some(mut rest) = signature.trim().strip_prefix('<') else {
        return generics;
    };

    while !rest.is_empty() && !rest.starts_with('>') {
        let Some(colon) = rest.find(':') else {
            break;
        };
        let name = rest[..colon].to_string();
        rest = &rest[colon + 1..];

        let mut bound: Option<String> = None;
        loop {
            if let Some(next) = rest.strip_prefix(':') {
                rest = next;
                continue;
            }
            if !(rest.starts_with('L') || rest.starts_with('T') || rest.starts_with('[')) {
                break;
            }
            let end = reference_signature_len(rest);
            if bound.is_none() {
                bound = Some(erase_reference_signature(&rest[..end]));
            }
            rest = &rest[end..];
            if !rest.starts_with(':') {
                break;
            }
        }

        generics.insert(name, bound.unwrap_or_else(|| OBJECT.to_string()));
    }
    generics
}

/// Length of one reference type signature (`L...;`, `T...;` or `[...`) at the start of `text`.
fn reference_signature_len(text: &str) -> usize {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' if i == 0 => return 1 + reference_signature_len(&text[1..]).max(1),
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return i + 1,
            _ => {}
        }
    }
    text.len()
}

fn erase_reference_signature(signature: &str) -> String {
    match signature.chars().next() {
        Some('L') => {
            let body = signature[1..].trim_end_matches(';');
            strip_type_arguments(body).replace('/', ".")
        }
        Some('[') => {
            let inner = &signature[1..];
            match inner.chars().next().and_then(primitive_name) {
                Some(primitive) if inner.len() == 1 => format!("{}[]", primitive),
                _ => format!("{}[]", erase_reference_signature(inner)),
            }
        }
        _ => OBJECT.to_string(),
    }
}

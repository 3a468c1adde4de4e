//! Decomposed member signatures and their canonical form.

use std::fmt;

use crate::{
    compile::ParseDictionary,
    signature::{
        types::{
            class_name_from_internal, erase, parse_generic_declaration, parse_method_descriptor,
            split_top_level, GenericsMap,
        },
        MemberModifiers,
    },
    Result,
};

/// Name of instance constructors.
pub const CONSTRUCTOR: &str = "<init>";
/// Name of static initializers.
pub const STATIC_INITIALIZER: &str = "<clinit>";

/// A member signature split into its parts.
///
/// The VM and its tools spell "this method" in several ways. Each factory below accepts one of
/// them; all of them normalize to the same [`CanonicalSignature`] when they describe the same
/// member:
///
/// | Factory | Source | Example |
/// |---------|--------|---------|
/// | [`from_bytecode_signature`](Self::from_bytecode_signature) | bytecode listing header | `public int add(int, int);` |
/// | [`from_log_signature`](Self::from_log_signature) | compiler log | `demo/Calc add (II)I` |
/// | [`from_assembly_header`](Self::from_assembly_header) | disassembly header | `# {method} {0x…} 'add' '(II)I' in 'demo/Calc'` |
/// | [`from_reflection`](Self::from_reflection) | reflection string | `public int demo.Calc.add(int,int)` |
/// | [`from_dictionary`](Self::from_dictionary) | log `method` id | `<method id='777' holder='776' …/>` |
///
/// # Examples
///
/// ```rust
/// use jitscope::signature::MemberSignatureParts;
///
/// let from_log = MemberSignatureParts::from_log_signature("demo/Calc add (II)I")?;
/// let from_reflection = MemberSignatureParts::from_reflection("public int demo.Calc.add(int,int)")?;
///
/// assert_eq!(from_log.canonical(), from_reflection.canonical());
/// # Ok::<(), jitscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSignatureParts {
    /// Declaring class, dot-separated; inner classes keep their `$`
    pub class_name: String,
    /// Member name; `<init>` for constructors, `<clinit>` for static initializers
    pub member_name: String,
    /// Return type as written; `void` for constructors and initializers
    pub return_type: String,
    /// Parameter types as written, possibly generic or variadic
    pub parameter_types: Vec<String>,
    /// Access flags
    pub modifiers: MemberModifiers,
    /// Type variables declared by the member itself
    pub generics: GenericsMap,
    /// Type variables declared by the enclosing class
    pub class_generics: GenericsMap,
    /// True if the last parameter is variadic
    pub varargs: bool,
}

/// Erased, normalized identity of a member.
///
/// Two signatures describe the same member exactly when their canonical forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalSignature {
    /// Declaring class with `$` replaced by `.`
    pub class_name: String,
    /// Member name
    pub member_name: String,
    /// Erased return type
    pub return_type: String,
    /// Erased parameter types
    pub parameter_types: Vec<String>,
}

impl fmt::Display for CanonicalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}({})",
            self.return_type,
            self.class_name,
            self.member_name,
            self.parameter_types.join(",")
        )
    }
}

impl MemberSignatureParts {
    /// Creates a signature from already separated parts.
    #[must_use]
    pub fn new(
        class_name: impl Into<String>,
        member_name: impl Into<String>,
        return_type: impl Into<String>,
        parameter_types: Vec<String>,
    ) -> Self {
        let varargs = parameter_types
            .last()
            .is_some_and(|p| p.trim_end().ends_with("..."));
        MemberSignatureParts {
            class_name: class_name.into(),
            member_name: member_name.into(),
            return_type: return_type.into(),
            parameter_types,
            modifiers: MemberModifiers::empty(),
            generics: GenericsMap::new(),
            class_generics: GenericsMap::new(),
            varargs,
        }
    }

    /// Parses a member header from a bytecode listing.
    ///
    /// `class_generics` are the type variables declared by the class header.
    ///
    /// # Errors
    /// Returns [`crate::Error::Signature`] if the header has no parameter list or no name.
    pub fn from_bytecode_signature(
        class_name: &str,
        header: &str,
        class_generics: &GenericsMap,
    ) -> Result<Self> {
        let text = header.trim().trim_end_matches(';').trim();

        if text == "static {}" {
            let mut parts = Self::new(class_name, STATIC_INITIALIZER, "void", Vec::new());
            parts.modifiers = MemberModifiers::STATIC;
            parts.class_generics = class_generics.clone();
            return Ok(parts);
        }

        // only constructors print a class name, which is authoritative
        let (mut parts, _) = parse_declaration(header, text, false)?;
        if parts.class_name.is_empty() {
            parts.class_name = class_name.to_string();
        }
        parts.class_generics = class_generics.clone();
        Ok(parts)
    }

    /// Parses the compiler's internal form `pkg/Cls name (desc)ret`, also accepting
    /// `pkg.Cls::name(desc)ret`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Signature`] if the text has no descriptor or the descriptor is
    /// malformed.
    pub fn from_log_signature(text: &str) -> Result<Self> {
        let trimmed = text.trim();

        let (class, name, descriptor) = if let Some((class, rest)) = trimmed.split_once("::") {
            let open = rest
                .find('(')
                .ok_or_else(|| signature_error!(text, "missing descriptor"))?;
            (class, rest[..open].trim(), rest[open..].trim())
        } else {
            let mut tokens = trimmed.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
                (Some(class), Some(name), Some(descriptor), None) => (class, name, descriptor),
                _ => {
                    return Err(signature_error!(
                        text,
                        "expected 'class name descriptor'"
                    ))
                }
            }
        };

        if name.is_empty() {
            return Err(signature_error!(text, "missing member name"));
        }

        let (parameters, return_type) = parse_method_descriptor(descriptor)?;
        Ok(Self::new(
            class_name_from_internal(class),
            name,
            return_type,
            parameters,
        ))
    }

    /// Parses a disassembly header line such as
    /// `# {method} {0x00007f…} 'hashCode' '()I' in 'java/lang/String'`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Signature`] if the name, descriptor or class is missing.
    pub fn from_assembly_header(text: &str) -> Result<Self> {
        let quoted: Vec<&str> = text.split('\'').skip(1).step_by(2).collect();
        if quoted.len() < 3 {
            return Err(signature_error!(
                text,
                "expected quoted name, descriptor and class"
            ));
        }

        let (parameters, return_type) = parse_method_descriptor(quoted[1])?;
        Ok(Self::new(
            class_name_from_internal(quoted[2]),
            quoted[0],
            return_type,
            parameters,
        ))
    }

    /// Parses a reflection string such as
    /// `public static int demo.Calc.add(int,int) throws java.io.IOException`, as produced by
    /// `Method.toString()`, `Method.toGenericString()` and their constructor counterparts.
    ///
    /// # Errors
    /// Returns [`crate::Error::Signature`] if the text has no parameter list or no qualified
    /// name.
    pub fn from_reflection(text: &str) -> Result<Self> {
        let (parts, _) = parse_declaration(text, text.trim(), true)?;
        if parts.class_name.is_empty() {
            return Err(signature_error!(text, "member name is not qualified"));
        }
        Ok(parts)
    }

    /// Builds a signature from a `method` id of the compiler log's dictionary.
    ///
    /// Returns `None` if the method, its holder or any of its types is not in the dictionary.
    #[must_use]
    pub fn from_dictionary(dictionary: &ParseDictionary, method_id: &str) -> Option<Self> {
        let method = dictionary.method(method_id)?;
        let holder = dictionary.klass_name(method.attribute("holder")?)?;
        let name = method.attribute("name")?;
        let return_type = dictionary.type_name(method.attribute("return")?)?;

        let parameters = match method.attribute("arguments") {
            Some(arguments) => arguments
                .split_whitespace()
                .map(|id| dictionary.type_name(id))
                .collect::<Option<Vec<String>>>()?,
            None => Vec::new(),
        };

        let mut parts = Self::new(holder, name, return_type, parameters);
        parts.varargs = false;
        if let Some(flags) = method.attribute("flags") {
            parts.modifiers = MemberModifiers::from_log_flags(flags);
            parts.varargs = parts.modifiers.contains(MemberModifiers::VARARGS);
        }
        Some(parts)
    }

    /// True for instance constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.member_name == CONSTRUCTOR
    }

    /// True for static initializers.
    #[must_use]
    pub fn is_static_initializer(&self) -> bool {
        self.member_name == STATIC_INITIALIZER
    }

    /// Class name without its package.
    #[must_use]
    pub fn simple_class_name(&self) -> &str {
        self.class_name
            .rsplit_once('.')
            .map_or(self.class_name.as_str(), |(_, name)| name)
    }

    /// Package of the declaring class, empty for the default package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.class_name
            .rsplit_once('.')
            .map_or("", |(package, _)| package)
    }

    /// Erased return type.
    #[must_use]
    pub fn erased_return_type(&self) -> String {
        erase(&self.return_type, &self.generics, &self.class_generics)
    }

    /// Erased parameter types, variadic parameters as arrays.
    #[must_use]
    pub fn erased_parameter_types(&self) -> Vec<String> {
        self.parameter_types
            .iter()
            .map(|p| erase(p, &self.generics, &self.class_generics))
            .collect()
    }

    /// The canonical identity of this member.
    #[must_use]
    pub fn canonical(&self) -> CanonicalSignature {
        CanonicalSignature {
            class_name: self.class_name.replace('$', "."),
            member_name: self.member_name.clone(),
            return_type: self.erased_return_type(),
            parameter_types: self.erased_parameter_types(),
        }
    }

    /// Method descriptor of the erased signature, e.g. `(ILjava/lang/String;)V`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        let params: String = self
            .parameter_types
            .iter()
            .map(|p| {
                crate::signature::types::to_descriptor(&erase(
                    p,
                    &self.generics,
                    &self.class_generics,
                ))
            })
            .collect();
        format!(
            "({}){}",
            params,
            crate::signature::types::to_descriptor(&self.erased_return_type())
        )
    }

    /// `Class::name`, the short form used in compile trees.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.class_name, self.member_name)
    }
}

impl fmt::Display for MemberSignatureParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.modifiers.is_empty() {
            write!(f, "{} ", self.modifiers)?;
        }
        if !self.is_constructor() && !self.is_static_initializer() {
            write!(f, "{} ", self.return_type)?;
        }
        write!(
            f,
            "{}.{}({})",
            self.class_name,
            self.member_name,
            self.parameter_types.join(", ")
        )
    }
}

/// Parses `[modifiers] [<generics>] [return] name(params) [throws ...]`.
///
/// With `qualified`, the name carries the declaring class (`pkg.Cls.name`). Without it, only
/// constructors carry one (`pkg.Cls`).
fn parse_declaration(
    original: &str,
    text: &str,
    qualified: bool,
) -> Result<(MemberSignatureParts, Option<String>)> {
    let open = text
        .find('(')
        .ok_or_else(|| signature_error!(original, "missing parameter list"))?;
    let close = text
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| signature_error!(original, "unterminated parameter list"))?;

    let throws = text[close + 1..]
        .trim()
        .strip_prefix("throws")
        .map(|t| t.trim().to_string());

    let parameters: Vec<String> = split_top_level(&text[open + 1..close], ',')
        .into_iter()
        .map(str::to_string)
        .collect();

    let prefix = split_top_level(text[..open].trim(), ' ');
    let (name_token, leading) = prefix
        .split_last()
        .ok_or_else(|| signature_error!(original, "missing member name"))?;

    let mut modifiers = MemberModifiers::empty();
    let mut generics = GenericsMap::new();
    let mut return_type: Option<&str> = None;
    for token in leading {
        if let Some(flag) = MemberModifiers::from_keyword(token) {
            modifiers |= flag;
        } else if token.starts_with('<') {
            generics = parse_generic_declaration(token);
        } else if return_type.is_none() {
            return_type = Some(token);
        } else {
            return Err(signature_error!(original, "unexpected token '{}'", token));
        }
    }

    let (class_name, member_name, return_type) = match return_type {
        // constructors have no return type and print the class as their name
        None => (name_token.to_string(), CONSTRUCTOR.to_string(), "void".to_string()),
        Some(ret) if qualified => {
            let (class, name) = name_token
                .rsplit_once('.')
                .ok_or_else(|| signature_error!(original, "member name is not qualified"))?;
            (class.to_string(), name.to_string(), ret.to_string())
        }
        Some(ret) => (String::new(), name_token.to_string(), ret.to_string()),
    };

    if member_name.is_empty() {
        return Err(signature_error!(original, "missing member name"));
    }

    let varargs = modifiers.contains(MemberModifiers::VARARGS)
        || parameters
            .last()
            .is_some_and(|p| p.trim_end().ends_with("..."));

    Ok((
        MemberSignatureParts {
            class_name,
            member_name,
            return_type,
            parameter_types: parameters,
            modifiers,
            generics,
            class_generics: GenericsMap::new(),
            varargs,
        },
        throws,
    ))
}

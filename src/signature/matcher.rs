//! Matching signatures against declared members.

use crate::signature::{
    types::{component_type, is_primitive, OBJECT},
    MemberSignatureParts,
};

/// Subtype relation between reference types, by dotted name.
///
/// Implemented by [`crate::model::ClassInventory`] over the classes it knows. Matching only
/// ever asks about reference types; primitives are compared exactly.
pub trait TypeHierarchy {
    /// True if `sub` names `sup` or one of its subtypes.
    fn is_subtype(&self, sub: &str, sup: &str) -> bool;
}

/// A hierarchy that knows nothing beyond `java.lang.Object` being the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatHierarchy;

impl TypeHierarchy for FlatHierarchy {
    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup
    }
}

/// How well a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    /// Every type equal after erasure
    Exact,
    /// At least one type matched through assignability or variadic expansion
    Assignable,
}

/// Matches wanted signatures against declared member signatures.
///
/// Rules, applied in order:
/// 1. member name and parameter count must agree
/// 2. each parameter matches exactly by erased name or, when enabled, the declared type is
///    assignable from the wanted type
/// 3. a declared trailing array parameter may absorb an expanded variadic argument list
/// 4. type variables are replaced by their bounds before any comparison
///
/// Return types are compared with the same exact-or-assignable rule. Among several matches the
/// first exact one wins, otherwise the first assignable one in declaration order.
///
/// # Examples
///
/// ```rust
/// use jitscope::signature::{FlatHierarchy, MemberMatcher, MemberSignatureParts};
///
/// let declared = vec![
///     MemberSignatureParts::from_reflection("public int demo.Calc.add(int,int)")?,
///     MemberSignatureParts::from_reflection("public long demo.Calc.add(long,long)")?,
/// ];
/// let wanted = MemberSignatureParts::from_log_signature("demo/Calc add (JJ)J")?;
///
/// let matcher = MemberMatcher::new(&FlatHierarchy);
/// assert_eq!(matcher.find_match(&declared, &wanted), Some(1));
/// # Ok::<(), jitscope::Error>(())
/// ```
pub struct MemberMatcher<'a> {
    hierarchy: &'a dyn TypeHierarchy,
    allow_assignable: bool,
}

impl<'a> MemberMatcher<'a> {
    /// Creates a matcher with assignable matching enabled.
    pub fn new(hierarchy: &'a dyn TypeHierarchy) -> Self {
        MemberMatcher {
            hierarchy,
            allow_assignable: true,
        }
    }

    /// Enables or disables assignable matching.
    #[must_use]
    pub fn with_assignable(mut self, allow: bool) -> Self {
        self.allow_assignable = allow;
        self
    }

    /// True if a value of type `from` may be passed where `to` is declared.
    ///
    /// Both names must already be erased.
    #[must_use]
    pub fn is_assignable(&self, to: &str, from: &str) -> bool {
        if to == from {
            return true;
        }
        if is_primitive(to) || is_primitive(from) {
            return false;
        }
        if to == OBJECT {
            return true;
        }

        match (component_type(to), component_type(from)) {
            (Some(to), Some(from)) => self.is_assignable(to, from),
            (None, Some(_)) => to == "java.lang.Cloneable" || to == "java.io.Serializable",
            (Some(_), None) => false,
            (None, None) => self.hierarchy.is_subtype(from, to),
        }
    }

    fn compare(&self, declared: &str, wanted: &str) -> Option<MatchKind> {
        if declared == wanted {
            Some(MatchKind::Exact)
        } else if self.allow_assignable && self.is_assignable(declared, wanted) {
            Some(MatchKind::Assignable)
        } else {
            None
        }
    }

    /// How `declared` matches `wanted`, or `None`.
    #[must_use]
    pub fn match_kind(
        &self,
        declared: &MemberSignatureParts,
        wanted: &MemberSignatureParts,
    ) -> Option<MatchKind> {
        if declared.member_name != wanted.member_name {
            return None;
        }

        let declared_params = declared.erased_parameter_types();
        let wanted_params = wanted.erased_parameter_types();

        let mut kind = match self.match_positional(&declared_params, &wanted_params) {
            Some(kind) => kind,
            None => self.match_variadic(declared, &declared_params, &wanted_params)?,
        };

        if !declared.is_constructor() && !wanted.is_constructor() {
            let declared_return = declared.erased_return_type();
            kind = kind.max(self.compare(&declared_return, &wanted.erased_return_type())?);
        }
        Some(kind)
    }

    fn match_positional(&self, declared: &[String], wanted: &[String]) -> Option<MatchKind> {
        if declared.len() != wanted.len() {
            return None;
        }
        let mut kind = MatchKind::Exact;
        for (d, w) in declared.iter().zip(wanted) {
            kind = kind.max(self.compare(d, w)?);
        }
        Some(kind)
    }

    fn match_variadic(
        &self,
        declared: &MemberSignatureParts,
        declared_params: &[String],
        wanted_params: &[String],
    ) -> Option<MatchKind> {
        let (last, fixed) = declared_params.split_last()?;
        if !declared.varargs || wanted_params.len() < fixed.len() {
            return None;
        }
        let element = component_type(last)?;

        for (d, w) in fixed.iter().zip(wanted_params) {
            self.compare(d, w)?;
        }
        for w in &wanted_params[fixed.len()..] {
            if w != element && !self.is_assignable(element, w) {
                return None;
            }
        }
        Some(MatchKind::Assignable)
    }

    /// Index of the best match for `wanted` among `declared`.
    #[must_use]
    pub fn find_match(
        &self,
        declared: &[MemberSignatureParts],
        wanted: &MemberSignatureParts,
    ) -> Option<usize> {
        self.find_best(declared.iter().enumerate(), wanted)
    }

    /// Returns the best matching item, with `signature` projecting each item to its signature.
    pub fn find_by<'c, T, F>(
        &self,
        items: &'c [T],
        signature: F,
        wanted: &MemberSignatureParts,
    ) -> Option<&'c T>
    where
        F: Fn(&T) -> &MemberSignatureParts,
    {
        let index = self.find_best(items.iter().map(&signature).enumerate(), wanted)?;
        items.get(index)
    }

    /// Index of the best matching item, with `signature` projecting each item to its
    /// signature.
    pub fn position_by<T, F>(
        &self,
        items: &[T],
        signature: F,
        wanted: &MemberSignatureParts,
    ) -> Option<usize>
    where
        F: Fn(&T) -> &MemberSignatureParts,
    {
        self.find_best(items.iter().map(signature).enumerate(), wanted)
    }

    fn find_best<'c, I>(&self, candidates: I, wanted: &MemberSignatureParts) -> Option<usize>
    where
        I: Iterator<Item = (usize, &'c MemberSignatureParts)>,
    {
        let mut first_assignable = None;
        for (index, candidate) in candidates {
            match self.match_kind(candidate, wanted) {
                Some(MatchKind::Exact) => return Some(index),
                Some(MatchKind::Assignable) if first_assignable.is_none() => {
                    first_assignable = Some(index);
                }
                _ => {}
            }
        }
        first_assignable
    }
}

//! The generic structural node produced by the tag processor.

use std::{collections::HashMap, fmt};

/// A single node of the compiler log tree.
///
/// A tag carries a name, an unordered attribute mapping, ordered children and optional text
/// content. Tags are mutated only while they are on the processor's open-tag stack; once the
/// processor hands one out it is treated as immutable.
///
/// # Examples
///
/// ```rust
/// use jitscope::tags::Tag;
///
/// let tag = Tag::new("call")
///     .with_attribute("method", "1050")
///     .with_attribute("count", "5000");
///
/// assert_eq!(tag.name(), "call");
/// assert_eq!(tag.attribute("method"), Some("1050"));
/// assert_eq!(tag.to_string(), "<call count='5000' method='1050'/>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<Tag>,
    text: Option<String>,
    self_closing: bool,
    complete: bool,
}

impl Tag {
    /// Creates a new, self-closing tag without attributes.
    ///
    /// ## Arguments
    /// * `name` - The tag name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            text: None,
            self_closing: true,
            complete: true,
        }
    }

    pub(crate) fn open(name: String, attributes: HashMap<String, String>) -> Self {
        Tag {
            name,
            attributes,
            children: Vec::new(),
            text: None,
            self_closing: false,
            complete: false,
        }
    }

    pub(crate) fn closed(name: String, attributes: HashMap<String, String>) -> Self {
        Tag {
            name,
            attributes,
            children: Vec::new(),
            text: None,
            self_closing: true,
            complete: true,
        }
    }

    /// Adds an attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Adds a child, builder style. The tag stops being self-closing.
    #[must_use]
    pub fn with_child(mut self, child: Tag) -> Self {
        self.add_child(child);
        self
    }

    /// Sets the text content, builder style. The tag stops being self-closing.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self.self_closing = false;
        self
    }

    /// Appends a child tag.
    pub fn add_child(&mut self, child: Tag) {
        self.self_closing = false;
        self.children.push(child);
    }

    /// Appends a line of text content, joining continued text with a newline.
    pub(crate) fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(text);
            }
            None => self.text = Some(text.to_string()),
        }
    }

    pub(crate) fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    /// The tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the (decoded) value of an attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns an attribute parsed as an unsigned integer.
    #[must_use]
    pub fn attribute_u32(&self, key: &str) -> Option<u32> {
        self.attribute(key).and_then(|v| v.trim().parse().ok())
    }

    /// Returns an attribute parsed as a floating point number.
    #[must_use]
    pub fn attribute_f64(&self, key: &str) -> Option<f64> {
        self.attribute(key).and_then(|v| v.trim().parse().ok())
    }

    /// Returns a hexadecimal attribute such as `address='0x00007f4e2d0f5a10'`.
    #[must_use]
    pub fn attribute_hex(&self, key: &str) -> Option<u64> {
        self.attribute(key).and_then(parse_hex)
    }

    /// The attribute mapping.
    #[must_use]
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// The ordered children.
    #[must_use]
    pub fn children(&self) -> &[Tag] {
        &self.children
    }

    /// The first direct child with the given name.
    #[must_use]
    pub fn first_named_child(&self, name: &str) -> Option<&Tag> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in order.
    pub fn named_children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// The first descendant (depth-first, document order) with the given name.
    #[must_use]
    pub fn first_named_descendant(&self, name: &str) -> Option<&Tag> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.first_named_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True if the tag was written as `<name .../>`.
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// False for tags that were still open when the input ended, or that were implicitly
    /// closed by the close marker of an ancestor.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Total number of tags in this subtree, including `self`.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Tag::subtree_size).sum::<usize>()
    }

    fn write_open(&self, f: &mut fmt::Formatter<'_>, close: bool) -> fmt::Result {
        write!(f, "<{}", self.name)?;

        let mut keys: Vec<&String> = self.attributes.keys().collect();
        keys.sort();
        for key in keys {
            let value = quick_xml::escape::escape(self.attributes[key].as_str());
            write!(f, " {}='{}'", key, value)?;
        }

        if close {
            write!(f, "/>")
        } else {
            write!(f, ">")
        }
    }
}

/// Renders the tag back into the line-oriented dialect: one marker per line, text content on
/// its own line(s). Feeding the output back through a [`crate::tags::TagProcessor`] yields an
/// equal tag.
impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.self_closing && self.children.is_empty() && self.text.is_none() {
            return self.write_open(f, true);
        }

        self.write_open(f, false)?;
        if let Some(text) = &self.text {
            write!(f, "\n{}", quick_xml::escape::escape(text.as_str()))?;
        }
        for child in &self.children {
            write!(f, "\n{}", child)?;
        }
        write!(f, "\n</{}>", self.name)
    }
}

/// Parses `0x`-prefixed (or bare) hexadecimal text.
pub(crate) fn parse_hex(text: &str) -> Option<u64> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation() {
        let tag = Tag::new("parse")
            .with_attribute("method", "1")
            .with_child(Tag::new("bc").with_attribute("bci", "3"))
            .with_child(
                Tag::new("call")
                    .with_attribute("method", "2")
                    .with_child(Tag::new("jvms").with_attribute("bci", "9")),
            )
            .with_child(Tag::new("bc").with_attribute("bci", "7"));

        assert_eq!(tag.children().len(), 3);
        assert_eq!(tag.named_children("bc").count(), 2);
        assert_eq!(
            tag.first_named_child("bc").and_then(|t| t.attribute_u32("bci")),
            Some(3)
        );
        assert_eq!(
            tag.first_named_descendant("jvms")
                .and_then(|t| t.attribute_u32("bci")),
            Some(9)
        );
        assert_eq!(tag.subtree_size(), 5);
        assert!(!tag.is_self_closing());
    }

    #[test]
    fn display_self_closing() {
        let tag = Tag::new("inline_fail").with_attribute("reason", "too big");
        assert_eq!(tag.to_string(), "<inline_fail reason='too big'/>");
    }

    #[test]
    fn display_escapes() {
        let tag = Tag::new("x").with_attribute("v", "a'b<c");
        assert_eq!(tag.to_string(), "<x v='a&apos;b&lt;c'/>");
    }

    #[test]
    fn display_nested() {
        let tag = Tag::new("name").with_text("Java HotSpot(TM)");
        assert_eq!(tag.to_string(), "<name>\nJava HotSpot(TM)\n</name>");
    }

    #[test]
    fn hex_attributes() {
        let tag = Tag::new("nmethod").with_attribute("address", "0x00007f4e2d0f5a10");
        assert_eq!(tag.attribute_hex("address"), Some(0x7f4e_2d0f_5a10));
        assert_eq!(tag.attribute_hex("entry"), None);
        assert_eq!(parse_hex("ff"), Some(255));
    }
}

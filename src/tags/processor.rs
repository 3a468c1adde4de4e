//! Incremental, line-oriented construction of [`Tag`] trees.
//!
//! The compiler log is written by several VM threads at once. The line splitter removes the
//! writer-switch markers, but the text on either side of such a marker may still be one
//! logical line that was cut in half. [`TagProcessor`] therefore keeps a small amount of
//! lookahead state: a marker that is syntactically unfinished at the end of a physical line
//! is held back as a *fragment* and re-joined with the next line before parsing resumes.
//!
//! Tags under construction live on an explicit stack indexed by nesting depth, so the
//! processor never needs the whole document in memory and can be queried between lines.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::{config::ParseConfig, tags::Tag};

/// Stateful converter from log lines to completed top-level [`Tag`]s.
///
/// # Example
///
/// ```rust
/// use jitscope::tags::TagProcessor;
///
/// let mut processor = TagProcessor::new();
/// assert!(processor.process_line("<task compile_id='1' method='java/lang/String hashCode ()I'>").is_none());
/// assert!(processor.process_line("<type id='1' name='int'/>").is_none());
/// let task = processor.process_line("</task>").unwrap();
///
/// assert_eq!(task.name(), "task");
/// assert_eq!(task.children().len(), 1);
/// assert!(!processor.fragment_seen());
/// ```
#[derive(Debug)]
pub struct TagProcessor {
    /// Tags that have been opened but not yet closed, outermost first
    stack: Vec<Tag>,
    /// Completed top-level tags not yet handed out
    completed: VecDeque<Tag>,
    /// Unfinished marker text carried over to the next line
    fragment: Option<String>,
    fragment_seen: bool,
    repair_count: usize,
    dropped_fragment_count: usize,
    stray_close_count: usize,
    transparent: Vec<String>,
    keep_incomplete: bool,
}

impl Default for TagProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagProcessor {
    /// Creates a processor with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ParseConfig::default())
    }

    /// Creates a processor using the transparent-tag and incomplete-tag settings of `config`.
    #[must_use]
    pub fn with_config(config: &ParseConfig) -> Self {
        TagProcessor {
            stack: Vec::new(),
            completed: VecDeque::new(),
            fragment: None,
            fragment_seen: false,
            repair_count: 0,
            dropped_fragment_count: 0,
            stray_close_count: 0,
            transparent: config.transparent_tags.clone(),
            keep_incomplete: config.keep_incomplete_tags,
        }
    }

    /// Feeds one physical line.
    ///
    /// Returns a top-level tag once its close marker (or self-closing marker) has been seen.
    /// If a single line completes more than one top-level tag, the first one is returned and
    /// the others can be drained with [`TagProcessor::next_completed`].
    ///
    /// A held fragment gets exactly one line of lookahead. It is dropped if that line starts a
    /// new marker, or if it is still unterminated after being re-joined.
    pub fn process_line(&mut self, line: &str) -> Option<Tag> {
        let line = line.trim_end_matches(['\r', '\n']);

        let (input, rejoined) = match self.fragment.take() {
            Some(fragment) if starts_marker(line.trim_start()) => {
                self.drop_fragment(&fragment);
                (line.to_string(), false)
            }
            Some(fragment) => {
                self.repair_count += 1;
                let joined = join_fragment(&fragment, line);
                debug!(fragment = %fragment, joined = %joined, "re-joined split tag");
                (joined, true)
            }
            None => (line.to_string(), false),
        };

        self.consume(&input, rejoined);
        self.completed.pop_front()
    }

    /// Returns the next completed top-level tag that was not yet handed out.
    pub fn next_completed(&mut self) -> Option<Tag> {
        self.completed.pop_front()
    }

    /// Flushes the processor at end of input.
    ///
    /// Any still-open tags are closed implicitly and marked incomplete. They are returned only
    /// if the configuration keeps incomplete tags. A dangling fragment is discarded.
    pub fn finish(&mut self) -> Vec<Tag> {
        if let Some(fragment) = self.fragment.take() {
            self.drop_fragment(&fragment);
        }

        while let Some(mut tag) = self.stack.pop() {
            tag.set_complete(false);
            match self.stack.last_mut() {
                Some(parent) => parent.add_child(tag),
                None if self.keep_incomplete => self.completed.push_back(tag),
                None => {}
            }
        }

        self.completed.drain(..).collect()
    }

    /// Returns the processor to its initial state, keeping its configuration.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.completed.clear();
        self.fragment = None;
        self.fragment_seen = false;
        self.repair_count = 0;
        self.dropped_fragment_count = 0;
        self.stray_close_count = 0;
    }

    /// True once any physically split marker has been detected.
    #[must_use]
    pub fn fragment_seen(&self) -> bool {
        self.fragment_seen
    }

    /// Number of re-joins performed.
    #[must_use]
    pub fn repair_count(&self) -> usize {
        self.repair_count
    }

    /// Number of split markers discarded because no continuation followed.
    #[must_use]
    pub fn dropped_fragment_count(&self) -> usize {
        self.dropped_fragment_count
    }

    /// Number of close markers that matched no open tag.
    #[must_use]
    pub fn stray_close_count(&self) -> usize {
        self.stray_close_count
    }

    /// Current nesting depth of in-progress tags.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True while a split marker is waiting for its continuation.
    #[must_use]
    pub fn has_pending_fragment(&self) -> bool {
        self.fragment.is_some()
    }

    fn is_transparent(&self, name: &str) -> bool {
        self.transparent.iter().any(|t| t == name)
    }

    fn drop_fragment(&mut self, fragment: &str) {
        self.dropped_fragment_count += 1;
        debug!(fragment = %fragment, "dropping split tag without continuation");
    }

    /// Consumes all markers and text in one logical line.
    ///
    /// `rejoined` is set when `input` starts with a fragment carried over from the previous
    /// line; that fragment is not held a second time.
    fn consume(&mut self, input: &str, rejoined: bool) {
        let mut rest = input;

        loop {
            let trimmed = rest.trim_start();
            if trimmed.is_empty() {
                break;
            }

            if starts_marker(trimmed) {
                match find_marker_end(trimmed) {
                    Some(end) => {
                        self.handle_marker(&trimmed[..=end]);
                        rest = &trimmed[end + 1..];
                    }
                    None if rejoined && rest.len() == input.len() => {
                        self.drop_fragment(trimmed);
                        break;
                    }
                    None => {
                        trace!(fragment = %trimmed, "unterminated marker held for next line");
                        self.fragment_seen = true;
                        self.fragment = Some(trimmed.to_string());
                        break;
                    }
                }
            } else {
                let end = find_next_marker(trimmed).unwrap_or(trimmed.len());
                let text = trimmed[..end].trim_end();
                if !text.is_empty() {
                    self.handle_text(text);
                }
                rest = &trimmed[end..];
            }
        }
    }

    fn handle_marker(&mut self, marker: &str) {
        let inner = &marker[1..marker.len() - 1];

        // Declarations, comments and CDATA carry nothing the model uses
        if inner.starts_with('?') || inner.starts_with('!') {
            return;
        }

        if let Some(name) = inner.strip_prefix('/') {
            self.handle_close(name.trim());
            return;
        }

        let (body, self_closing) = match inner.strip_suffix('/') {
            Some(body) => (body, true),
            None => (inner, false),
        };

        let (name, attributes) = parse_marker_body(body);
        if name.is_empty() || self.is_transparent(&name) {
            return;
        }

        if self_closing {
            self.emit(Tag::closed(name, attributes));
        } else {
            self.stack.push(Tag::open(name, attributes));
        }
    }

    fn handle_close(&mut self, name: &str) {
        let Some(position) = self.stack.iter().rposition(|t| t.name() == name) else {
            if !self.is_transparent(name) {
                self.stray_close_count += 1;
                debug!(tag = name, "close marker without matching open tag");
            }
            return;
        };

        // Children left open inside the closed tag are completed implicitly
        while self.stack.len() > position + 1 {
            if let Some(mut unclosed) = self.stack.pop() {
                debug!(tag = unclosed.name(), closed_by = name, "implicitly closing tag");
                unclosed.set_complete(false);
                if let Some(parent) = self.stack.last_mut() {
                    parent.add_child(unclosed);
                }
            }
        }

        if let Some(mut tag) = self.stack.pop() {
            tag.set_complete(true);
            self.emit(tag);
        }
    }

    fn handle_text(&mut self, text: &str) {
        let decoded = decode(text);
        match self.stack.last_mut() {
            Some(tag) => tag.append_text(&decoded),
            None => trace!(text = %decoded, "text outside of any tag"),
        }
    }

    fn emit(&mut self, tag: Tag) {
        match self.stack.last_mut() {
            Some(parent) => parent.add_child(tag),
            None => self.completed.push_back(tag),
        }
    }
}

/// True if `text` starts with something that can only be a marker.
fn starts_marker(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('<')
        && matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?' | '_'))
}

/// Index of the closing `>` of the marker starting at `text[0]`, ignoring `>` in quoted values.
fn find_marker_end(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, c) in text.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '>') => return Some(index),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

/// Index of the next position in `text` that starts a marker.
fn find_next_marker(text: &str) -> Option<usize> {
    text.char_indices()
        .find(|(index, c)| *c == '<' && starts_marker(&text[*index..]))
        .map(|(index, _)| index)
}

/// Joins an unterminated marker with the line that continues it.
///
/// A separator is inserted only when the split happened on an attribute boundary: either the
/// continuation starts with whitespace, or the fragment ends in a closed quoted value and the
/// continuation starts a new attribute. Anything else was cut mid-token and is concatenated.
fn join_fragment(fragment: &str, continuation: &str) -> String {
    let trimmed = continuation.trim_start();
    let leading_space = trimmed.len() != continuation.len();
    let fragment = fragment.trim_end();

    let at_boundary = leading_space
        || (quotes_balanced(fragment)
            && fragment.ends_with(['\'', '"'])
            && trimmed.starts_with(|c: char| c.is_ascii_alphabetic()))
        || (quotes_balanced(fragment)
            && !fragment.contains(' ')
            && starts_attribute(trimmed));

    if at_boundary {
        format!("{} {}", fragment, trimmed)
    } else {
        format!("{}{}", fragment, trimmed)
    }
}

/// True if the first token of `text` looks like `key=...`.
fn starts_attribute(text: &str) -> bool {
    let token_end = text.find(char::is_whitespace).unwrap_or(text.len());
    let token = &text[..token_end];
    token.starts_with(|c: char| c.is_ascii_alphabetic()) && token.contains('=')
}

fn quotes_balanced(text: &str) -> bool {
    let mut quote: Option<char> = None;
    for c in text.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {}
        }
    }
    quote.is_none()
}

/// Splits `name attr='value' ...` into the name and decoded attributes.
fn parse_marker_body(body: &str) -> (String, HashMap<String, String>) {
    let body = body.trim();
    let name_end = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    let name = body[..name_end].to_string();

    let mut attributes = HashMap::new();
    let mut rest = body[name_end..].trim_start();

    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let Some(after_eq) = rest.strip_prefix('=') else {
            // Valueless attribute
            if !key.is_empty() {
                attributes.insert(key.to_string(), String::new());
            }
            continue;
        };
        rest = after_eq.trim_start();

        let value = match rest.chars().next() {
            Some(q @ ('\'' | '"')) => {
                let value_body = &rest[1..];
                match value_body.find(q) {
                    Some(end) => {
                        let value = &value_body[..end];
                        rest = &value_body[end + 1..];
                        value
                    }
                    None => {
                        let value = value_body;
                        rest = "";
                        value
                    }
                }
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(rest.len());
                let value = &rest[..end];
                rest = &rest[end..];
                value
            }
        };

        if !key.is_empty() {
            attributes.insert(key.to_string(), decode(value));
        }
        rest = rest.trim_start();
    }

    (name, attributes)
}

/// Decodes entity references, keeping the raw text if it contains an invalid one.
fn decode(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    match quick_xml::escape::unescape(text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(processor: &mut TagProcessor, lines: &[&str]) -> Vec<Tag> {
        let mut tags = Vec::new();
        for line in lines {
            if let Some(tag) = processor.process_line(line) {
                tags.push(tag);
            }
            while let Some(tag) = processor.next_completed() {
                tags.push(tag);
            }
        }
        tags
    }

    #[test]
    fn self_closing_is_emitted_immediately() {
        let mut processor = TagProcessor::new();
        let tag = processor
            .process_line("<klass id='1030' name='java/lang/String' flags='17'/>")
            .unwrap();

        assert_eq!(tag.name(), "klass");
        assert_eq!(tag.attribute("id"), Some("1030"));
        assert_eq!(tag.attribute("name"), Some("java/lang/String"));
        assert_eq!(tag.attribute_u32("flags"), Some(17));
        assert!(tag.is_self_closing());
        assert!(tag.is_complete());
        assert_eq!(processor.depth(), 0);
    }

    #[test]
    fn nesting() {
        let mut processor = TagProcessor::new();
        let tags = feed(
            &mut processor,
            &[
                "<task compile_id='3'>",
                "<phase name='parse' nodes='3'>",
                "<parse method='1050'>",
                "<bc code='182' bci='5'/>",
                "</parse>",
                "</phase>",
                "<task_done success='1'/>",
                "</task>",
            ],
        );

        assert_eq!(tags.len(), 1);
        let task = &tags[0];
        assert_eq!(task.children().len(), 2);
        let phase = task.first_named_child("phase").unwrap();
        let parse = phase.first_named_child("parse").unwrap();
        assert_eq!(parse.children()[0].attribute("bci"), Some("5"));
        assert!(task.first_named_child("task_done").is_some());
    }

    #[test]
    fn nothing_emitted_until_closed() {
        let mut processor = TagProcessor::new();
        assert!(processor.process_line("<task compile_id='1'>").is_none());
        assert!(processor.process_line("<type id='1' name='void'/>").is_none());
        assert_eq!(processor.depth(), 1);
        assert!(processor.process_line("</task>").is_some());
    }

    #[test]
    fn two_line_open_marker() {
        let mut processor = TagProcessor::new();
        assert!(processor
            .process_line("<method id='1050' holder='1049' name='length'")
            .is_none());
        assert!(processor.has_pending_fragment());

        let tag = processor
            .process_line(" return='1029' flags='1' bytes='6'/>")
            .unwrap();

        assert_eq!(tag.name(), "method");
        assert_eq!(tag.attributes().len(), 6);
        assert_eq!(tag.attribute("name"), Some("length"));
        assert_eq!(tag.attribute("bytes"), Some("6"));
        assert!(processor.fragment_seen());
        assert_eq!(processor.repair_count(), 1);
        assert!(processor.next_completed().is_none());
    }

    #[test]
    fn two_line_marker_without_leading_space() {
        let mut processor = TagProcessor::new();
        assert!(processor.process_line("<call method='1050' count='5000'").is_none());
        let tag = processor.process_line("inline='1'/>").unwrap();

        assert_eq!(tag.attribute("count"), Some("5000"));
        assert_eq!(tag.attribute("inline"), Some("1"));
    }

    #[test]
    fn split_mid_token() {
        let mut processor = TagProcessor::new();
        // writer switch removed between these two physical lines
        assert!(processor.process_line("<parse method='1047' uses='1").is_none());
        assert!(processor.process_line("0' stamp='0.112'>").is_none());
        let parse = processor.process_line("</parse>").unwrap();

        assert_eq!(parse.attribute("uses"), Some("10"));
        assert_eq!(parse.attribute("stamp"), Some("0.112"));
        assert!(processor.fragment_seen());
    }

    #[test]
    fn fragment_without_continuation_is_dropped() {
        let mut processor = TagProcessor::new();
        let tags = feed(
            &mut processor,
            &[
                "<task_queued compile_id='5' method='demo/X",
                "<task_queued compile_id='6' method='demo/X a ()V'/>",
                "<task_queued compile_id='7' method='demo/X b ()V'/>",
                "<task_queued compile_id='8' method='demo/X c ()V'/>",
            ],
        );

        let ids: Vec<_> = tags.iter().filter_map(|t| t.attribute("compile_id")).collect();
        assert_eq!(ids, vec!["6", "7", "8"]);
        assert!(processor.fragment_seen());
        assert!(!processor.has_pending_fragment());
        assert_eq!(processor.repair_count(), 0);
        assert_eq!(processor.dropped_fragment_count(), 1);
    }

    #[test]
    fn fragment_is_rejoined_only_once() {
        let mut processor = TagProcessor::new();
        let tags = feed(
            &mut processor,
            &[
                "<task_queued compile_id='5' method='demo/X",
                " a ()V",
                "garbage",
                "<task_queued compile_id='6'/>",
            ],
        );

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].attribute("compile_id"), Some("6"));
        assert_eq!(processor.repair_count(), 1);
        assert_eq!(processor.dropped_fragment_count(), 1);
        assert!(!processor.has_pending_fragment());
    }

    #[test]
    fn split_inside_tree_keeps_structure() {
        let mut processor = TagProcessor::new();
        let tags = feed(
            &mut processor,
            &[
                "<parse method='1'>",
                "<bc code='182' bci='2'/>",
                "<call method='2' count='1",
                "00' inline='1'/>",
                "<inline_success reason='accessor'/>",
                "</parse>",
            ],
        );

        assert_eq!(tags.len(), 1);
        let parse = &tags[0];
        assert_eq!(parse.children().len(), 3);
        assert_eq!(parse.children()[1].attribute("count"), Some("100"));
        assert!(processor.fragment_seen());
    }

    #[test]
    fn text_content() {
        let mut processor = TagProcessor::new();
        let tags = feed(
            &mut processor,
            &[
                "<vm_version>",
                "<name>",
                "Java HotSpot(TM) 64-Bit Server VM",
                "</name>",
                "<release>",
                "17.0.2+8",
                "more",
                "</release>",
                "</vm_version>",
            ],
        );

        let vm = &tags[0];
        assert_eq!(
            vm.first_named_child("name").and_then(Tag::text),
            Some("Java HotSpot(TM) 64-Bit Server VM")
        );
        assert_eq!(
            vm.first_named_child("release").and_then(Tag::text),
            Some("17.0.2+8\nmore")
        );
    }

    #[test]
    fn same_line_text_and_markers() {
        let mut processor = TagProcessor::new();
        let tag = processor.process_line("<info>hello &amp; bye</info>").unwrap();
        assert_eq!(tag.text(), Some("hello & bye"));

        let tags = feed(&mut processor, &["<a><b x='1'/><c/></a>"]);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].children().len(), 2);
    }

    #[test]
    fn multiple_top_level_on_one_line() {
        let mut processor = TagProcessor::new();
        let first = processor.process_line("<a/><b/>").unwrap();
        assert_eq!(first.name(), "a");
        assert_eq!(processor.next_completed().unwrap().name(), "b");
    }

    #[test]
    fn entities_are_decoded() {
        let mut processor = TagProcessor::new();
        let tag = processor
            .process_line("<inline_fail reason='callee&apos;s &quot;size&quot; &lt; 35'/>")
            .unwrap();
        assert_eq!(tag.attribute("reason"), Some("callee's \"size\" < 35"));
    }

    #[test]
    fn quoted_angle_brackets() {
        let mut processor = TagProcessor::new();
        let tag = processor
            .process_line("<method id='1' name='<init>' holder='2'/>")
            .unwrap();
        assert_eq!(tag.attribute("name"), Some("<init>"));
    }

    #[test]
    fn transparent_containers() {
        let mut processor = TagProcessor::new();
        let tags = feed(
            &mut processor,
            &[
                "<?xml version='1.0' encoding='UTF-8'?>",
                "<hotspot_log version='160 1' process='1234' time_ms='1'>",
                "<task_queued compile_id='1'/>",
                "<compilation_log thread='7'>",
                "<start_compile_thread thread='7'/>",
                "</compilation_log>",
                "</hotspot_log>",
            ],
        );

        let names: Vec<_> = tags.iter().map(Tag::name).collect();
        assert_eq!(names, vec!["task_queued", "start_compile_thread"]);
        assert_eq!(processor.stray_close_count(), 0);
    }

    #[test]
    fn mismatched_close_completes_children() {
        let mut processor = TagProcessor::new();
        let tags = feed(
            &mut processor,
            &["<task>", "<phase name='parse'>", "<parse method='1'>", "</task>"],
        );

        let task = &tags[0];
        assert!(task.is_complete());
        let phase = task.first_named_child("phase").unwrap();
        assert!(!phase.is_complete());
        assert!(phase.first_named_child("parse").is_some());
    }

    #[test]
    fn stray_close_is_ignored() {
        let mut processor = TagProcessor::new();
        assert!(processor.process_line("</parse>").is_none());
        assert_eq!(processor.stray_close_count(), 1);
    }

    #[test]
    fn finish_returns_incomplete() {
        let mut processor = TagProcessor::new();
        processor.process_line("<task compile_id='9'>");
        processor.process_line("<parse method='1'>");
        processor.process_line("<dangling a='");

        let rest = processor.finish();
        assert_eq!(rest.len(), 1);
        assert!(!rest[0].is_complete());
        assert_eq!(rest[0].children().len(), 1);
        assert_eq!(processor.depth(), 0);

        let mut strict = TagProcessor::with_config(&ParseConfig::strict());
        strict.process_line("<task>");
        assert!(strict.finish().is_empty());
    }

    #[test]
    fn idempotent_over_same_input() {
        let lines = [
            "<task compile_id='2'>",
            "<parse method='1'>",
            "<branch target_bci='9' taken='0' not_taken='5'/>",
            "</parse>",
            "</task>",
        ];
        let first = feed(&mut TagProcessor::new(), &lines);
        let second = feed(&mut TagProcessor::new(), &lines);
        assert_eq!(first, second);
    }

    #[test]
    fn display_round_trip() {
        let lines = [
            "<task compile_id='2' method='a/B c ()V'>",
            "<parse method='1'>",
            "<inline_fail reason='too &apos;big&apos;'/>",
            "</parse>",
            "</task>",
        ];
        let original = feed(&mut TagProcessor::new(), &lines).remove(0);
        let rendered = original.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        let reparsed = feed(&mut TagProcessor::new(), &lines).remove(0);
        assert_eq!(original, reparsed);
    }

    #[test]
    fn reset_clears_state() {
        let mut processor = TagProcessor::new();
        processor.process_line("<task a='");
        assert!(processor.fragment_seen());
        processor.reset();
        assert!(!processor.fragment_seen());
        assert!(!processor.has_pending_fragment());
        assert_eq!(processor.depth(), 0);
    }

    #[test]
    fn join_rules() {
        assert_eq!(join_fragment("<a x='1'", " y='2'/>"), "<a x='1' y='2'/>");
        assert_eq!(join_fragment("<a x='1'", "y='2'/>"), "<a x='1' y='2'/>");
        assert_eq!(join_fragment("<a x='1", "2'/>"), "<a x='12'/>");
        assert_eq!(join_fragment("<a", "x='1'/>"), "<a x='1'/>");
        assert_eq!(join_fragment("<a x='1'", "/>"), "<a x='1'/>");
        assert_eq!(join_fragment("<ca", "ll method='1'/>"), "<call method='1'/>");
    }
}

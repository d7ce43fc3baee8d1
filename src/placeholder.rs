//! Placeholder substitution, in string form before compilation and in tree
//! form after.
//!
//! String replacements happen on the raw markup, so their values are
//! compiled as markup. Tree replacements splice prebuilt [`StyledRun`]
//! subtrees into leaves and are never re-scanned.

use crate::run::StyledRun;

/// A set of placeholder definitions.
///
/// # Examples
///
/// ```
/// use chatdown::{Parser, Placeholders};
///
/// let placeholders = Placeholders::new().set("name", "Bob");
/// let parser = Parser::new();
/// let run = parser
///     .parse_with_placeholders("hello %name%", &placeholders)
///     .unwrap();
/// assert_eq!(run.plain_text(), "hello Bob");
/// ```
#[derive(Clone, Debug)]
pub struct Placeholders {
    prefix: String,
    suffix: String,
    ignore_case: bool,
    text: Vec<(String, String)>,
    runs: Vec<(String, StyledRun)>,
}

impl Default for Placeholders {
    fn default() -> Self {
        Placeholders {
            prefix: "%".to_string(),
            suffix: "%".to_string(),
            ignore_case: true,
            text: Vec::new(),
            runs: Vec::new(),
        }
    }
}

impl Placeholders {
    /// Create an empty set with `%key%` delimiters, case-insensitive.
    pub fn new() -> Self {
        Placeholders::default()
    }

    /// Set the placeholder prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the placeholder suffix.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Make key matching case-sensitive.
    pub fn case_sensitive(mut self, on: bool) -> Self {
        self.ignore_case = !on;
        self
    }

    /// Add a string replacement.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((key.into(), value.into()));
        self
    }

    /// Add a subtree replacement, used by tree-mode substitution.
    pub fn set_run(mut self, key: impl Into<String>, run: StyledRun) -> Self {
        self.runs.push((key.into(), run));
        self
    }

    /// String mode: replace every `prefix+key+suffix` occurrence in `input`
    /// for each configured string placeholder, left to right, non-overlapping.
    pub fn replace_in(&self, input: &str) -> String {
        let mut out = input.to_string();
        for (key, value) in &self.text {
            let pattern = format!("{}{}{}", self.prefix, key, self.suffix);
            out = replace_all(&out, &pattern, value, self.ignore_case);
        }
        out
    }

    /// Tree mode: splice configured subtree replacements into every leaf,
    /// splitting the leaf text around each match.
    pub fn apply(&self, run: &StyledRun) -> StyledRun {
        let mut out = run.clone();
        self.apply_in_place(&mut out);
        out
    }

    fn apply_in_place(&self, run: &mut StyledRun) {
        for child in &mut run.children {
            self.apply_in_place(child);
        }
        self.apply_leaf(run, 0);
    }

    /// Splice keys `from..` into a leaf. Spliced subtrees are final; only
    /// the text pieces around them see the remaining keys.
    fn apply_leaf(&self, run: &mut StyledRun, from: usize) {
        if run.text.is_empty() {
            return;
        }
        for (idx, (key, replacement)) in self.runs.iter().enumerate().skip(from) {
            let pattern = format!("{}{}{}", self.prefix, key, self.suffix);
            let pieces = split_leaf(&run.text, &pattern, self.ignore_case);
            let Some(pieces) = pieces else { continue };
            let mut children = Vec::with_capacity(pieces.len());
            for piece in pieces {
                match piece {
                    Piece::Text(text) => {
                        // The leaf becomes a branch carrying its style; the
                        // text pieces keep it too so flattening is unchanged.
                        let mut leaf = run.clone();
                        leaf.text = text;
                        leaf.children = Vec::new();
                        self.apply_leaf(&mut leaf, idx + 1);
                        children.push(leaf);
                    }
                    Piece::Match => children.push(replacement.clone()),
                }
            }
            run.text.clear();
            run.children = children;
            return;
        }
    }
}

enum Piece {
    Text(String),
    Match,
}

/// Split leaf text at each pattern occurrence. `None` when nothing matches.
fn split_leaf(text: &str, pattern: &str, ignore_case: bool) -> Option<Vec<Piece>> {
    let mut pieces = Vec::new();
    let mut rest = text;
    let mut matched = false;
    while let Some(at) = find(rest, pattern, ignore_case) {
        matched = true;
        if at > 0 {
            pieces.push(Piece::Text(rest[..at].to_string()));
        }
        pieces.push(Piece::Match);
        rest = &rest[at + pattern.len()..];
    }
    if !matched {
        return None;
    }
    if !rest.is_empty() {
        pieces.push(Piece::Text(rest.to_string()));
    }
    Some(pieces)
}

fn replace_all(input: &str, pattern: &str, value: &str, ignore_case: bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(at) = find(rest, pattern, ignore_case) {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + pattern.len()..];
    }
    out.push_str(rest);
    out
}

/// Byte index of the first occurrence of `pattern` in `haystack`,
/// optionally ignoring ASCII case. An empty pattern never matches: the
/// replacement loops advance by the match length.
fn find(haystack: &str, pattern: &str, ignore_case: bool) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return None;
    }
    if !ignore_case {
        return haystack.find(pattern);
    }
    (0..=haystack.len() - pattern.len()).find(|&i| {
        haystack.is_char_boundary(i)
            && haystack.is_char_boundary(i + pattern.len())
            && haystack[i..i + pattern.len()].eq_ignore_ascii_case(pattern)
    })
}

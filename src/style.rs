//! Decorations, color specifications, and the shared color/format token
//! grammar.
//!
//! The token grammar here is used by inline extended tokens (`&gold&`,
//! `&#f00,#00f&`) and by the `color=`/`format=` attributes of event
//! definitions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color::{Color, NamedColor};
use crate::error::ParseError;

/// A single text decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoration {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Obfuscated,
}

impl Decoration {
    /// All decorations, in a fixed canonical order.
    pub const ALL: [Decoration; 5] = [
        Decoration::Bold,
        Decoration::Italic,
        Decoration::Underline,
        Decoration::Strikethrough,
        Decoration::Obfuscated,
    ];

    /// The single-character legacy code for this decoration.
    pub fn code(self) -> char {
        match self {
            Decoration::Bold => 'l',
            Decoration::Italic => 'o',
            Decoration::Underline => 'n',
            Decoration::Strikethrough => 'm',
            Decoration::Obfuscated => 'k',
        }
    }

    /// Look up a decoration by its legacy code, case-insensitively.
    pub fn from_code(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        Decoration::ALL.iter().copied().find(|d| d.code() == c)
    }

    /// The inline marker character, doubled in markup (`**bold**`).
    pub fn marker(self) -> char {
        match self {
            Decoration::Bold => '*',
            Decoration::Italic => '#',
            Decoration::Underline => '_',
            Decoration::Strikethrough => '~',
            Decoration::Obfuscated => '?',
        }
    }

    /// Look up a decoration by its inline marker character.
    pub fn from_marker(c: char) -> Option<Self> {
        Decoration::ALL.iter().copied().find(|d| d.marker() == c)
    }

    /// The canonical lowercase name for this decoration.
    pub fn name(self) -> &'static str {
        match self {
            Decoration::Bold => "bold",
            Decoration::Italic => "italic",
            Decoration::Underline => "underline",
            Decoration::Strikethrough => "strikethrough",
            Decoration::Obfuscated => "obfuscated",
        }
    }

    /// Look up a decoration by name, case-insensitively. Accepts the
    /// `underlined`, `strike`, and `magic` aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bold" => Some(Decoration::Bold),
            "italic" => Some(Decoration::Italic),
            "underline" | "underlined" => Some(Decoration::Underline),
            "strikethrough" | "strike" => Some(Decoration::Strikethrough),
            "obfuscated" | "magic" => Some(Decoration::Obfuscated),
            _ => None,
        }
    }
}

/// The set of decorations active on a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecorationSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

impl DecorationSet {
    /// Returns true if no decoration is set.
    pub fn is_empty(&self) -> bool {
        !self.bold && !self.italic && !self.underline && !self.strikethrough && !self.obfuscated
    }

    /// Whether a decoration is set.
    pub fn contains(&self, decoration: Decoration) -> bool {
        match decoration {
            Decoration::Bold => self.bold,
            Decoration::Italic => self.italic,
            Decoration::Underline => self.underline,
            Decoration::Strikethrough => self.strikethrough,
            Decoration::Obfuscated => self.obfuscated,
        }
    }

    /// Set or clear a decoration.
    pub fn set(&mut self, decoration: Decoration, on: bool) {
        match decoration {
            Decoration::Bold => self.bold = on,
            Decoration::Italic => self.italic = on,
            Decoration::Underline => self.underline = on,
            Decoration::Strikethrough => self.strikethrough = on,
            Decoration::Obfuscated => self.obfuscated = on,
        }
    }

    /// The decorations set in both sets combined.
    pub fn union(&self, other: &DecorationSet) -> DecorationSet {
        DecorationSet {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
            obfuscated: self.obfuscated || other.obfuscated,
        }
    }

    /// Iterate over the set decorations in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Decoration> + '_ {
        Decoration::ALL.iter().copied().filter(|d| self.contains(*d))
    }
}

/// Parse-time color state: a solid color, a gradient anchor list, or a
/// rainbow.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorSpec {
    /// A single color applied to the whole run.
    Solid(Color),
    /// Two or more anchors rendered as discrete slices across the run.
    Gradient(Vec<Color>),
    /// Hue-cycled colors, one per codepoint, offset by a phase in degrees.
    Rainbow {
        phase: i32,
    },
}

/// What the caller of the token grammar expects to find.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Expect {
    Any,
    ColorOnly,
    FormatOnly,
}

/// One resolved token from the grammar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum FormatToken {
    Color(Color),
    Decoration(Decoration),
}

static RAINBOW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)rainbow(?::(-?\d+))?$").unwrap());

/// Recognize a rainbow directive (`rainbow`, `rainbow:25`) and extract its
/// phase.
pub(crate) fn rainbow_phase(token: &str) -> Option<i32> {
    let captures = RAINBOW.captures(token)?;
    match captures.get(1) {
        Some(phase) => phase.as_str().parse().ok(),
        None => Some(0),
    }
}

/// Parse a comma/hyphen-separated list of color and format tokens.
///
/// Each segment is a hex color, a named color or decoration, `reset`, or —
/// exactly one character long — a legacy code. A leading `!` negates the
/// segment. In lenient mode undecodable or mismatched segments are dropped.
pub(crate) fn parse_format_tokens(
    input: &str,
    expect: Expect,
    lenient: bool,
) -> Result<Vec<(FormatToken, bool)>, ParseError> {
    let mut out = Vec::new();
    for raw in input.split([',', '-']) {
        let (segment, negated) = match raw.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let token = match decode_segment(segment) {
            Some(token) => token,
            None => {
                if lenient {
                    continue;
                }
                return Err(ParseError::InvalidColorToken(segment.to_string()));
            }
        };
        match (expect, token) {
            (Expect::ColorOnly, FormatToken::Decoration(_)) => {
                if lenient {
                    continue;
                }
                return Err(ParseError::ColorFormatMismatch {
                    expected: "color",
                    found: segment.to_string(),
                });
            }
            (Expect::FormatOnly, FormatToken::Color(_)) => {
                if lenient {
                    continue;
                }
                return Err(ParseError::ColorFormatMismatch {
                    expected: "format",
                    found: segment.to_string(),
                });
            }
            _ => out.push((token, negated)),
        }
    }
    Ok(out)
}

fn decode_segment(segment: &str) -> Option<FormatToken> {
    if segment.is_empty() {
        return None;
    }
    if segment.starts_with('#') {
        return Color::parse(segment).ok().map(FormatToken::Color);
    }
    if let Some(decoration) = Decoration::from_name(segment) {
        return Some(FormatToken::Decoration(decoration));
    }
    if segment.eq_ignore_ascii_case("reset") {
        return Some(FormatToken::Color(Color::Reset));
    }
    if let Some(named) = NamedColor::from_name(segment) {
        return Some(FormatToken::Color(Color::Named(named)));
    }
    // A single character is a legacy code.
    let mut chars = segment.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(named) = NamedColor::from_code(c) {
            return Some(FormatToken::Color(Color::Named(named)));
        }
        if let Some(decoration) = Decoration::from_code(c) {
            return Some(FormatToken::Decoration(decoration));
        }
        if c.eq_ignore_ascii_case(&'r') {
            return Some(FormatToken::Color(Color::Reset));
        }
    }
    None
}

/// Apply a resolved token list to an active color spec and decoration set.
///
/// Colors accumulate in source order: one becomes a solid, two or more a
/// gradient. A negated color clears the active color; a negated decoration
/// clears its flag (last occurrence wins).
pub(crate) fn fold_tokens(
    tokens: &[(FormatToken, bool)],
    color: &mut Option<ColorSpec>,
    decorations: &mut DecorationSet,
) {
    let mut anchors: Vec<Color> = Vec::new();
    for (token, negated) in tokens {
        match token {
            FormatToken::Color(c) => {
                if *negated {
                    anchors.clear();
                    *color = None;
                } else {
                    anchors.push(*c);
                }
            }
            FormatToken::Decoration(d) => decorations.set(*d, !negated),
        }
    }
    match anchors.len() {
        0 => {}
        1 => *color = Some(ColorSpec::Solid(anchors[0])),
        _ => *color = Some(ColorSpec::Gradient(anchors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoration_lookups() {
        assert_eq!(Decoration::from_code('L'), Some(Decoration::Bold));
        assert_eq!(Decoration::from_marker('~'), Some(Decoration::Strikethrough));
        assert_eq!(Decoration::from_name("underlined"), Some(Decoration::Underline));
        assert_eq!(Decoration::from_name("magic"), Some(Decoration::Obfuscated));
        assert_eq!(Decoration::from_name("shiny"), None);
    }

    #[test]
    fn decoration_set_basics() {
        let mut set = DecorationSet::default();
        assert!(set.is_empty());
        set.set(Decoration::Bold, true);
        set.set(Decoration::Italic, true);
        assert!(set.contains(Decoration::Bold));
        let listed: Vec<_> = set.iter().collect();
        assert_eq!(listed, vec![Decoration::Bold, Decoration::Italic]);
        set.set(Decoration::Bold, false);
        assert!(!set.contains(Decoration::Bold));
    }

    #[test]
    fn rainbow_directive() {
        assert_eq!(rainbow_phase("rainbow"), Some(0));
        assert_eq!(rainbow_phase("Rainbow:25"), Some(25));
        assert_eq!(rainbow_phase("rainbow:-10"), Some(-10));
        assert_eq!(rainbow_phase("rainbows"), None);
        assert_eq!(rainbow_phase("rainbow:"), None);
    }

    #[test]
    fn parse_single_color() {
        let tokens = parse_format_tokens("gold", Expect::Any, false).unwrap();
        assert_eq!(
            tokens,
            vec![(FormatToken::Color(Color::Named(NamedColor::Gold)), false)]
        );
    }

    #[test]
    fn parse_gradient_list() {
        let tokens = parse_format_tokens("#f00-#00f", Expect::Any, false).unwrap();
        assert_eq!(tokens.len(), 2);
        let tokens = parse_format_tokens("red,gold,blue", Expect::Any, false).unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn parse_legacy_code_segment() {
        let tokens = parse_format_tokens("a", Expect::Any, false).unwrap();
        assert_eq!(
            tokens,
            vec![(FormatToken::Color(Color::Named(NamedColor::Green)), false)]
        );
        let tokens = parse_format_tokens("l", Expect::Any, false).unwrap();
        assert_eq!(tokens, vec![(FormatToken::Decoration(Decoration::Bold), false)]);
    }

    #[test]
    fn parse_negated() {
        let tokens = parse_format_tokens("!bold", Expect::Any, false).unwrap();
        assert_eq!(tokens, vec![(FormatToken::Decoration(Decoration::Bold), true)]);
    }

    #[test]
    fn strict_rejects_unknown() {
        let err = parse_format_tokens("notacolor", Expect::Any, false).unwrap_err();
        assert_eq!(err, ParseError::InvalidColorToken("notacolor".to_string()));
    }

    #[test]
    fn lenient_drops_unknown() {
        let tokens = parse_format_tokens("notacolor,bold", Expect::Any, true).unwrap();
        assert_eq!(tokens, vec![(FormatToken::Decoration(Decoration::Bold), false)]);
    }

    #[test]
    fn expect_mismatch() {
        let err = parse_format_tokens("bold", Expect::ColorOnly, false).unwrap_err();
        assert!(matches!(err, ParseError::ColorFormatMismatch { expected: "color", .. }));
        let err = parse_format_tokens("red", Expect::FormatOnly, false).unwrap_err();
        assert!(matches!(err, ParseError::ColorFormatMismatch { expected: "format", .. }));
        let tokens = parse_format_tokens("red", Expect::FormatOnly, true).unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn fold_solid_and_gradient() {
        let mut color = None;
        let mut decorations = DecorationSet::default();
        let tokens = parse_format_tokens("gold,bold", Expect::Any, false).unwrap();
        fold_tokens(&tokens, &mut color, &mut decorations);
        assert_eq!(color, Some(ColorSpec::Solid(Color::Named(NamedColor::Gold))));
        assert!(decorations.contains(Decoration::Bold));

        let tokens = parse_format_tokens("#f00,#00f", Expect::Any, false).unwrap();
        fold_tokens(&tokens, &mut color, &mut decorations);
        assert_eq!(
            color,
            Some(ColorSpec::Gradient(vec![
                Color::Rgb(255, 0, 0),
                Color::Rgb(0, 0, 255)
            ]))
        );
    }

    #[test]
    fn fold_negated_clears() {
        let mut color = Some(ColorSpec::Solid(Color::Named(NamedColor::Red)));
        let mut decorations = DecorationSet {
            bold: true,
            ..Default::default()
        };
        let tokens = parse_format_tokens("!red,!bold", Expect::Any, false).unwrap();
        fold_tokens(&tokens, &mut color, &mut decorations);
        assert_eq!(color, None);
        assert!(decorations.is_empty());
    }
}

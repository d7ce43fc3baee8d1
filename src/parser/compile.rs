//! The recursive markup compiler.
//!
//! Compilation scans the input left to right, accumulating plain text in a
//! per-span frame and flushing it into a styled leaf whenever a construct
//! opens, the active style changes, or the span ends. Constructs recurse
//! with a fresh frame: formatting spans inherit the surrounding style,
//! event spans compute their own from the definition.

use log::trace;

use crate::color::{Color, NamedColor};
use crate::error::ParseError;
use crate::gradient::{gradient_colors, rainbow_colors};
use crate::options::{Features, Options};
use crate::placeholder::Placeholders;
use crate::run::{ClickAction, ClickEvent, HoverEvent, Interaction, StyledRun};
use crate::style::{self, ColorSpec, Decoration, DecorationSet, Expect};

use super::event;
use super::scanner;
use super::url;

/// Compiles markup strings into [`StyledRun`] trees.
///
/// A parser is cheap to clone; share one per call site rather than across
/// threads.
///
/// # Examples
///
/// ```
/// use chatdown::Parser;
///
/// let run = Parser::new().parse("&gold&hello **world**").unwrap();
/// assert_eq!(run.plain_text(), "hello world");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Parser {
    options: Options,
}

/// Per-span compilation state.
#[derive(Clone, Debug)]
struct Frame {
    buffer: String,
    color: Option<ColorSpec>,
    decorations: DecorationSet,
    font: Option<String>,
    insertion: Option<String>,
    interaction: Option<Interaction>,
    /// Whether the active decorations arrived via legacy code sequencing.
    /// Only those are cleared by a legacy reset or color code.
    legacy_decorations: bool,
    url_detection: bool,
    children: Vec<StyledRun>,
}

impl Frame {
    fn root(url_detection: bool) -> Self {
        Frame {
            buffer: String::new(),
            color: None,
            decorations: DecorationSet::default(),
            font: None,
            insertion: None,
            interaction: None,
            legacy_decorations: false,
            url_detection,
            children: Vec::new(),
        }
    }
}

impl Parser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Parser::default()
    }

    /// Create a parser with the given options.
    pub fn with_options(options: Options) -> Self {
        Parser { options }
    }

    /// The options this parser compiles with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Compile markup into a styled run tree.
    pub fn parse(&self, input: &str) -> Result<StyledRun, ParseError> {
        trace!("compiling {} bytes of markup", input.len());
        self.compile_span(input, Frame::root(true), 0)
    }

    /// Compile markup after substituting string placeholders, then splice
    /// any configured subtree placeholders into the result.
    pub fn parse_with_placeholders(
        &self,
        input: &str,
        placeholders: &Placeholders,
    ) -> Result<StyledRun, ParseError> {
        let replaced = placeholders.replace_in(input);
        let run = self.parse(&replaced)?;
        Ok(placeholders.apply(&run))
    }

    /// Compile an embedded markup fragment (hover tooltips, entity names).
    /// URL detection is off so generated tooltips never gain interactions.
    pub(crate) fn compile_fragment(
        &self,
        input: &str,
        depth: usize,
    ) -> Result<StyledRun, ParseError> {
        self.compile_span(input, Frame::root(false), depth)
    }

    fn compile_span(
        &self,
        input: &str,
        mut frame: Frame,
        depth: usize,
    ) -> Result<StyledRun, ParseError> {
        let features = self.options.features;
        let mut i = 0;
        while i < input.len() {
            let rest = &input[i..];
            let Some(c) = rest.chars().next() else { break };

            // Escape: consume both, emit the second literally.
            if c == '\\' {
                i += 1;
                match input[i..].chars().next() {
                    Some(next) => {
                        frame.buffer.push(next);
                        i += next.len_utf8();
                    }
                    None => frame.buffer.push('\\'),
                }
                continue;
            }

            // Legacy colors: configured marker or the native one.
            if (c == self.options.marker || c == '§')
                && features.contains(Features::LEGACY_COLORS)
            {
                let after = i + c.len_utf8();
                if let Some(next) = self.apply_color_code(input, after, c, &mut frame)? {
                    i = next;
                    continue;
                }
                frame.buffer.push(c);
                i = after;
                continue;
            }

            // Events: [display](definition).
            if c == '[' && features.contains(Features::ADVANCED_FORMATTING) {
                if let Some(close) = scanner::match_square(input, i) {
                    if input[close + 1..].starts_with('(') {
                        if let Some(end) = scanner::match_paren(input, close + 1) {
                            if depth >= self.options.max_depth {
                                frame.buffer.push_str(&input[i..=end]);
                                i = end + 1;
                                continue;
                            }
                            self.flush(&mut frame)?;
                            let display = &input[i + 1..close];
                            let definition = &input[close + 2..end];
                            let run = self.compile_event(display, definition, &frame, depth)?;
                            frame.children.push(run);
                            i = end + 1;
                            continue;
                        }
                    }
                }
                frame.buffer.push('[');
                i += 1;
                continue;
            }

            // Inline formatting: doubled marker pairs.
            if features.contains(Features::SIMPLE_FORMATTING) {
                if let Some(decoration) = Decoration::from_marker(c) {
                    if rest[c.len_utf8()..].starts_with(c) {
                        if let Some(close) = scanner::find_doubled(input, i + 2, c) {
                            if depth >= self.options.max_depth {
                                frame.buffer.push_str(&input[i..close + 2]);
                                i = close + 2;
                                continue;
                            }
                            self.flush(&mut frame)?;
                            let mut inner = Frame {
                                buffer: String::new(),
                                children: Vec::new(),
                                legacy_decorations: false,
                                ..frame.clone()
                            };
                            inner.decorations.set(decoration, true);
                            let run =
                                self.compile_span(&input[i + 2..close], inner, depth + 1)?;
                            frame.children.push(run);
                            i = close + 2;
                            continue;
                        }
                    }
                }
            }

            frame.buffer.push(c);
            i += c.len_utf8();
        }

        self.flush(&mut frame)?;
        Ok(finish(frame))
    }

    /// Decode the color construct following a marker at `after`, apply it
    /// to the frame, and return the position after it. `None` means nothing
    /// decodable follows and the marker is plain text.
    fn apply_color_code(
        &self,
        input: &str,
        after: usize,
        marker: char,
        frame: &mut Frame,
    ) -> Result<Option<usize>, ParseError> {
        // Extended token: marker + token + marker, no whitespace inside.
        // A single character that itself decodes as a legacy code is not a
        // delimited token: &l&c is two chained codes, not token "l".
        if let Some(end) = scanner::find_token_end(input, after, marker) {
            if end > after && !is_single_legacy_code(&input[after..end]) {
                let token = &input[after..end];
                let next = end + marker.len_utf8();
                if let Some(phase) = style::rainbow_phase(token) {
                    self.flush(frame)?;
                    frame.color = Some(ColorSpec::Rainbow { phase });
                    frame.legacy_decorations = false;
                    return Ok(Some(next));
                }
                // An undecodable delimited token is plain text in both
                // error modes; strictness applies only inside event
                // definitions.
                if let Ok(tokens) = style::parse_format_tokens(token, Expect::Any, false) {
                    self.flush(frame)?;
                    style::fold_tokens(&tokens, &mut frame.color, &mut frame.decorations);
                    frame.legacy_decorations = false;
                    return Ok(Some(next));
                }
            }
        }

        // Legacy RGB hex: marker + x + 6 hex digits.
        if let Some((color, consumed)) = legacy_hex(&input[after..]) {
            self.flush(frame)?;
            frame.color = Some(ColorSpec::Solid(color));
            if frame.legacy_decorations {
                frame.decorations = DecorationSet::default();
                frame.legacy_decorations = false;
            }
            return Ok(Some(after + consumed));
        }

        // Single legacy code.
        let Some(code) = input[after..].chars().next() else {
            return Ok(None);
        };
        let next = after + code.len_utf8();
        if let Some(named) = NamedColor::from_code(code) {
            self.flush(frame)?;
            frame.color = Some(ColorSpec::Solid(Color::Named(named)));
            // A legacy color restarts legacy sequencing, dropping any
            // decorations accumulated through it.
            if frame.legacy_decorations {
                frame.decorations = DecorationSet::default();
                frame.legacy_decorations = false;
            }
            return Ok(Some(next));
        }
        if let Some(decoration) = Decoration::from_code(code) {
            self.flush(frame)?;
            frame.decorations.set(decoration, true);
            frame.legacy_decorations = true;
            return Ok(Some(next));
        }
        if code.eq_ignore_ascii_case(&'r') {
            self.flush(frame)?;
            frame.color = None;
            // Reset clears decorations only when they arrived via legacy
            // codes; span-inherited formatting survives.
            if frame.legacy_decorations {
                frame.decorations = DecorationSet::default();
            }
            frame.legacy_decorations = false;
            return Ok(Some(next));
        }
        Ok(None)
    }

    fn compile_event(
        &self,
        display: &str,
        definition: &str,
        outer: &Frame,
        depth: usize,
    ) -> Result<StyledRun, ParseError> {
        let def = event::parse_definition(definition, self, depth + 1)?;
        let inner = Frame {
            buffer: String::new(),
            color: def.color,
            decorations: def.decorations,
            font: def.font.or_else(|| outer.font.clone()),
            insertion: def.insertion.or_else(|| outer.insertion.clone()),
            interaction: None,
            legacy_decorations: false,
            url_detection: outer.url_detection,
            children: Vec::new(),
        };
        let mut run = self.compile_span(display, inner, depth + 1)?;
        if let Some(interaction) = assemble_interaction(def.click, def.hover) {
            if run.interaction.is_none() {
                run.interaction = Some(interaction);
            } else {
                run = StyledRun {
                    interaction: Some(interaction),
                    children: vec![run],
                    ..Default::default()
                };
            }
        }
        Ok(run)
    }

    /// Emit the buffered text as styled leaves under the frame, detecting
    /// bare URLs word by word when enabled.
    fn flush(&self, frame: &mut Frame) -> Result<(), ParseError> {
        if frame.buffer.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(&mut frame.buffer);
        if !(frame.url_detection && self.options.url_detection) {
            let run = make_styled(&text, frame);
            frame.children.push(run);
            return Ok(());
        }
        let mut plain = String::new();
        for (idx, word) in text.split(' ').enumerate() {
            if idx > 0 {
                plain.push(' ');
            }
            if url::is_url(word) {
                if !plain.is_empty() {
                    frame.children.push(make_styled(&plain, frame));
                    plain.clear();
                }
                frame.children.push(self.url_run(word, frame)?);
            } else {
                plain.push_str(word);
            }
        }
        if !plain.is_empty() {
            frame.children.push(make_styled(&plain, frame));
        }
        Ok(())
    }

    fn url_run(&self, word: &str, frame: &Frame) -> Result<StyledRun, ParseError> {
        trace!("detected url: {word}");
        let value = if url::has_scheme(word) || !self.options.auto_url_prefix {
            word.to_string()
        } else {
            format!("http://{word}")
        };
        let click = ClickEvent {
            action: ClickAction::OpenUrl,
            value,
        };
        let hover = if self.options.url_hover_text.is_empty() {
            None
        } else {
            let tooltip = self.options.url_hover_text.replace("%url%", word);
            let tooltip = wrap_words(&tooltip, self.options.hover_wrap_width);
            Some(HoverEvent::Text(Box::new(
                self.compile_fragment(&tooltip, 0)?,
            )))
        };
        let mut run = make_styled(word, frame);
        run.interaction = assemble_interaction(Some(click), hover);
        Ok(run)
    }
}

/// Close a frame into its result run. A single child collapses into itself.
fn finish(mut frame: Frame) -> StyledRun {
    match frame.children.len() {
        1 => match frame.children.pop() {
            Some(run) => run,
            None => StyledRun::default(),
        },
        _ => StyledRun::branch(frame.children),
    }
}

/// Build a styled leaf from the frame's active style, expanding gradients
/// and rainbows into a branch of per-slice leaves.
fn make_styled(text: &str, frame: &Frame) -> StyledRun {
    let base = StyledRun {
        text: text.to_string(),
        decorations: frame.decorations,
        font: frame.font.clone(),
        insertion: frame.insertion.clone(),
        interaction: frame.interaction.clone(),
        ..Default::default()
    };
    let colors = match &frame.color {
        None => return base,
        Some(ColorSpec::Solid(color)) => {
            return StyledRun {
                color: Some(*color),
                ..base
            };
        }
        Some(ColorSpec::Gradient(anchors)) => {
            gradient_colors(text.chars().count(), anchors)
        }
        Some(ColorSpec::Rainbow { phase }) => {
            rainbow_colors(text.chars().count(), *phase)
        }
    };
    let leaves = group_colors(text, &colors);
    match leaves.len() {
        0 => base,
        1 => {
            let mut only = base;
            if let Some(leaf) = leaves.into_iter().next() {
                only.text = leaf.text;
                only.color = leaf.color;
            }
            only
        }
        _ => StyledRun {
            text: String::new(),
            children: leaves,
            ..base
        },
    }
}

/// Split text into leaves of consecutive equal per-codepoint colors.
fn group_colors(text: &str, colors: &[Color]) -> Vec<StyledRun> {
    let mut out: Vec<StyledRun> = Vec::new();
    for (c, color) in text.chars().zip(colors.iter()) {
        match out.last_mut() {
            Some(last) if last.color == Some(*color) => last.text.push(c),
            _ => out.push(StyledRun {
                text: c.to_string(),
                color: Some(*color),
                ..Default::default()
            }),
        }
    }
    out
}

/// Whether `token` is one character decoding as a legacy color code,
/// decoration code, or reset.
fn is_single_legacy_code(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            NamedColor::from_code(c).is_some()
                || Decoration::from_code(c).is_some()
                || c.eq_ignore_ascii_case(&'r')
        }
        _ => false,
    }
}

/// `marker + x + RRGGBB`: the raw hex form of legacy colors.
fn legacy_hex(rest: &str) -> Option<(Color, usize)> {
    let x = rest.chars().next()?;
    if !x.eq_ignore_ascii_case(&'x') {
        return None;
    }
    let hex = rest.get(1..7)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((Color::Rgb(r, g, b), 7))
}

/// Combine click and hover; a click without a hover always gets a synthetic
/// tooltip naming the action.
fn assemble_interaction(
    click: Option<ClickEvent>,
    hover: Option<HoverEvent>,
) -> Option<Interaction> {
    match (click, hover) {
        (None, None) => None,
        (Some(click), None) => {
            let tooltip = format!("{}: {}", click.action.keyword(), click.value);
            Some(Interaction {
                click: Some(click),
                hover: Some(HoverEvent::Text(Box::new(StyledRun::leaf(tooltip)))),
            })
        }
        (click, hover) => Some(Interaction { click, hover }),
    }
}

/// Greedy word-boundary wrapping; zero width disables it.
fn wrap_words(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let mut out = String::new();
    let mut line = 0usize;
    for (idx, word) in text.split(' ').enumerate() {
        let len = word.chars().count();
        if idx > 0 {
            if line + 1 + len > width {
                out.push('\n');
                line = 0;
            } else {
                out.push(' ');
                line += 1;
            }
        }
        out.push_str(word);
        line += len;
    }
    out
}

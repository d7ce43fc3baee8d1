//! The inverse of the compiler: styled run trees back into markup.
//!
//! The walk tracks the previous sibling's active color and the stack of
//! open inline markers, emitting only deltas. Markers close last-opened
//! first, and closing a span restores the color that was active when it
//! opened, mirroring how the compiler scopes color changes to spans.
//!
//! Serialization is always strict: a tree shape the grammar cannot express
//! is an error, never silently dropped.

use crate::color::Color;
use crate::error::WriteError;
use crate::run::{HoverEvent, Interaction, StyledRun};
use crate::style::{Decoration, DecorationSet};

/// Serialize a tree into markup with the default `&` marker.
///
/// # Examples
///
/// ```
/// use chatdown::{parse, serialize};
///
/// let run = parse("&gold&hi **there**").unwrap();
/// assert_eq!(serialize(&run).unwrap(), "&gold&hi **there**");
/// ```
pub fn serialize(run: &StyledRun) -> Result<String, WriteError> {
    Writer::new().write(run)
}

/// Markup serializer.
#[derive(Clone, Debug)]
pub struct Writer {
    marker: char,
}

impl Default for Writer {
    fn default() -> Self {
        Writer { marker: '&' }
    }
}

/// Effective style already established by enclosing runs.
#[derive(Clone, Debug, Default)]
struct Inherited {
    color: Option<Color>,
    decorations: DecorationSet,
    font: Option<String>,
    insertion: Option<String>,
    interaction: Option<Interaction>,
}

/// Emission state shared across siblings: the active color and the open
/// inline markers, each remembering the color active when it opened.
#[derive(Clone, Debug, Default)]
struct State {
    color: Option<Color>,
    open: Vec<(Decoration, Option<Color>)>,
}

impl Writer {
    /// Create a serializer with the default `&` marker.
    pub fn new() -> Self {
        Writer::default()
    }

    /// Set the color marker character to emit.
    pub fn marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    /// Serialize a tree into markup.
    pub fn write(&self, run: &StyledRun) -> Result<String, WriteError> {
        let mut out = String::new();
        let mut state = State::default();
        self.write_run(run, &Inherited::default(), &mut state, &mut out, true)?;
        self.close_all(&mut state, &mut out);
        Ok(out)
    }

    /// Serialize an embedded fragment (hover tooltips, entity names), where
    /// event syntax is unavailable: its parentheses would terminate the
    /// enclosing definition.
    fn fragment(&self, run: &StyledRun) -> Result<String, WriteError> {
        let mut out = String::new();
        let mut state = State::default();
        self.write_run(run, &Inherited::default(), &mut state, &mut out, false)?;
        self.close_all(&mut state, &mut out);
        Ok(out)
    }

    fn write_run(
        &self,
        run: &StyledRun,
        inh: &Inherited,
        state: &mut State,
        out: &mut String,
        allow_events: bool,
    ) -> Result<(), WriteError> {
        if !run.text.is_empty() && !run.children.is_empty() {
            return Err(WriteError::UnsupportedRun(
                "run carries both text and children".to_string(),
            ));
        }

        let own_color = match run.color {
            Some(Color::Reset) => None,
            other => other,
        };
        let eff = Inherited {
            color: own_color.or(inh.color),
            decorations: run.decorations.union(&inh.decorations),
            font: run.font.clone().or_else(|| inh.font.clone()),
            insertion: run.insertion.clone().or_else(|| inh.insertion.clone()),
            interaction: run
                .interaction
                .clone()
                .filter(|i| !i.is_empty())
                .or_else(|| inh.interaction.clone()),
        };
        let own_interaction = run
            .interaction
            .clone()
            .filter(|i| !i.is_empty() && Some(i) != inh.interaction.as_ref());

        let needs_event = own_interaction.is_some()
            || eff.font != inh.font
            || eff.insertion != inh.insertion;
        if needs_event {
            if !allow_events {
                return Err(WriteError::UnsupportedRun(
                    "interaction or font override inside a tooltip".to_string(),
                ));
            }
            return self.write_event(run, inh, &eff, own_interaction, state, out);
        }

        if run.children.is_empty() {
            if !run.text.is_empty() {
                self.write_leaf(&run.text, &eff, state, out);
            }
            return Ok(());
        }
        for child in &run.children {
            self.write_run(child, &eff, state, out, allow_events)?;
        }
        Ok(())
    }

    /// Emit `[display](definition)`, re-establishing the run's effective
    /// style inside the definition since event scopes reset color and
    /// formatting.
    fn write_event(
        &self,
        run: &StyledRun,
        inh: &Inherited,
        eff: &Inherited,
        interaction: Option<Interaction>,
        state: &mut State,
        out: &mut String,
    ) -> Result<(), WriteError> {
        self.close_all(state, out);

        let mut parts: Vec<String> = Vec::new();
        if let Some(token) = style_token(eff.color, &eff.decorations) {
            parts.push(token);
        }
        if eff.font != inh.font {
            if let Some(font) = &eff.font {
                parts.push(format!("font={}", escape_token(font)));
            }
        }
        if eff.insertion != inh.insertion {
            if let Some(insertion) = &eff.insertion {
                parts.push(format!("insert={{{}}}", escape_value(insertion)));
            }
        }
        if let Some(interaction) = &interaction {
            if let Some(click) = &interaction.click {
                parts.push(format!(
                    "{}={{{}}}",
                    click.action.keyword(),
                    escape_value(&click.value)
                ));
            }
            if let Some(hover) = &interaction.hover {
                parts.push(self.hover_definition(hover)?);
            }
        }

        let mut display = String::new();
        if run.children.is_empty() {
            display.push_str(&self.escape_text(&run.text));
        } else {
            let mut inner = State {
                color: eff.color,
                open: Vec::new(),
            };
            let inner_inh = Inherited {
                interaction: interaction.or_else(|| inh.interaction.clone()),
                ..eff.clone()
            };
            for child in &run.children {
                self.write_run(child, &inner_inh, &mut inner, &mut display, true)?;
            }
            self.close_all(&mut inner, &mut display);
        }

        out.push('[');
        out.push_str(&display);
        out.push_str("](");
        out.push_str(&parts.join(" "));
        out.push(')');
        Ok(())
    }

    fn hover_definition(&self, hover: &HoverEvent) -> Result<String, WriteError> {
        match hover {
            HoverEvent::Text(run) => Ok(format!("show_text={{{}}}", self.fragment(run)?)),
            HoverEvent::Entity { id, kind, name } => {
                let mut payload = format!("{}:{}", escape_value(id), escape_value(kind));
                if let Some(name) = name {
                    payload.push(' ');
                    payload.push_str(&self.fragment(name)?);
                }
                Ok(format!("show_entity={{{payload}}}"))
            }
            HoverEvent::Item { id, count, tag } => {
                let mut payload = escape_value(id);
                if *count != 1 {
                    payload.push('*');
                    payload.push_str(&count.to_string());
                }
                if let Some(tag) = tag {
                    payload.push(' ');
                    payload.push_str(&escape_value(tag));
                }
                Ok(format!("show_item={{{payload}}}"))
            }
        }
    }

    fn write_leaf(&self, text: &str, eff: &Inherited, state: &mut State, out: &mut String) {
        self.sync_decorations(eff.decorations, state, out);
        if eff.color != state.color {
            let token = match eff.color {
                Some(color) => color_token(color),
                None => "reset".to_string(),
            };
            out.push(self.marker);
            out.push_str(&token);
            out.push(self.marker);
            state.color = eff.color;
        }
        out.push_str(&self.escape_text(text));
    }

    /// Close and open inline markers until exactly `want` is active.
    /// Closing pops last-opened-first and restores that marker's opening
    /// color, matching the compiler's span-scoped color state.
    fn sync_decorations(&self, want: DecorationSet, state: &mut State, out: &mut String) {
        let keep = state
            .open
            .iter()
            .take_while(|(d, _)| want.contains(*d))
            .count();
        let mut reopen = Vec::new();
        while state.open.len() > keep {
            if let Some((decoration, color)) = state.open.pop() {
                push_marker_pair(out, decoration);
                state.color = color;
                if want.contains(decoration) {
                    reopen.push(decoration);
                }
            }
        }
        for decoration in reopen.into_iter().rev() {
            push_marker_pair(out, decoration);
            state.open.push((decoration, state.color));
        }
        for decoration in Decoration::ALL {
            if want.contains(decoration) && !state.open.iter().any(|(d, _)| *d == decoration) {
                push_marker_pair(out, decoration);
                state.open.push((decoration, state.color));
            }
        }
    }

    fn close_all(&self, state: &mut State, out: &mut String) {
        self.sync_decorations(DecorationSet::default(), state, out);
    }

    /// Escape plain text so it re-parses to itself: grammar characters get
    /// a backslash, and the second of two adjacent inline marker characters
    /// is broken up so they do not read as a span.
    fn escape_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut prev: Option<char> = None;
        for c in text.chars() {
            let special = matches!(c, '\\' | '[' | ']' | '(' | ')' | '{' | '}' | '§')
                || c == self.marker;
            if special || (prev == Some(c) && Decoration::from_marker(c).is_some()) {
                out.push('\\');
                out.push(c);
                prev = None;
                continue;
            }
            out.push(c);
            prev = Some(c);
        }
        out
    }
}

/// The bare color/format token re-establishing a style inside an event
/// definition. `None` when there is nothing to establish.
fn style_token(color: Option<Color>, decorations: &DecorationSet) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(color) = color {
        parts.push(color_token(color));
    }
    for decoration in decorations.iter() {
        parts.push(decoration.name().to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}

fn color_token(color: Color) -> String {
    match color {
        Color::Named(named) => named.name().to_string(),
        Color::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
        Color::Reset => "reset".to_string(),
    }
}

fn push_marker_pair(out: &mut String, decoration: Decoration) {
    let marker = decoration.marker();
    out.push(marker);
    out.push(marker);
}

/// Escape a brace-quoted definition value.
fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '{' | '}' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a bare definition token value, where spaces and `=` also split.
fn escape_token(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '{' | '}' | '(' | ')' | ' ' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

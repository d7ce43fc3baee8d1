//! Event definition parsing: the `(...)` side of `[display](definition)`.
//!
//! A definition is a space-separated token list. Tokens resolve, in order of
//! precedence, to: a rainbow directive, a bare color/format list, one of the
//! `font=`/`insert=`/`color=`/`format=` keys, a bare URL (immediately after
//! the color/format tokens), or a click/hover action keyword. Action values
//! may span several tokens, or be brace-quoted with `{...}`.

use log::trace;

use crate::error::ParseError;
use crate::run::{ClickAction, ClickEvent, HoverEvent};
use crate::style::{self, ColorSpec, DecorationSet, Expect};

use super::compile::Parser;
use super::scanner;
use super::url;

/// Everything a definition can contribute to its display span.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventDefinition {
    pub color: Option<ColorSpec>,
    pub decorations: DecorationSet,
    pub font: Option<String>,
    pub insertion: Option<String>,
    pub click: Option<ClickEvent>,
    pub hover: Option<HoverEvent>,
}

pub(crate) fn parse_definition(
    definition: &str,
    parser: &Parser,
    depth: usize,
) -> Result<EventDefinition, ParseError> {
    let lenient = parser.options().lenient;
    let tokens = scanner::split_unescaped_spaces(definition);
    trace!("event definition: {} token(s)", tokens.len());

    let mut out = EventDefinition::default();
    // Index of the bare color/format token, if any; a bare URL is only an
    // implicit click when it directly follows it.
    let mut format_end: Option<usize> = None;
    let mut saw_key = false;
    let mut saw_rainbow = false;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token.is_empty() {
            i += 1;
            continue;
        }
        let eq = scanner::find_unescaped_eq(token);
        let (key, value) = match eq {
            Some(pos) => (Some(&token[..pos]), &token[pos + 1..]),
            None => (None, token),
        };

        // Rainbow directive: anywhere, under any key; first match wins.
        if let Some(phase) = style::rainbow_phase(value) {
            if !saw_rainbow {
                out.color = Some(ColorSpec::Rainbow { phase });
                saw_rainbow = true;
            }
            i += 1;
            continue;
        }

        if eq.is_none() {
            // Bare color/format list, before any explicit key.
            if format_end.is_none() && !saw_key {
                if let Ok(parsed) = style::parse_format_tokens(token, Expect::Any, false) {
                    style::fold_tokens(&parsed, &mut out.color, &mut out.decorations);
                    format_end = Some(i);
                    i += 1;
                    continue;
                }
            }
            // Bare URL directly after the color/format tokens.
            let url_slot = format_end.map_or(0, |end| end + 1);
            if i == url_slot && url::is_url(token) {
                out.click = Some(ClickEvent {
                    action: ClickAction::OpenUrl,
                    value: prefixed_url(token, parser),
                });
                i += 1;
                continue;
            }
        }

        match key.map(str::to_ascii_lowercase).as_deref() {
            Some("font") => {
                out.font = Some(scanner::unescape(value));
                saw_key = true;
                i += 1;
                continue;
            }
            Some("insert") => {
                let raw = collect_value(&tokens, &mut i, value);
                out.insertion = Some(scanner::unescape(&raw));
                saw_key = true;
                continue;
            }
            Some("color") => {
                match style::parse_format_tokens(value, Expect::ColorOnly, lenient) {
                    Ok(parsed) => {
                        style::fold_tokens(&parsed, &mut out.color, &mut out.decorations)
                    }
                    Err(err) => return Err(err),
                }
                saw_key = true;
                i += 1;
                continue;
            }
            Some("format") => {
                match style::parse_format_tokens(value, Expect::FormatOnly, lenient) {
                    Ok(parsed) => {
                        style::fold_tokens(&parsed, &mut out.color, &mut out.decorations)
                    }
                    Err(err) => return Err(err),
                }
                saw_key = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        // Click and hover action keywords; click takes precedence when a
        // keyword is in both sets.
        let keyword = key.unwrap_or(token).to_ascii_lowercase();
        if let Some(action) = ClickAction::from_keyword(&keyword) {
            let raw = collect_value(&tokens, &mut i, value_part(eq, value));
            out.click = Some(ClickEvent {
                action,
                value: scanner::unescape(&raw),
            });
            saw_key = true;
            continue;
        }
        match keyword.as_str() {
            // `hover=` alone always means show-text.
            "hover" | "show_text" => {
                let raw = collect_value(&tokens, &mut i, value_part(eq, value));
                out.hover = Some(HoverEvent::Text(Box::new(
                    parser.compile_fragment(&raw, depth)?,
                )));
                saw_key = true;
                continue;
            }
            "show_entity" => {
                let raw = collect_value(&tokens, &mut i, value_part(eq, value));
                match parse_entity(&raw, parser, depth)? {
                    Some(hover) => out.hover = Some(hover),
                    None => {} // lenient: dropped
                }
                saw_key = true;
                continue;
            }
            "show_item" => {
                let raw = collect_value(&tokens, &mut i, value_part(eq, value));
                out.hover = Some(parse_item(&raw));
                saw_key = true;
                continue;
            }
            _ => {}
        }

        if !lenient {
            return Err(ParseError::InvalidColorToken(token.to_string()));
        }
        i += 1;
    }

    Ok(out)
}

/// A click target for a bare URL token, `http://`-prefixed when schemeless
/// and the parser is configured to do so.
fn prefixed_url(token: &str, parser: &Parser) -> String {
    if url::has_scheme(token) || !parser.options().auto_url_prefix {
        token.to_string()
    } else {
        format!("http://{token}")
    }
}

fn value_part<'a>(eq: Option<usize>, value: &'a str) -> &'a str {
    // A keyword without `=` starts an empty value; the real value follows
    // in later tokens.
    if eq.is_some() { value } else { "" }
}

/// Collect a possibly multi-token value starting at token `i` (whose value
/// part is `first`), advancing `i` past everything consumed.
///
/// Brace-quoted values run until a token ending in an unescaped `}`; plain
/// values run until the next token that is at bracket depth 0 and contains
/// an unescaped `=`.
fn collect_value(tokens: &[&str], i: &mut usize, first: &str) -> String {
    // A bare keyword token contributes no value of its own.
    let mut parts: Vec<&str> = if first.is_empty() { Vec::new() } else { vec![first] };
    *i += 1;
    if first.starts_with('{') {
        let mut closed = first.len() > 1 && scanner::ends_with_unescaped_brace(first);
        while !closed && *i < tokens.len() {
            let token = tokens[*i];
            parts.push(token);
            *i += 1;
            closed = scanner::ends_with_unescaped_brace(token);
        }
        let joined = parts.join(" ");
        let inner = joined.strip_prefix('{').unwrap_or(&joined);
        let inner = inner.strip_suffix('}').unwrap_or(inner);
        return inner.to_string();
    }
    let mut depth = scanner::bracket_delta(first);
    while *i < tokens.len() {
        let token = tokens[*i];
        if depth <= 0 && scanner::find_unescaped_eq(token).is_some() {
            break;
        }
        parts.push(token);
        depth += scanner::bracket_delta(token);
        *i += 1;
    }
    parts.join(" ")
}

/// `show_entity` payload: `uuid:type name...`, colon-split, name optional.
///
/// Returns `Ok(None)` when lenient mode drops a malformed payload.
fn parse_entity(
    value: &str,
    parser: &Parser,
    depth: usize,
) -> Result<Option<HoverEvent>, ParseError> {
    let malformed = || ParseError::InvalidEntityReference(value.to_string());
    let Some((id, rest)) = value.split_once(':') else {
        if parser.options().lenient {
            return Ok(None);
        }
        return Err(malformed());
    };
    let (kind, name) = match rest.split_once(' ') {
        Some((kind, name)) => (kind, Some(name)),
        None => (rest, None),
    };
    if id.is_empty() || kind.is_empty() {
        if parser.options().lenient {
            return Ok(None);
        }
        return Err(malformed());
    }
    let name = match name {
        Some(markup) => Some(Box::new(parser.compile_fragment(markup, depth)?)),
        None => None,
    };
    Ok(Some(HoverEvent::Entity {
        id: scanner::unescape(id),
        kind: scanner::unescape(kind),
        name,
    }))
}

/// `show_item` payload: `id[*count] [tag...]`; count defaults to 1 and
/// the id to the `minecraft:` namespace. The tag is kept verbatim after
/// unescaping, not interpreted.
fn parse_item(value: &str) -> HoverEvent {
    let (head, tag) = match value.split_once(' ') {
        Some((head, tag)) => (head, Some(scanner::unescape(tag))),
        None => (value, None),
    };
    let (id, count) = match head.split_once('*') {
        Some((id, count)) => (id, count.parse().unwrap_or(1)),
        None => (head, 1),
    };
    let id = if id.contains(':') {
        scanner::unescape(id)
    } else {
        format!("minecraft:{}", scanner::unescape(id))
    };
    HoverEvent::Item { id, count, tag }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, NamedColor};
    use crate::options::Options;
    use crate::style::Decoration;

    fn definition(def: &str) -> EventDefinition {
        parse_definition(def, &Parser::new(), 0).unwrap()
    }

    fn lenient_definition(def: &str) -> EventDefinition {
        let parser = Parser::with_options(Options::default().lenient(true));
        parse_definition(def, &parser, 0).unwrap()
    }

    #[test]
    fn bare_color_list() {
        let def = definition("aqua");
        assert_eq!(
            def.color,
            Some(ColorSpec::Solid(Color::Named(NamedColor::Aqua)))
        );
        let def = definition("red,bold");
        assert!(def.decorations.contains(Decoration::Bold));
    }

    #[test]
    fn rainbow_first_match_wins() {
        let def = definition("rainbow:25");
        assert_eq!(def.color, Some(ColorSpec::Rainbow { phase: 25 }));
        let def = definition("rainbow rainbow:99");
        assert_eq!(def.color, Some(ColorSpec::Rainbow { phase: 0 }));
        // Under a key prefix too.
        let def = definition("color=rainbow:5");
        assert_eq!(def.color, Some(ColorSpec::Rainbow { phase: 5 }));
    }

    #[test]
    fn explicit_keys() {
        let def = definition("color=gold format=bold,italic font=alt insert=clicky");
        assert_eq!(
            def.color,
            Some(ColorSpec::Solid(Color::Named(NamedColor::Gold)))
        );
        assert!(def.decorations.contains(Decoration::Bold));
        assert!(def.decorations.contains(Decoration::Italic));
        assert_eq!(def.font.as_deref(), Some("alt"));
        assert_eq!(def.insertion.as_deref(), Some("clicky"));
    }

    #[test]
    fn color_format_mismatch_is_strict_error() {
        let err = parse_definition("format=red", &Parser::new(), 0).unwrap_err();
        assert!(matches!(err, ParseError::ColorFormatMismatch { .. }));
        let def = lenient_definition("format=red");
        assert!(def.decorations.is_empty());
    }

    #[test]
    fn unknown_format_value_is_invalid_token() {
        let err = parse_definition("format=notacolor", &Parser::new(), 0).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidColorToken("notacolor".to_string())
        );
        assert!(lenient_definition("format=notacolor").decorations.is_empty());
    }

    #[test]
    fn implicit_url_click() {
        let def = definition("https://example.com");
        let click = def.click.unwrap();
        assert_eq!(click.action, ClickAction::OpenUrl);
        assert_eq!(click.value, "https://example.com");

        // Schemeless URLs get prefixed.
        let def = definition("example.com");
        assert_eq!(def.click.unwrap().value, "http://example.com");

        // Only directly after the color tokens.
        let def = definition("gold example.com");
        assert!(def.click.is_some());

        // Prefixing honors the option.
        let parser = Parser::with_options(Options::default().auto_url_prefix(false));
        let def = parse_definition("example.com", &parser, 0).unwrap();
        assert_eq!(def.click.unwrap().value, "example.com");
    }

    #[test]
    fn click_action_with_multi_word_value() {
        let def = definition("run_command=/tell someone hello there");
        let click = def.click.unwrap();
        assert_eq!(click.action, ClickAction::RunCommand);
        assert_eq!(click.value, "/tell someone hello there");
    }

    #[test]
    fn value_stops_at_next_key() {
        let def = definition("suggest_command=/msg name insert=extra");
        assert_eq!(def.click.unwrap().value, "/msg name");
        assert_eq!(def.insertion.as_deref(), Some("extra"));
    }

    #[test]
    fn brace_quoted_value() {
        let def = definition("run_command={/say a=b c=d} color=red");
        assert_eq!(def.click.unwrap().value, "/say a=b c=d");
        assert_eq!(def.color, Some(ColorSpec::Solid(Color::Named(NamedColor::Red))));
    }

    #[test]
    fn hover_key_means_show_text() {
        let def = definition("hover=a tooltip");
        match def.hover.unwrap() {
            HoverEvent::Text(run) => assert_eq!(run.plain_text(), "a tooltip"),
            other => panic!("expected text hover, got {other:?}"),
        }
    }

    #[test]
    fn show_entity_payload() {
        let def = definition("show_entity=0-0-0-0-0:zombie Fred");
        match def.hover.unwrap() {
            HoverEvent::Entity { id, kind, name } => {
                assert_eq!(id, "0-0-0-0-0");
                assert_eq!(kind, "zombie");
                assert_eq!(name.unwrap().plain_text(), "Fred");
            }
            other => panic!("expected entity hover, got {other:?}"),
        }
    }

    #[test]
    fn show_entity_requires_type() {
        let err = parse_definition("show_entity=justanid", &Parser::new(), 0).unwrap_err();
        assert!(matches!(err, ParseError::InvalidEntityReference(_)));
        assert!(lenient_definition("show_entity=justanid").hover.is_none());
    }

    #[test]
    fn show_item_payload() {
        let def = definition("show_item=stone*3");
        match def.hover.unwrap() {
            HoverEvent::Item { id, count, tag } => {
                assert_eq!(id, "minecraft:stone");
                assert_eq!(count, 3);
                assert_eq!(tag, None);
            }
            other => panic!("expected item hover, got {other:?}"),
        }
        let def = definition("show_item=mod:gem {display:fancy}");
        match def.hover.unwrap() {
            HoverEvent::Item { id, count, tag } => {
                assert_eq!(id, "mod:gem");
                assert_eq!(count, 1);
                assert_eq!(tag.as_deref(), Some("{display:fancy}"));
            }
            other => panic!("expected item hover, got {other:?}"),
        }
    }

    #[test]
    fn unknown_token_policy() {
        let err = parse_definition("mystery", &Parser::new(), 0).unwrap_err();
        assert_eq!(err, ParseError::InvalidColorToken("mystery".to_string()));
        // The bare color still applies even though it follows the dropped
        // token.
        let def = lenient_definition("mystery gold");
        assert_eq!(
            def.color,
            Some(ColorSpec::Solid(Color::Named(NamedColor::Gold)))
        );
    }
}

//! Escape-aware scanning primitives shared by the compiler.
//!
//! A `\` escapes the following character everywhere; escaped characters are
//! literal and never participate in bracket matching or token boundaries.

/// Byte index of the `]` matching the unescaped `[` at `open`, honoring
/// nesting. `None` if the bracket never closes.
pub(crate) fn match_square(input: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (off, c) in input[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + off);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte index of the first unescaped `)` at or after the `(` at `open`.
/// Parentheses do not nest within a definition.
pub(crate) fn match_paren(input: &str, open: usize) -> Option<usize> {
    let mut escaped = false;
    for (off, c) in input[open..].char_indices() {
        if off == 0 {
            continue; // the opening paren itself
        }
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ')' => return Some(open + off),
            _ => {}
        }
    }
    None
}

/// Byte index of the first char of the next unescaped doubled `marker`
/// pair at or after `from`.
pub(crate) fn find_doubled(input: &str, from: usize, marker: char) -> Option<usize> {
    let mut escaped = false;
    let mut pending: Option<usize> = None;
    for (off, c) in input[from..].char_indices() {
        if escaped {
            escaped = false;
            pending = None;
            continue;
        }
        if c == '\\' {
            escaped = true;
            pending = None;
            continue;
        }
        if c == marker {
            if let Some(start) = pending {
                return Some(from + start);
            }
            pending = Some(off);
        } else {
            pending = None;
        }
    }
    None
}

/// Byte index of the next unescaped `marker` at or after `from`, giving up
/// at the first whitespace. Used to find the end of an extended color token.
pub(crate) fn find_token_end(input: &str, from: usize, marker: char) -> Option<usize> {
    let mut escaped = false;
    for (off, c) in input[from..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == marker {
            return Some(from + off);
        } else if c.is_whitespace() {
            return None;
        }
    }
    None
}

/// Split on unescaped spaces. Leading/trailing spaces yield empty tokens,
/// which signal empty first/last values in event definitions.
pub(crate) fn split_unescaped_spaces(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == ' ' {
            parts.push(&input[start..i]);
            start = i + 1;
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Byte index of the first unescaped `=` in a token.
pub(crate) fn find_unescaped_eq(token: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in token.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' {
            return Some(i);
        }
    }
    None
}

/// Whether the token's last character is an unescaped `}`.
pub(crate) fn ends_with_unescaped_brace(token: &str) -> bool {
    let mut escaped = false;
    let mut closes = false;
    for c in token.chars() {
        if escaped {
            escaped = false;
            closes = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            closes = false;
        } else {
            closes = c == '}';
        }
    }
    closes
}

/// Net `[`/`]` depth change contributed by a token's unescaped brackets.
pub(crate) fn bracket_delta(token: &str) -> i32 {
    let mut delta = 0;
    let mut escaped = false;
    for c in token.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => delta += 1,
            ']' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Strip backslash escapes, turning `\x` into a literal `x`.
pub(crate) fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

//! Chat markup compilation for styled text trees.
//!
//! `chatdown` compiles a lightweight markup language into a tree of styled
//! runs and serializes such trees back into markup. The grammar covers
//! legacy color codes (`&6`, `§a`, `&xff8800`), extended color tokens
//! (`&gold&`, `&#f00,#00f&`, `&rainbow&`), doubled inline formatting
//! markers (`**bold**`, `##italic##`), bracketed click/hover events
//! (`[text](gold run_command=/help hover=a tooltip)`), and `%key%`
//! placeholders.
//!
//! # Examples
//!
//! Compile markup into a tree and inspect it:
//!
//! ```
//! use chatdown::{parse, Color, NamedColor};
//!
//! let run = parse("&gold&**important** notice").unwrap();
//! let leaves = run.flatten();
//! assert_eq!(leaves[0].text, "important");
//! assert_eq!(leaves[0].color, Some(Color::Named(NamedColor::Gold)));
//! assert!(leaves[0].decorations.bold);
//! ```
//!
//! Serialize a tree back into markup:
//!
//! ```
//! use chatdown::{parse, serialize};
//!
//! let run = parse("&green&hello **bold** world").unwrap();
//! assert_eq!(serialize(&run).unwrap(), "&green&hello **bold** world");
//! ```
//!
//! Compilation never panics on malformed input: unterminated constructs
//! degrade to plain text, and invalid tokens either abort with a
//! [`ParseError`] (strict, the default) or are dropped ([`Options::lenient`]).

pub mod color;
pub mod error;
pub mod gradient;
pub mod options;
pub mod parser;
pub mod placeholder;
pub mod run;
pub mod style;
pub mod writer;

pub use color::{Color, NamedColor};
pub use error::{ParseError, WriteError};
pub use options::{Features, Options};
pub use parser::Parser;
pub use placeholder::Placeholders;
pub use run::{ClickAction, ClickEvent, HoverEvent, Interaction, StyledRun};
pub use style::{ColorSpec, Decoration, DecorationSet};
pub use writer::{serialize, Writer};

/// Compile markup with default options.
///
/// Shorthand for `Parser::new().parse(input)`.
pub fn parse(input: &str) -> Result<StyledRun, ParseError> {
    Parser::new().parse(input)
}

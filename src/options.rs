//! Compiler configuration.

use bitflags::bitflags;

bitflags! {
    /// Grammar features that can be toggled independently.
    ///
    /// A disabled feature's syntax is left in the text verbatim.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Features: u8 {
        /// Doubled inline markers: `**bold**`, `##italic##`, ...
        const SIMPLE_FORMATTING = 1 << 0;
        /// Bracketed events: `[text](definition)`.
        const ADVANCED_FORMATTING = 1 << 1;
        /// Marker-prefixed color codes and extended color tokens.
        const LEGACY_COLORS = 1 << 2;
    }
}

impl Default for Features {
    fn default() -> Self {
        Features::all()
    }
}

/// Configuration for the markup compiler.
///
/// # Examples
///
/// ```
/// use chatdown::{Options, Parser};
///
/// let parser = Parser::with_options(Options::default().lenient(true));
/// assert!(parser.parse("[x](format=notathing)").is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct Options {
    /// Which parts of the grammar are recognized.
    pub features: Features,
    /// Drop invalid tokens instead of aborting the compile.
    pub lenient: bool,
    /// Recognize bare URLs in plain text and make them clickable.
    pub url_detection: bool,
    /// Prefix `http://` onto detected URLs that lack a scheme.
    pub auto_url_prefix: bool,
    /// Markup template compiled into the hover tooltip of detected URLs.
    /// `%url%` is replaced with the detected URL. Empty disables the
    /// template (a plain tooltip naming the action is used instead).
    pub url_hover_text: String,
    /// Word-boundary wrap width for generated hover tooltips, in
    /// characters. Zero disables wrapping.
    pub hover_wrap_width: usize,
    /// The color marker character. The native `§` marker is always
    /// recognized as well.
    pub marker: char,
    /// Maximum nesting depth. Constructs opening a deeper frame are left
    /// as plain text.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            features: Features::all(),
            lenient: false,
            url_detection: true,
            auto_url_prefix: true,
            url_hover_text: "Click to open %url%".to_string(),
            hover_wrap_width: 0,
            marker: '&',
            max_depth: 32,
        }
    }
}

impl Options {
    /// Replace the recognized feature set.
    pub fn features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Set the error policy.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Enable or disable URL autodetection.
    pub fn url_detection(mut self, on: bool) -> Self {
        self.url_detection = on;
        self
    }

    /// Enable or disable `http://` prefixing of schemeless URLs.
    pub fn auto_url_prefix(mut self, on: bool) -> Self {
        self.auto_url_prefix = on;
        self
    }

    /// Set the URL hover tooltip template.
    pub fn url_hover_text(mut self, template: impl Into<String>) -> Self {
        self.url_hover_text = template.into();
        self
    }

    /// Set the hover tooltip wrap width (0 disables wrapping).
    pub fn hover_wrap_width(mut self, width: usize) -> Self {
        self.hover_wrap_width = width;
        self
    }

    /// Set the color marker character.
    pub fn marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    /// Set the maximum nesting depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

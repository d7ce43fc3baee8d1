//! The styled text tree produced by the compiler.
//!
//! A [`StyledRun`] is either a leaf carrying text or a branch carrying
//! children; text lives only at leaves. Styles and interactions set on a
//! branch act as defaults for its descendants.

use crate::color::Color;
use crate::style::DecorationSet;

/// A click action attached to a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickAction {
    OpenUrl,
    OpenFile,
    RunCommand,
    SuggestCommand,
    ChangePage,
    CopyToClipboard,
}

impl ClickAction {
    /// The keyword used in event definitions.
    pub fn keyword(self) -> &'static str {
        match self {
            ClickAction::OpenUrl => "open_url",
            ClickAction::OpenFile => "open_file",
            ClickAction::RunCommand => "run_command",
            ClickAction::SuggestCommand => "suggest_command",
            ClickAction::ChangePage => "change_page",
            ClickAction::CopyToClipboard => "copy_to_clipboard",
        }
    }

    /// Look up an action by keyword, case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.to_ascii_lowercase();
        [
            ClickAction::OpenUrl,
            ClickAction::OpenFile,
            ClickAction::RunCommand,
            ClickAction::SuggestCommand,
            ClickAction::ChangePage,
            ClickAction::CopyToClipboard,
        ]
        .into_iter()
        .find(|a| a.keyword() == keyword)
    }
}

/// A click interaction: what happens when the run is clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickEvent {
    pub action: ClickAction,
    pub value: String,
}

/// A hover interaction: what is shown when the run is hovered.
///
/// Entity and item payloads are carried as parsed strings; validating them
/// against actual registries is the host's concern.
#[derive(Clone, Debug, PartialEq)]
pub enum HoverEvent {
    /// A styled tooltip.
    Text(Box<StyledRun>),
    /// An entity reference: uuid, type, and an optional styled name.
    Entity {
        id: String,
        kind: String,
        name: Option<Box<StyledRun>>,
    },
    /// An item reference with an optional raw data tag.
    Item {
        id: String,
        count: u32,
        tag: Option<String>,
    },
}

impl HoverEvent {
    /// The keyword used in event definitions.
    pub fn keyword(&self) -> &'static str {
        match self {
            HoverEvent::Text(_) => "show_text",
            HoverEvent::Entity { .. } => "show_entity",
            HoverEvent::Item { .. } => "show_item",
        }
    }
}

/// Click and hover metadata attached to a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
    pub click: Option<ClickEvent>,
    pub hover: Option<HoverEvent>,
}

impl Interaction {
    /// Returns true if neither click nor hover is present.
    pub fn is_empty(&self) -> bool {
        self.click.is_none() && self.hover.is_none()
    }
}

/// A node in the styled text tree.
///
/// # Examples
///
/// ```
/// use chatdown::StyledRun;
///
/// let run = chatdown::parse("**hello**").unwrap();
/// assert_eq!(run.plain_text(), "hello");
/// assert!(run.decorations.bold);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledRun {
    /// Leaf text. Empty on branches.
    pub text: String,
    /// This run's own color; `None` defers to the nearest ancestor.
    pub color: Option<Color>,
    /// Decorations set on this run.
    pub decorations: DecorationSet,
    /// Font override, if any.
    pub font: Option<String>,
    /// Text inserted into the input box on shift-click, if any.
    pub insertion: Option<String>,
    /// Click/hover metadata, if any.
    pub interaction: Option<Interaction>,
    /// Child runs. Non-empty only on branches, whose own text is empty.
    pub children: Vec<StyledRun>,
}

impl StyledRun {
    /// Create an unstyled leaf.
    pub fn leaf(text: impl Into<String>) -> Self {
        StyledRun {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a branch over the given children.
    pub fn branch(children: Vec<StyledRun>) -> Self {
        StyledRun {
            children,
            ..Default::default()
        }
    }

    /// Returns true if this run has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if this run carries no style or interaction of its own.
    pub fn is_plain(&self) -> bool {
        self.color.is_none()
            && self.decorations.is_empty()
            && self.font.is_none()
            && self.insertion.is_none()
            && self.interaction.as_ref().is_none_or(Interaction::is_empty)
    }

    /// The concatenated text of all leaves, in order.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Flatten the tree into leaves carrying their *effective* style:
    /// ancestor colors, decorations, fonts, insertions, and interactions
    /// resolved onto each leaf, `Reset` normalized to "no color".
    ///
    /// Two trees that flatten identically render identically; this is the
    /// equivalence used by the round-trip guarantees.
    pub fn flatten(&self) -> Vec<StyledRun> {
        let mut out = Vec::new();
        self.flatten_into(&Context::default(), &mut out);
        out
    }

    fn flatten_into(&self, inherited: &Context, out: &mut Vec<StyledRun>) {
        let own_color = match self.color {
            Some(Color::Reset) => None,
            other => other,
        };
        let context = Context {
            color: own_color.or(inherited.color),
            decorations: self.decorations.union(&inherited.decorations),
            font: self.font.clone().or_else(|| inherited.font.clone()),
            insertion: self.insertion.clone().or_else(|| inherited.insertion.clone()),
            interaction: self
                .interaction
                .clone()
                .filter(|i| !i.is_empty())
                .or_else(|| inherited.interaction.clone()),
        };
        if self.children.is_empty() {
            if !self.text.is_empty() {
                out.push(StyledRun {
                    text: self.text.clone(),
                    color: context.color,
                    decorations: context.decorations,
                    font: context.font,
                    insertion: context.insertion,
                    interaction: context.interaction,
                    children: Vec::new(),
                });
            }
            return;
        }
        for child in &self.children {
            child.flatten_into(&context, out);
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Context {
    color: Option<Color>,
    decorations: DecorationSet,
    font: Option<String>,
    insertion: Option<String>,
    interaction: Option<Interaction>,
}

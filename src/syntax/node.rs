use std::ops::Range;

/// Node-kind tag produced by the parser.
///
/// Names follow the Lezer markdown grammar (`FencedCode`, `ListMark`, …).
/// Anything unrecognised becomes `Other` and is ignored by every handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// ATX or setext heading with its level (1-6)
    Heading(u8),
    HeaderMark,
    Emphasis,
    StrongEmphasis,
    EmphasisMark,
    Strikethrough,
    StrikethroughMark,
    InlineCode,
    CodeMark,
    FencedCode,
    CodeInfo,
    CodeText,
    BulletList,
    OrderedList,
    ListItem,
    ListMark,
    TaskMarker,
    Image,
    Link,
    Url,
    Table,
    HtmlTag,
    Blockquote,
    QuoteMark,
    HorizontalRule,
    Other(String),
}

impl NodeKind {
    /// Parse a Lezer-style node name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ATXHeading1" | "SetextHeading1" => Self::Heading(1),
            "ATXHeading2" | "SetextHeading2" => Self::Heading(2),
            "ATXHeading3" => Self::Heading(3),
            "ATXHeading4" => Self::Heading(4),
            "ATXHeading5" => Self::Heading(5),
            "ATXHeading6" => Self::Heading(6),
            "HeaderMark" => Self::HeaderMark,
            "Emphasis" => Self::Emphasis,
            "StrongEmphasis" => Self::StrongEmphasis,
            "EmphasisMark" => Self::EmphasisMark,
            "Strikethrough" => Self::Strikethrough,
            "StrikethroughMark" => Self::StrikethroughMark,
            "InlineCode" => Self::InlineCode,
            "CodeMark" => Self::CodeMark,
            "FencedCode" => Self::FencedCode,
            "CodeInfo" => Self::CodeInfo,
            "CodeText" => Self::CodeText,
            "BulletList" => Self::BulletList,
            "OrderedList" => Self::OrderedList,
            "ListItem" => Self::ListItem,
            "ListMark" => Self::ListMark,
            "TaskMarker" => Self::TaskMarker,
            "Image" => Self::Image,
            "Link" => Self::Link,
            "URL" | "Url" => Self::Url,
            "Table" => Self::Table,
            "HTMLTag" | "HtmlTag" => Self::HtmlTag,
            "Blockquote" => Self::Blockquote,
            "QuoteMark" => Self::QuoteMark,
            "HorizontalRule" => Self::HorizontalRule,
            other => Self::Other(other.to_string()),
        }
    }

    /// Delimiters hidden by the mark handler.
    pub fn is_mark(&self) -> bool {
        matches!(
            self,
            Self::HeaderMark
                | Self::EmphasisMark
                | Self::StrikethroughMark
                | Self::CodeMark
                | Self::ListMark
        )
    }

    /// Constructs whose whole span reveals their delimiters when the caret enters.
    pub fn is_formatting_container(&self) -> bool {
        matches!(
            self,
            Self::Heading(_)
                | Self::Emphasis
                | Self::StrongEmphasis
                | Self::Strikethrough
                | Self::InlineCode
        )
    }

    /// Regions where inline scanners (html, mentions, emoji) must not look.
    pub fn is_code(&self) -> bool {
        matches!(self, Self::FencedCode | Self::InlineCode)
    }
}

/// A typed span `[from, to)` produced by the external parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub from: usize,
    pub to: usize,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, from: usize, to: usize) -> Self {
        Self { kind, from, to }
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `range` lies within this node.
    pub fn contains(&self, range: &Range<usize>) -> bool {
        self.from <= range.start && range.end <= self.to
    }
}

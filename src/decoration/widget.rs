use serde::Serialize;

use crate::diagram::ContentKey;

/// State of a rendered diagram as the overlay shows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DiagramView {
    /// Request in flight or not yet issued; shows a placeholder.
    Loading,
    Rendered { svg: String },
    /// Terminal failure, shown as inline error text.
    Failed { message: String },
}

/// Renderable replacement for a span.
///
/// Equality is structural: two widgets with the same content are
/// interchangeable, whatever instance they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Bullet {
        glyph: char,
    },
    Checkbox {
        checked: bool,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    Table {
        html: String,
    },
    InlineHtml {
        tag: String,
        content: String,
    },
    Diagram {
        key: ContentKey,
        language: String,
        view: DiagramView,
    },
    Mention {
        name: String,
        detail: Option<String>,
    },
    Emoji {
        glyph: String,
    },
    ColumnPad {
        delimiter: char,
        padding: usize,
    },
}

impl Widget {
    /// Block widgets occupy their own lines and win every conflict.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Widget::Image { .. } | Widget::Table { .. } | Widget::Diagram { .. }
        )
    }

    /// Textual stand-in used by `DecorationSet::project`.
    pub fn text(&self) -> String {
        match self {
            Widget::Bullet { glyph } => glyph.to_string(),
            Widget::Checkbox { checked: true } => "☑".to_string(),
            Widget::Checkbox { checked: false } => "☐".to_string(),
            Widget::Image { alt, .. } => format!("[image: {alt}]"),
            Widget::Table { .. } => "[table]".to_string(),
            Widget::InlineHtml { content, .. } => content.clone(),
            Widget::Diagram { view, language, .. } => match view {
                DiagramView::Loading => format!("[{language} diagram loading]"),
                DiagramView::Rendered { .. } => format!("[{language} diagram]"),
                DiagramView::Failed { message } => format!("[{language} diagram error: {message}]"),
            },
            Widget::Mention {
                name,
                detail: Some(detail),
            } => format!("@{name} ({detail})"),
            Widget::Mention { name, detail: None } => format!("@{name}"),
            Widget::Emoji { glyph } => glyph.clone(),
            Widget::ColumnPad { delimiter, padding } => {
                format!("{}{}", " ".repeat(*padding), delimiter)
            }
        }
    }
}

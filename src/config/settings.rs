use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of content the engine decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFlavor {
    /// Markdown: syntax-driven handlers plus text scanners.
    #[default]
    Markdown,
    /// Delimiter-separated tabular text: only column alignment runs.
    Delimited,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagramSettings {
    pub enabled: bool,
    /// Base URL of the renderer service; requests go to `{endpoint}/{language}/svg`.
    pub endpoint: String,
    /// Fenced code languages rendered as diagrams.
    pub languages: Vec<String>,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: super::defaults::DEFAULT_DIAGRAM_ENDPOINT.to_string(),
            languages: super::defaults::default_diagram_languages(),
        }
    }
}

impl DiagramSettings {
    pub fn supports(&self, language: &str) -> bool {
        self.enabled
            && self
                .languages
                .iter()
                .any(|l| l.eq_ignore_ascii_case(language))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Base path or URL that relative image references resolve against.
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub delimiter: char,
    pub quote: char,
    pub escape: char,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            escape: '\\',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmojiSettings {
    pub enabled: bool,
    /// Extra shortcode to glyph entries, keyed without colons.
    pub custom: HashMap<String, String>,
}

impl Default for EmojiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            custom: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MentionSettings {
    pub enabled: bool,
}

impl Default for MentionSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Files at or below this size are inlined as data URLs when no uploader is set.
    pub inline_limit: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            inline_limit: super::defaults::DEFAULT_INLINE_LIMIT,
        }
    }
}

/// Top-level settings, one TOML table per subsystem.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub flavor: ContentFlavor,
    pub diagram: DiagramSettings,
    pub images: ImageSettings,
    pub columns: ColumnSettings,
    pub emoji: EmojiSettings,
    pub mentions: MentionSettings,
    pub upload: UploadSettings,
}

use std::collections::HashMap;

/// Built-in shortcodes, keyed without colons.
const BUILTIN: &[(&str, &str)] = &[
    ("smile", "😄"),
    ("smiley", "😃"),
    ("grin", "😁"),
    ("laughing", "😆"),
    ("joy", "😂"),
    ("wink", "😉"),
    ("blush", "😊"),
    ("heart_eyes", "😍"),
    ("thinking", "🤔"),
    ("neutral_face", "😐"),
    ("confused", "😕"),
    ("cry", "😢"),
    ("sob", "😭"),
    ("angry", "😠"),
    ("scream", "😱"),
    ("sunglasses", "😎"),
    ("sweat_smile", "😅"),
    ("upside_down_face", "🙃"),
    ("+1", "👍"),
    ("thumbsup", "👍"),
    ("-1", "👎"),
    ("thumbsdown", "👎"),
    ("clap", "👏"),
    ("wave", "👋"),
    ("pray", "🙏"),
    ("muscle", "💪"),
    ("ok_hand", "👌"),
    ("raised_hands", "🙌"),
    ("eyes", "👀"),
    ("heart", "❤️"),
    ("broken_heart", "💔"),
    ("star", "⭐"),
    ("sparkles", "✨"),
    ("fire", "🔥"),
    ("zap", "⚡"),
    ("boom", "💥"),
    ("100", "💯"),
    ("tada", "🎉"),
    ("rocket", "🚀"),
    ("bug", "🐛"),
    ("warning", "⚠️"),
    ("x", "❌"),
    ("white_check_mark", "✅"),
    ("heavy_check_mark", "✔️"),
    ("question", "❓"),
    ("exclamation", "❗"),
    ("bulb", "💡"),
    ("memo", "📝"),
    ("pencil", "📝"),
    ("book", "📖"),
    ("calendar", "📆"),
    ("lock", "🔒"),
    ("key", "🔑"),
    ("link", "🔗"),
    ("wrench", "🔧"),
    ("hammer", "🔨"),
    ("gear", "⚙️"),
    ("package", "📦"),
    ("chart_with_upwards_trend", "📈"),
    ("hourglass", "⌛"),
    ("coffee", "☕"),
    ("pizza", "🍕"),
    ("beer", "🍺"),
    ("cake", "🍰"),
    ("sunny", "☀️"),
    ("cloud", "☁️"),
    ("snowflake", "❄️"),
    ("rainbow", "🌈"),
    ("earth_americas", "🌎"),
    ("cat", "🐱"),
    ("dog", "🐶"),
    ("see_no_evil", "🙈"),
    ("construction", "🚧"),
    ("checkered_flag", "🏁"),
    ("trophy", "🏆"),
];

/// Shortcode to glyph lookup: the built-in set plus configured extras.
#[derive(Debug, Clone)]
pub struct EmojiTable {
    entries: HashMap<String, String>,
}

impl Default for EmojiTable {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

impl EmojiTable {
    /// Built-ins overlaid with `custom`; a custom entry replaces a built-in one.
    pub fn new(custom: &HashMap<String, String>) -> Self {
        let mut entries: HashMap<String, String> = BUILTIN
            .iter()
            .map(|(code, glyph)| (code.to_string(), glyph.to_string()))
            .collect();
        entries.extend(
            custom
                .iter()
                .map(|(code, glyph)| (code.trim_matches(':').to_string(), glyph.clone())),
        );
        Self { entries }
    }

    /// Glyph for `code`, given with or without surrounding colons.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        let code = code
            .strip_prefix(':')
            .and_then(|c| c.strip_suffix(':'))
            .unwrap_or(code);
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

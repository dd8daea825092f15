//! Default configuration values for livemark.

/// Public renderer accepting `POST /{language}/svg` with a plain-text body.
pub const DEFAULT_DIAGRAM_ENDPOINT: &str = "https://kroki.io";

/// 256 KiB
pub const DEFAULT_INLINE_LIMIT: usize = 256 * 1024;

/// Returns the fenced code languages rendered as diagrams by default.
pub fn default_diagram_languages() -> Vec<String> {
    [
        "mermaid",
        "plantuml",
        "graphviz",
        "dot",
        "d2",
        "ditaa",
        "erd",
        "nomnoml",
        "pikchr",
        "svgbob",
        "vega",
        "vegalite",
        "wavedrom",
        "bpmn",
        "excalidraw",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

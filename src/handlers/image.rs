//! `![alt](src "title")` images as block widgets.

use std::path::Path;

use url::Url;

use super::link::label_end;
use super::{HandlerContext, HandlerOutput, NodeHandler};
use crate::decoration::{Decoration, Widget};
use crate::syntax::{NodeKind, SyntaxNode};

pub struct ImageHandler;

/// The parts of an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub alt: String,
    pub src: String,
    pub title: Option<String>,
    /// Offset of `src` within the image text.
    pub src_offset: usize,
}

pub fn parse_image(text: &str) -> Option<ImageRef> {
    let label = text.strip_prefix('!')?;
    let close = label_end(label)?;
    let alt = label[1..close].to_string();

    let body_start = 1 + close + 2;
    let body = text.get(body_start..text.len().checked_sub(1)?)?;
    if !text.ends_with(')') {
        return None;
    }

    let leading = body.len() - body.trim_start().len();
    let rest = &body[leading..];
    let (src, after) = if let Some(angled) = rest.strip_prefix('<') {
        let end = angled.find('>')?;
        (&angled[..end], &angled[end + 1..])
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], &rest[end..])
    };
    let src_offset = body_start + leading + usize::from(rest.starts_with('<'));

    let title = after.trim();
    let title = ['"', '\'', '(']
        .iter()
        .zip(['"', '\'', ')'])
        .find_map(|(open, close)| title.strip_prefix(*open)?.strip_suffix(close))
        .map(str::to_string);

    Some(ImageRef {
        alt,
        src: src.to_string(),
        title,
        src_offset,
    })
}

/// Resolve `src` against `base`, leaving absolute URLs, data URLs and
/// root-relative paths alone.
pub fn resolve_src(src: &str, base: Option<&str>) -> String {
    if Url::parse(src).is_ok() || src.starts_with('/') {
        return src.to_string();
    }
    let Some(base) = base.filter(|b| !b.is_empty()) else {
        return src.to_string();
    };
    match Url::parse(base) {
        Ok(mut base_url) => {
            if !base_url.path().ends_with('/') {
                let path = format!("{}/", base_url.path());
                base_url.set_path(&path);
            }
            base_url
                .join(src)
                .map(String::from)
                .unwrap_or_else(|_| src.to_string())
        }
        Err(_) => Path::new(base).join(src).to_string_lossy().into_owned(),
    }
}

impl NodeHandler for ImageHandler {
    fn name(&self) -> &'static str {
        "image"
    }

    fn accepts(&self, kind: &NodeKind) -> bool {
        *kind == NodeKind::Image
    }

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        let Some(image) = parse_image(ctx.text(&node.range())) else {
            return;
        };
        if ctx.reveals(&node.range()) {
            return;
        }
        let src = resolve_src(&image.src, ctx.settings.images.base_path.as_deref());
        out.push(Decoration::replace(
            node.range(),
            Widget::Image {
                src,
                alt: image.alt,
                title: image.title,
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::Fixture;
    use rstest::rstest;

    #[test]
    fn parses_alt_src_and_title() {
        let image = parse_image(r#"![a cat](cat.png "Tom")"#).unwrap();
        assert_eq!(image.alt, "a cat");
        assert_eq!(image.src, "cat.png");
        assert_eq!(image.title.as_deref(), Some("Tom"));
        assert_eq!(image.src_offset, 9);
    }

    #[test]
    fn parses_angle_bracketed_src() {
        let image = parse_image("![x](<my file.png>)").unwrap();
        assert_eq!(image.src, "my file.png");
        assert_eq!(image.src_offset, 6);
        assert_eq!(image.title, None);
    }

    #[test]
    fn rejects_non_images() {
        assert_eq!(parse_image("[x](y)"), None);
        assert_eq!(parse_image("![x]"), None);
    }

    #[rstest]
    #[case::relative_path("img/a.png", Some("/notes"), "/notes/img/a.png")]
    #[case::relative_url("a.png", Some("https://cdn.example/docs"), "https://cdn.example/docs/a.png")]
    #[case::absolute_url("https://x.io/a.png", Some("/notes"), "https://x.io/a.png")]
    #[case::data_url("data:image/png;base64,AAAA", Some("/notes"), "data:image/png;base64,AAAA")]
    #[case::root_relative("/a.png", Some("/notes"), "/a.png")]
    #[case::no_base("a.png", None, "a.png")]
    fn resolves_sources(#[case] src: &str, #[case] base: Option<&str>, #[case] expected: &str) {
        assert_eq!(resolve_src(src, base), expected);
    }

    #[test]
    fn image_becomes_block_widget_with_resolved_src() {
        let mut fixture = Fixture::new("![cat](cat.png)", vec![SyntaxNode::new(NodeKind::Image, 0, 15)]);
        fixture.settings.images.base_path = Some("https://cdn.example/".to_string());
        let out = fixture.decorate(&ImageHandler, &NodeKind::Image);

        let widget = out.decorations[0].widget().unwrap();
        assert!(widget.is_block());
        assert_eq!(
            **widget,
            Widget::Image {
                src: "https://cdn.example/cat.png".to_string(),
                alt: "cat".to_string(),
                title: None,
            }
        );
    }
}

//! Diagram blocks from rebuild to rendered widget: fetch effects, the
//! single-flight pipeline, delivery as a transaction, and the HTTP renderer.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use livemark::decoration::DiagramView;
use livemark::diagram::{
    DiagramCache, DiagramPipeline, DiagramRenderer, DiagramRequest, HttpDiagramRenderer,
    RenderError,
};
use livemark::{
    Document, EditorState, Effect, NodeKind, OverlayCaches, OverlayEngine, OverlaySettings,
    Selection, StateEffect, SyntaxNode, SyntaxTree, Transaction, Widget,
};

const TWO_BLOCKS: &str = "```mermaid\ngraph TD\n```\n\ntext\n\n```mermaid\ngraph TD\n```\n";

struct CountingRenderer {
    calls: Arc<AtomicUsize>,
}

impl DiagramRenderer for CountingRenderer {
    async fn render(&self, _language: &str, source: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(format!(r#"<svg height="42.5"><!-- {source} --></svg>"#))
    }
}

fn blocks() -> Vec<SyntaxNode> {
    let first = "```mermaid\ngraph TD\n```\n".len();
    let second = TWO_BLOCKS.len() - first;
    vec![
        SyntaxNode::new(NodeKind::FencedCode, 0, first),
        SyntaxNode::new(NodeKind::FencedCode, second, TWO_BLOCKS.len()),
    ]
}

fn requests(effects: &[Effect]) -> Vec<DiagramRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchDiagram(request) => Some(request.clone()),
            Effect::Dispatch(_) => None,
        })
        .collect()
}

fn diagram_views(state: &EditorState) -> Vec<DiagramView> {
    state
        .decorations()
        .iter()
        .filter_map(|d| match d.widget()?.as_ref() {
            Widget::Diagram { view, .. } => Some(view.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn identical_blocks_fetch_once_and_render_together() {
    let caches = OverlayCaches::default();
    let mut engine = OverlayEngine::new(OverlaySettings::default(), caches.clone());
    let doc = Document::new(TWO_BLOCKS);
    let len = doc.len();
    let (state, effects) = engine.create_state(
        doc,
        SyntaxTree::from_nodes(blocks()),
        Selection::none(),
        vec![0..len],
    );

    // Both blocks share a content key; the engine asks once
    let wanted = requests(&effects);
    assert_eq!(wanted.len(), 1);
    assert_eq!(
        diagram_views(&state),
        vec![DiagramView::Loading, DiagramView::Loading]
    );

    let calls = Arc::new(AtomicUsize::new(0));
    let (pipeline, mut deliveries) = DiagramPipeline::new(
        CountingRenderer {
            calls: calls.clone(),
        },
        caches.diagrams.clone(),
    );
    assert!(pipeline.request(wanted[0].clone()));
    // A rebuild racing the first fetch must not issue another
    assert!(!pipeline.request(wanted[0].clone()));

    let delivery = tokio::time::timeout(Duration::from_secs(5), deliveries.recv())
        .await
        .expect("delivery in time")
        .expect("channel open");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(delivery.height, Some(43));
    assert!(!delivery.is_error);

    let (state, effects) = engine
        .apply(
            &state,
            Transaction::new().with_effect(StateEffect::DiagramReady(delivery)),
        )
        .expect("apply");
    assert!(requests(&effects).is_empty(), "cached now");
    let views = diagram_views(&state);
    assert_eq!(views.len(), 2);
    assert!(
        views
            .iter()
            .all(|view| matches!(view, DiagramView::Rendered { .. }))
    );
}

#[tokio::test]
async fn failed_render_shows_error_and_is_not_retried() {
    struct Failing;
    impl DiagramRenderer for Failing {
        async fn render(&self, _language: &str, _source: &str) -> Result<String, RenderError> {
            Err(RenderError::Transport("connection refused".to_string()))
        }
    }

    let caches = OverlayCaches::default();
    let mut engine = OverlayEngine::new(OverlaySettings::default(), caches.clone());
    let text = "```plantuml\nA -> B\n```";
    let doc = Document::new(text);
    let (state, effects) = engine.create_state(
        doc,
        SyntaxTree::from_nodes(vec![SyntaxNode::new(NodeKind::FencedCode, 0, text.len())]),
        Selection::none(),
        vec![0..text.len()],
    );

    let (pipeline, mut deliveries) = DiagramPipeline::new(Failing, caches.diagrams.clone());
    for request in requests(&effects) {
        pipeline.request(request);
    }
    let delivery = deliveries.recv().await.expect("delivery");
    assert!(delivery.is_error);

    let (state, effects) = engine
        .apply(
            &state,
            Transaction::new().with_effect(StateEffect::DiagramReady(delivery)),
        )
        .expect("apply");
    assert!(requests(&effects).is_empty());
    assert!(matches!(
        diagram_views(&state).as_slice(),
        [DiagramView::Failed { message }] if message.contains("connection refused")
    ));
}

#[tokio::test]
async fn delivery_for_an_old_version_still_rebuilds() {
    let caches = OverlayCaches::default();
    let mut engine = OverlayEngine::new(OverlaySettings::default(), caches.clone());
    let text = "```mermaid\ngraph LR\n```";
    let (state, effects) = engine.create_state(
        Document::new(format!("{text}\n")),
        SyntaxTree::from_nodes(vec![SyntaxNode::new(NodeKind::FencedCode, 0, text.len())]),
        Selection::none(),
        vec![0..text.len() + 1],
    );
    let (pipeline, mut deliveries) = DiagramPipeline::new(
        CountingRenderer {
            calls: Arc::new(AtomicUsize::new(0)),
        },
        caches.diagrams.clone(),
    );
    for request in requests(&effects) {
        pipeline.request(request);
    }

    // The user types below the block while the fetch is out
    let edit = Transaction::new().with_changes(livemark::ChangeSet::single(
        livemark::Change::insert(text.len() + 1, "more"),
    ));
    let (state, _) = engine.apply(&state, edit).expect("apply");

    let delivery = deliveries.recv().await.expect("delivery");
    assert!(delivery.version < state.doc().version());
    let (state, _) = engine
        .apply(
            &state,
            Transaction::new().with_effect(StateEffect::DiagramReady(delivery)),
        )
        .expect("apply");
    assert!(matches!(
        diagram_views(&state).as_slice(),
        [DiagramView::Rendered { .. }]
    ));
}

#[tokio::test]
async fn clearing_caches_fetches_again() {
    let caches = OverlayCaches::default();
    let mut engine = OverlayEngine::new(OverlaySettings::default(), caches.clone());
    let text = "```d2\na -> b\n```";
    let tree = SyntaxTree::from_nodes(vec![SyntaxNode::new(NodeKind::FencedCode, 0, text.len())]);
    let calls = Arc::new(AtomicUsize::new(0));
    let (pipeline, mut deliveries) = DiagramPipeline::new(
        CountingRenderer {
            calls: calls.clone(),
        },
        caches.diagrams.clone(),
    );

    let (state, effects) = engine.create_state(
        Document::new(text),
        tree,
        Selection::none(),
        vec![0..text.len()],
    );
    for request in requests(&effects) {
        pipeline.request(request);
    }
    deliveries.recv().await.expect("delivery");
    assert_eq!(caches.diagrams.len(), 1);

    let refresh = engine.clear_caches();
    assert!(caches.diagrams.is_empty());
    let (_, effects) = engine.apply(&state, refresh).expect("apply");
    let again = requests(&effects);
    assert_eq!(again.len(), 1);
    assert!(pipeline.request(again[0].clone()));
    deliveries.recv().await.expect("delivery");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn non_diagram_languages_are_left_alone() {
    let mut engine = OverlayEngine::new(OverlaySettings::default(), OverlayCaches::default());
    let text = "```rust\nfn main() {}\n```";
    let (state, effects) = engine.create_state(
        Document::new(text),
        SyntaxTree::from_nodes(vec![SyntaxNode::new(NodeKind::FencedCode, 0, text.len())]),
        Selection::none(),
        vec![0..text.len()],
    );
    assert!(requests(&effects).is_empty());
    assert!(diagram_views(&state).is_empty());
}

/// Serve one HTTP request on a local port and hand back what was received.
fn serve_once(status: &'static str, body: &'static str) -> (String, std::thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let endpoint = format!("http://{}", listener.local_addr().expect("addr"));
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut head = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read");
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            head.push_str(&line);
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).expect("body");
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: image/svg+xml\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write");
        format!("{head}\r\n{}", String::from_utf8_lossy(&request_body))
    });
    (endpoint, handle)
}

#[tokio::test]
async fn http_renderer_posts_source_to_language_path() {
    let (endpoint, server) = serve_once("200 OK", r#"<svg height="10"></svg>"#);
    let renderer = HttpDiagramRenderer::new(&endpoint).expect("renderer");

    let svg = renderer.render("mermaid", "graph TD").await.expect("render");
    assert_eq!(svg, r#"<svg height="10"></svg>"#);

    let request = server.join().expect("server");
    assert!(request.starts_with("POST /mermaid/svg "), "{request}");
    assert!(request.to_ascii_lowercase().contains("content-type: text/plain"));
    assert!(request.ends_with("graph TD"));
}

#[tokio::test]
async fn http_renderer_reports_error_status() {
    let (endpoint, server) = serve_once("400 Bad Request", "Syntax error in graph\n");
    let renderer = HttpDiagramRenderer::new(&endpoint).expect("renderer");

    let err = renderer.render("mermaid", "graph ???").await.unwrap_err();
    server.join().expect("server");
    match err {
        RenderError::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Syntax error in graph");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn shared_cache_is_visible_to_every_engine() {
    let cache = DiagramCache::new();
    let caches = OverlayCaches {
        diagrams: cache.clone(),
        ..OverlayCaches::default()
    };
    let text = "```mermaid\nx\n```";
    cache.insert_if_absent(
        livemark::diagram::ContentKey::new("mermaid", "x"),
        livemark::diagram::DiagramCacheEntry::Rendered {
            content: "<svg/>".to_string(),
        },
    );
    let mut engine = OverlayEngine::new(OverlaySettings::default(), caches);
    let (state, effects) = engine.create_state(
        Document::new(text),
        SyntaxTree::from_nodes(vec![SyntaxNode::new(NodeKind::FencedCode, 0, text.len())]),
        Selection::none(),
        vec![0..text.len()],
    );
    assert!(requests(&effects).is_empty());
    assert_eq!(
        diagram_views(&state),
        vec![DiagramView::Rendered {
            svg: "<svg/>".to_string()
        }]
    );
}

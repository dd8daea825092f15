use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

use super::LOG_TARGET;
use crate::error::{OverlayError, OverlayResult};

/// Why a diagram could not be rendered. Every variant is terminal for its
/// content key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The service answered with a non-2xx status; `body` is its error text.
    #[error("renderer returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("renderer unreachable: {0}")]
    Transport(String),

    #[error("invalid renderer endpoint: {0}")]
    Endpoint(String),
}

/// External diagram renderer.
///
/// Returns the rendered image (SVG markup) for `source` in `language`.
pub trait DiagramRenderer: Send + Sync + 'static {
    fn render(
        &self,
        language: &str,
        source: &str,
    ) -> impl Future<Output = Result<String, RenderError>> + Send;
}

/// Renderer speaking the kroki-style protocol:
/// `POST {endpoint}/{language}/svg` with the raw source as a `text/plain` body.
#[derive(Debug, Clone)]
pub struct HttpDiagramRenderer {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpDiagramRenderer {
    pub fn new(endpoint: &str) -> OverlayResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| OverlayError::config(format!("diagram endpoint {endpoint:?}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `{endpoint}/{language}/svg`, tolerating a trailing slash on the endpoint.
    pub fn request_url(&self, language: &str) -> Result<Url, RenderError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{language}/svg"))
            .map_err(|e| RenderError::Endpoint(e.to_string()))
    }
}

impl DiagramRenderer for HttpDiagramRenderer {
    async fn render(&self, language: &str, source: &str) -> Result<String, RenderError> {
        let url = self.request_url(language)?;
        log::debug!(target: LOG_TARGET, "POST {}", url);

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(source.to_string())
            .send()
            .await
            .map_err(|e| RenderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RenderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(RenderError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(body)
    }
}

static SVG_HEIGHT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"<svg\b[^>]*?\sheight\s*=\s*["']([0-9]+(?:\.[0-9]+)?)(?:px)?["']"#).ok()
});

/// Pixel height declared on the SVG root element, rounded up.
///
/// Percentages and other units yield `None`; the host then sizes the image
/// itself.
pub fn svg_height(svg: &str) -> Option<u32> {
    let captures = SVG_HEIGHT.as_ref()?.captures(svg)?;
    let height: f64 = captures.get(1)?.as_str().parse().ok()?;
    Some(height.ceil() as u32)
}

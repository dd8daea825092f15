//! File drop and paste.
//!
//! Dropped or pasted files become markdown links (images as `![name](url)`)
//! inserted at the drop position. A host uploader, when configured, turns a
//! file into a URL; without one, small files are inlined as base64 data URLs.
//! A failed upload or an empty URL inserts nothing.

use std::future::Future;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::config::UploadSettings;
use crate::engine::{Transaction, UserEvent};
use crate::selection::Selection;
use crate::text::{Change, ChangeSet};

const LOG_TARGET: &str = "livemark::drop";

/// A dropped or pasted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Markdown pointing at `url`.
    fn markup(&self, url: &str) -> String {
        let label = self.name.replace(['[', ']'], "");
        if self.is_image() {
            format!("![{label}]({url})")
        } else {
            format!("[{label}]({url})")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("upload of {name} failed: {message}")]
    Failed { name: String, message: String },

    #[error("{name} is {size} bytes, over the inline limit of {limit}")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
}

/// Host-provided upload function returning a resolvable URL.
pub trait Uploader: Send + Sync + 'static {
    fn upload(
        &self,
        file: &FileDescriptor,
    ) -> impl Future<Output = Result<String, UploadError>> + Send;
}

/// Placeholder uploader type for handlers that only inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineOnly;

impl Uploader for InlineOnly {
    async fn upload(&self, file: &FileDescriptor) -> Result<String, UploadError> {
        Ok(file.data_url())
    }
}

pub struct DropHandler<U = InlineOnly> {
    uploader: Option<Arc<U>>,
    inline_limit: usize,
}

impl DropHandler<InlineOnly> {
    /// Inline every file up to the configured limit.
    pub fn inline(settings: &UploadSettings) -> Self {
        Self {
            uploader: None,
            inline_limit: settings.inline_limit,
        }
    }
}

impl<U: Uploader> DropHandler<U> {
    pub fn with_uploader(uploader: U, settings: &UploadSettings) -> Self {
        Self {
            uploader: Some(Arc::new(uploader)),
            inline_limit: settings.inline_limit,
        }
    }

    async fn url_for(&self, file: &FileDescriptor) -> Result<String, UploadError> {
        match &self.uploader {
            Some(uploader) => uploader.upload(file).await,
            None if file.bytes.len() <= self.inline_limit => Ok(file.data_url()),
            None => Err(UploadError::TooLarge {
                name: file.name.clone(),
                size: file.bytes.len(),
                limit: self.inline_limit,
            }),
        }
    }

    /// The transaction inserting markup for `files` at `at`, or `None` when
    /// no file produced a URL.
    pub async fn handle(&self, files: &[FileDescriptor], at: usize) -> Option<Transaction> {
        let mut links = Vec::with_capacity(files.len());
        for file in files {
            match self.url_for(file).await {
                Ok(url) if url.trim().is_empty() => {
                    log::warn!(target: LOG_TARGET, "Upload of {} returned no URL", file.name);
                }
                Ok(url) => links.push(file.markup(url.trim())),
                Err(e) => log::warn!(target: LOG_TARGET, "{}", e),
            }
        }
        if links.is_empty() {
            return None;
        }

        let insert = links.join("\n");
        let end = at + insert.len();
        Some(
            Transaction::new()
                .with_changes(ChangeSet::single(Change::insert(at, insert)))
                .with_selection(Selection::cursor(end))
                .with_user_event(UserEvent::Drop),
        )
    }
}

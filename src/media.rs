//! Opaque media sink: raw bytes plus a MIME type go in, a public URL comes
//! out. Uploads always happen before the database write they accompany, and
//! a sink failure fails the whole request.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, atomic::AtomicBool, atomic::Ordering},
};

use crate::{
    errors::{Error, Result},
    id::generate_entity_id,
};

/// A media upload as received from the transport layer.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Upload sink injected into the content store and account directory.
pub trait MediaSink: Clone + Send + Sync + 'static {
    /// Stores the bytes and returns a public URL for them.
    fn upload(&self, upload: Upload) -> impl Future<Output = Result<String>> + Send;
}

/// Sink that writes uploads under a local directory served as static files.
#[derive(Debug, Clone)]
pub struct LocalMediaSink {
    dir: PathBuf,
    base_url: String,
}

impl LocalMediaSink {
    pub fn new(dir: PathBuf, base_url: String) -> Self {
        Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl MediaSink for LocalMediaSink {
    async fn upload(&self, upload: Upload) -> Result<String> {
        let file_name = format!("{}.{}", generate_entity_id(), extension_for(&upload.content_type));
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| Error::internal(format!("media directory unavailable: {err}")))?;
        tokio::fs::write(self.dir.join(&file_name), &upload.bytes)
            .await
            .map_err(|err| Error::internal(format!("media upload failed: {err}")))?;
        Ok(format!("{}/{}", self.base_url, file_name))
    }
}

fn extension_for(content_type: &str) -> &str {
    content_type.split('/').nth(1).filter(|ext| !ext.is_empty()).unwrap_or("bin")
}

/// In-process sink for tests and demos. Records every upload and can be told
/// to fail, simulating a sink outage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    uploads: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent upload fail.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// `(url, content_type)` pairs in upload order.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().expect("sink poisoned").clone()
    }
}

impl MediaSink for MemorySink {
    async fn upload(&self, upload: Upload) -> Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::internal("media upload failed: sink unavailable"));
        }
        let mut uploads = self.uploads.lock().expect("sink poisoned");
        let url = format!("memory://media/{}", uploads.len());
        uploads.push((url.clone(), upload.content_type));
        Ok(url)
    }
}

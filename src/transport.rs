// src/transport.rs

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Response};
use std::time::Instant;

use crate::config::AppConfig;
use crate::errors::{Result, SubmitError};
use crate::progress::{Progress, ProgressFn};
use crate::response::{FormatterReply, Reply};
use crate::snapshot::EncodedForm;

/// Something that can carry one encoded form to the formatter and bring the
/// answer back.
///
/// Implementations return the status and full text of a successful (2xx)
/// response. A response outside the success range is reported as
/// `SubmitError::HttpStatus` carrying whatever part of the error body could
/// be read, an empty string if none.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn post_form(&self, form: EncodedForm, progress: ProgressFn) -> Result<Reply>;
}

/// `FormTransport` over HTTP using reqwest.
pub struct HttpTransport {
    client: Client,
    config: AppConfig,
}

impl HttpTransport {
    /// Creates a new `HttpTransport`.
    pub fn new(client: Client, config: AppConfig) -> Self {
        Self { client, config }
    }

    /// Calls the health check function and returns its `info` field.
    pub async fn health_check(&self) -> Result<String> {
        let url = self.config.healthcheck_url();
        log::info!("🩺 Checking formatter health: {}", url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| SubmitError::BodyRead {
            status: Some(status.as_u16()),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(SubmitError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let reply: FormatterReply = serde_json::from_str(&text)?;
        Ok(reply.info)
    }
}

#[async_trait]
impl FormTransport for HttpTransport {
    async fn post_form(&self, form: EncodedForm, progress: ProgressFn) -> Result<Reply> {
        let url = self.config.formatter_url();
        let total = form.len();

        log::info!("📡 Posting {} bytes to {}", total, url);

        let start = Instant::now();
        let body = upload_body(form.body, self.config.chunk_size, progress.clone());

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, form.content_type)
            .header(CONTENT_LENGTH, total)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Formatter response status: {} ({}ms)", status, latency_ms);

        let code = status.as_u16();
        let received = read_body(resp, &progress).await;

        if !status.is_success() {
            if let Some(e) = &received.error {
                log::warn!(
                    "Error body cut short after {} bytes: {}",
                    received.bytes.len(),
                    e
                );
            }
            return Err(SubmitError::HttpStatus {
                status: code,
                body: String::from_utf8_lossy(&received.bytes).into_owned(),
            });
        }

        if let Some(e) = received.error {
            return Err(SubmitError::BodyRead {
                status: Some(code),
                reason: e.to_string(),
            });
        }

        let body = String::from_utf8(received.bytes).map_err(|e| SubmitError::BodyRead {
            status: Some(code),
            reason: e.to_string(),
        })?;

        Ok(Reply { status: code, body })
    }
}

/// Streams `bytes` in `chunk_size` pieces, reporting upload progress as each
/// piece is handed to the connection.
fn upload_body(bytes: Vec<u8>, chunk_size: usize, progress: ProgressFn) -> Body {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes
        .chunks(chunk_size.max(1))
        .map(<[u8]>::to_vec)
        .collect();

    let mut sent = 0u64;
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        progress(Progress::upload(sent, Some(total)));
        Ok::<_, std::io::Error>(chunk)
    }));

    Body::wrap_stream(stream)
}

/// Bytes received from a response body, and the error that ended it early.
struct ReceivedBody {
    bytes: Vec<u8>,
    error: Option<reqwest::Error>,
}

/// Reads the body until it ends or fails, reporting download progress per
/// received chunk. Bytes that arrived before a failure are kept.
async fn read_body(mut resp: Response, progress: &ProgressFn) -> ReceivedBody {
    let total = resp.content_length();
    let capacity = total.unwrap_or(0).min(1 << 20) as usize;
    let mut bytes = Vec::with_capacity(capacity);

    loop {
        match resp.chunk().await {
            Ok(Some(chunk)) => {
                bytes.extend_from_slice(&chunk);
                progress(Progress::download(bytes.len() as u64, total));
            }
            Ok(None) => return ReceivedBody { bytes, error: None },
            Err(e) => {
                return ReceivedBody {
                    bytes,
                    error: Some(e),
                };
            }
        }
    }
}

//! Amendment full-text documents
//!
//! The only network access in the crate: downloading an amendment's
//! full text to report its size. Requests are bounded by a timeout and
//! never retried.

use crate::config::DocumentConfig;
use crate::error::{AppError, AppResult, FetchError};
use crate::models::Amendment;
use std::time::Duration;
use tracing::{debug, warn};

pub struct DocumentClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl DocumentClient {
    pub fn new(config: &DocumentConfig) -> AppResult<Self> {
        Self::with_timeout(Duration::from_secs(config.timeout_secs), &config.user_agent)
    }

    pub fn with_timeout(timeout: Duration, user_agent: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, timeout })
    }

    /// Size in bytes of the amendment's full text, `0` when it has no link
    pub async fn document_size(&self, amendment: &Amendment) -> Result<u64, FetchError> {
        match amendment.full_text_link.as_deref() {
            Some(link) => self.fetch_len(link).await,
            None => Ok(0),
        }
    }

    async fn fetch_len(&self, link: &str) -> Result<u64, FetchError> {
        let url = url::Url::parse(link).map_err(|e| FetchError::InvalidUrl {
            url: link.to_string(),
            reason: e.to_string(),
        })?;

        debug!("Fetching document {}", url);

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(link, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Document {} answered {}", link, status);
            return Err(FetchError::Status {
                url: link.to_string(),
                status: status.as_u16(),
            });
        }

        let mut size: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify(link, e))? {
            size += chunk.len() as u64;
        }
        debug!("Document {} is {} bytes", link, size);
        Ok(size)
    }

    fn classify(&self, link: &str, e: reqwest::Error) -> FetchError {
        warn!("Document fetch failed for {}: {}", link, e);
        if e.is_timeout() {
            FetchError::Timeout {
                url: link.to_string(),
                timeout: self.timeout,
            }
        } else if e.is_connect() {
            FetchError::Connect {
                url: link.to_string(),
                reason: e.to_string(),
            }
        } else {
            FetchError::Request {
                url: link.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn amendment(link: Option<String>) -> Amendment {
        Amendment {
            id: 1,
            stage_id: 1,
            presented_on: NaiveDate::from_ymd_opt(2019, 5, 20).unwrap(),
            venue: "CCJC".to_string(),
            author: "Dep. Fulano".to_string(),
            full_text_link: link,
        }
    }

    fn client(timeout: Duration) -> DocumentClient {
        DocumentClient::with_timeout(timeout, "legis-tracker-tests").unwrap()
    }

    /// Serve a single canned HTTP response on a random local port
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}/emenda.pdf", addr)
    }

    #[tokio::test]
    async fn test_no_link_is_zero() {
        let size = client(Duration::from_secs(1))
            .document_size(&amendment(None))
            .await
            .unwrap();
        assert_eq!(size, 0);
    }

    #[tokio::test]
    async fn test_size_is_body_length() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: 11\r\nConnection: close\r\n\r\n%PDF-1.4...",
        )
        .await;
        let size = client(Duration::from_secs(5))
            .document_size(&amendment(Some(url)))
            .await
            .unwrap();
        assert_eq!(size, 11);
    }

    #[tokio::test]
    async fn test_chunked_body_is_summed() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n",
        )
        .await;
        let size = client(Duration::from_secs(5))
            .document_size(&amendment(Some(url)))
            .await
            .unwrap();
        assert_eq!(size, 11);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let err = client(Duration::from_secs(5))
            .document_size(&amendment(Some(url)))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // accept and never answer
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });

        let err = client(Duration::from_millis(200))
            .document_size(&amendment(Some(format!("http://{}/lento.pdf", addr))))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(Duration::from_secs(5))
            .document_size(&amendment(Some(format!("http://{}/x.pdf", addr))))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Connect { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_invalid_link() {
        let err = client(Duration::from_secs(1))
            .document_size(&amendment(Some("not a url".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}

//! Genius API client
//!
//! Lyrics are not part of the public API: the API resolves a query to a song
//! page path, and the page itself is scraped.

use super::{ErrorKind, LyricsError, Stage, scrape};
use crate::config::GeniusConfig;
use anyhow::Context;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub result: HitResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HitResult {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist_names: String,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    response: SongBody,
}

#[derive(Debug, Deserialize)]
struct SongBody {
    song: Song,
}

#[derive(Debug, Deserialize)]
struct Song {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Clone)]
pub struct GeniusClient {
    http: reqwest::Client,
    access_token: Arc<str>,
    api_base: String,
    web_base: String,
}

impl GeniusClient {
    const USER_AGENT: &'static str = concat!("cmus-lyrics/", env!("CARGO_PKG_VERSION"));

    pub fn new(cfg: &GeniusConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            http,
            access_token: Arc::from(cfg.access_token.as_str()),
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            web_base: cfg.web_base.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve free-text `query` (usually "artist title") to plain-text lyrics.
    ///
    /// Any stage failing aborts the whole lookup. Cancelling `cancel` aborts
    /// whichever stage is running with [`ErrorKind::Cancelled`].
    pub async fn fetch_lyrics(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<String, LyricsError> {
        let hit = guard(Stage::Search, cancel, self.search(query)).await?;
        debug!(
            kind = %hit.kind,
            id = hit.result.id,
            title = %hit.result.title,
            artist = %hit.result.artist_names,
            "genius top hit"
        );

        let path = guard(Stage::SongLookup, cancel, self.song_path(hit.result.id)).await?;
        let html = guard(Stage::PageScrape, cancel, self.page(&path)).await?;

        scrape::extract_lyrics(&html)
            .ok_or_else(|| LyricsError::new(Stage::PageScrape, ErrorKind::NoLyricsFound))
    }

    /// Top hit for `query`, in the provider's own relevance order.
    async fn search(&self, query: &str) -> Result<SearchHit, LyricsError> {
        let url = format!("{}/search?q={}", self.api_base, urlencoding::encode(query));
        let response = self
            .http
            .get(&url)
            .bearer_auth(&*self.access_token)
            .send()
            .await
            .map_err(|e| unavailable(Stage::Search, format!("send request: {e}")))?;

        if !response.status().is_success() {
            return Err(unavailable(
                Stage::Search,
                format!("unexpected status code: {}", response.status().as_u16()),
            ));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| unavailable(Stage::Search, format!("decode response: {e}")))?;

        body.response
            .hits
            .into_iter()
            .next()
            .ok_or_else(|| LyricsError::new(Stage::Search, ErrorKind::NoResults))
    }

    async fn song_path(&self, id: i64) -> Result<String, LyricsError> {
        let url = format!("{}/songs/{id}", self.api_base);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&*self.access_token)
            .send()
            .await
            .map_err(|e| unavailable(Stage::SongLookup, format!("send request: {e}")))?;

        if !response.status().is_success() {
            return Err(lookup_failed(format!(
                "unexpected status code: {}",
                response.status().as_u16()
            )));
        }

        let body: SongResponse = response
            .json()
            .await
            .map_err(|e| lookup_failed(format!("decode response: {e}")))?;

        if body.response.song.path.is_empty() {
            return Err(lookup_failed("song has no page path".to_string()));
        }
        Ok(body.response.song.path)
    }

    /// The song page is public; no credential is sent.
    async fn page(&self, path: &str) -> Result<String, LyricsError> {
        let url = format!("{}{}", self.web_base, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(Stage::PageScrape, format!("send request: {e}")))?;

        if !response.status().is_success() {
            return Err(unavailable(
                Stage::PageScrape,
                format!("unexpected status code: {}", response.status().as_u16()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| unavailable(Stage::PageScrape, format!("read page: {e}")))
    }
}

async fn guard<T>(
    stage: Stage,
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, LyricsError>>,
) -> Result<T, LyricsError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LyricsError::new(stage, ErrorKind::Cancelled)),
        out = fut => out,
    }
}

fn unavailable(stage: Stage, detail: String) -> LyricsError {
    LyricsError::new(stage, ErrorKind::RemoteUnavailable(detail))
}

fn lookup_failed(detail: String) -> LyricsError {
    LyricsError::new(Stage::SongLookup, ErrorKind::SongLookupFailed(detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[derive(Debug, Clone)]
    struct Seen {
        target: String,
        authorized: bool,
    }

    struct Route {
        path: &'static str,
        status: u16,
        content_type: &'static str,
        body: String,
        /// Accept the request but never answer it.
        hang: bool,
    }

    fn route(path: &'static str, status: u16, content_type: &'static str, body: &str) -> Route {
        Route {
            path,
            status,
            content_type,
            body: body.to_string(),
            hang: false,
        }
    }

    fn hanging(path: &'static str) -> Route {
        Route {
            hang: true,
            ..route(path, 200, "text/plain", "")
        }
    }

    /// Minimal HTTP/1.1 responder; one request per connection.
    async fn serve(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<Seen>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let log = seen.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match sock.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&buf).to_string();
                    let target = head
                        .lines()
                        .next()
                        .and_then(|l| l.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    let authorized = head
                        .lines()
                        .any(|l| l.to_ascii_lowercase().starts_with("authorization: bearer "));
                    log.lock().unwrap().push(Seen {
                        target: target.clone(),
                        authorized,
                    });

                    let path = target.split('?').next().unwrap_or("/");
                    let found = routes.iter().find(|r| r.path == path);
                    if found.is_some_and(|r| r.hang) {
                        std::future::pending::<()>().await;
                    }
                    let (status, content_type, body) = found
                        .map(|r| (r.status, r.content_type, r.body.clone()))
                        .unwrap_or((404, "text/plain", "not found".to_string()));
                    let response = format!(
                        "HTTP/1.1 {status} X\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = sock.write_all(response.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });

        (base, seen)
    }

    fn client(base: &str) -> GeniusClient {
        let mut client = GeniusClient::new(&GeniusConfig {
            access_token: "secret".into(),
            api_base: format!("{base}/"),
            web_base: base.to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        // Keep ambient proxy settings away from the local stub.
        client.http = reqwest::Client::builder().no_proxy().build().unwrap();
        client
    }

    const SEARCH_HIT: &str = r#"{"meta":{"status":200},"response":{"hits":[
        {"type":"song","result":{"id":42,"title":"Song","artist_names":"Artist"}},
        {"type":"song","result":{"id":7,"title":"Other","artist_names":"Someone"}}]}}"#;
    const SONG: &str = r#"{"response":{"song":{"id":42,"path":"/Artist-song-lyrics"}}}"#;
    const PAGE: &str = r#"<html><body><div data-lyrics-container="true"><div data-exclude-from-selection="true">Report</div>Hello<br>World</div></body></html>"#;

    #[tokio::test]
    async fn test_full_pipeline() {
        let (base, seen) = serve(vec![
            route("/search", 200, "application/json", SEARCH_HIT),
            route("/songs/42", 200, "application/json", SONG),
            route("/Artist-song-lyrics", 200, "text/html", PAGE),
        ])
        .await;

        let lyrics = client(&base)
            .fetch_lyrics("Artist Song", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(lyrics, "Hello\nWorld");

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].target, "/search?q=Artist%20Song");
        assert!(seen[0].authorized);
        assert_eq!(seen[1].target, "/songs/42");
        assert!(seen[1].authorized);
        assert_eq!(seen[2].target, "/Artist-song-lyrics");
        assert!(!seen[2].authorized);
    }

    #[tokio::test]
    async fn test_zero_hits_stops_after_search() {
        let (base, seen) = serve(vec![route(
            "/search",
            200,
            "application/json",
            r#"{"response":{"hits":[]}}"#,
        )])
        .await;

        let err = client(&base)
            .fetch_lyrics("nothing", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, LyricsError::new(Stage::Search, ErrorKind::NoResults));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_song_lookup_status_failure() {
        let (base, seen) = serve(vec![
            route("/search", 200, "application/json", SEARCH_HIT),
            route("/songs/42", 500, "application/json", "{}"),
        ])
        .await;

        let err = client(&base)
            .fetch_lyrics("Artist Song", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::SongLookup);
        assert!(matches!(err.kind, ErrorKind::SongLookupFailed(_)));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_song_lookup_decode_failure() {
        let (base, _seen) = serve(vec![
            route("/search", 200, "application/json", SEARCH_HIT),
            route("/songs/42", 200, "application/json", "not json"),
        ])
        .await;

        let err = client(&base)
            .fetch_lyrics("Artist Song", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SongLookupFailed(_)));
    }

    #[tokio::test]
    async fn test_page_without_lyrics() {
        let (base, _seen) = serve(vec![
            route("/search", 200, "application/json", SEARCH_HIT),
            route("/songs/42", 200, "application/json", SONG),
            route("/Artist-song-lyrics", 200, "text/html", "<html><body>Nope</body></html>"),
        ])
        .await;

        let err = client(&base)
            .fetch_lyrics("Artist Song", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LyricsError::new(Stage::PageScrape, ErrorKind::NoLyricsFound)
        );
    }

    #[tokio::test]
    async fn test_unauthorized_search() {
        let (base, _seen) = serve(vec![route("/search", 401, "application/json", "{}")]).await;

        let err = client(&base)
            .fetch_lyrics("Artist Song", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::Search);
        assert!(matches!(err.kind, ErrorKind::RemoteUnavailable(ref m) if m.contains("401")));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = client(&base)
            .fetch_lyrics("Artist Song", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.stage, Stage::Search);
        assert!(matches!(err.kind, ErrorKind::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_cancel_during_song_lookup() {
        let (base, seen) = serve(vec![
            route("/search", 200, "application/json", SEARCH_HIT),
            hanging("/songs/42"),
        ])
        .await;
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = client(&base).fetch_lyrics("Artist Song", &cancel).await.unwrap_err();
        assert_eq!(err, LyricsError::new(Stage::SongLookup, ErrorKind::Cancelled));
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].target, "/songs/42");
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (base, seen) = serve(vec![route("/search", 200, "application/json", SEARCH_HIT)]).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client(&base).fetch_lyrics("Artist Song", &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.stage, Stage::Search);
        assert!(seen.lock().unwrap().is_empty());
    }
}

//! HTTP image download on a worker thread, with fractional progress and
//! cooperative cancellation.

use crate::config::DownloadLimits;
use crate::image::human_readable_bytes;
use reqwest::Url;
use reqwest::redirect::Policy;
use std::io::Read as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

const USER_AGENT: &str = concat!("filterdeck/", env!("CARGO_PKG_VERSION"));
const CHUNK_SIZE: usize = 64 * 1024;
/// Progress step for bodies without a Content-Length header.
const UNSIZED_REPORT_STEP: u64 = 256 * 1024;

/// Emitted over the handle's channel. Every non-cancelled download ends with
/// exactly one `Finished` or `Failed`.
pub enum DownloadEvent {
    Progress { fraction: Option<f32>, bytes: u64 },
    Finished(Vec<u8>),
    Failed(String),
}

/// Receiver side of a running download. Dropping the handle after `cancel()`
/// abandons the worker; its sends go nowhere.
pub struct DownloadHandle {
    rx: Receiver<DownloadEvent>,
    cancel: Arc<AtomicBool>,
}

impl DownloadHandle {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn try_recv(&self) -> Result<DownloadEvent, TryRecvError> {
        self.rx.try_recv()
    }
}

/// Parse and vet a user-typed download link. An invalid URL never starts a
/// download.
pub fn validate_download_url(text: &str) -> Result<Url, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("Enter a download link first.".to_string());
    }
    let url = Url::parse(trimmed).map_err(|err| format!("Not a valid URL: {err}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!(
            "Unsupported URL scheme \"{other}\"; use http or https."
        )),
    }
}

fn progress_fraction(bytes: u64, total: Option<u64>) -> Option<f32> {
    total.filter(|t| *t > 0).map(|t| {
        #[allow(clippy::cast_precision_loss)]
        let fraction = bytes as f64 / t as f64;
        #[allow(clippy::cast_possible_truncation)]
        {
            fraction.min(1.0) as f32
        }
    })
}

const fn body_exceeds_limit(bytes: u64, limits: &DownloadLimits) -> bool {
    bytes > limits.max_body_bytes
}

enum Outcome {
    Finished(Vec<u8>),
    Cancelled,
    Failed(String),
}

fn fetch_body(
    limits: &DownloadLimits,
    url: Url,
    cancel: &AtomicBool,
    report: &impl Fn(Option<f32>, u64),
) -> Outcome {
    let client = match reqwest::blocking::Client::builder()
        .redirect(Policy::limited(limits.max_redirects))
        .connect_timeout(Duration::from_secs(limits.connect_timeout_secs))
        // No whole-request deadline: large bodies on slow links are fine,
        // cancellation covers abandoned transfers.
        .timeout(None::<Duration>)
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(err) => return Outcome::Failed(format!("Could not build HTTP client: {err}")),
    };

    let mut response = match client.get(url).send() {
        Ok(response) => response,
        Err(err) => return Outcome::Failed(format!("Request failed: {err}")),
    };
    if !response.status().is_success() {
        return Outcome::Failed(format!("Server answered HTTP {}", response.status()));
    }

    let total = response.content_length().filter(|t| *t > 0);
    if let Some(announced) = total
        && body_exceeds_limit(announced, limits)
    {
        return Outcome::Failed(format!(
            "Download too large: {} announced, limit is {}",
            human_readable_bytes(announced),
            human_readable_bytes(limits.max_body_bytes)
        ));
    }

    let mut body: Vec<u8> =
        Vec::with_capacity(total.and_then(|t| usize::try_from(t).ok()).unwrap_or(0));
    let mut buf = vec![0_u8; CHUNK_SIZE];
    let mut last_step = 0_u64;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return Outcome::Cancelled;
        }
        match response.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                body.extend_from_slice(&buf[..n]);
                let bytes = body.len() as u64;
                if body_exceeds_limit(bytes, limits) {
                    return Outcome::Failed(format!(
                        "Download exceeded the {} limit",
                        human_readable_bytes(limits.max_body_bytes)
                    ));
                }
                let fraction = progress_fraction(bytes, total);
                let step = fraction.map_or(bytes / UNSIZED_REPORT_STEP, |f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    {
                        (f * 100.0) as u64
                    }
                });
                if step != last_step {
                    last_step = step;
                    report(fraction, bytes);
                }
            }
            Err(err) => return Outcome::Failed(format!("Download interrupted: {err}")),
        }
    }
    Outcome::Finished(body)
}

/// Spawn a worker that streams `url` into memory, reporting progress over the
/// returned handle's channel.
pub fn start_download(limits: &DownloadLimits, url: Url) -> DownloadHandle {
    let limits = limits.sanitized();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let report = |fraction, bytes| {
            let _ = tx.send(DownloadEvent::Progress { fraction, bytes });
        };
        match fetch_body(&limits, url, &flag, &report) {
            Outcome::Finished(bytes) => {
                let _ = tx.send(DownloadEvent::Finished(bytes));
            }
            Outcome::Failed(msg) => {
                let _ = tx.send(DownloadEvent::Failed(msg));
            }
            Outcome::Cancelled => {}
        }
    });
    DownloadHandle { rx, cancel }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        assert!(validate_download_url("").is_err());
        assert!(validate_download_url("   ").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_download_url("not a url at all").is_err());
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        let err = validate_download_url("ftp://example.com/cat.png").unwrap_err();
        assert!(err.contains("ftp"));
        assert!(validate_download_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn http_and_https_are_accepted() {
        let url = validate_download_url(" https://example.com/cat.png ").expect("https accepted");
        assert_eq!(url.scheme(), "https");
        assert!(validate_download_url("http://example.com/cat.png").is_ok());
    }

    #[test]
    fn body_limit_is_exclusive_of_the_cap_itself() {
        let limits = DownloadLimits {
            max_body_bytes: 1024 * 1024,
            connect_timeout_secs: 15,
            max_redirects: 10,
        };
        assert!(!body_exceeds_limit(1024 * 1024, &limits));
        assert!(body_exceeds_limit(1024 * 1024 + 1, &limits));
    }

    #[test]
    fn fraction_requires_a_known_total() {
        assert_eq!(progress_fraction(10, None), None);
        assert_eq!(progress_fraction(10, Some(0)), None);
    }

    #[test]
    fn fraction_is_clamped_to_one() {
        assert_eq!(progress_fraction(50, Some(100)), Some(0.5));
        assert_eq!(progress_fraction(200, Some(100)), Some(1.0));
    }

    #[test]
    fn cancelled_flag_stops_before_any_request_event() {
        // A pre-cancelled handle must never deliver a terminal event.
        let limits = DownloadLimits::default().sanitized();
        let url = Url::parse("http://127.0.0.1:9/unreachable.png").expect("url");
        let handle = start_download(&limits, url);
        handle.cancel();
        // The worker may still send a connection failure if it lost the race;
        // both silence and a single Failed are acceptable here, but never a
        // Finished.
        std::thread::sleep(std::time::Duration::from_millis(200));
        while let Ok(event) = handle.try_recv() {
            assert!(!matches!(event, DownloadEvent::Finished(_)));
        }
    }
}

//! [`EntityRecognizer`] backed by a Presidio analyzer HTTP service.
//!
//! Construction performs a health check, so an unreachable service surfaces as
//! [`DetectionError::Unavailable`] and detector selection can fall back to the
//! regex variant. Every request carries a timeout.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::statistical::{EntityRecognizer, RecognizedEntity};
use crate::error::DetectionError;

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Deserialize)]
struct AnalyzerResult {
    entity_type: String,
    start: usize,
    end: usize,
    score: f64,
}

/// Client for a Presidio analyzer (`GET /health`, `POST /analyze`).
#[derive(Debug)]
pub struct PresidioRecognizer {
    client: Client,
    base_url: String,
    language: String,
}

impl PresidioRecognizer {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connects to the analyzer at `base_url` and checks that it is healthy.
    pub fn connect(base_url: impl Into<String>) -> Result<Self, DetectionError> {
        Self::connect_with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn connect_with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DetectionError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DetectionError::Unavailable(err.to_string()))?;

        let response = client
            .get(format!("{base_url}/health"))
            .send()
            .map_err(|err| DetectionError::Unavailable(format!("{base_url}: {err}")))?;
        if !response.status().is_success() {
            return Err(DetectionError::Unavailable(format!(
                "{base_url}: health check returned {}",
                response.status()
            )));
        }

        Ok(Self {
            client,
            base_url,
            language: "en".to_owned(),
        })
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl EntityRecognizer for PresidioRecognizer {
    fn name(&self) -> &str {
        "presidio"
    }

    fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, DetectionError> {
        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .json(&AnalyzeRequest {
                text,
                language: &self.language,
            })
            .send()
            .map_err(|err| DetectionError::Backend(err.to_string()))?;
        if !response.status().is_success() {
            return Err(DetectionError::Backend(format!(
                "analyze returned {}",
                response.status()
            )));
        }
        let results: Vec<AnalyzerResult> = response
            .json()
            .map_err(|err| DetectionError::MalformedResponse(err.to_string()))?;

        Ok(results
            .into_iter()
            .filter_map(|result| {
                let Some((start, end)) = char_span_to_bytes(text, result.start, result.end) else {
                    tracing::warn!(
                        label = %result.entity_type,
                        start = result.start,
                        end = result.end,
                        chars = text.chars().count(),
                        "presidio reported an offset outside the text; entity dropped"
                    );
                    return None;
                };
                Some(RecognizedEntity {
                    label: result.entity_type,
                    start,
                    end,
                    score: result.score,
                })
            })
            .collect())
    }
}

/// Presidio reports offsets in Unicode scalar values; findings use byte offsets.
fn char_span_to_bytes(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let mut boundaries = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()));
    let start_byte = boundaries.nth(start)?;
    let end_byte = if end == start {
        start_byte
    } else {
        boundaries.nth(end.checked_sub(start + 1)?)?
    };
    Some((start_byte, end_byte))
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::{TcpListener, TcpStream},
        thread::{self, JoinHandle},
    };

    use super::*;
    use crate::detect::{PiiDetector, StatisticalDetector};

    const HEALTHY: (u16, &str) = (200, "Presidio Analyzer service is up");

    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0_u8; 1024];
        loop {
            let read = stream.read(&mut buf).unwrap();
            if read == 0 {
                break;
            }
            data.extend_from_slice(&buf[..read]);
            if let Some(head_end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&data[..head_end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .map_or(0, |len| len.trim().parse::<usize>().unwrap());
                if data.len() >= head_end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8(data).unwrap()
    }

    /// Answers one connection per canned response, in order, and hands back
    /// the raw requests it received.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| {
                    let (mut stream, _) = listener.accept().unwrap();
                    let request = read_request(&mut stream);
                    write!(
                        stream,
                        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    )
                    .unwrap();
                    request
                })
                .collect()
        });
        (base_url, handle)
    }

    fn connect(base_url: &str) -> Result<PresidioRecognizer, DetectionError> {
        PresidioRecognizer::connect_with_timeout(base_url, Duration::from_secs(5))
    }

    #[test]
    fn ascii_offsets_are_unchanged() {
        assert_eq!(char_span_to_bytes("mail a@b.com", 5, 12), Some((5, 12)));
    }

    #[test]
    fn multibyte_offsets_are_converted() {
        // 'Zoë' is 3 chars but 4 bytes.
        let text = "Zoë at z@x.io";
        assert_eq!(char_span_to_bytes(text, 0, 3), Some((0, 4)));
        assert_eq!(char_span_to_bytes(text, 7, 13), Some((8, 14)));
    }

    #[test]
    fn out_of_range_offsets_are_rejected() {
        assert_eq!(char_span_to_bytes("abc", 1, 9), None);
        assert_eq!(char_span_to_bytes("abc", 2, 1), None);
    }

    #[test]
    fn failing_health_check_is_unavailable() {
        let (base_url, _server) = serve(vec![(503, "")]);
        assert!(matches!(connect(&base_url), Err(DetectionError::Unavailable(_))));
    }

    #[test]
    fn unreachable_service_is_unavailable() {
        let base_url = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };
        assert!(matches!(connect(&base_url), Err(DetectionError::Unavailable(_))));
    }

    #[test]
    fn error_status_is_a_backend_failure() {
        let (base_url, _server) = serve(vec![HEALTHY, (500, "{\"error\": \"boom\"}")]);
        let recognizer = connect(&base_url).unwrap();
        assert!(matches!(
            recognizer.recognize("hello"),
            Err(DetectionError::Backend(_))
        ));
    }

    #[test]
    fn undecodable_body_is_malformed() {
        let (base_url, _server) = serve(vec![HEALTHY, (200, "not json")]);
        let recognizer = connect(&base_url).unwrap();
        assert!(matches!(
            recognizer.recognize("hello"),
            Err(DetectionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn analyze_round_trip_converts_offsets() {
        let (base_url, server) = serve(vec![
            HEALTHY,
            (
                200,
                r#"[
                    {"entity_type": "PERSON", "start": 0, "end": 3, "score": 0.85},
                    {"entity_type": "EMAIL_ADDRESS", "start": 7, "end": 13, "score": 1.0}
                ]"#,
            ),
        ]);
        let detector = StatisticalDetector::new(Box::new(connect(&base_url).unwrap()));

        let result = detector.detect_and_redact("Zoë at z@x.io").unwrap();
        assert_eq!(result.redacted_text, "[PERSON_REDACTED] at [EMAIL_REDACTED]");

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("GET /health "));
        assert!(requests[1].starts_with("POST /analyze "));
        assert!(requests[1].contains(r#""language":"en""#));
    }

    #[test]
    fn entity_with_bad_offsets_is_dropped() {
        let (base_url, _server) = serve(vec![
            HEALTHY,
            (
                200,
                r#"[
                    {"entity_type": "PERSON", "start": 2, "end": 99, "score": 0.9},
                    {"entity_type": "EMAIL_ADDRESS", "start": 5, "end": 12, "score": 1.0}
                ]"#,
            ),
        ]);
        let recognizer = connect(&base_url).unwrap();
        let entities = recognizer.recognize("mail a@b.com").unwrap();
        assert_eq!(
            entities,
            vec![RecognizedEntity {
                label: "EMAIL_ADDRESS".into(),
                start: 5,
                end: 12,
                score: 1.0,
            }]
        );
    }
}

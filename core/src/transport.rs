//! The seam between plain-data requests and the network.
//!
//! A `Transport` executes one `HttpRequest` and reports either an
//! `HttpResponse` (whatever its status) or a `TransportError`. Status codes
//! are never treated as transport failures; that is the `ResponseHandler`'s
//! call. Timeouts and cancellation belong to the transport as well.

use std::error::Error as StdError;
use std::fmt;

use crate::http::{HttpRequest, HttpResponse};

/// A failure below HTTP: DNS, connect, TLS, I/O, timeout.
///
/// Displays exactly as the error the transport raised, which stays reachable
/// through `get_ref` and `into_inner`.
#[derive(Debug)]
pub struct TransportError(Box<dyn StdError + Send + Sync + 'static>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self(err.into())
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Executes requests built by the client.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::fmt;
    use std::time::{Duration, Instant};

    use tracing::{debug, warn};

    use super::{Transport, TransportError};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};

    /// Blocking transport backed by a `ureq` agent.
    ///
    /// 4xx/5xx responses come back as data, not as errors. A request body is
    /// sent whatever the method, GET and DELETE included.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
        timeout: Option<Duration>,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::with_timeout(None)
        }

        /// Limit each whole request (connect through body) to `timeout`.
        pub fn with_timeout(timeout: Option<Duration>) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self { agent, timeout }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("UreqTransport")
                .field("timeout", &self.timeout)
                .finish_non_exhaustive()
        }
    }

    fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let uri = request.uri();
            let body = request.body.as_ref().map(RequestBody::to_bytes);
            let started = Instant::now();
            debug!(method = %request.method, url = %request.url, "sending request");

            let result = match (request.method, body) {
                (HttpMethod::Get, None) => with_headers(self.agent.get(&uri), &request.headers).call(),
                (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(&uri), &request.headers)
                    .force_send_body()
                    .send(&body[..]),
                (HttpMethod::Delete, None) => with_headers(self.agent.delete(&uri), &request.headers).call(),
                (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(&uri), &request.headers)
                    .force_send_body()
                    .send(&body[..]),
                (HttpMethod::Post, Some(body)) => {
                    with_headers(self.agent.post(&uri), &request.headers).send(&body[..])
                }
                (HttpMethod::Post, None) => with_headers(self.agent.post(&uri), &request.headers).send_empty(),
                (HttpMethod::Put, Some(body)) => {
                    with_headers(self.agent.put(&uri), &request.headers).send(&body[..])
                }
                (HttpMethod::Put, None) => with_headers(self.agent.put(&uri), &request.headers).send_empty(),
            };

            let mut response = result.map_err(|err| {
                warn!(method = %request.method, url = %request.url, error = %err, "transport failure");
                TransportError::new(err)
            })?;

            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response.body_mut().read_to_vec().map_err(|err| {
                warn!(url = %request.url, error = %err, "failed to read response body");
                TransportError::new(err)
            })?;

            debug!(
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "received response"
            );

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn transport_error_keeps_original_error() {
        let err = TransportError::new(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert_eq!(err.to_string(), "refused");
        let inner = err.into_inner();
        let io_err = inner.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::ConnectionRefused);
    }

    #[test]
    fn closures_are_transports() {
        let transport = |request: &HttpRequest| -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(200, request.url.clone()))
        };
        let request = HttpRequest {
            method: crate::http::HttpMethod::Get,
            url: "http://example.test/".to_string(),
            query_string: None,
            headers: Vec::new(),
            body: None,
        };
        let response = transport.send(&request).unwrap();
        assert_eq!(response.text(), "http://example.test/");
    }

    #[cfg(feature = "ureq")]
    fn read_raw_request(stream: &mut std::net::TcpStream) -> String {
        use std::io::Read;

        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            raw.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&raw).into_owned();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    });
                let complete = match content_length {
                    Some(len) => raw.len() >= head_end + 4 + len,
                    None => text.ends_with("0\r\n\r\n"),
                };
                if complete || n == 0 {
                    return text;
                }
            }
            if n == 0 {
                return String::from_utf8_lossy(&raw).into_owned();
            }
        }
    }

    #[cfg(feature = "ureq")]
    #[test]
    fn ureq_transport_sends_body_on_delete() {
        use std::io::Write;
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let raw = read_raw_request(&mut stream);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}")
                .unwrap();
            raw
        });

        let request = HttpRequest {
            method: crate::http::HttpMethod::Delete,
            url: format!("http://{addr}/v1/L1/items/I1"),
            query_string: None,
            headers: Vec::new(),
            body: None,
        }
        .with_json(serde_json::json!({"reason": "gone"}));
        let response = UreqTransport::new().send(&request).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text(), "{}");

        let raw = server.join().unwrap();
        assert!(raw.starts_with("DELETE /v1/L1/items/I1 HTTP/1.1\r\n"), "got {raw}");
        assert!(raw.contains(r#"{"reason":"gone"}"#), "got {raw}");
    }
}

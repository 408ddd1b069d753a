//! Request head parsing.
//!
//! # Responsibilities
//! - Split the first client read into request line, header block and body prefix
//! - Collect headers by exact name (last value wins)
//! - Derive the origin host and port from the `Host` header
//!
//! # Design Decisions
//! - Single-shot: only the bytes of one read are inspected, nothing is buffered further
//! - Slices share the original buffer (`Bytes`), so the raw request can be forwarded verbatim
//! - Header names are matched case-sensitively; `Host` must be spelled exactly

use bytes::Bytes;
use thiserror::Error;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Default port for plain HTTP forwarding.
pub const HTTP_DEFAULT_PORT: u16 = 80;
/// Default port for CONNECT tunnels.
pub const CONNECT_DEFAULT_PORT: u16 = 443;

/// Reasons a request head is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRequest {
    #[error("header block is not terminated by an empty line")]
    Unterminated,

    #[error("request line has {0} space-separated tokens, expected 3")]
    RequestLine(usize),

    #[error("no Host header")]
    MissingHost,

    #[error("invalid port in Host header: {0:?}")]
    InvalidPort(String),
}

/// Header block keyed by exact name bytes, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(Bytes, Bytes)>,
}

impl Headers {
    /// Insert a header, replacing the value of an existing entry with the same name.
    fn insert(&mut self, name: Bytes, value: Bytes) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a header by its exact name.
    pub fn get(&self, name: &[u8]) -> Option<&Bytes> {
        self.entries
            .iter()
            .find(|(n, _)| &n[..] == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> {
        self.entries.iter().map(|(n, v)| (n, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A request head parsed from the first client read.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    raw: Bytes,
    method: Bytes,
    target: Bytes,
    version: Bytes,
    headers: Headers,
    body_prefix: Bytes,
    host: Bytes,
    port: u16,
}

impl ParsedRequest {
    /// The complete buffer as it was received.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn method(&self) -> &[u8] {
        &self.method
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    pub fn version(&self) -> &[u8] {
        &self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Bytes that followed the header terminator in the same read.
    pub fn body_prefix(&self) -> &[u8] {
        &self.body_prefix
    }

    pub fn host(&self) -> &[u8] {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_connect(&self) -> bool {
        &self.method[..] == b"CONNECT"
    }
}

/// Parse a raw request head.
pub fn parse(raw: Bytes) -> Result<ParsedRequest, MalformedRequest> {
    let split = find(&raw, HEADER_TERMINATOR).ok_or(MalformedRequest::Unterminated)?;
    let head = raw.slice(..split);
    let body_prefix = raw.slice(split + HEADER_TERMINATOR.len()..);

    let mut lines = Lines::new(&head);
    let request_line = lines.next().unwrap_or_default();
    let tokens: Vec<&[u8]> = request_line.split(|&b| b == b' ').collect();
    let &[method, target, version] = &tokens[..] else {
        return Err(MalformedRequest::RequestLine(tokens.len()));
    };

    let mut headers = Headers::default();
    for line in lines {
        let (name, value) = match line.iter().position(|&b| b == b':') {
            Some(colon) => (&line[..colon], &line[colon + 1..]),
            None => (line, &line[line.len()..]),
        };
        headers.insert(
            raw.slice_ref(name.trim_ascii()),
            raw.slice_ref(value.trim_ascii()),
        );
    }

    let host_value = headers
        .get(b"Host")
        .cloned()
        .ok_or(MalformedRequest::MissingHost)?;
    let is_connect = method == b"CONNECT";

    let (host, port) = match host_value.iter().position(|&b| b == b':') {
        None => {
            let port = if is_connect {
                CONNECT_DEFAULT_PORT
            } else {
                HTTP_DEFAULT_PORT
            };
            (host_value, port)
        }
        Some(colon) => {
            let suffix = &host_value[colon + 1..];
            let port = std::str::from_utf8(suffix)
                .ok()
                .and_then(|s| s.parse::<u16>().ok())
                .ok_or_else(|| {
                    MalformedRequest::InvalidPort(String::from_utf8_lossy(suffix).into_owned())
                })?;
            (host_value.slice(..colon), port)
        }
    };

    Ok(ParsedRequest {
        method: raw.slice_ref(method),
        target: raw.slice_ref(target),
        version: raw.slice_ref(version),
        raw,
        headers,
        body_prefix,
        host,
        port,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Iterator over CRLF-separated lines.
struct Lines<'a> {
    rest: Option<&'a [u8]>,
}

impl<'a> Lines<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { rest: Some(buf) }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.rest?;
        match find(rest, LINE_TERMINATOR) {
            Some(end) => {
                self.rest = Some(&rest[end + LINE_TERMINATOR.len()..]);
                Some(&rest[..end])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

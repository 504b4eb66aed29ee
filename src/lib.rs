//! Convert a raw HTTP request into an equivalent curl command line.
//!
//! The input is what a browser's "copy as raw request" (or a packet dump) gives you:
//! a request-line, headers, a blank line and an optional body. The output is a single
//! curl invocation reproducing the same method, URL, headers and body.
//!
//! # Architecture
//!
//! The conversion runs in two independent stages:
//!
//! 1. **Parsing**: a three-state line machine (request-line, headers, body) backed by a
//!    Pest grammar turns the text into a validated [`ParsedRequest`]
//! 2. **Synthesis**: a rule engine maps the [`ParsedRequest`] plus the user's
//!    [`OutputOptions`] into a [`CurlCommand`] with a deterministic fragment order
//!
//! Neither stage keeps state between calls, so every conversion is a pure function of
//! its input.
//!
//! # Examples
//!
//! ```
//! use h2curl::{OutputOptions, ParsedRequest};
//! # fn main() -> Result<(), h2curl::Error> {
//! let raw = "HEAD / HTTP/1.1\r\nHost: example.com\r\nUser-Agent: moo\r\n";
//! let request: ParsedRequest = raw.parse()?;
//! let curl = request.to_curl(&OutputOptions::default())?;
//! assert_eq!(
//!     curl.to_string(),
//!     r#"curl --head --http1.1 --header Accept: --user-agent "moo" https://example.com/"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Placeholders in the request can be filled from a template context:
//!
//! ```
//! use h2curl::{OutputOptions, ParsedRequest};
//! use serde_json::json;
//! # fn main() -> Result<(), h2curl::Error> {
//! let raw = "GET /user HTTP/2\nHost: api.github.com\nX-Api-Key: {{ key }}\n";
//! let request = ParsedRequest::load(raw, json!({ "key": "abcd1234" }))?;
//! let opts = OutputOptions {
//!     use_short_flags: true,
//!     ..Default::default()
//! };
//! let curl = request.to_curl(&opts)?;
//! assert!(curl.to_string().contains(r#"-H "X-Api-Key: abcd1234""#));
//! # Ok(())
//! # }
//! ```

pub(crate) mod error;
mod flags;
mod parser;
mod synth;

use http::Version;
use std::collections::BTreeMap;

pub use error::Error;
pub use flags::{Doc, FlagVocabulary};
pub use synth::{CommandSynthesizer, CurlCommand, UnsupportedBodyEncoding};

/// A request as read from the raw text.
///
/// `headers` holds the canonical form (lower-cased name and value, last occurrence
/// wins); `original_case` holds the same keys with the name and value as written.
/// Names are kept as plain text, so anything before the first colon of a header line
/// is a name, HTTP/2 pseudo-headers like `:authority` included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    pub path: String,
    pub http_version: String,
    pub headers: BTreeMap<String, String>,
    pub original_case: BTreeMap<String, RawHeader>,
    pub body: Vec<String>,
}

/// A header field exactly as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub name: String,
    pub value: String,
}

/// Output conventions chosen by the user. The defaults match curl's own long-form
/// spelling over https with curl's default headers suppressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Keep curl's built-in `Accept` and `User-Agent` when the request lacks them.
    pub allow_default_headers: bool,
    /// Emit `http://` instead of `https://`.
    pub use_http_scheme: bool,
    /// Skip the HTTP version flag altogether.
    pub ignore_http_version: bool,
    pub use_short_flags: bool,
    pub verbose: bool,
    /// Collect a [`Doc`] for each option used.
    pub emit_docs: bool,
}

impl ParsedRequest {
    /// Canonical (lower-cased) value of a header, looked up by its lower-cased name.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers.get(name.as_ref()).map(String::as_str)
    }

    /// Protocol version named in the request-line, if it is one curl can be told to use.
    pub fn version(&self) -> Option<Version> {
        match self.http_version.to_ascii_uppercase().as_str() {
            "HTTP/1.1" => Some(Version::HTTP_11),
            "HTTP/2" => Some(Version::HTTP_2),
            _ => None,
        }
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

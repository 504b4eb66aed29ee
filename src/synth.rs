use crate::{
    OutputOptions, ParsedRequest,
    error::*,
    flags::{self, Doc, FlagVocabulary},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use http::{
    HeaderName, Version,
    header::{
        ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, EXPECT,
        HOST, USER_AGENT,
    },
};
use snafu::{OptionExt, ResultExt};
use std::fmt;
use tracing::{debug, warn};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data;";
const SEND_BODY: &str = "send this string as a body with POST";

/// Marker for a body the synthesizer recognizes but does not convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedBodyEncoding {
    pub content_type: String,
}

impl fmt::Display for UnsupportedBodyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body with content-type {} is not converted", self.content_type)
    }
}

/// A synthesized curl invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlCommand {
    /// Non-empty pieces of the command line, in output order.
    pub fragments: Vec<String>,
    /// Empty unless [`OutputOptions::emit_docs`] was set.
    pub docs: Vec<Doc>,
    pub unsupported_body: Option<UnsupportedBodyEncoding>,
}

impl fmt::Display for CurlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("curl")?;
        for fragment in &self.fragments {
            write!(f, " {fragment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct HeaderField<'a> {
    /// Name as written in the request.
    name: &'a str,
    /// Canonical lower-cased value.
    value: &'a str,
    raw_value: &'a str,
}

enum Effect {
    Skip,
    Add { arg: String, doc: Option<Doc> },
}

type HeaderHandler = fn(&HeaderField<'_>, &FlagVocabulary) -> Result<Effect>;

static HEADER_HANDLERS: [(HeaderName, HeaderHandler); 8] = [
    // used for the URL
    (HOST, skip),
    (AUTHORIZATION, authorization),
    // curl does expect on its own
    (EXPECT, skip),
    (ACCEPT_ENCODING, accept_encoding),
    (ACCEPT, accept),
    // curl computes the size
    (CONTENT_LENGTH, skip),
    (USER_AGENT, user_agent),
    (COOKIE, cookie),
];

fn handler_for(name: &str) -> HeaderHandler {
    HEADER_HANDLERS
        .iter()
        .find(|(n, _)| n.as_str() == name)
        .map_or(custom_header as HeaderHandler, |(_, handler)| *handler)
}

fn skip(_: &HeaderField<'_>, _: &FlagVocabulary) -> Result<Effect> {
    Ok(Effect::Skip)
}

fn authorization(field: &HeaderField<'_>, flags: &FlagVocabulary) -> Result<Effect> {
    let Some(token) = field.raw_value.strip_prefix("Basic ") else {
        return Ok(Effect::Skip);
    };
    let decoded = STANDARD.decode(token.trim()).context(BadAuthEncodingSnafu)?;
    Ok(Effect::Add {
        arg: format!(r#"{} "{}""#, flags.user, String::from_utf8_lossy(&decoded)),
        doc: Some(Doc::new(
            flags.user,
            "use this user and password for basic auth",
        )),
    })
}

fn accept_encoding(field: &HeaderField<'_>, flags: &FlagVocabulary) -> Result<Effect> {
    if !field.value.contains("gzip") {
        return custom_header(field, flags);
    }
    Ok(Effect::Add {
        arg: flags::COMPRESSED.into(),
        doc: Some(Doc::new(flags::COMPRESSED, "request a compressed response")),
    })
}

fn accept(field: &HeaderField<'_>, flags: &FlagVocabulary) -> Result<Effect> {
    // */* is what curl sends anyway
    if field.value == "*/*" {
        return Ok(Effect::Skip);
    }
    custom_header(field, flags)
}

fn user_agent(field: &HeaderField<'_>, flags: &FlagVocabulary) -> Result<Effect> {
    Ok(Effect::Add {
        arg: format!(r#"{} "{}""#, flags.user_agent, field.value),
        doc: Some(Doc::new(
            flags.user_agent,
            "use this custom User-Agent request header",
        )),
    })
}

fn cookie(field: &HeaderField<'_>, flags: &FlagVocabulary) -> Result<Effect> {
    Ok(Effect::Add {
        arg: format!(r#"{} "{}""#, flags.cookie, field.value),
        doc: Some(Doc::new(
            flags.cookie,
            "pass on this custom Cookie: request header",
        )),
    })
}

fn custom_header(field: &HeaderField<'_>, flags: &FlagVocabulary) -> Result<Effect> {
    Ok(Effect::Add {
        arg: format!(r#"{} "{}: {}""#, flags.header, field.name, field.value),
        doc: None,
    })
}

/// Turns a [`ParsedRequest`] into a [`CurlCommand`] under a fixed set of
/// [`OutputOptions`].
#[derive(Debug, Clone, Copy)]
pub struct CommandSynthesizer {
    opts: OutputOptions,
    flags: FlagVocabulary,
}

impl CommandSynthesizer {
    pub fn new(opts: OutputOptions) -> Self {
        Self {
            opts,
            flags: FlagVocabulary::select(opts.use_short_flags),
        }
    }

    pub fn flags(&self) -> &FlagVocabulary {
        &self.flags
    }

    pub fn synthesize(&self, req: &ParsedRequest) -> Result<CurlCommand> {
        let flags = &self.flags;
        let mut docs = Vec::new();
        let mut unsupported_body = None;
        let mut path = req.path.as_str();
        let content_type = req.header(&CONTENT_TYPE);

        let mut body = Vec::new();
        match content_type {
            Some(ct) if ct.starts_with(MULTIPART_FORM_DATA) => {
                // TODO: convert multipart bodies into --form arguments
                warn!(content_type = ct, "multipart/form-data body is left out");
                unsupported_body = Some(UnsupportedBodyEncoding {
                    content_type: ct.into(),
                });
            }
            _ if req.has_body() => {
                body.push(format!(r#"{} "{}""#, flags::DATA_BINARY, escape_body(&req.body)));
                docs.push(Doc::new(flags::DATA_BINARY, SEND_BODY));
            }
            _ => {}
        }

        let mut method = String::new();
        let mut request_target = String::new();
        match req.method.to_ascii_uppercase().as_str() {
            "HEAD" => {
                method = flags.head.into();
                docs.push(Doc::new(flags.head, "send a HEAD request"));
            }
            "POST" => self.force_body(&mut body, &mut docs),
            "PUT" => {
                self.force_body(&mut body, &mut docs);
                body.push(format!("{} PUT", flags.request));
                docs.push(Doc::new(
                    flags.request,
                    "replace the request method with this string",
                ));
            }
            "OPTIONS" => {
                method = format!("{} OPTIONS", flags.request);
                if !path.starts_with('/') {
                    request_target = format!(r#"{} "{path}""#, flags::REQUEST_TARGET);
                    docs.push(Doc::new(
                        flags::REQUEST_TARGET,
                        "specify request target to use instead of using the URL's",
                    ));
                    path = "";
                }
            }
            _ => {}
        }

        let mut disabled = Vec::new();
        let mut added = Vec::new();
        let mut content_type_restated = false;
        if !body.is_empty() {
            match content_type {
                Some(ct) if ct.eq_ignore_ascii_case(FORM_URLENCODED) => {
                    added.push(format!(r#"{} "Content-Type: {ct}""#, flags.header));
                    content_type_restated = true;
                }
                Some(_) => {}
                None => disabled.push(format!("{} Content-Type:", flags.header)),
            }
        }

        let mut version = "";
        if !self.opts.ignore_http_version {
            let parsed = req.version().context(UnsupportedHttpVersionSnafu {
                version: &req.http_version,
            })?;
            let (flag, description) = if parsed == Version::HTTP_2 {
                (flags::HTTP2, "use HTTP protocol version 2")
            } else {
                (flags::HTTP1_1, "use HTTP protocol version 1.1")
            };
            version = flag;
            docs.push(Doc::new(flag, description));
        }

        if !self.opts.allow_default_headers {
            for (name, spelled) in [(ACCEPT, "Accept"), (USER_AGENT, "User-Agent")] {
                if !req.headers.contains_key(name.as_str()) {
                    disabled.push(format!("{} {spelled}:", flags.header));
                }
            }
        }

        for (name, value) in &req.headers {
            if content_type_restated && name == CONTENT_TYPE.as_str() {
                continue;
            }
            let raw = req.original_case.get(name);
            let field = HeaderField {
                name: raw.map_or(name.as_str(), |r| r.name.as_str()),
                value,
                raw_value: raw.map_or(value.as_str(), |r| r.value.as_str()),
            };
            match handler_for(name)(&field, flags)? {
                Effect::Skip => {}
                Effect::Add { arg, doc } => {
                    added.push(arg);
                    docs.extend(doc);
                }
            }
        }
        if !disabled.is_empty() || !added.is_empty() {
            docs.push(Doc::new(
                flags.header,
                "add, replace or remove HTTP headers from the request",
            ));
        }

        let host = req.header(&HOST).context(MissingHostSnafu)?;
        let scheme = if self.opts.use_http_scheme {
            "http"
        } else {
            "https"
        };
        let url = if needs_quote(path) {
            format!(r#""{scheme}://{host}{path}""#)
        } else {
            format!("{scheme}://{host}{path}")
        };

        let mut verbose = "";
        if self.opts.verbose {
            verbose = flags.verbose;
            docs.push(Doc::new(flags.verbose, "show verbose output"));
        }

        let fragments: Vec<String> = [
            verbose.to_owned(),
            method,
            version.to_owned(),
            disabled.join(" "),
            added.join(" "),
            body.join(" "),
            request_target,
            url,
        ]
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect();

        if !self.opts.emit_docs {
            docs.clear();
        }

        let command = CurlCommand {
            fragments,
            docs,
            unsupported_body,
        };
        debug!(%command, "synthesized curl command");
        Ok(command)
    }

    /// Without any body curl would send a GET.
    fn force_body(&self, body: &mut Vec<String>, docs: &mut Vec<Doc>) {
        if body.is_empty() {
            body.push(format!(r#"{} """#, self.flags.data));
            docs.push(Doc::new(self.flags.data, SEND_BODY));
        }
    }
}

impl Default for CommandSynthesizer {
    fn default() -> Self {
        Self::new(OutputOptions::default())
    }
}

impl ParsedRequest {
    pub fn to_curl(&self, opts: &OutputOptions) -> Result<CurlCommand> {
        CommandSynthesizer::new(*opts).synthesize(self)
    }
}

fn escape_body(lines: &[String]) -> String {
    lines.concat().replace('\n', " ").replace('"', r#"\""#)
}

fn needs_quote(path: &str) -> bool {
    path.contains([' ', '&', '?'])
}

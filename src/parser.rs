use crate::{ParsedRequest, RawHeader, error::*};
use http::{Method, header::HOST};
use minijinja::Environment;
use pest::Parser as _;
use pest_derive::Parser;
use serde::Serialize;
use snafu::{ResultExt, ensure};
use std::{io::Read, str::FromStr};
use tracing::{debug, trace};

#[derive(Debug, Parser)]
#[grammar = "src/request.pest"]
pub struct RequestParser;

const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::HEAD,
    Method::PUT,
    Method::OPTIONS,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    RequestLine,
    Header,
    Body,
}

fn parse_input(input: &str) -> Result<ParsedRequest> {
    let mut parsed = ParsedRequest::default();
    let mut state = State::RequestLine;

    // only the terminator's own `\r` goes, any other stays with the line
    for line in input.split_terminator('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match state {
            State::RequestLine => {
                let (method, target, version) = parse_request_line(line)?;
                parsed.method = method.into();
                parsed.path = target.into();
                parsed.http_version = version.into();
                debug!(method, target, version, "parsed request-line");
                state = State::Header;
            }
            State::Header => {
                if let Some((name, value)) = parse_header_line(line) {
                    let key = name.to_lowercase();
                    trace!(header = %key, "parsed header");
                    parsed.headers.insert(key.clone(), value.to_lowercase());
                    parsed.original_case.insert(
                        key,
                        RawHeader {
                            name: name.into(),
                            value: value.into(),
                        },
                    );
                } else if line.len() < 2 {
                    debug!(headers = parsed.headers.len(), "reached header separator");
                    state = State::Body;
                } else {
                    return MalformedHeaderSnafu { line }.fail();
                }
            }
            State::Body => parsed.body.push(line.into()),
        }
    }

    ensure!(parsed.headers.contains_key(HOST.as_str()), MissingHostSnafu);
    ensure!(
        SUPPORTED_METHODS
            .iter()
            .any(|m| m.as_str().eq_ignore_ascii_case(&parsed.method)),
        UnsupportedMethodSnafu {
            method: &parsed.method
        }
    );

    // a body made only of blank lines is no body at all
    if parsed.body.iter().all(String::is_empty) {
        parsed.body.clear();
    }
    Ok(parsed)
}

fn parse_request_line(line: &str) -> Result<(&str, &str, &str)> {
    let pairs = RequestParser::parse(Rule::request_line, line)
        .context(BadRequestLineSnafu { line })?;
    let (mut method, mut target, mut version) = ("", "", "");
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::method => method = pair.as_str(),
            Rule::target => target = pair.as_str(),
            Rule::version => version = pair.as_str(),
            _ => {}
        }
    }
    Ok((method, target, version))
}

fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let pairs = RequestParser::parse(Rule::header_line, line).ok()?;
    let (mut name, mut value) = ("", "");
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::name => name = pair.as_str(),
            Rule::value => value = pair.as_str(),
            _ => {}
        }
    }
    Some((name, value))
}

impl ParsedRequest {
    /// Render `input` as a template with `context` and parse the result.
    pub fn load(input: &str, context: impl Serialize) -> Result<Self> {
        let env = Environment::new();
        let input = env.render_str(input, context).context(RenderSnafu)?;
        parse_input(&input)
    }

    /// Read a whole request from `reader`. Bytes that are not valid UTF-8 are replaced
    /// rather than rejected, since bodies from packet dumps are often binary.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).context(ReadInputSnafu)?;
        parse_input(&String::from_utf8_lossy(&buf))
    }
}

impl FromStr for ParsedRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_input(s)
    }
}

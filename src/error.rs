use crate::parser::Rule;
use snafu::Snafu;

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Bad request-line: {line}"))]
    BadRequestLine {
        line: String,
        #[snafu(source(from(pest::error::Error<Rule>, Box::new)))]
        source: Box<pest::error::Error<Rule>>,
    },
    #[snafu(display("Illegal HTTP header on line: {line}"))]
    MalformedHeader { line: String },
    #[snafu(display("No Host: header makes it impossible to tell the URL"))]
    MissingHost,
    #[snafu(display("Unsupported HTTP method: '{method}'"))]
    UnsupportedMethod { method: String },
    #[snafu(display("Failed to read the request"))]
    ReadInput { source: std::io::Error },
    #[snafu(display("Failed to render request template"))]
    Render { source: minijinja::Error },

    #[snafu(display("Unsupported HTTP version: {version}"))]
    UnsupportedHttpVersion { version: String },
    #[snafu(display("Failed to decode authorization info"))]
    BadAuthEncoding { source: base64::DecodeError },
}

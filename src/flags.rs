use std::fmt;

pub(crate) const DATA_BINARY: &str = "--data-binary";
pub(crate) const COMPRESSED: &str = "--compressed";
pub(crate) const HTTP1_1: &str = "--http1.1";
pub(crate) const HTTP2: &str = "--http2";
pub(crate) const REQUEST_TARGET: &str = "--request-target";

const MANPAGE_URL: &str = "https://curl.se/docs/manpage.html";

/// Concrete spellings of the curl options that come in a long and a short form.
///
/// Options curl only offers in long form (`--data-binary`, `--compressed`, `--http1.1`,
/// `--http2`, `--request-target`) are not part of the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagVocabulary {
    pub data: &'static str,
    pub request: &'static str,
    pub head: &'static str,
    pub header: &'static str,
    pub user_agent: &'static str,
    pub cookie: &'static str,
    pub verbose: &'static str,
    pub form: &'static str,
    pub user: &'static str,
}

impl FlagVocabulary {
    pub const LONG: Self = Self {
        data: "--data",
        request: "--request",
        head: "--head",
        header: "--header",
        user_agent: "--user-agent",
        cookie: "--cookie",
        verbose: "--verbose",
        form: "--form",
        user: "--user",
    };

    pub const SHORT: Self = Self {
        data: "-d",
        request: "-X",
        head: "-I",
        header: "-H",
        user_agent: "-A",
        cookie: "-b",
        verbose: "-v",
        form: "-F",
        user: "-u",
    };

    pub fn select(use_short_flags: bool) -> Self {
        if use_short_flags {
            Self::SHORT
        } else {
            Self::LONG
        }
    }
}

impl Default for FlagVocabulary {
    fn default() -> Self {
        Self::LONG
    }
}

/// A documentation annotation explaining one option of the generated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doc {
    pub flag: &'static str,
    pub description: &'static str,
}

impl Doc {
    pub(crate) const fn new(flag: &'static str, description: &'static str) -> Self {
        Self { flag, description }
    }

    /// Link to the option's entry in the curl man page.
    pub fn manpage_url(&self) -> String {
        format!("{MANPAGE_URL}#{}", self.flag)
    }
}

impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.flag, self.description, self.manpage_url())
    }
}

//! `[<file-kind>:]<path>` file-specs.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

static FILE_SPEC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\w+):)?(.*)$").expect("valid file-spec regex"));

/// Path marker for standard input.
pub const STDIN_PATH: &str = "-";

/// Where a file-spec's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Path(PathBuf),
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed file-spec. The original text is kept for error context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    raw: String,
    kind: Option<String>,
    source: InputSource,
}

impl FileSpec {
    /// Parse `[<file-kind>:]<path>`; an empty path or `-` means stdin.
    pub fn parse(raw: &str) -> Self {
        let (kind, path) = match FILE_SPEC_REGEX.captures(raw) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str().to_string()),
                caps.get(2).map_or("", |m| m.as_str()),
            ),
            // `.*` stops at newlines; keep such specs as a bare path.
            None => (None, raw),
        };
        let source = if path.is_empty() || path == STDIN_PATH {
            InputSource::Stdin
        } else {
            InputSource::Path(PathBuf::from(path))
        };
        Self {
            raw: raw.to_string(),
            kind,
            source,
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }
}

impl fmt::Display for FileSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

use super::ParsedLine;
use std::fmt;

/// Why a line could not be turned into a [`ParsedLine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// No quoted request field on the line
    MissingRequest,
    /// The request field has no URL token
    MissingUrl,
    /// The trailing field is not a non-negative number
    InvalidDuration(String),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::MissingRequest => write!(f, "missing quoted request field"),
            ParseFailure::MissingUrl => write!(f, "missing request URL"),
            ParseFailure::InvalidDuration(raw) => write!(f, "invalid request time '{}'", raw),
        }
    }
}

/// Extracts the request URL and the trailing request time from access log lines
///
/// Lines are expected to follow the nginx `ui_short` layout, where the request
/// line is the first quoted field and `$request_time` closes the line:
///
/// ```text
/// 1.2.3.4 -  - [29/Jun/2017:03:50:22 +0300] "GET /api/v2/banner/25019354 HTTP/1.1" 200 927 "-" "Lynx/2.8.8dev.9" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" 0.390
/// ```
///
/// Nothing else on the line is inspected.
pub struct LineParser;

impl LineParser {
    pub fn parse(line: &str) -> Result<ParsedLine, ParseFailure> {
        let mut fields = line.split('"');
        // Text before the first quote is not used
        fields.next();
        let request = fields.next().ok_or(ParseFailure::MissingRequest)?;

        let url = request
            .split(' ')
            .nth(1)
            .filter(|url| !url.is_empty())
            .ok_or(ParseFailure::MissingUrl)?;

        // `split` always yields at least one item, and we already consumed two
        let tail = fields.next_back().unwrap_or(request).trim();
        let duration: f64 = tail
            .parse()
            .map_err(|_| ParseFailure::InvalidDuration(tail.to_string()))?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(ParseFailure::InvalidDuration(tail.to_string()));
        }

        Ok(ParsedLine {
            url: url.to_string(),
            duration,
        })
    }
}

// Result Parser
//
// Converts the raw stdout text of `speedtest-cli --simple` into a
// MeasurementResult. Pure except for the timestamp capture, which goes
// through the injected clock port.

use thiserror::Error;

use crate::domain::MeasurementResult;
use crate::port::TimeProvider;

/// Parse failures, one variant per failure condition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to parse measurement output: expected 3 lines, found {0}")]
    TooFewLines(usize),

    #[error("failed to parse measurement output: line {line} does not match `{expected}`")]
    MalformedLine {
        line: usize,
        expected: &'static str,
    },
}

// (keyword, unit, human-readable shape) per line, in the fixed order the
// utility prints them
const LINE_SHAPES: [(&str, &str, &str); 3] = [
    ("Ping", "ms", "Ping: <number> ms"),
    ("Download", "Mbit/s", "Download: <number> Mbit/s"),
    ("Upload", "Mbit/s", "Upload: <number> Mbit/s"),
];

/// Parse the complete captured stdout of one utility invocation.
///
/// Matching is strictly positional: line 1 must be Ping, line 2 Download,
/// line 3 Upload. Order-independent matching would silently accept reordered
/// or duplicated fields from a misbehaving utility, so it is deliberately not
/// attempted. Lines beyond the third are ignored.
///
/// The timestamp is captured only after all three lines have validated, so it
/// stands for "reading available and valid", not "subprocess exited".
pub fn parse_summary(
    output: &str,
    clock: &dyn TimeProvider,
) -> Result<MeasurementResult, ParseError> {
    let lines: Vec<&str> = output.trim().lines().collect();

    if lines.len() < 3 {
        return Err(ParseError::TooFewLines(lines.len()));
    }

    let mut values = [0f64; 3];
    for (idx, &(keyword, unit, expected)) in LINE_SHAPES.iter().enumerate() {
        values[idx] =
            parse_metric_line(lines[idx], keyword, unit).ok_or(ParseError::MalformedLine {
                line: idx + 1,
                expected,
            })?;
    }

    let measured_at = clock.now_millis();

    Ok(MeasurementResult {
        ping_ms: values[0],
        download_mbps: values[1],
        upload_mbps: values[2],
        measured_at,
    })
}

/// Match one `<Keyword>: <number> <unit>` line, whitespace-flexible,
/// case-sensitive. Returns None on any deviation.
fn parse_metric_line(line: &str, keyword: &str, unit: &str) -> Option<f64> {
    let mut tokens = line.split_whitespace();

    let label = tokens.next()?;
    let number = tokens.next()?;
    let unit_token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    if label.strip_suffix(':') != Some(keyword) || unit_token != unit {
        return None;
    }

    parse_positive_number(number)
}

/// One or more ASCII digits with an optional decimal point. No sign, no
/// exponent, no NaN/inf spellings. Must yield a finite positive value.
fn parse_positive_number(token: &str) -> Option<f64> {
    if !token.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }

    let value: f64 = token.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::time_provider::FixedTimeProvider;

    const VALID_OUTPUT: &str = "Ping: 23.456 ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s\n";

    fn clock() -> FixedTimeProvider {
        FixedTimeProvider::new(1_700_000_000_000)
    }

    #[test]
    fn test_parse_valid_output() {
        let result = parse_summary(VALID_OUTPUT, &clock()).unwrap();

        assert_eq!(result.ping_ms, 23.456);
        assert_eq!(result.download_mbps, 85.67);
        assert_eq!(result.upload_mbps, 12.34);
        assert_eq!(result.measured_at, 1_700_000_000_000);
    }

    #[test]
    fn test_parse_integer_values() {
        let output = "Ping: 9 ms\nDownload: 100 Mbit/s\nUpload: 40 Mbit/s";
        let result = parse_summary(output, &clock()).unwrap();

        assert_eq!(result.ping_ms, 9.0);
        assert_eq!(result.download_mbps, 100.0);
        assert_eq!(result.upload_mbps, 40.0);
    }

    #[test]
    fn test_parse_flexible_whitespace() {
        let output = "Ping:   23.456   ms\nDownload:  85.67 Mbit/s\nUpload: 12.34  Mbit/s";
        let result = parse_summary(output, &clock()).unwrap();

        assert_eq!(result.ping_ms, 23.456);
    }

    #[test]
    fn test_parse_ignores_trailing_lines() {
        let output = format!("{VALID_OUTPUT}Share results: http://example.com/result.png\n");
        let result = parse_summary(&output, &clock()).unwrap();

        assert_eq!(result.download_mbps, 85.67);
    }

    #[test]
    fn test_parse_too_few_lines() {
        let err = parse_summary("Invalid output format\n", &clock()).unwrap_err();
        assert_eq!(err, ParseError::TooFewLines(1));

        let err = parse_summary("", &clock()).unwrap_err();
        assert_eq!(err, ParseError::TooFewLines(0));

        let err =
            parse_summary("Ping: 23.456 ms\nDownload: 85.67 Mbit/s\n", &clock()).unwrap_err();
        assert_eq!(err, ParseError::TooFewLines(2));
    }

    #[test]
    fn test_parse_rejects_reordered_lines() {
        // Same three fields, wrong order: must fail, not be matched by keyword
        let output = "Download: 85.67 Mbit/s\nPing: 23.456 ms\nUpload: 12.34 Mbit/s";
        let err = parse_summary(output, &clock()).unwrap_err();

        assert_eq!(
            err,
            ParseError::MalformedLine {
                line: 1,
                expected: "Ping: <number> ms",
            }
        );
    }

    #[test]
    fn test_parse_rejects_wrong_unit() {
        let output = "Ping: 23.456 ms\nDownload: 85.67 MB/s\nUpload: 12.34 Mbit/s";
        let err = parse_summary(output, &clock()).unwrap_err();

        assert_eq!(
            err,
            ParseError::MalformedLine {
                line: 2,
                expected: "Download: <number> Mbit/s",
            }
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let output = "ping: 23.456 ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());
    }

    #[test]
    fn test_parse_rejects_negative_and_signed_values() {
        let output = "Ping: -23.456 ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());

        let output = "Ping: +23.456 ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());
    }

    #[test]
    fn test_parse_rejects_zero_values() {
        let output = "Ping: 23.456 ms\nDownload: 0.0 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_values() {
        let output = "Ping: fast ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());

        let output = "Ping: 1.2.3 ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());

        let output = "Ping: . ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_colon_and_extra_tokens() {
        let output = "Ping 23.456 ms\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());

        let output = "Ping: 23.456 ms extra\nDownload: 85.67 Mbit/s\nUpload: 12.34 Mbit/s";
        assert!(parse_summary(output, &clock()).is_err());
    }
}

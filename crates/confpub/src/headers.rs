//! Parsing of repeated `KEY=VALUE` header tokens.

use std::collections::HashMap;

/// Parse a single `KEY=VALUE` token.
///
/// The token must contain exactly one `=` and a non-empty key; the value
/// may be empty. Used as a clap value parser, so one malformed token fails
/// the whole invocation and no partial header map is ever applied.
pub(crate) fn parse_header(token: &str) -> Result<(String, String), String> {
    match token.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.contains('=') => {
            Ok((key.to_owned(), value.to_owned()))
        }
        _ => Err(format!(
            "could not parse argument \"{token}\", it should follow the format: KEY=VALUE"
        )),
    }
}

/// Build the header map from parsed tokens; duplicate keys keep the last
/// occurrence.
pub(crate) fn header_map(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse_all(tokens: &[&str]) -> Result<HashMap<String, String>, String> {
        let pairs = tokens
            .iter()
            .map(|token| parse_header(token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(header_map(pairs))
    }

    #[test]
    fn test_well_formed_tokens() {
        let map = parse_all(&["X-Forwarded-For=10.0.0.1", "X-Trace=abc"]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["X-Forwarded-For"], "10.0.0.1");
        assert_eq!(map["X-Trace"], "abc");
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let map = parse_all(&["X-Empty="]).unwrap();
        assert_eq!(map["X-Empty"], "");
    }

    #[test]
    fn test_second_separator_is_rejected() {
        let message = parse_all(&["X-Equation=a=b"]).unwrap_err();
        assert!(message.contains("X-Equation=a=b"));
        assert!(message.contains("KEY=VALUE"));
    }

    #[test]
    fn test_duplicate_key_keeps_last() {
        let map = parse_all(&["X-Key=first", "X-Key=second"]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["X-Key"], "second");
    }

    #[test]
    fn test_missing_separator_fails_whole_parse() {
        let result = parse_all(&["X-Good=1", "bogus"]);
        let message = result.unwrap_err();
        assert!(message.contains("bogus"));
        assert!(message.contains("KEY=VALUE"));
    }

    #[test]
    fn test_empty_key_fails() {
        assert!(parse_all(&["=value"]).is_err());
    }

    #[test]
    fn test_no_tokens_yield_empty_map() {
        assert!(parse_all(&[]).unwrap().is_empty());
    }
}

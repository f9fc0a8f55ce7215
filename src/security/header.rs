//! `Authorization: TaskRooAuth ...` header parsing.
//!
//! Grammar (as sent by the web client):
//!
//! ```text
//! Authorization: TaskRooAuth realm="taskroo@aetas.pl",tokenKey="=SessionIDString=",cnonce="uniqueValue"
//! ```
//!
//! Notes:
//! - The scheme tag is stripped once if present; a header without it is parsed anyway.
//! - Elements are split on `,` and then on the first `=`, so values may contain `=` but not `,`.
//! - Empty trailing elements (`...,tokenKey="T",`) are dropped; whitespace-only ones are not.
//! - Every `"` in a value is dropped, not only the delimiting pair. There is no escaping.

use std::collections::HashMap;

use thiserror::Error;

pub const SCHEME_PREFIX: &str = "TaskRooAuth ";
pub const TOKEN_KEY_FIELD: &str = "tokenKey";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    // Position only: the element itself may carry the token.
    #[error("authorization header element {position} has no '=' separator")]
    MissingSeparator { position: usize },
    #[error("authorization header is not visible ASCII")]
    NotVisibleAscii,
}

/// Parsed `key=value` fields of a `TaskRooAuth` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthHeaderFields(HashMap<String, String>);

impl AuthHeaderFields {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The session token, if the client sent a non-empty one.
    pub fn token_key(&self) -> Option<&str> {
        self.get(TOKEN_KEY_FIELD).filter(|t| !t.is_empty())
    }
}

pub fn parse(raw: &str) -> Result<AuthHeaderFields, HeaderError> {
    let rest = raw.replacen(SCHEME_PREFIX, "", 1);

    let mut elements: Vec<&str> = rest.split(',').collect();
    // An empty header stays a single empty element and still fails below.
    if elements.len() > 1 {
        while elements.last() == Some(&"") {
            elements.pop();
        }
    }

    let mut fields = HashMap::new();
    for (position, element) in elements.into_iter().enumerate() {
        let (key, value) = element
            .split_once('=')
            .ok_or(HeaderError::MissingSeparator { position })?;

        // A repeated key overwrites the earlier one.
        fields.insert(
            key.trim().to_string(),
            value.replace('"', "").trim().to_string(),
        );
    }

    Ok(AuthHeaderFields(fields))
}

pub fn parse_header_value(
    value: &axum::http::HeaderValue,
) -> Result<AuthHeaderFields, HeaderError> {
    let raw = value.to_str().map_err(|_| HeaderError::NotVisibleAscii)?;
    parse(raw)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn parses_client_header() {
        let fields = parse(r#"TaskRooAuth realm="R",tokenKey="T",cnonce="C""#).unwrap();

        let expected = AuthHeaderFields(HashMap::from([
            ("realm".to_string(), "R".to_string()),
            ("tokenKey".to_string(), "T".to_string()),
            ("cnonce".to_string(), "C".to_string()),
        ]));
        assert_eq!(fields, expected);
        assert_eq!(fields.token_key(), Some("T"));
    }

    #[test]
    fn client_header_fields_round_trip() {
        let long_token = "k".repeat(512);
        let cases: [(&str, &str, &str); 5] = [
            ("taskroo@aetas.pl", "=SessionIDString=", "uniqueValue"),
            ("api.taskroo.com", "a=b=c", "n-1"),
            ("Task Roo realm", "abc 123", "c nonce"),
            ("r", long_token.as_str(), "c"),
            ("", "x", ""),
        ];

        for (realm, token, cnonce) in cases {
            let raw = format!(r#"TaskRooAuth realm="{realm}",tokenKey="{token}",cnonce="{cnonce}""#);
            let fields = parse(&raw).unwrap();

            let expected = AuthHeaderFields(HashMap::from([
                ("realm".to_string(), realm.to_string()),
                ("tokenKey".to_string(), token.to_string()),
                ("cnonce".to_string(), cnonce.to_string()),
            ]));
            assert_eq!(fields, expected, "header: {raw}");
        }
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let fields = parse(
            r#"TaskRooAuth realm="taskroo@aetas.pl",tokenKey="=SessionIDString=",cnonce="uniqueValue""#,
        )
        .unwrap();

        assert_eq!(fields.token_key(), Some("=SessionIDString="));
        assert_eq!(fields.get("realm"), Some("taskroo@aetas.pl"));
    }

    #[test]
    fn whitespace_and_field_order_do_not_matter() {
        let fields = parse(r#"TaskRooAuth  cnonce = "c1" ,  tokenKey= "abc123"  "#).unwrap();

        assert_eq!(fields.get("cnonce"), Some("c1"));
        assert_eq!(fields.token_key(), Some("abc123"));
    }

    #[test]
    fn embedded_quotes_are_stripped() {
        let fields = parse(r#"TaskRooAuth tokenKey="ab"c"d""#).unwrap();
        assert_eq!(fields.token_key(), Some("abcd"));
    }

    #[test]
    fn missing_scheme_prefix_is_tolerated() {
        let fields = parse(r#"tokenKey="abc123""#).unwrap();
        assert_eq!(fields.token_key(), Some("abc123"));
    }

    #[test]
    fn only_first_scheme_prefix_is_stripped() {
        let fields = parse(r#"TaskRooAuth tokenKey="TaskRooAuth x""#).unwrap();
        assert_eq!(fields.token_key(), Some("TaskRooAuth x"));
    }

    #[test]
    fn last_duplicate_wins() {
        let fields = parse(r#"TaskRooAuth tokenKey="first",tokenKey="second""#).unwrap();
        assert_eq!(fields.token_key(), Some("second"));
    }

    #[test]
    fn empty_token_key_is_treated_as_absent() {
        let fields = parse(r#"TaskRooAuth realm="R",tokenKey="""#).unwrap();
        assert_eq!(fields.get("tokenKey"), Some(""));
        assert_eq!(fields.token_key(), None);
    }

    #[test]
    fn element_without_separator_is_rejected() {
        assert_eq!(
            parse("garbage-no-equals-sign"),
            Err(HeaderError::MissingSeparator { position: 0 })
        );
        assert_eq!(
            parse(r#"TaskRooAuth realm="R",oops,tokenKey="T""#),
            Err(HeaderError::MissingSeparator { position: 1 })
        );
        assert_eq!(parse(""), Err(HeaderError::MissingSeparator { position: 0 }));
        assert_eq!(
            parse("TaskRooAuth "),
            Err(HeaderError::MissingSeparator { position: 0 })
        );
    }

    #[test]
    fn trailing_commas_are_ignored() {
        let fields = parse(r#"TaskRooAuth realm="R",tokenKey="T","#).unwrap();
        assert_eq!(fields.get("realm"), Some("R"));
        assert_eq!(fields.token_key(), Some("T"));

        let fields = parse(r#"TaskRooAuth tokenKey="T",,,"#).unwrap();
        assert_eq!(fields.token_key(), Some("T"));
    }

    #[test]
    fn whitespace_only_trailing_element_is_rejected() {
        assert_eq!(
            parse(r#"TaskRooAuth realm="R",tokenKey="T", "#),
            Err(HeaderError::MissingSeparator { position: 2 })
        );
        // an empty element in the middle is not trailing
        assert_eq!(
            parse(r#"TaskRooAuth realm="R",,tokenKey="T""#),
            Err(HeaderError::MissingSeparator { position: 1 })
        );
    }

    #[test]
    fn comma_in_value_splits_the_element() {
        // Known limitation of the grammar: the tail becomes an element of its own.
        assert_eq!(
            parse(r#"TaskRooAuth realm="a,b",tokenKey="T""#),
            Err(HeaderError::MissingSeparator { position: 1 })
        );
    }

    #[test]
    fn opaque_header_bytes_are_rejected() {
        let value = HeaderValue::from_bytes(b"TaskRooAuth tokenKey=\"\xfa\"").unwrap();
        assert_eq!(parse_header_value(&value), Err(HeaderError::NotVisibleAscii));
    }
}

//! Short recipe links (`/s/<token>/`).

use uuid::Uuid;

use crate::error::ShortLinkError;

pub const TOKEN_LEN: usize = 5;
pub const MAX_ATTEMPTS: usize = 32;

/// Random 5-character lowercase hex token.
pub fn generate_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(TOKEN_LEN);
    token
}

pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Generate tokens until `taken` reports one as free.
///
/// `taken` is usually a uniqueness lookup against storage; its errors are
/// passed through unchanged.
pub fn allocate<F, E>(mut taken: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<bool, E>,
    E: From<ShortLinkError>,
{
    for _ in 0..MAX_ATTEMPTS {
        let token = generate_token();
        if !taken(&token)? {
            return Ok(token);
        }
    }
    Err(ShortLinkError::Exhausted(MAX_ATTEMPTS).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, PartialEq)]
    enum TestError {
        ShortLink(ShortLinkError),
        Storage,
    }

    impl From<ShortLinkError> for TestError {
        fn from(e: ShortLinkError) -> Self {
            TestError::ShortLink(e)
        }
    }

    #[test]
    fn test_token_shape() {
        for _ in 0..100 {
            let token = generate_token();
            assert!(is_valid_token(&token), "bad token {}", token);
            assert_eq!(token, token.to_lowercase());
        }
    }

    #[test]
    fn test_is_valid_token() {
        assert!(is_valid_token("a1b2c"));
        assert!(!is_valid_token("a1b2"));
        assert!(!is_valid_token("zzzzz"));
    }

    #[test]
    fn test_allocate_retries_on_collision() {
        let mut seen = HashSet::new();
        let mut calls = 0;
        let token = allocate::<_, TestError>(|candidate| {
            calls += 1;
            seen.insert(candidate.to_string());
            // First two candidates are "taken"
            Ok(calls <= 2)
        })
        .unwrap();
        assert_eq!(calls, 3);
        assert!(seen.contains(&token));
    }

    #[test]
    fn test_allocate_gives_up() {
        let result = allocate::<_, TestError>(|_| Ok(true));
        assert_eq!(
            result,
            Err(TestError::ShortLink(ShortLinkError::Exhausted(MAX_ATTEMPTS)))
        );
    }

    #[test]
    fn test_allocate_propagates_storage_errors() {
        let result = allocate::<_, TestError>(|_| Err(TestError::Storage));
        assert_eq!(result, Err(TestError::Storage));
    }
}

/// Session token generation and cookie handling
///
/// Authentication state is a server-side session keyed by an opaque cookie.
/// The client-held token is random base62 with a short prefix; the server
/// stores only its SHA-256 hash, so a leaked sessions table does not leak
/// usable tokens.
///
/// # Token Format
///
/// `tbs_{40_chars}` - prefix + 40 random alphanumeric chars
/// (key space 62^40, well beyond brute force).
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::session::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert!(token.starts_with("tbs_"));
/// assert_eq!(hash, hash_session_token(&token));
/// assert_eq!(hash.len(), 64);
/// ```
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the session token (characters)
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Session token prefix
const TOKEN_PREFIX: &str = "tbs_";

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sid";

/// Generates a new session token
///
/// Returns a tuple of (plaintext_token, sha256_hash). The plaintext goes
/// into the cookie; only the hash is persisted.
pub fn generate_session_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_session_token(&token);

    (token, hash)
}

/// Generates a random alphanumeric string (base62)
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a session token using SHA-256
///
/// Returns the hex-encoded hash (64 characters), the storage key of the
/// sessions table.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Builds the Set-Cookie value establishing a session
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// Builds the Set-Cookie value clearing the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extracts the session token from a Cookie header value
///
/// Handles multiple cookies in one header (`a=1; sid=tbs_...; b=2`).
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token_format() {
        let (token, hash) = generate_session_token();

        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH);
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_session_token(&token));
    }

    #[test]
    fn test_generate_session_token_unique() {
        let (token1, _) = generate_session_token();
        let (token2, _) = generate_session_token();

        assert_ne!(token1, token2);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_session_token("tbs_abc"), hash_session_token("tbs_abc"));
        assert_ne!(hash_session_token("tbs_abc"), hash_session_token("tbs_abd"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tbs_token", 86400);

        assert!(cookie.starts_with("sid=tbs_token;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[test]
    fn test_clear_session_cookie() {
        let cookie = clear_session_cookie();

        assert!(cookie.starts_with("sid=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(token_from_cookie_header("sid=tbs_abc"), Some("tbs_abc"));
        assert_eq!(
            token_from_cookie_header("theme=dark; sid=tbs_abc; lang=en"),
            Some("tbs_abc")
        );
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("sid="), None);
        assert_eq!(token_from_cookie_header(""), None);
    }
}

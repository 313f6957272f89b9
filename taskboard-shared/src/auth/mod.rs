/// Authentication utilities
///
/// - `password`: Argon2id hashing and constant-time verification
/// - `session`: opaque session tokens and cookie handling
/// - `middleware`: the authenticated-request context extracted by the API
pub mod middleware;
pub mod password;
pub mod session;

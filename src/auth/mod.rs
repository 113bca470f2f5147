/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: Signed session token issuance and verification
/// - [`middleware`]: Bearer-token layer guarding the task routes
///
/// Tokens are bearer credentials: any holder is treated as the identified
/// user, with no additional binding such as IP or device checks.

pub mod jwt;
pub mod middleware;
pub mod password;

/// Authentication primitives
///
/// - `jwt`: Signed identity token issuance and verification
/// - `password`: Argon2id password hashing and verification

pub mod jwt;
pub mod password;

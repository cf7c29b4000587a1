/// Request middleware
///
/// - `auth`: bearer-token authorization gate

pub mod auth;

// Account registration, login and bearer-token authentication.

pub mod accounts;
pub mod extractor;
pub mod handlers;
pub mod password;
pub mod tokens;

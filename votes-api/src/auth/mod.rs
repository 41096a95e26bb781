//! Bearer token authentication for the votes API.
mod jwt;

pub use jwt::{AuthError, Claims, JwtValidator, voter_from_headers};

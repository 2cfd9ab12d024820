//! Authentication
//!
//! JWT validation, the authenticated-user context and the middleware
//! that guards `/api/` routes.

mod extractor;
mod jwt;
mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{require_admin, require_auth};

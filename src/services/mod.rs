pub mod auth_service;
pub mod email;

pub use auth_service::{AuthError, AuthService, SessionUser};
pub use email::{EmailError, Mailer};

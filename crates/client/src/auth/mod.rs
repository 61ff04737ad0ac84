// Authentication: token storage, refresh, and the provider trait the
// orchestrator consumes

pub mod service;
pub mod traits;
pub mod types;

pub use service::{AuthError, AuthService};
pub use traits::AccessTokenProvider;
pub use types::TokenSet;

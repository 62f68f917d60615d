//! Application Layer
//!
//! Use cases of the session/token issuer.

pub mod config;
pub mod issue_tokens;
pub mod login;
pub mod oauth_login;
pub mod refresh;
pub mod refresh_cookie;
pub mod register;

pub use config::AuthConfig;
pub use issue_tokens::{AuthOutput, TokenIssuer};
pub use login::{LoginInput, LoginUseCase};
pub use oauth_login::OAuthLoginUseCase;
pub use refresh::RefreshUseCase;
pub use refresh_cookie::{attach_refresh_cookie, clear_refresh_cookie, read_refresh_cookie};
pub use register::{RegisterInput, RegisterUseCase};

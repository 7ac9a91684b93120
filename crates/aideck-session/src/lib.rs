//! AIDeck Session Management
//!
//! - A Session is a named snapshot of the embedded browser's cookies
//! - Sessions persist to `sessions.json` in insertion order
//! - Saving requires at least one cookie; an empty save is a no-op
//! - Restoring clears the cookie jar, then installs every stored cookie
//! - `__Secure-` and `__Host-` cookies are normalised before install

mod cookie;
mod error;
mod jar;
mod manager;
mod session;

pub use cookie::{Cookie, CookieInstall, SameSite, HOST_PREFIX, SECURE_PREFIX};
pub use error::SessionError;
pub use jar::{CookieInstallError, CookieJar, CookieJarError, RestoreReport};
pub use manager::{SessionStore, DEFAULT_SESSION};
pub use session::{Session, SessionMap};

pub type Result<T> = std::result::Result<T, SessionError>;

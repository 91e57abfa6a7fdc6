// handlers/protected/mod.rs - endpoints behind the password or token middleware

pub mod session; // POST /login, GET /me, GET /logout

pub use session::{login_post, logout_get, me_get};

// handlers/public/mod.rs - endpoints that require no credentials

pub mod diagnostics; // GET /hello, /plaintext, /info, /description, /health
pub mod register;    // POST /users

pub use diagnostics::{describe_request, health, hello, plaintext};
pub use register::register_post;

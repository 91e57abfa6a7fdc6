// handlers/mod.rs - request handlers grouped by the credentials they require
//
// public    - no authentication (diagnostics, registration)
// protected - behind the password (login) or token (me, logout) middleware
// resource  - generic CRUD controller; the router decides which instances are guarded

pub mod protected;
pub mod public;
pub mod resource;

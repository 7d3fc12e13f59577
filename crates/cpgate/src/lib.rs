//! cpgate: a local proxy for the Check Point management API and a console
//! that drives it.
//!
//! `server` exposes the proxy over HTTP; `remote` is the console's HTTP
//! client for it.

pub mod remote;
pub mod server;

pub use remote::HttpBackend;
pub use server::{router, serve};

//! HTTP middleware: session layer and authentication extractors.

pub mod auth;
pub mod session;

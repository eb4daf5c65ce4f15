//! API exposures
//!
//! An exposure consumes a `ServerHost` and produces a router for one protocol.

pub mod rest;

pub use rest::RestExposure;

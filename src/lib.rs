//! tikicrawl library
//!
//! Exposes the product model, the Tiki client, the cache stores and the HTTP
//! server so the binary and the integration tests share them.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod printer;
pub mod products;
pub mod server;

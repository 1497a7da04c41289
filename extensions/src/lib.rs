//! Parses and emits the TLS extension blocks named in `spec.md` §4.3:
//! ClientHello extension recognition/validation, and ServerHello
//! extension emission including the CryptoPro compatibility blob and the
//! F5 "danger zone" padding workaround.

mod client_hello;
mod error;
mod server_hello;
pub mod types;

pub use client_hello::{ParsedExtensions, SignatureAlgorithm};
pub use error::{ExtensionError, Result};
pub use server_hello::ServerHelloExtensions;

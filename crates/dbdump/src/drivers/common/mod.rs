//! Pieces shared by the catalog drivers.

pub mod tls;

pub use tls::{SslMode, TlsBuilder};

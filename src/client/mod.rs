//! HTTP-facing pieces: the validation probe and client construction.

mod network;
mod validation;

pub use network::{HttpClientConfig, ProxyConfig};
pub use validation::ValidationRequest;

//! Shared mocks for integration tests

pub mod configs;
pub mod gated_server;
pub mod test_server;

#[allow(unused_imports)]
pub use gated_server::GatedResourceServer;
#[allow(unused_imports)]
pub use test_server::TestServer;

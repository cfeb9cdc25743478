//! Stablepay API
//!
//! axum router and handlers exposing the relay core over HTTP.

pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

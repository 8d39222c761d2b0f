//! Asmodeus terminal gateway.
//!
//! Keeps one working session per terminal id and exposes the command
//! processor over a small JSON HTTP API.

pub mod protocol;
pub mod server;
pub mod session_registry;
pub mod terminal;

pub use server::{GatewayState, build_router, start_server};
pub use session_registry::SessionRegistry;
pub use terminal::TerminalHost;

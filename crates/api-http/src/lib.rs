// Gridsim HTTP Surface
//
// Dashboard, status API, rate control and the SSE push channel. The
// controller is an opaque collaborator reached only through its snapshot
// and rate operations.

pub mod dashboard;
pub mod handlers;
pub mod server;
pub mod stream;
pub mod types;

pub use server::{app_state, router, serve, AppState, HttpServerConfig};

// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive flow.
//
// Module responsibilities:
// - `api`: the Portainer client; one method per REST endpoint, all
//   funneled through a single low-level request helper.
// - `error`: typed error kinds surfaced by the client.
// - `ui`: terminal menu flows that compose `api` calls into a stack
//   deployment task.

pub mod api;
pub mod error;
pub mod ui;

pub use api::PortainerClient;
pub use error::{ApiError, ApiResult};

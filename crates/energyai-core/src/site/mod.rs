//! Static file server for the course web pages.
//!
//! Serves a directory over HTTP with a fixed extension-to-MIME table.
//! `/` maps to `/index.html`; missing files and any path containing `..`
//! get a 404 page, other read failures a 500 page.

mod mime;
pub mod server;

pub use mime::content_type_for;
pub use server::{build_router, start_server, ServerError};

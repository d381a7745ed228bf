// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod drill;
pub mod feed;
pub mod letter;
pub mod record;
pub mod recovery;
pub mod runtime;
pub mod session;
pub mod unit;
pub mod util;
pub mod viewport;
pub mod wrap;

//! Filesystem adapters built on `cap_std`.
//!
//! - [`CapStdPluginWorkspace`] publishes generated plugins atomically and
//!   packages them as zip archives.
//! - [`CapStdCodeFileStore`] reads, writes and backs up individual files for
//!   injection, export and patching.
//!
//! All blocking I/O runs on the tokio blocking pool.

mod archive;
mod code_file_store;
mod plugin_workspace;

pub use code_file_store::CapStdCodeFileStore;
pub use plugin_workspace::CapStdPluginWorkspace;

//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the registry core and an
//! external system (git, credentials, host context, repository folders).
//! Implementations live in `src/adapters/` and `src/folder.rs`.

pub mod context_sink;
pub mod credentials;
pub mod folder;
pub mod git;

pub use context_sink::ContextSink;
pub use credentials::{CredentialFuture, CredentialStore, Session};
pub use folder::FolderManager;
pub use git::{GitRemote, GitRepo};

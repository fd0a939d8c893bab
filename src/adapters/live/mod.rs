//! Live adapters for real external interactions.

pub mod context_sink;
pub mod credentials;
pub mod git;

pub use context_sink::MemoryContextSink;
pub use credentials::LiveCredentialStore;
pub use git::LiveGitRepo;

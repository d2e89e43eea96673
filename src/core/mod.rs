pub mod error;
pub mod vcs;

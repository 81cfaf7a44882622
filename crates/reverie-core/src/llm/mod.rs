//! Generation collaborator trait.

pub mod provider;

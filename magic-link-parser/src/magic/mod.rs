//! Main module for magic link functionality

pub mod handlers;
pub mod matcher;
pub mod options;
pub mod overrides;
pub mod record;
pub mod resolver;
pub mod rule;
pub(crate) mod urls;

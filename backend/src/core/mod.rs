//! Forensic Lab Core
//!
//! Analysis pipeline and its building blocks: workspace lifecycle, metadata
//! extraction, keyframe sampling, match search and report assembly.

pub mod config;
pub mod keyframes;
pub mod matching;
pub mod metadata;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod tools;
pub mod workspace;

mod error;
pub use error::*;

#[cfg(all(test, unix))]
mod test_support;

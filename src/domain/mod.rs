//! Domain models for userchrome-loader
//!
//! This module contains pure domain objects: the browser profile being modified,
//! the directives found in its root stylesheet, and the metadata recorded for
//! every installed bundle.

pub mod bundle;
pub mod directive;
pub mod profile;

pub use bundle::BundleMetadata;
pub use directive::Directive;
pub use profile::{Profile, ProfileAccessor};

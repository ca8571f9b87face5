//! Data-driven trait content and loaders.
//!
//! Decodes the asset files the trait system is configured from:
//! - Trait definitions (`traits.json`, or RON)
//! - Character classes (`characterclasses.json`, or RON)
//! - Scheduler tuning (TOML)
//!
//! Loaders hand back plain `trait-core` values; installing them into the
//! registries is the runtime's job.

pub mod loaders;

pub use loaders::{
    ClassLoader, ConfigLoader, ContentBundle, LoadResult, TraitLoader, load_content_dir,
};

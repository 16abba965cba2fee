//! Generates Big Globe compatibility datapacks from the ores other mods declare.
//!
//! Each mod archive is unpacked, its id read from `fabric.mod.json` or
//! `META-INF/mods.toml`, and its configured features scanned for modded ores
//! replacing vanilla blocks. The ores are rendered through JSON templates into
//! a datapack that is zipped into the output directory.

#![warn(
    missing_docs,
    missing_debug_implementations,
    nonstandard_style,
    clippy::complexity,
    clippy::style,
    clippy::suspicious
)]
#![deny(unsafe_code)]

pub mod config;
pub mod datapack;
pub mod discover;
pub mod error;
pub mod extract;
pub mod identity;
pub mod pipeline;
pub mod template;
pub mod util;
pub mod virtual_fs;

/// Re-exports of the types needed to run the generator.
pub mod prelude {
    #[doc(inline)]
    pub use crate::{
        config::Config,
        datapack::Datapack,
        discover::{discover_ores, Discovery, OreDescriptor},
        error::{Error, Result},
        identity::{MetadataDialect, ModIdentity},
        pipeline::{process_archive, run_batch, BatchReport},
        template::{Placeholder, Substitutions, TemplateKind, TemplateSet},
    };
}

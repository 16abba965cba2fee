//! Utility functions for the compat datapack generator.

mod work_dir;

#[doc(inline)]
pub use work_dir::WorkDir;

// src/config/mod.rs

//! Environment file loading and validation.
//!
//! - `model.rs` holds the TOML-backed raw model and the resolved tree.
//! - `loader.rs` reads files and renders the resolved tree for `dump`.
//! - `validate.rs` resolves raw into validated form.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{dump_to_string, load_and_validate, load_from_path, load_from_str};
pub use model::{Environment, Profile, RawEnvironment, RawProfile, RawWorker, Script, Worker};

//! sub-export library
//!
//! Model import and SUB/JSON export, usable both from the `sub-export`
//! binary and from other tools and tests.

pub mod document;
pub mod export;
pub mod import;
pub mod model;

pub use export::{write_json, write_materials, write_sub};
pub use import::{read_model, Importer};
pub use model::{Aabb, Material, Model, Origin, Part};

//! Model importers (glTF/GLB, OBJ, JSON)

mod gltf;
mod json;
mod obj;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::model::Model;

pub use self::gltf::GltfImporter;
pub use self::json::JsonImporter;
pub use self::obj::ObjImporter;

/// Error at the import boundary, before a concrete importer takes over
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unsupported model format: {0:?} (use .gltf, .glb, .obj, or .json)")]
    UnsupportedFormat(PathBuf),
}

/// One source format's reader
pub trait Importer {
    fn read(&self, input: &Path) -> Result<Model>;
}

/// Sniff the file extension and read the model with the matching importer
pub fn read_model(input: &Path) -> Result<Model> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "gltf" | "glb" => GltfImporter.read(input),
        "obj" => ObjImporter.read(input),
        "json" => JsonImporter.read(input),
        _ => Err(ImportError::UnsupportedFormat(input.to_path_buf()).into()),
    }
}

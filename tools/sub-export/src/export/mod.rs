//! Model exporters (SUB binary, plain JSON)

pub mod json;
pub mod sub;

pub use json::{write_json, write_materials};
pub use sub::write_sub;

pub mod class_key;
pub mod json_array;

pub use class_key::*;
pub use json_array::*;

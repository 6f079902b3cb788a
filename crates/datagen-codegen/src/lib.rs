//! C code generation engine for synthesizer lookup tables.
//!
//! This crate turns dynamically-shaped [`Value`] trees into C source text:
//!
//! - [`ctypes`] maps scalar kinds to C type names and literal formats
//! - [`convert`] narrows or widens values to a requested scalar type
//! - [`stringify`] renders values as C initializers and infers their shape
//! - [`emit`] accumulates includes, macros and data declarations into a header
//!
//! # Example
//!
//! ```
//! use datagen_codegen::{Header, Value};
//!
//! let mut header = Header::new();
//! header.add_include("stdint.h", true);
//! header.add_data("steps", Value::from(vec![1u16, 2, 3]), vec![], None);
//!
//! let text = header.render().unwrap();
//! assert!(text.contains("static const uint16_t steps[3] = {"));
//! assert!(text.contains("#define steps_len 3"));
//! ```

pub mod convert;
pub mod ctypes;
pub mod emit;
pub mod error;
pub mod naming;
pub mod stringify;
pub mod value;

pub use emit::{apply_string_width, Header};
pub use error::{CodegenError, CodegenResult};
pub use stringify::{stringify, stringify_value, Stringified};
pub use value::{KindFamily, Record, ScalarKind, Value};

//! Declaration emitters.
//!
//! A [`Header`] accumulates includes, macros and data declarations in three
//! append-only lists and serializes them into a C header.

mod data;
mod header;
mod include;
mod macros;

pub use data::apply_string_width;
pub(crate) use data::DataList;
pub use header::{Header, GENERATED_BANNER};
pub(crate) use include::IncludeList;
pub(crate) use macros::MacroList;

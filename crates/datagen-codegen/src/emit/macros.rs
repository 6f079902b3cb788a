use std::io::Write;

use crate::ctypes::check_finite;
use crate::error::{CodegenError, CodegenResult};
use crate::stringify::stringify_value;
use crate::value::Value;

/// One `#define` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    pub identifier: String,
    pub value: Option<Value>,
    /// Render integers as fixed-width hex.
    pub hex: bool,
    /// Render the value's plain text, without quoting or hex.
    pub raw: bool,
}

impl Macro {
    fn render(&self) -> CodegenResult<String> {
        let value = self.value.as_ref().ok_or(CodegenError::NullValue)?;
        if !self.raw {
            return stringify_value(value, self.hex);
        }
        if !value.is_scalar() {
            return Err(CodegenError::UnsupportedType {
                kind: value.shape_name(),
            });
        }
        check_finite(value)?;
        Ok(value.to_string())
    }
}

/// Ordered macro list.
#[derive(Debug, Default)]
pub struct MacroList {
    entries: Vec<Macro>,
}

impl MacroList {
    pub fn add(
        &mut self,
        identifier: impl Into<String>,
        value: impl Into<Option<Value>>,
        hex: bool,
        raw: bool,
    ) {
        self.entries.push(Macro {
            identifier: identifier.into(),
            value: value.into(),
            hex,
            raw,
        });
    }

    pub fn write<W: Write>(&self, w: &mut W) -> CodegenResult<()> {
        if !self.entries.is_empty() {
            writeln!(w)?;
        }
        for mac in &self.entries {
            writeln!(w, "#define {} {}", mac.identifier, mac.render()?)?;
        }
        Ok(())
    }
}

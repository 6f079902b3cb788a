use std::io::Write;

use super::{DataList, IncludeList, MacroList};
use crate::error::CodegenResult;
use crate::value::Value;

/// Comment line opening every generated header.
pub const GENERATED_BANNER: &str = "// Code generated by \"synth-datagen\"; DO NOT EDIT.";

/// A generated C header under construction.
#[derive(Debug, Default)]
pub struct Header {
    includes: IncludeList,
    macros: MacroList,
    data: DataList,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_include(&mut self, path: impl Into<String>, system: bool) {
        self.includes.add(path, system);
    }

    pub fn add_macro(
        &mut self,
        identifier: impl Into<String>,
        value: impl Into<Option<Value>>,
        hex: bool,
        raw: bool,
    ) {
        self.macros.add(identifier, value, hex, raw);
    }

    pub fn add_data(
        &mut self,
        identifier: impl Into<String>,
        value: impl Into<Option<Value>>,
        attributes: Vec<String>,
        width: Option<i32>,
    ) {
        self.data.add(identifier, value, attributes, width);
    }

    /// Writes the banner, the `#pragma once` guard, then includes, macros
    /// and data in insertion order.
    pub fn write<W: Write>(&self, w: &mut W) -> CodegenResult<()> {
        write!(w, "{}\n\n#pragma once\n", GENERATED_BANNER)?;
        self.includes.write(w)?;
        self.macros.write(w)?;
        self.data.write(w)?;
        Ok(())
    }

    /// Renders the header into a string.
    pub fn render(&self) -> CodegenResult<String> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        // Every fragment is built from `str` values.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodegenError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_header() {
        assert_eq!(
            Header::new().render().unwrap(),
            "// Code generated by \"synth-datagen\"; DO NOT EDIT.\n\n#pragma once\n"
        );
    }

    #[test]
    fn test_sections_in_order() {
        let mut header = Header::new();
        header.add_data("table", Value::from(vec![1u8, 2]), vec![], None);
        header.add_macro("SIZE", Value::UInt8(2), false, false);
        header.add_include("stdint.h", true);
        header.add_include("config.h", false);
        assert_eq!(
            header.render().unwrap(),
            concat!(
                "// Code generated by \"synth-datagen\"; DO NOT EDIT.\n",
                "\n",
                "#pragma once\n",
                "\n",
                "#include <stdint.h>\n",
                "#include \"config.h\"\n",
                "\n",
                "#define SIZE 2\n",
                "\n",
                "static const uint8_t table[2] = {\n",
                "    0x01, 0x02,\n",
                "};\n",
                "#define table_len 2\n",
            )
        );
    }

    #[test]
    fn test_write_propagates_errors() {
        let mut header = Header::new();
        header.add_macro("BAD", None::<Value>, false, false);
        assert!(matches!(header.render(), Err(CodegenError::NullValue)));
    }
}

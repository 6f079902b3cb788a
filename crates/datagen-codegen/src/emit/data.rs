use std::io::Write;

use crate::error::{CodegenError, CodegenResult};
use crate::stringify::stringify;
use crate::value::Value;

const STRING_CTYPE: &str = "char*";
const CONST_STRING_CTYPE: &str = "char* const";

/// One `static const` data declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub identifier: String,
    pub value: Option<Value>,
    /// Raw attribute strings placed between the declarator and `=`.
    pub attributes: Vec<String>,
    /// Fixed string width. Positive right-justifies, negative left-justifies.
    pub width: Option<i32>,
}

impl Data {
    fn render<W: Write>(&self, w: &mut W) -> CodegenResult<()> {
        let value = self.value.as_ref().ok_or(CodegenError::NullValue)?;

        let mut padded;
        let value = match self.width {
            Some(width) => {
                padded = value.clone();
                apply_string_width(&mut padded, width)?;
                &padded
            }
            None => value,
        };

        let out = stringify(value)?;
        let mut ctype = out.ctype;
        let mut dims = out.dims;
        if ctype == STRING_CTYPE {
            match self.width {
                Some(width) => {
                    ctype = "char".to_string();
                    dims.push(width.unsigned_abs() as usize);
                }
                // Pointer tables must be const to live in read-only sections.
                None => ctype = CONST_STRING_CTYPE.to_string(),
            }
        }

        let mut decl = format!("static const {} {}", ctype, self.identifier);
        for dim in &dims {
            decl.push_str(&format!("[{}]", dim));
        }
        decl.push(' ');
        if !self.attributes.is_empty() {
            decl.push_str(&self.attributes.join(" "));
            decl.push(' ');
        }
        write!(w, "\n{}= {};\n", decl, out.data)?;

        match dims.as_slice() {
            [] => {}
            [len] => writeln!(w, "#define {}_len {}", self.identifier, len)?,
            [rows, cols] => {
                writeln!(w, "#define {}_rows {}", self.identifier, rows)?;
                writeln!(w, "#define {}_cols {}", self.identifier, cols)?;
            }
            dims => {
                for (idx, dim) in dims.iter().enumerate() {
                    writeln!(w, "#define {}_len_{} {}", self.identifier, idx, dim)?;
                }
            }
        }
        Ok(())
    }
}

/// Ordered data declaration list.
#[derive(Debug, Default)]
pub struct DataList {
    entries: Vec<Data>,
}

impl DataList {
    pub fn add(
        &mut self,
        identifier: impl Into<String>,
        value: impl Into<Option<Value>>,
        attributes: Vec<String>,
        width: Option<i32>,
    ) {
        self.entries.push(Data {
            identifier: identifier.into(),
            value: value.into(),
            attributes,
            width,
        });
    }

    /// Writes every declaration in insertion order. Declarations written
    /// before a failing one stay in `w`.
    pub fn write<W: Write>(&self, w: &mut W) -> CodegenResult<()> {
        for data in &self.entries {
            data.render(w)?;
        }
        Ok(())
    }
}

/// Pads a string, or every string of a (possibly nested) sequence, to
/// exactly `|width|` bytes.
///
/// A positive width pads on the left, a negative width on the right. Other
/// values, including non-string sequence elements, are left untouched.
pub fn apply_string_width(value: &mut Value, width: i32) -> CodegenResult<()> {
    match value {
        Value::String(s) => {
            let w = width.unsigned_abs() as usize;
            let len = s.len();
            if len > w {
                return Err(CodegenError::WidthOverflow {
                    value: s.clone(),
                    len,
                    width: w,
                });
            }
            let padding = " ".repeat(w - len);
            if width < 0 {
                s.push_str(&padding);
            } else {
                s.insert_str(0, &padding);
            }
            Ok(())
        }
        Value::Sequence(items) => items
            .iter_mut()
            .try_for_each(|item| apply_string_width(item, width)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(list: &DataList) -> CodegenResult<String> {
        let mut buf = Vec::new();
        list.write(&mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    fn single(value: impl Into<Value>, attributes: &[&str], width: Option<i32>) -> CodegenResult<String> {
        let mut list = DataList::default();
        list.add(
            "v",
            value.into(),
            attributes.iter().map(|a| a.to_string()).collect(),
            width,
        );
        render(&list)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            single(42i32, &[], None).unwrap(),
            "\nstatic const int32_t v = 0x0000002a;\n"
        );
        assert_eq!(single(true, &[], None).unwrap(), "\nstatic const bool v = true;\n");
        assert_eq!(
            single("hello", &[], None).unwrap(),
            "\nstatic const char* const v = \"hello\";\n"
        );
    }

    #[test]
    fn test_one_dimension() {
        assert_eq!(
            single(vec![1i32, 2, 3], &[], None).unwrap(),
            "\nstatic const int32_t v[3] = {\n    0x00000001, 0x00000002, 0x00000003,\n};\n#define v_len 3\n"
        );
    }

    #[test]
    fn test_two_dimensions() {
        let got = single(vec![vec![1i32, 2], vec![3, 4]], &[], None).unwrap();
        assert!(got.contains("static const int32_t v[2][2] = {"));
        assert!(got.ends_with("};\n#define v_rows 2\n#define v_cols 2\n"));
    }

    #[test]
    fn test_three_dimensions() {
        let value = vec![vec![vec![1i32, 2], vec![3, 4]], vec![vec![5, 6], vec![7, 8]]];
        let got = single(value, &[], None).unwrap();
        assert!(got.contains("static const int32_t v[2][2][2] = {"));
        assert!(got.ends_with("#define v_len_0 2\n#define v_len_1 2\n#define v_len_2 2\n"));
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            single(1i32, &["__attr1__", "__attr2__"], None).unwrap(),
            "\nstatic const int32_t v __attr1__ __attr2__ = 0x00000001;\n"
        );
        assert!(single(vec![1i32, 2], &["__aligned__"], None)
            .unwrap()
            .contains("static const int32_t v[2] __aligned__ = {"));
    }

    #[test]
    fn test_string_width() {
        assert_eq!(
            single("hi", &[], Some(5)).unwrap(),
            "\nstatic const char v[5] = \"   hi\";\n#define v_len 5\n"
        );
        assert!(single("hi", &[], Some(-5)).unwrap().contains("\"hi   \""));
    }

    #[test]
    fn test_string_width_sequence() {
        let got = single(vec!["hi", "bye"], &[], Some(5)).unwrap();
        assert!(got.contains("static const char v[2][5] = {\n    \"   hi\", \"  bye\",\n};"));
        assert!(got.ends_with("#define v_rows 2\n#define v_cols 5\n"));
    }

    #[test]
    fn test_string_width_ignored_for_numbers() {
        assert_eq!(
            single(vec![1u8], &[], Some(4)).unwrap(),
            "\nstatic const uint8_t v[1] = {\n    0x01,\n};\n#define v_len 1\n"
        );
    }

    #[test]
    fn test_string_width_overflow() {
        let err = single("toolong", &[], Some(3)).unwrap_err();
        assert!(err.to_string().contains("width overflow"));
    }

    #[test]
    fn test_string_table_pointers_are_const() {
        let got = single(vec!["C-1", "C#-1"], &["PROGMEM"], None).unwrap();
        assert!(got.contains("static const char* const v[2] PROGMEM = {"));
    }

    #[test]
    fn test_string_width_counts_bytes() {
        let err = single("5\u{b5}s", &[], Some(-3)).unwrap_err();
        assert!(matches!(err, CodegenError::WidthOverflow { len: 4, width: 3, .. }));

        assert_eq!(
            single("\u{b5}s", &[], Some(4)).unwrap(),
            "\nstatic const char v[4] = \" \u{b5}s\";\n#define v_len 4\n"
        );
    }

    #[test]
    fn test_string_width_nested_sequence() {
        let err = single(vec![vec!["toolong"]], &[], Some(3)).unwrap_err();
        assert!(matches!(err, CodegenError::WidthOverflow { len: 7, .. }));

        let got = single(vec![vec!["a", "bc"], vec!["d", "e"]], &[], Some(-3)).unwrap();
        assert!(got.contains("static const char v[2][2][3] = {"));
        assert!(got.contains("\"a  \", \"bc \""));
    }

    #[test]
    fn test_partial_output_before_failure() {
        let mut list = DataList::default();
        list.add("a", Value::Int8(1), vec![], None);
        list.add("bad", None::<Value>, vec![], None);
        let mut buf = Vec::new();
        assert!(matches!(list.write(&mut buf), Err(CodegenError::NullValue)));
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "\nstatic const int8_t a = 0x01;\n"
        );
    }

    #[test]
    fn test_apply_string_width() {
        let mut value = Value::from("hi");
        apply_string_width(&mut value, -5).unwrap();
        assert_eq!(value, Value::from("hi   "));

        let mut value = Value::from("hi");
        apply_string_width(&mut value, 2).unwrap();
        assert_eq!(value, Value::from("hi"));

        let mut value = Value::from("toolong");
        assert!(matches!(
            apply_string_width(&mut value, 3),
            Err(CodegenError::WidthOverflow { len: 7, width: 3, .. })
        ));

        let mut value = Value::Sequence(vec![Value::from("a"), Value::Int8(1)]);
        apply_string_width(&mut value, 3).unwrap();
        assert_eq!(value, Value::Sequence(vec![Value::from("  a"), Value::Int8(1)]));
    }
}

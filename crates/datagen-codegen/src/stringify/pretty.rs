//! Line-wrapping layout of literal tokens.

/// Maximum line width of a wrapped token row, trailing space excluded.
pub const LINE_WIDTH: usize = 100;

/// Returns `depth * 4` spaces.
pub fn lpadding(depth: usize) -> String {
    " ".repeat(depth * 4)
}

/// Lays out literal tokens inside braces, indented by `depth`, wrapping
/// rows at [`LINE_WIDTH`].
///
/// A token that does not fit on a non-blank row starts a new row. A token
/// that does not fit even on a blank row is emitted alone on its own row.
pub fn dump_values(values: &[String], depth: usize) -> String {
    let mut rv = lpadding(depth) + "{";
    if values.is_empty() {
        return rv + "}";
    }
    rv.push('\n');

    let mut line = lpadding(depth + 1);
    for value in values {
        if line.len() + value.len() + 2 < LINE_WIDTH + 1 {
            line.push_str(value);
            line.push_str(", ");
        } else if line.trim().is_empty() {
            rv.push_str(&line);
            rv.push_str(value);
            rv.push_str(",\n");
            line = lpadding(depth + 1);
        } else {
            rv.push_str(line.trim_end());
            rv.push('\n');
            line = lpadding(depth + 1) + value + ", ";
        }
    }
    if !line.trim().is_empty() {
        rv.push_str(line.trim_end());
        rv.push('\n');
    }

    rv + &lpadding(depth) + "}"
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_lpadding() {
        assert_eq!(lpadding(0), "");
        assert_eq!(lpadding(2), "        ");
    }

    #[test]
    fn test_dump_values_empty() {
        assert_eq!(dump_values(&[], 0), "{}");
        assert_eq!(dump_values(&[], 2), "        {}");
    }

    #[test]
    fn test_dump_values_single() {
        assert_eq!(dump_values(&tokens(&["1"]), 0), "{\n    1,\n}");
        assert_eq!(dump_values(&tokens(&["1"]), 1), "    {\n        1,\n    }");
    }

    #[test]
    fn test_dump_values_wraps_at_line_width() {
        let values: Vec<String> = (1..=16).map(|v| format!("0x{:08x}", v)).collect();
        assert_eq!(
            dump_values(&values, 0),
            "{\n    0x00000001, 0x00000002, 0x00000003, 0x00000004, 0x00000005, 0x00000006, 0x00000007, 0x00000008,\n    0x00000009, 0x0000000a, 0x0000000b, 0x0000000c, 0x0000000d, 0x0000000e, 0x0000000f, 0x00000010,\n}"
        );
    }

    #[test]
    fn test_dump_values_long_token_gets_own_row() {
        let long = format!("\"{}\"", "a".repeat(129));
        let values = vec!["\"c\"".to_string(), long.clone(), "\"d\"".to_string()];
        assert_eq!(
            dump_values(&values, 1),
            format!("    {{\n        \"c\",\n        {},\n        \"d\",\n    }}", long)
        );
    }

    #[test]
    fn test_dump_values_rows_stay_within_width() {
        let values: Vec<String> = (0..500).map(|v| v.to_string()).collect();
        let text = dump_values(&values, 3);
        for line in text.lines() {
            assert!(line.len() <= LINE_WIDTH, "{:?}", line);
        }
    }
}

use super::pretty::{dump_values, lpadding};
use super::{stringify_at, TypeSpec};
use crate::ctypes;
use crate::error::{CodegenError, CodegenResult};
use crate::value::Value;

pub(super) fn stringify_sequence(
    items: &[Value],
    depth: usize,
    spec: &mut TypeSpec,
) -> CodegenResult<String> {
    match spec.dims.get(depth) {
        None => {
            if items.is_empty() {
                return Err(CodegenError::EmptyCannotInferType);
            }
            spec.dims.push(items.len());
        }
        Some(&expected) if expected != items.len() => {
            return Err(CodegenError::NonRectangular {
                depth,
                expected,
                found: items.len(),
            });
        }
        Some(_) => {}
    }

    // dims[depth] is set, so the sequence is not empty.
    let first = &items[0];
    if let Some(kind) = first.scalar_kind() {
        let desc = ctypes::by_kind(kind);
        spec.ctype = Some(desc.ctype);
        let values = items
            .iter()
            .filter(|item| item.scalar_kind() == Some(kind))
            .map(|item| ctypes::format(item, true))
            .collect::<CodegenResult<Vec<_>>>()?;
        return Ok(dump_values(&values, depth));
    }

    let mut rv = lpadding(depth) + "{\n";
    for item in items {
        if item.shape_name() != first.shape_name() {
            return Err(CodegenError::UnsupportedElementType {
                expected: first.shape_name(),
                found: item.shape_name(),
            });
        }
        rv.push_str(&stringify_at(item, depth + 1, spec)?);
        rv.push_str(",\n");
    }
    Ok(rv + &lpadding(depth) + "}")
}

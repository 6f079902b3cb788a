use super::pretty::{dump_values, lpadding};
use super::TypeSpec;
use crate::ctypes::{self, ScalarDescriptor};
use crate::naming::field_name_to_snake;
use crate::value::Record;

/// Renders a record through the frozen field layout of `spec`, freezing it
/// from this record when still empty.
///
/// Fields missing from the record, or whose kind differs from the frozen
/// one, are skipped.
pub(super) fn stringify_record(rec: &Record, depth: usize, spec: &mut TypeSpec) -> String {
    if spec.fields.is_empty() {
        spec.fields = rec
            .fields()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .scalar_kind()
                    .map(|kind| (name.clone(), ctypes::by_kind(kind)))
            })
            .collect();
    }

    let values: Vec<String> = spec
        .fields
        .iter()
        .filter_map(|(name, desc)| {
            let value = rec.get(name)?;
            if value.scalar_kind() != Some(desc.kind) {
                return None;
            }
            ctypes::format(value, true).ok()
        })
        .collect();
    dump_values(&values, depth)
}

/// Synthesizes an anonymous struct type from a field layout.
pub(super) fn struct_type(fields: &[(String, &'static ScalarDescriptor)]) -> String {
    let mut rv = String::from("struct {");
    if !fields.is_empty() {
        rv.push('\n');
    }
    for (name, desc) in fields {
        rv.push_str(&format!(
            "{}{} {};\n",
            lpadding(1),
            desc.ctype,
            field_name_to_snake(name)
        ));
    }
    rv + "}"
}

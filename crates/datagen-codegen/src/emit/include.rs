use std::io::Write;

use crate::error::CodegenResult;

/// One `#include` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub path: String,
    /// `<path>` when set, `"path"` otherwise.
    pub system: bool,
}

/// Ordered include list, unique by path.
#[derive(Debug, Default)]
pub struct IncludeList {
    entries: Vec<Include>,
}

impl IncludeList {
    /// Adds an include. A path already present keeps its position; a system
    /// include is downgraded to a local one, never the reverse.
    pub fn add(&mut self, path: impl Into<String>, system: bool) {
        let path = path.into();
        if let Some(existing) = self.entries.iter_mut().find(|inc| inc.path == path) {
            if existing.system && !system {
                existing.system = false;
            }
            return;
        }
        self.entries.push(Include { path, system });
    }

    pub fn write<W: Write>(&self, w: &mut W) -> CodegenResult<()> {
        if !self.entries.is_empty() {
            writeln!(w)?;
        }
        for inc in &self.entries {
            if inc.system {
                writeln!(w, "#include <{}>", inc.path)?;
            } else {
                writeln!(w, "#include \"{}\"", inc.path)?;
            }
        }
        Ok(())
    }
}

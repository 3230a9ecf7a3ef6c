use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// WGSL shipped with the crate.
pub const BATCH_WGSL: &str = include_str!("shaders/batch.wgsl");

/// Where the batch shader comes from.
///
/// Custom shaders must keep the built-in interface: `vs_main`/`fs_main`, vertex
/// locations 0 (position) and 1 (uv), and the group 0 bindings
/// (uniform, texture, sampler).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShaderSource {
    #[default]
    Builtin,
    /// WGSL file read at pipeline construction.
    File(PathBuf),
    /// WGSL text.
    Wgsl(String),
}

impl ShaderSource {
    /// Resolves the WGSL text.
    ///
    /// Only I/O failures are reported here; compilation errors surface through
    /// wgpu's validation when the module is created.
    pub fn load(&self) -> Result<Cow<'_, str>> {
        match self {
            ShaderSource::Builtin => Ok(Cow::Borrowed(BATCH_WGSL)),
            ShaderSource::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .with_context(|| format!("failed to read shader {}", path.display())),
            ShaderSource::Wgsl(src) => Ok(Cow::Borrowed(src.as_str())),
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            ShaderSource::Builtin => "mote batch shader",
            ShaderSource::File(_) => "mote batch shader (file)",
            ShaderSource::Wgsl(_) => "mote batch shader (inline)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_exposes_both_entry_points() {
        let src = ShaderSource::Builtin.load().unwrap();
        assert!(src.contains("fn vs_main"));
        assert!(src.contains("fn fs_main"));
    }

    #[test]
    fn inline_source_is_borrowed_verbatim() {
        let s = ShaderSource::Wgsl("// nothing".to_string());
        assert_eq!(s.load().unwrap(), "// nothing");
    }

    #[test]
    fn missing_file_reports_path() {
        let s = ShaderSource::File(PathBuf::from("/nonexistent/mote/batch.wgsl"));
        let err = s.load().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/mote/batch.wgsl"));
    }
}

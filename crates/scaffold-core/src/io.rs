use crate::error::Result;
use crate::types::WriteOutcome;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory,
/// creating parent directories as needed.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write a generated file. With `overwrite` false an existing file is left
/// as is.
pub fn write_generated(path: &Path, content: &str, overwrite: bool) -> Result<WriteOutcome> {
    let existed = path.exists();
    if existed && !overwrite {
        return Ok(WriteOutcome::Skipped);
    }
    atomic_write(path, content.as_bytes())?;
    Ok(if existed {
        WriteOutcome::Overwritten
    } else {
        WriteOutcome::Created
    })
}

/// Files directly under `dir` with the given extension, sorted by name.
/// A missing directory yields an empty list.
pub fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".cursor/rules/level1-core.mdc");
        atomic_write(&path, b"# Core").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Core");
    }

    #[test]
    fn write_generated_reports_outcome() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".cursorrules");
        assert_eq!(write_generated(&path, "one", true).unwrap(), WriteOutcome::Created);
        assert_eq!(write_generated(&path, "two", true).unwrap(), WriteOutcome::Overwritten);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn write_generated_skips_existing_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".cursorrules");
        std::fs::write(&path, "hand written").unwrap();
        assert_eq!(write_generated(&path, "new", false).unwrap(), WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hand written");
    }

    #[test]
    fn files_with_extension_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.mdc"), "").unwrap();
        std::fs::write(dir.path().join("a.mdc"), "").unwrap();
        std::fs::write(dir.path().join("manifest.json"), "{}").unwrap();
        let files = files_with_extension(dir.path(), "mdc").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mdc", "b.mdc"]);
        assert!(files_with_extension(&dir.path().join("missing"), "mdc").unwrap().is_empty());
    }
}

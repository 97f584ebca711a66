use crate::types::{CommandKind, RuleLevel};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Workspace layout
// ---------------------------------------------------------------------------

pub const CURSORRULES_FILE: &str = ".cursorrules";
pub const CURSOR_DIR: &str = ".cursor";
pub const RULES_DIR: &str = ".cursor/rules";
pub const COMMANDS_DIR: &str = ".cursor/commands";
pub const HOOKS_DIR: &str = ".cursor/hooks";
pub const RULES_MANIFEST: &str = ".cursor/rules/rules_manifest.json";
pub const COMMANDS_MANIFEST: &str = ".cursor/commands/commands_manifest.json";
pub const AGENTS_MD: &str = ".cursor/AGENTS.md";

pub const CONFIG_FILE: &str = "scaffold.yaml";

/// Files every generated workspace must contain.
pub const REQUIRED_FILES: &[&str] = &[CURSORRULES_FILE, RULES_MANIFEST, COMMANDS_MANIFEST];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn cursorrules_path(root: &Path) -> PathBuf {
    root.join(CURSORRULES_FILE)
}

pub fn rules_dir(root: &Path) -> PathBuf {
    root.join(RULES_DIR)
}

pub fn commands_dir(root: &Path) -> PathBuf {
    root.join(COMMANDS_DIR)
}

pub fn hooks_dir(root: &Path) -> PathBuf {
    root.join(HOOKS_DIR)
}

pub fn rule_path(root: &Path, level: RuleLevel) -> PathBuf {
    rules_dir(root).join(level.filename())
}

pub fn command_path(root: &Path, kind: CommandKind) -> PathBuf {
    commands_dir(root).join(kind.filename())
}

pub fn rules_manifest_path(root: &Path) -> PathBuf {
    root.join(RULES_MANIFEST)
}

pub fn commands_manifest_path(root: &Path) -> PathBuf {
    root.join(COMMANDS_MANIFEST)
}

pub fn agents_md_path(root: &Path) -> PathBuf {
    root.join(AGENTS_MD)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// `path` relative to `root` with forward slashes, for reports.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            rule_path(root, RuleLevel::Language),
            PathBuf::from("/tmp/proj/.cursor/rules/level4-language.mdc")
        );
        assert_eq!(
            command_path(root, CommandKind::Test),
            PathBuf::from("/tmp/proj/.cursor/commands/test-commands.mdc")
        );
        assert_eq!(
            rules_manifest_path(root),
            PathBuf::from("/tmp/proj/.cursor/rules/rules_manifest.json")
        );
    }

    #[test]
    fn relative_display() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            display_relative(root, &agents_md_path(root)),
            ".cursor/AGENTS.md"
        );
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RuleLevel
// ---------------------------------------------------------------------------

/// Rule files load from most general (core) to most specific (framework).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleLevel {
    Core,
    Architecture,
    ProjectType,
    Language,
    Framework,
}

impl RuleLevel {
    pub fn all() -> &'static [RuleLevel] {
        &[
            RuleLevel::Core,
            RuleLevel::Architecture,
            RuleLevel::ProjectType,
            RuleLevel::Language,
            RuleLevel::Framework,
        ]
    }

    /// 1-based level number.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleLevel::Core => "core",
            RuleLevel::Architecture => "architecture",
            RuleLevel::ProjectType => "project-type",
            RuleLevel::Language => "language",
            RuleLevel::Framework => "framework",
        }
    }

    pub fn filename(self) -> String {
        format!("level{}-{}.mdc", self.number(), self.as_str())
    }

    /// Context key whose value decides whether this level is generated.
    /// Core and architecture rules are always generated.
    pub fn gating_key(self) -> Option<&'static str> {
        match self {
            RuleLevel::Core | RuleLevel::Architecture => None,
            RuleLevel::ProjectType => Some("project_type"),
            RuleLevel::Language => Some("primary_language"),
            RuleLevel::Framework => Some("framework"),
        }
    }

    pub fn always_load(self) -> bool {
        self.gating_key().is_none()
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleLevel::Core => "Core rules and principles",
            RuleLevel::Architecture => "Architecture and design patterns",
            RuleLevel::ProjectType => "Project type-specific rules",
            RuleLevel::Language => "Language-specific rules",
            RuleLevel::Framework => "Framework-specific rules",
        }
    }
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleLevel {
    type Err = crate::error::ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "core" => Ok(RuleLevel::Core),
            "2" | "architecture" => Ok(RuleLevel::Architecture),
            "3" | "project-type" | "project_type" => Ok(RuleLevel::ProjectType),
            "4" | "language" => Ok(RuleLevel::Language),
            "5" | "framework" => Ok(RuleLevel::Framework),
            _ => Err(crate::error::ScaffoldError::UnknownRuleLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CommandKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Test,
    Build,
    Deploy,
    Docker,
}

impl CommandKind {
    pub fn all() -> &'static [CommandKind] {
        &[
            CommandKind::Test,
            CommandKind::Build,
            CommandKind::Deploy,
            CommandKind::Docker,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Test => "test",
            CommandKind::Build => "build",
            CommandKind::Deploy => "deploy",
            CommandKind::Docker => "docker",
        }
    }

    pub fn filename(self) -> String {
        format!("{}-commands.mdc", self.as_str())
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandKind::Test => "Run the project's test suite",
            CommandKind::Build => "Build the project",
            CommandKind::Deploy => "Deploy the project",
            CommandKind::Docker => "Build and run container images",
        }
    }

    /// Context key that must be set for the command file to be generated.
    /// Build commands are always generated.
    pub fn gating_key(self) -> Option<&'static str> {
        match self {
            CommandKind::Test => Some("testing_framework"),
            CommandKind::Build => None,
            CommandKind::Deploy => Some("deployment_type"),
            CommandKind::Docker => Some("containerization"),
        }
    }

    pub fn load_order(self) -> u8 {
        match self {
            CommandKind::Build => 1,
            CommandKind::Test => 2,
            CommandKind::Deploy => 3,
            CommandKind::Docker => 4,
        }
    }

    pub fn use_when(self) -> &'static str {
        match self {
            CommandKind::Test => "when testing_framework is present and not 'unknown'",
            CommandKind::Build => "always - build commands are needed for all projects",
            CommandKind::Deploy => "when deployment_type is present and not 'unknown'",
            CommandKind::Docker => "when Docker containerization is detected",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommandKind {
    type Err = crate::error::ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(CommandKind::Test),
            "build" => Ok(CommandKind::Build),
            "deploy" => Ok(CommandKind::Deploy),
            "docker" => Ok(CommandKind::Docker),
            _ => Err(crate::error::ScaffoldError::UnknownCommandKind(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WriteOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Overwritten,
    Skipped,
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteOutcome::Created => "created",
            WriteOutcome::Overwritten => "overwritten",
            WriteOutcome::Skipped => "skipped",
        })
    }
}

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
    Error,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
            CheckStatus::Skip => "skip",
            CheckStatus::Error => "error",
        })
    }
}

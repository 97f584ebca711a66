use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("unknown rule level '{0}': expected 1-5 or core, architecture, project-type, language, framework")]
    UnknownRuleLevel(String),

    #[error("unknown command kind '{0}': expected test, build, deploy or docker")]
    UnknownCommandKind(String),

    #[error("unknown condition: {0}")]
    UnknownCondition(String),

    #[error("missing placeholders in {file}: {}", missing.join(", "))]
    StrictRender { file: String, missing: Vec<String> },

    #[error("interview cancelled: {0}")]
    InterviewCancelled(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;

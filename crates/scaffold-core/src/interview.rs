use crate::context::{Context, ContextValue};
use crate::engine::TemplateEngine;
use crate::error::{Result, ScaffoldError};
use std::io::{BufRead, Write};

const RULE: &str = "============================================================";

/// `(label, value)` pairs shown as a numbered menu.
type Menu = &'static [(&'static str, &'static str)];

const PROJECT_TYPES: Menu = &[
    ("Microservices", "microservices"),
    ("Monorepo", "monorepo"),
    ("SPA (Single Page Application)", "spa"),
    ("API Server", "api"),
    ("Full-stack", "full_stack"),
    ("CLI Tool", "cli"),
    ("Other", "other"),
];

const LANGUAGES: Menu = &[
    ("Python", "python"),
    ("JavaScript", "javascript"),
    ("TypeScript", "typescript"),
    ("Go", "go"),
    ("Rust", "rust"),
    ("Java", "java"),
    ("Other", "other"),
];

const DEPLOYMENT_TYPES: Menu = &[
    ("Docker", "docker"),
    ("Kubernetes", "kubernetes"),
    ("Cloud (AWS/GCP/Azure)", "cloud"),
    ("Serverless", "serverless"),
    ("Local development only", "local"),
    ("Other", "other"),
];

/// Five-phase question flow that builds a project context from a human
/// answering on `input`.
///
/// End of input is treated as an empty answer everywhere except the project
/// name, where it cancels the interview.
pub struct Interview<R, W> {
    input: R,
    output: W,
    ctx: Context,
}

impl<R: BufRead, W: Write> Interview<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            ctx: Context::new(),
        }
    }

    /// Run every phase and return the normalized context.
    pub fn run(mut self, engine: &TemplateEngine) -> Result<Context> {
        writeln!(self.output, "Starting 5-phase interview for new project setup...")?;
        self.classification()?;
        self.tech_stack()?;
        self.constraints()?;
        self.workflow()?;
        self.confirmation()?;

        let ctx = engine.normalize(&self.ctx);
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "Interview completed. Collected {} context variables.", ctx.len())?;
        tracing::debug!(keys = ctx.len(), "interview finished");
        Ok(ctx)
    }

    // -----------------------------------------------------------------------
    // Phases
    // -----------------------------------------------------------------------

    fn classification(&mut self) -> Result<()> {
        self.heading("PHASE 1: Project Classification")?;

        let name = self
            .ask("What is the name of your project? ")?
            .ok_or_else(|| ScaffoldError::InterviewCancelled("end of input".to_string()))?;
        if name.is_empty() {
            return Err(ScaffoldError::InterviewCancelled(
                "project name is required".to_string(),
            ));
        }
        self.ctx.insert("project_name", name);

        let project_type = self.choose(
            "What type of project is this?",
            PROJECT_TYPES,
            "other",
            "project type",
        )?;
        self.ctx.insert("project_type", project_type);

        let language = self.choose(
            "What is the primary programming language?",
            LANGUAGES,
            "other",
            "primary language",
        )?;
        self.ctx.insert("primary_language", language);
        Ok(())
    }

    fn tech_stack(&mut self) -> Result<()> {
        self.heading("PHASE 2: Technology Stack & Architecture")?;

        writeln!(
            self.output,
            "\nWhat framework(s) are you using? (comma-separated, or press Enter to skip)"
        )?;
        let frameworks = split_list(&self.answer("Frameworks: ")?);
        let mut extras = Vec::new();

        if let Some(primary) = frameworks.first().map(|f| f.to_lowercase()) {
            let shown = crate::normalize::capitalize(&primary);
            match primary.as_str() {
                "fastapi" | "django" | "flask" => {
                    writeln!(self.output, "\n{shown} detected. Any specific configuration? (press Enter to skip)")?;
                    let config = self.answer("Configuration: ")?;
                    if !config.is_empty() {
                        extras.push(format!("{primary} config: {config}"));
                    }
                }
                "react" | "nextjs" | "vue" => {
                    writeln!(self.output, "\n{shown} detected. Using TypeScript? (yes/no, press Enter for no)")?;
                    if is_yes(&self.answer("TypeScript: ")?) {
                        extras.push("typescript".to_string());
                    }
                }
                "express" | "nestjs" => {
                    writeln!(self.output, "\n{shown} detected. Any specific middleware? (press Enter to skip)")?;
                    let middleware = self.answer("Middleware: ")?;
                    if !middleware.is_empty() {
                        extras.push(format!("middleware: {middleware}"));
                    }
                }
                _ => {}
            }
        }

        let project_type = self.ctx.text("project_type").unwrap_or_default().to_string();
        if matches!(project_type.as_str(), "microservices" | "monorepo") {
            writeln!(
                self.output,
                "\nWhat services/components does this project have? (comma-separated, or press Enter to skip)"
            )?;
            let services = split_list(&self.answer("Services: ")?);
            self.ctx.insert("services", services);
        }

        writeln!(
            self.output,
            "\nWhat ports will your services use? (comma-separated, or press Enter to skip)"
        )?;
        let mut ports = match parse_ports(&self.answer("Ports: ")?) {
            Some(ports) => ports,
            None => {
                writeln!(self.output, "Warning: Invalid port numbers, skipping.")?;
                tracing::warn!("invalid port list in interview answer");
                Vec::new()
            }
        };
        if ports.is_empty() {
            if let Some(port) = frameworks.first().and_then(|f| default_port(f)) {
                ports.push(port.to_string());
            }
        }
        self.ctx.insert("ports", ports);

        writeln!(self.output, "\nWhat is the architecture pattern? (press Enter for default)")?;
        writeln!(self.output, "Options: microservices, monolith, serverless, event-driven, etc.")?;
        let architecture = self.answer("Architecture: ")?;
        let architecture = if architecture.is_empty() {
            project_type
        } else {
            architecture
        };
        self.ctx.insert("architecture", architecture);

        if let Some(first) = frameworks.first() {
            self.ctx.insert("framework", first.clone());
        }
        if !extras.is_empty() {
            let mut technologies = frameworks.clone();
            technologies.extend(extras);
            self.ctx.insert("technologies", technologies);
        }
        self.ctx.insert("frameworks", frameworks);
        Ok(())
    }

    fn constraints(&mut self) -> Result<()> {
        self.heading("PHASE 3: Constraints & Requirements")?;

        let deployment = self.choose(
            "What is the deployment type?",
            DEPLOYMENT_TYPES,
            "local",
            "deployment type",
        )?;
        match deployment.as_str() {
            "docker" => self.ctx.insert("containerization", vec!["docker"]),
            "kubernetes" => self.ctx.insert("orchestration", vec!["kubernetes"]),
            _ => {}
        }
        self.ctx.insert("deployment_type", deployment);

        writeln!(self.output, "\nAny specific networking requirements? (press Enter to skip)")?;
        let networking = self.answer("Networking: ")?;
        self.ctx.insert("networking", or_default(networking, "standard"));

        writeln!(
            self.output,
            "\nWhat database(s) are you using? (comma-separated, or press Enter to skip)"
        )?;
        let databases = split_list(&self.answer("Databases: ")?);
        self.ctx.insert("databases", databases);

        writeln!(self.output, "\nAny specific constraints or requirements? (press Enter to skip)")?;
        let constraints = self.answer("Constraints: ")?;
        if !constraints.is_empty() {
            self.ctx.insert("constraints", constraints);
        }
        Ok(())
    }

    fn workflow(&mut self) -> Result<()> {
        self.heading("PHASE 4: Development Workflow & Standards")?;
        let language = self.ctx.text("primary_language").unwrap_or_default().to_string();
        let js_family = matches!(language.as_str(), "javascript" | "typescript");

        writeln!(self.output, "\nWhat coding standards do you follow? (press Enter for default)")?;
        let options = match language.as_str() {
            "python" => "PEP 8, Google Style, Black, etc.",
            _ if js_family => "Standard, Airbnb, Google, etc.",
            _ => "Standard, Google Style, etc.",
        };
        writeln!(self.output, "Options: {options}")?;
        let standards = self.answer("Coding standards: ")?;
        let default_standards = if language == "python" { "PEP 8" } else { "Standard" };
        self.ctx.insert("coding_standards", or_default(standards, default_standards));

        writeln!(self.output, "\nAny specific file organization preferences? (press Enter to skip)")?;
        let organization = self.answer("File organization: ")?;
        self.ctx.insert("file_organization", or_default(organization, "standard"));

        writeln!(self.output, "\nWhat testing framework are you using? (press Enter to skip)")?;
        let testing = self.answer("Testing framework: ")?;
        let default_testing = match language.as_str() {
            "python" => "pytest",
            _ if js_family => "jest",
            _ => "unknown",
        };
        self.ctx.insert("testing_framework", or_default(testing, default_testing));
        Ok(())
    }

    fn confirmation(&mut self) -> Result<()> {
        self.heading("PHASE 5: Confirmation & Examples")?;

        writeln!(self.output, "\n--- Recap of Project Information ---")?;
        for (label, key) in [
            ("Project Name", "project_name"),
            ("Project Type", "project_type"),
            ("Primary Language", "primary_language"),
            ("Frameworks", "frameworks"),
            ("Architecture", "architecture"),
            ("Deployment Type", "deployment_type"),
            ("Testing Framework", "testing_framework"),
        ] {
            let value = self
                .ctx
                .get(key)
                .filter(|v| !v.is_empty())
                .map(ContextValue::stringify)
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(self.output, "{label}: {value}")?;
        }
        writeln!(self.output, "{RULE}")?;

        let confirmed = is_yes(&self.answer("\nIs this information correct? (yes/no): ")?);
        if !confirmed {
            writeln!(self.output, "Please review and correct the saved context as needed.")?;
        }
        self.ctx.insert("confirmed", confirmed);

        writeln!(
            self.output,
            "\nWould you like to provide examples of correct/incorrect code? (yes/no)"
        )?;
        if is_yes(&self.answer("Provide examples: ")?) {
            writeln!(self.output, "Enter examples (press Enter twice to finish):")?;
            let mut lines: Vec<String> = Vec::new();
            while let Some(line) = self.read_line()? {
                if line.is_empty() {
                    if lines.is_empty() {
                        continue;
                    }
                    break;
                }
                lines.push(line);
            }
            if !lines.is_empty() {
                self.ctx.insert("examples", lines.join("\n"));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Prompt helpers
    // -----------------------------------------------------------------------

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.output, "\n{RULE}\n{title}\n{RULE}")?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt and read one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    fn answer(&mut self, prompt: &str) -> Result<String> {
        Ok(self.ask(prompt)?.unwrap_or_default())
    }

    /// Numbered menu. Unrecognized choices fall back to `fallback`; choosing
    /// `other` asks for free text, defaulting to `unknown`.
    fn choose(&mut self, question: &str, menu: Menu, fallback: &str, what: &str) -> Result<String> {
        writeln!(self.output, "\n{question}")?;
        for (i, (label, _)) in menu.iter().enumerate() {
            writeln!(self.output, "{}. {label}", i + 1)?;
        }
        let choice = self.answer(&format!("Enter choice (1-{}): ", menu.len()))?;
        let value = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| menu.get(i))
            .map_or(fallback, |(_, value)| *value);

        if value == "other" {
            let custom = self.answer(&format!("Please specify {what}: "))?;
            return Ok(or_default(custom, "unknown"));
        }
        Ok(value.to_string())
    }
}

fn split_list(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `None` when any entry is not a port number.
fn parse_ports(answer: &str) -> Option<Vec<String>> {
    split_list(answer)
        .into_iter()
        .map(|p| p.parse::<u16>().ok().map(|n| n.to_string()))
        .collect()
}

fn default_port(framework: &str) -> Option<u16> {
    match framework.to_lowercase().as_str() {
        "fastapi" | "django" => Some(8000),
        "react" | "nextjs" | "express" => Some(3000),
        _ => None,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "yes" | "y")
}

fn or_default(answer: String, default: &str) -> String {
    if answer.is_empty() {
        default.to_string()
    } else {
        answer
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Notebook-to-repository publishing.
//!
//! Publishing is a short saga: the repository is created first, then the
//! README is generated, the notebook payload fetched, and the three files
//! written. If anything fails after creation but before the first write, the
//! repository is deleted again so the caller is not left with an empty repo.
//! Once a file has been written the repository is kept, and the error names it.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::{take_chars, Notebook, ReadmeGenerator};
use crate::domain::{FileStore, NewRepository, SourceHost, TextGenerator};
use crate::error::ToolError;

const MAX_DESCRIPTION_CHARS: usize = 100;
const MAX_REPO_NAME_CHARS: usize = 100;

const GITIGNORE_TEMPLATE: &str = "\
# Byte-compiled / optimized files
__pycache__/
*.py[cod]

# Jupyter
.ipynb_checkpoints/

# Environments
.env
.venv/
venv/

# Data and model artifacts
*.csv
*.h5
*.pkl

# OS files
.DS_Store
Thumbs.db
";

/// Where a publish transaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    NotStarted,
    RepoCreated,
    ReadmeWritten,
    PayloadWritten,
    GitignoreWritten,
    Done,
    RolledBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    CreateRepo,
    WriteReadme,
    WritePayload,
    WriteGitignore,
}

impl PublishStep {
    fn resulting_state(self) -> PublishState {
        match self {
            PublishStep::CreateRepo => PublishState::RepoCreated,
            PublishStep::WriteReadme => PublishState::ReadmeWritten,
            PublishStep::WritePayload => PublishState::PayloadWritten,
            PublishStep::WriteGitignore => PublishState::GitignoreWritten,
        }
    }
}

/// Bookkeeping for one publish call.
#[derive(Debug, Clone)]
pub struct PublishTransaction {
    pub id: Uuid,
    pub repo_identifier: String,
    pub state: PublishState,
    pub steps_completed: Vec<PublishStep>,
    pub rollback_performed: bool,
}

impl PublishTransaction {
    fn new(repo_identifier: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            repo_identifier,
            state: PublishState::NotStarted,
            steps_completed: Vec::new(),
            rollback_performed: false,
        }
    }

    fn complete(&mut self, step: PublishStep) {
        self.steps_completed.push(step);
        self.state = step.resulting_state();
        info!(
            "📦 [{}] {} -> {:?}",
            self.id, self.repo_identifier, self.state
        );
    }

    /// Compensation only applies while nothing has been written yet.
    fn can_roll_back(&self) -> bool {
        self.state == PublishState::RepoCreated
    }
}

/// Input of [`PublishOrchestrator::publish`].
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub file_id: String,
    pub file_name: String,
    pub repo_name: String,
    pub description: Option<String>,
    pub is_private: bool,
}

/// What the caller gets back after a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReceipt {
    pub repo_name: String,
    pub repo_url: String,
    pub clone_url: String,
    pub ssh_url: String,
    pub owner: String,
    pub is_private: bool,
    pub files_uploaded: Vec<String>,
    pub created_at: String,
}

pub struct PublishOrchestrator<'a> {
    host: &'a dyn SourceHost,
    files: &'a dyn FileStore,
    generator: Option<&'a dyn TextGenerator>,
}

impl<'a> PublishOrchestrator<'a> {
    pub fn new(
        host: &'a dyn SourceHost,
        files: &'a dyn FileStore,
        generator: Option<&'a dyn TextGenerator>,
    ) -> Self {
        Self {
            host,
            files,
            generator,
        }
    }

    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, ToolError> {
        validate_repo_name(&request.repo_name)?;
        let description = sanitize_description(
            request
                .description
                .as_deref()
                .unwrap_or("Google Colab notebook"),
        );

        let owner = self
            .host
            .authenticated_user()
            .await
            .map_err(|e| ToolError::remote("Failed to resolve the GitHub user", &e))?;
        let full_name = format!("{}/{}", owner.login, request.repo_name);

        let existing = self
            .host
            .get_repository(&full_name)
            .await
            .map_err(|e| ToolError::remote("Failed to check for an existing repository", &e))?;
        if existing.is_some() {
            return Err(ToolError::validation(format!(
                "Repository '{}' already exists",
                full_name
            )));
        }

        let repo = self
            .host
            .create_repository(&NewRepository {
                name: request.repo_name.clone(),
                description,
                private: request.is_private,
            })
            .await
            .map_err(|e| ToolError::remote("Failed to create repository", &e))?;
        // The platform may normalize the name; later steps target what it created.
        let full_name = repo.full_name.clone();
        let mut tx = PublishTransaction::new(full_name.clone());
        tx.complete(PublishStep::CreateRepo);

        let readme = match self.generate_readme(request).await {
            Ok(readme) => readme,
            Err(err) => return Err(self.roll_back(&mut tx, err).await),
        };
        let payload = match self.files.download(&request.file_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = ToolError::remote("Failed to fetch notebook content", &e);
                return Err(self.roll_back(&mut tx, err).await);
            }
        };

        let payload_name = payload_file_name(&request.file_name);
        let uploads: [(PublishStep, &str, &[u8]); 3] = [
            (PublishStep::WriteReadme, "README.md", readme.as_bytes()),
            (PublishStep::WritePayload, payload_name.as_str(), payload.as_slice()),
            (
                PublishStep::WriteGitignore,
                ".gitignore",
                GITIGNORE_TEMPLATE.as_bytes(),
            ),
        ];
        let mut files_uploaded = Vec::new();
        for (step, path, content) in uploads {
            let message = format!("Add {}", path);
            if let Err(e) = self.host.put_file(&full_name, path, content, &message).await {
                warn!(
                    "Upload of {} failed; repository {} remains in state {:?}",
                    path, full_name, tx.state
                );
                return Err(ToolError::remote(
                    &format!(
                        "Failed to upload {} (repository {} was created and remains)",
                        path, full_name
                    ),
                    &e,
                ));
            }
            tx.complete(step);
            files_uploaded.push(path.to_string());
        }
        tx.state = PublishState::Done;
        info!("✅ Published {} to {}", request.file_name, repo.html_url);

        Ok(PublishReceipt {
            repo_name: repo.name,
            repo_url: repo.html_url,
            clone_url: repo.clone_url,
            ssh_url: repo.ssh_url,
            owner: repo.owner,
            is_private: repo.private,
            files_uploaded,
            created_at: repo
                .created_at
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        })
    }

    async fn generate_readme(&self, request: &PublishRequest) -> Result<String, ToolError> {
        let bytes = self
            .files
            .download(&request.file_id)
            .await
            .map_err(|e| ToolError::remote("Failed to read notebook for README generation", &e))?;
        let notebook = Notebook::parse(&request.file_name, &bytes)
            .map_err(|e| ToolError::remote("Failed to generate README", &e))?;
        Ok(ReadmeGenerator::new(self.generator)
            .generate(&notebook)
            .await
            .content)
    }

    /// Delete the just-created repository; returns the original error either way.
    async fn roll_back(&self, tx: &mut PublishTransaction, cause: ToolError) -> ToolError {
        if !tx.can_roll_back() {
            return cause;
        }
        warn!(
            "↩️  Rolling back {} after failure: {}",
            tx.repo_identifier, cause
        );
        match self.host.delete_repository(&tx.repo_identifier).await {
            Ok(()) => {
                tx.state = PublishState::RolledBack;
                tx.rollback_performed = true;
            }
            Err(e) => error!(
                "Failed to delete repository {} during rollback: {:#}",
                tx.repo_identifier, e
            ),
        }
        cause
    }
}

/// Repository names: 1 to 100 characters of `[A-Za-z0-9._-]`, not `.` or `..`.
pub fn validate_repo_name(name: &str) -> Result<(), ToolError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if name.is_empty()
        || name.chars().count() > MAX_REPO_NAME_CHARS
        || !valid_chars
        || name == "."
        || name == ".."
    {
        return Err(ToolError::validation(format!(
            "Invalid repository name '{}': use 1-{} letters, digits, '.', '_' or '-'",
            name, MAX_REPO_NAME_CHARS
        )));
    }
    Ok(())
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Single-line description the hosting platform accepts.
pub fn sanitize_description(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\r' | '\n'))
        .map(|c| if matches!(c, '\t' | '\r' | '\n') { ' ' } else { c })
        .collect();
    let collapsed = whitespace_run().replace_all(&cleaned, " ");
    take_chars(collapsed.trim(), MAX_DESCRIPTION_CHARS)
        .trim_end()
        .to_string()
}

fn payload_file_name(file_name: &str) -> String {
    if file_name.to_lowercase().ends_with(".ipynb") {
        file_name.to_string()
    } else {
        format!("{}.ipynb", file_name)
    }
}

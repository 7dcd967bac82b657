use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ResourceError;

pub const DEFAULT_KUBECTL: &str = "kubectl";

/// Applies and removes the external resources a case prepares.
#[async_trait]
pub trait ResourcePort: Send + Sync {
    async fn apply(&self, resource: &str) -> Result<(), ResourceError>;
    async fn delete(&self, resource: &str) -> Result<(), ResourceError>;
}

/// Shells out to `<program> apply|delete -f <resource>`.
#[derive(Debug, Clone)]
pub struct KubectlPort {
    program: String,
}

impl Default for KubectlPort {
    fn default() -> Self {
        Self::new(DEFAULT_KUBECTL)
    }
}

impl KubectlPort {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, action: &'static str, resource: &str) -> Result<(), ResourceError> {
        let command = format!("{} {} -f {}", self.program, action, resource);
        debug!("{}", command);
        let output = Command::new(&self.program)
            .args([action, "-f", resource])
            .kill_on_drop(true)
            .output()
            .await;
        let output = match output {
            Ok(output) => output,
            Err(err) => {
                return Err(ResourceError::Spawn {
                    command,
                    source: err,
                });
            }
        };
        if output.status.success() {
            return Ok(());
        }
        Err(ResourceError::Failed {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}

#[async_trait]
impl ResourcePort for KubectlPort {
    async fn apply(&self, resource: &str) -> Result<(), ResourceError> {
        self.run("apply", resource).await
    }

    async fn delete(&self, resource: &str) -> Result<(), ResourceError> {
        self.run("delete", resource).await
    }
}

/// Applies `resources` in order, stopping at the first failure.
pub(super) async fn apply_all(
    port: &dyn ResourcePort,
    resources: &[String],
) -> Result<(), ResourceError> {
    for resource in resources {
        port.apply(resource).await?;
    }
    Ok(())
}

/// Deletes `resources` in reverse order, stopping at the first failure.
pub(super) async fn delete_all(
    port: &dyn ResourcePort,
    resources: &[String],
) -> Result<(), ResourceError> {
    for resource in resources.iter().rev() {
        port.delete(resource).await?;
    }
    Ok(())
}

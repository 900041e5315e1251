//! Installing npm dependencies into a generated project
//!
//! Runs the detected package manager inside the project directory and streams
//! its output, the same way for runtime and dev packages.

use crate::codegen::project::Dependencies;
use crate::runtime::PackageManager;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for one install step (5 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Installs packages with one package manager in one directory
pub struct DependencyInstaller {
    manager: PackageManager,
    project_dir: PathBuf,
}

impl DependencyInstaller {
    pub fn new(manager: PackageManager, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            project_dir: project_dir.into(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Full command line for one install step
    pub fn install_command(&self, packages: &[&str], dev: bool) -> Vec<String> {
        let mut command = vec![self.manager.binary().to_string()];
        command.extend(self.manager.add_args(dev).into_iter().map(str::to_string));
        command.extend(packages.iter().map(|package| package.to_string()));
        command
    }

    /// Install runtime packages, then dev packages
    pub async fn install(&self, deps: &Dependencies) -> Result<()> {
        if !deps.runtime.is_empty() {
            self.run(&self.install_command(&deps.runtime, false)).await?;
        }
        if !deps.dev.is_empty() {
            self.run(&self.install_command(&deps.dev, true)).await?;
        }
        Ok(())
    }

    async fn run(&self, command: &[String]) -> Result<()> {
        let command_line = command.join(" ");
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("Empty install command"))?;

        println!();
        println!("{} {}", "Running:".dimmed(), command_line.yellow());
        println!();
        tracing::info!(
            command = %command_line,
            dir = %self.project_dir.display(),
            "installing packages"
        );

        let mut child = TokioCommand::new(program)
            .args(args)
            .current_dir(&self.project_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", program))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture stderr"))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        // Stream output until both pipes close
        let output_task = async {
            let mut stdout_done = false;
            let mut stderr_done = false;
            while !(stdout_done && stderr_done) {
                tokio::select! {
                    line = stdout_reader.next_line(), if !stdout_done => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => stdout_done = true,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                stdout_done = true;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if !stderr_done => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_done = true,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_done = true;
                            }
                        }
                    }
                }
            }
        };

        if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            anyhow::bail!(
                "Installation timed out after {} seconds.\n\
                 Please run it manually inside {}:\n\
                 {}",
                INSTALL_TIMEOUT.as_secs(),
                self.project_dir.display(),
                command_line
            );
        }

        match timeout(Duration::from_secs(5), child.wait()).await {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    anyhow::bail!(
                        "Installation failed with exit code: {}\n\
                         Please try installing manually: {}",
                        status.code().unwrap_or(-1),
                        command_line
                    );
                }
            }
            Ok(Err(e)) => anyhow::bail!("Failed to wait for {}: {}", program, e),
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "{} hung. Please try installing manually:\n{}",
                    program,
                    command_line
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_command_npm() {
        let installer = DependencyInstaller::new(PackageManager::Npm, "/tmp/app");
        assert_eq!(
            installer.install_command(&["react", "react-dom"], false),
            vec!["npm", "install", "react", "react-dom"]
        );
        assert_eq!(
            installer.install_command(&["webpack"], true),
            vec!["npm", "install", "-D", "webpack"]
        );
    }

    #[test]
    fn test_install_command_pnpm_dev() {
        let installer = DependencyInstaller::new(PackageManager::Pnpm, "/tmp/app");
        assert_eq!(
            installer.install_command(&["typescript"], true),
            vec!["pnpm", "add", "-D", "typescript"]
        );
    }

    #[tokio::test]
    async fn test_install_nothing_is_ok() {
        let installer = DependencyInstaller::new(PackageManager::Npm, "/nonexistent");
        let deps = Dependencies {
            runtime: vec![],
            dev: vec![],
        };
        installer.install(&deps).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_missing_program_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let installer = DependencyInstaller::new(PackageManager::Npm, dir.path());
        let command = vec![
            "kintone-create-no-such-binary".to_string(),
            "install".to_string(),
        ];
        let err = installer.run(&command).await.unwrap_err();
        assert!(err.to_string().contains("Failed to start kintone-create-no-such-binary"));
    }
}

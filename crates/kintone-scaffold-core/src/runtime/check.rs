//! Runtime detection for Node.js and JavaScript package managers

use std::fmt;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Run `<binary> --version` and report what came back
fn detect_version(binary: &str, name: &'static str) -> RuntimeInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    detect_version("node", "Node.js")
}

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Package managers in order of preference
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Arguments that add packages, before the package names
    pub fn add_args(&self, dev: bool) -> Vec<&'static str> {
        let mut args = match self {
            PackageManager::Npm => vec!["install"],
            PackageManager::Pnpm | PackageManager::Yarn | PackageManager::Bun => vec!["add"],
        };
        if dev {
            args.push(match self {
                PackageManager::Bun => "--dev",
                _ => "-D",
            });
        }
        args
    }

    /// Command used to build the generated project
    pub fn run_command(&self, script: &str) -> String {
        format!("{} run {}", self.binary(), script)
    }

    pub fn check(&self) -> RuntimeInfo {
        detect_version(self.binary(), self.binary())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

/// Detect the first available package manager
pub fn detect_package_manager() -> Option<PackageManager> {
    PackageManager::ALL
        .into_iter()
        .find(|manager| manager.check().available)
}

//! Command table owned by each detector system.
//!
//! Commands live under the directory `/gate/<system>/`. The ARF commands add
//! `arf/setARFStage`, which takes a stage name.

/// Commands a system messenger can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    /// `arf/setARFStage <stage>`
    SetArfStage,
}

impl SystemCommand {
    pub fn relative_path(self) -> &'static str {
        match self {
            SystemCommand::SetArfStage => "arf/setARFStage",
        }
    }

    pub fn guidance(self) -> &'static str {
        match self {
            SystemCommand::SetArfStage => {
                "Set the ARF stage: generateData, computeTables or useTables"
            }
        }
    }
}

/// Messenger of a single system.
#[derive(Debug, Clone)]
pub struct SystemMessenger {
    directory: String,
    guidance: String,
    commands: Vec<SystemCommand>,
}

impl SystemMessenger {
    pub fn new(system: &str) -> Self {
        Self {
            directory: format!("/gate/{}/", system),
            guidance: String::new(),
            commands: Vec::new(),
        }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    pub fn set_directory_guidance(&mut self, guidance: impl Into<String>) {
        self.guidance = guidance.into();
    }

    pub fn set_arf_commands(&mut self) {
        if !self.commands.contains(&SystemCommand::SetArfStage) {
            self.commands.push(SystemCommand::SetArfStage);
        }
    }

    /// Full paths of all installed commands.
    pub fn command_paths(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| format!("{}{}", self.directory, c.relative_path()))
            .collect()
    }

    /// Resolve a full (`/gate/head/arf/setARFStage`) or relative path.
    pub fn resolve(&self, path: &str) -> Option<SystemCommand> {
        let relative = path.strip_prefix(self.directory.as_str()).unwrap_or(path);
        self.commands
            .iter()
            .copied()
            .find(|c| c.relative_path() == relative)
    }
}

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use pyp_domain::ProjectLayout;

use crate::core::config::{Config, GlobalOptions};
use crate::core::runtime::effects::{ProcessRunner, SharedEffects};
use crate::core::runtime::CommandGroup;

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    config: Config,
    layout: ProjectLayout,
    effects: SharedEffects,
}

impl<'a> CommandContext<'a> {
    /// Creates a context rooted at the current working directory.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined.
    pub fn new(global: &'a GlobalOptions, effects: SharedEffects) -> Result<Self> {
        let root = env::current_dir().context("unable to determine current directory")?;
        Ok(Self::with_root(global, effects, root))
    }

    pub fn with_root(global: &'a GlobalOptions, effects: SharedEffects, root: PathBuf) -> Self {
        Self {
            global,
            config: Config::from_env(),
            layout: ProjectLayout::new(root),
            effects,
        }
    }

    pub fn shared_effects(&self) -> SharedEffects {
        self.effects.clone()
    }

    pub fn process(&self) -> &dyn ProcessRunner {
        self.effects.process()
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// `--python` wins over `PYP_PYTHON`.
    pub fn python_override(&self) -> Option<&str> {
        self.global
            .python
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .or_else(|| self.config.python())
    }
}

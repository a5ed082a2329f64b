use anyhow::{bail, Result};

use crate::wizard::tree::Role;

pub const USAGE: &str = "\
Usage: grapple [grappler|grappled|outside] [--no-tips] [--no-mechanics]

  role            Skip role selection and start in that role's tree
  --no-tips       Hide the tips list on each screen
  --no-mechanics  Hide the rules mechanics box

Logging: set RUST_LOG=info or RUST_LOG=debug for transition logs on stderr";

// ---------------------------------------------------------------------------
// Wizard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Role to start in. `None` opens on the role selector.
    pub start_role: Option<Role>,
    pub show_tips: bool,
    pub show_mechanics: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            start_role: None,
            show_tips: true,
            show_mechanics: true,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(WizardConfig),
    Help,
}

impl WizardConfig {
    /// Parse the program arguments, excluding the binary name.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Invocation> {
        let mut config = WizardConfig::default();

        for arg in args {
            match arg.as_ref() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "--no-tips" => config.show_tips = false,
                "--no-mechanics" => config.show_mechanics = false,
                flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n\n{USAGE}"),
                role => {
                    if config.start_role.is_some() {
                        bail!("only one role may be given\n\n{USAGE}");
                    }
                    match role.parse::<Role>() {
                        Ok(role) => config.start_role = Some(role),
                        Err(err) => bail!("{err}\n\n{USAGE}"),
                    }
                }
            }
        }

        Ok(Invocation::Run(config))
    }
}

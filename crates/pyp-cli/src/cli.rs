use clap::{ArgAction, Args, Parser, Subcommand};
use pyp_core::api::LICENSE_CHOICES;

#[derive(Parser, Debug)]
#[command(
    name = "pyp",
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    about = "A CLI tool to manage Python projects",
    long_about = "A command line interface built to manage Python projects the simple way: \
                  one virtual environment (.env), one manifest (pypconfig.toml), and named scripts."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct PypCli {
    #[arg(
        long,
        value_name = "PATH",
        help = "Python executable used to create and probe the environment (else PYP_PYTHON, python3, python)",
        global = true
    )]
    pub python: Option<String>,
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still set the exit code)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(about = "Print the pyp version")]
    Version,
    #[command(about = "Initialize a Python project: creates .env and pypconfig.toml")]
    Init(InitArgs),
    #[command(
        about = "Install packages, or everything pypconfig.toml declares when none are given",
        aliases = [
            "add", "i", "in", "ins", "inst", "insta", "instal", "isnt", "isnta", "isntal",
            "isntall",
        ]
    )]
    Install(InstallArgs),
    #[command(
        about = "Uninstall a package",
        aliases = ["unlink", "remove", "rm", "r", "un"]
    )]
    Uninstall(PackageArgs),
    #[command(about = "List installed packages")]
    List,
    #[command(about = "Check whether a package is installed")]
    Check(PackageArgs),
    #[command(
        about = "Upgrade a package to its latest version",
        aliases = ["up", "upgrade", "udpate"]
    )]
    Update(PackageArgs),
    #[command(
        about = "Run a script from the [scripts] table of pypconfig.toml",
        aliases = ["rn", "run", "rum", "urn"]
    )]
    RunScript(RunScriptArgs),
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    #[arg(long, help = "Project name")]
    pub name: Option<String>,
    #[arg(
        long = "version",
        id = "project_version",
        value_name = "VERSION",
        help = "Project version"
    )]
    pub project_version: Option<String>,
    #[arg(long, value_parser = LICENSE_CHOICES, help = "Project license")]
    pub license: Option<String>,
}

impl InitArgs {
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.project_version.is_some() && self.license.is_some()
    }
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    #[arg(value_name = "PACKAGE", help = "Requirement specs handed to pip install")]
    pub packages: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PackageArgs {
    #[arg(value_name = "PACKAGE")]
    pub package: String,
}

#[derive(Args, Debug)]
pub struct RunScriptArgs {
    #[arg(value_name = "SCRIPT", help = "Key in the [scripts] table")]
    pub script: String,
}

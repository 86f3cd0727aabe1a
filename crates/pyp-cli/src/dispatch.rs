use std::io::{self, BufRead, Write};

use atty::Stream;
use color_eyre::Result;
use pyp_core::api::{
    self as api, CheckRequest, CommandContext, CommandGroup, CommandInfo, ExecutionOutcome,
    InstallRequest, ProjectInitRequest, RunScriptRequest, ScaffoldArgs, UninstallRequest,
    UpdateRequest, DEFAULT_LICENSE, DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_VERSION,
    LICENSE_CHOICES,
};
use tracing::debug;

use crate::cli::{CommandGroupCli, InitArgs};

pub fn dispatch_command(
    ctx: &CommandContext,
    group: &CommandGroupCli,
) -> Result<(CommandInfo, ExecutionOutcome)> {
    match group {
        CommandGroupCli::Version => {
            let info = CommandInfo::new(CommandGroup::Version, "version");
            Ok((info, api::tool_version()))
        }
        CommandGroupCli::Init(args) => {
            let info = CommandInfo::new(CommandGroup::Init, "init");
            let request = project_init_request_from_args(ctx, args)?;
            core_call(info, || api::project_init(ctx, &request))
        }
        CommandGroupCli::Install(args) => {
            let info = CommandInfo::new(CommandGroup::Install, "install");
            let request = InstallRequest {
                packages: args.packages.clone(),
            };
            core_call(info, || api::package_install(ctx, &request))
        }
        CommandGroupCli::Uninstall(args) => {
            let info = CommandInfo::new(CommandGroup::Uninstall, "uninstall");
            let request = UninstallRequest {
                package: args.package.clone(),
            };
            core_call(info, || api::package_uninstall(ctx, &request))
        }
        CommandGroupCli::List => {
            let info = CommandInfo::new(CommandGroup::List, "list");
            core_call(info, || api::package_list(ctx))
        }
        CommandGroupCli::Check(args) => {
            let info = CommandInfo::new(CommandGroup::Check, "check");
            let request = CheckRequest {
                package: args.package.clone(),
            };
            core_call(info, || api::package_check(ctx, &request))
        }
        CommandGroupCli::Update(args) => {
            let info = CommandInfo::new(CommandGroup::Update, "update");
            let request = UpdateRequest {
                package: args.package.clone(),
            };
            core_call(info, || api::package_update(ctx, &request))
        }
        CommandGroupCli::RunScript(args) => {
            let info = CommandInfo::new(CommandGroup::RunScript, "run-script");
            let request = RunScriptRequest {
                script: args.script.clone(),
            };
            core_call(info, || api::run_script(ctx, &request))
        }
    }
}

/// Fills in missing `init` flags, prompting only when a new manifest will
/// actually be written and someone is at the terminal.
fn project_init_request_from_args(
    ctx: &CommandContext,
    args: &InitArgs,
) -> Result<ProjectInitRequest> {
    let prompt = !args.is_complete() && init_can_prompt(ctx) && !manifest_exists(ctx);
    let scaffold = if prompt {
        let mut input = io::stdin().lock();
        let name = match &args.name {
            Some(name) => name.clone(),
            None => ask(&mut input, "What is your project name?", DEFAULT_PROJECT_NAME)?,
        };
        let version = match &args.project_version {
            Some(version) => version.clone(),
            None => ask(
                &mut input,
                "What is your project version?",
                DEFAULT_PROJECT_VERSION,
            )?,
        };
        let license = match &args.license {
            Some(license) => license.clone(),
            None => ask_license(&mut input)?,
        };
        ScaffoldArgs {
            name,
            version,
            license,
        }
    } else {
        ScaffoldArgs {
            name: args
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            version: args
                .project_version
                .clone()
                .unwrap_or_else(|| DEFAULT_PROJECT_VERSION.to_string()),
            license: args
                .license
                .clone()
                .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
        }
    };
    Ok(ProjectInitRequest { scaffold })
}

fn manifest_exists(ctx: &CommandContext) -> bool {
    match api::project_readiness(ctx) {
        Ok(readiness) => readiness.manifest,
        Err(err) => {
            // project_init reports the access error itself.
            debug!(error = %err, "readiness probe failed before init");
            true
        }
    }
}

fn init_can_prompt(ctx: &CommandContext) -> bool {
    if ctx.global.json || ctx.global.quiet {
        return false;
    }
    atty::is(Stream::Stdin) && atty::is(Stream::Stderr)
}

fn ask(input: &mut impl BufRead, question: &str, default: &str) -> Result<String> {
    eprint!("? {question} ({default}) ");
    io::stderr().flush().ok();
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

fn ask_license(input: &mut impl BufRead) -> Result<String> {
    let choices = LICENSE_CHOICES.join("/");
    loop {
        let answer = ask(input, &format!("Choose a license [{choices}]:"), DEFAULT_LICENSE)?;
        if let Some(choice) = LICENSE_CHOICES
            .iter()
            .find(|choice| choice.eq_ignore_ascii_case(&answer))
        {
            return Ok((*choice).to_string());
        }
        eprintln!("  please pick one of {choices}");
    }
}

fn core_call<F>(info: CommandInfo, action: F) -> Result<(CommandInfo, ExecutionOutcome)>
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    match action() {
        Ok(outcome) => Ok((info, outcome)),
        Err(err) => {
            if let Some(outcome) = api::error_outcome(&err) {
                return Ok((info, outcome));
            }
            let issues: Vec<String> = err.chain().map(ToString::to_string).collect();
            Ok((
                info,
                ExecutionOutcome::failure(
                    err.to_string(),
                    serde_json::json!({
                        "reason": "internal_error",
                        "error": format!("{err:#}"),
                        "issues": issues,
                        "hint": "Re-run with `-vv` for more detail, or open an issue if this persists.",
                    }),
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_answer_takes_default() {
        let mut input = Cursor::new("\n");
        assert_eq!(ask(&mut input, "name?", "my_project").unwrap(), "my_project");
        let mut input = Cursor::new("  demo \n");
        assert_eq!(ask(&mut input, "name?", "my_project").unwrap(), "demo");
    }

    #[test]
    fn license_prompt_retries_until_valid() {
        let mut input = Cursor::new("GPL\nmit\n");
        assert_eq!(ask_license(&mut input).unwrap(), "MIT");
    }

    #[test]
    fn untyped_failures_become_internal_errors() {
        let info = CommandInfo::new(CommandGroup::List, "list");
        let (_, outcome) = core_call(info, || Err(anyhow::anyhow!("disk on fire"))).unwrap();
        assert_eq!(outcome.details["reason"], "internal_error");
        assert_eq!(outcome.message, "disk on fire");
    }
}

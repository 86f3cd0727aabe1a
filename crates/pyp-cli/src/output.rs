use std::io::{self, Write};

use atty::Stream;
use color_eyre::Result;
use pyp_core::api::{
    format_status_message, to_json_response, CommandInfo, CommandStatus, ExecutionOutcome,
};
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

/// Renders `outcome` and returns the process exit code.
pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.exit_code();
    let style = Style::new(opts.no_color, atty::is(Stream::Stdout));

    if opts.json {
        let payload = to_json_response(info, outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }
    if opts.quiet {
        return Ok(code);
    }

    let raw_output = outcome
        .is_passthrough()
        .then(|| outcome.detail_str("output"))
        .flatten();
    if let Some(output) = raw_output {
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
    }

    if outcome.status == CommandStatus::Ok {
        if outcome.is_passthrough() {
            if raw_output.is_none() && !outcome.message.is_empty() {
                println!("{}", outcome.message);
            }
        } else {
            let message = format_status_message(info, &outcome.message);
            println!("{}", style.status(outcome.status, &message));
            if let Some(hint) = outcome.detail_str("hint") {
                println!("{}", style.info(&format!("Tip: {hint}")));
            }
        }
    } else {
        let message = format_status_message(info, &outcome.message);
        println!("{}", style.status(outcome.status, &message));
        let reasons = collect_why_lines(&outcome.details);
        if !reasons.is_empty() {
            println!();
            println!("{}", style.heading("Why:"));
            for reason in reasons {
                println!("{}", style.dimmed(&format!("  {reason}")));
            }
        }
        if let Some(hint) = outcome.detail_str("hint") {
            println!();
            println!("{}", style.info(&format!("Tip: {hint}")));
        }
    }

    Ok(code)
}

/// Captured tool output, one line per entry, skipping blank lines.
fn collect_why_lines(details: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    for key in ["stderr", "error"] {
        if let Some(text) = details.get(key).and_then(Value::as_str) {
            for line in text.lines().map(str::trim_end) {
                if !line.trim().is_empty() && !lines.iter().any(|seen| seen == line) {
                    lines.push(line.to_string());
                }
            }
        }
    }
    if let Some(issues) = details.get("issues").and_then(Value::as_array) {
        for issue in issues.iter().filter_map(Value::as_str) {
            if !lines.iter().any(|seen| seen == issue) {
                lines.push(issue.to_string());
            }
        }
    }
    lines
}

use std::{
    io::{self, Read},
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};

const CAPTURE_LIMIT_ENV: &str = "PYP_MAX_CAPTURE_BYTES";
const DEFAULT_CAPTURE_LIMIT: usize = 1024 * 1024;
const TRUNCATION_MARKER: &str = "\n[...truncated...]\n";

#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs `program` to completion with stdout and stderr captured separately.
///
/// Both pipes are drained on helper threads so a chatty child cannot block on
/// a full pipe while we wait for it.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or its output cannot be
/// read.
pub fn run_command(program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
    let mut child = command(program, args, cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    let limit = capture_limit();
    let stdout = drain_on_thread(child.stdout.take(), limit);
    let stderr = drain_on_thread(child.stderr.take(), limit);
    let status = wait(&mut child, program)?;
    Ok(RunOutput {
        code: exit_code(status),
        stdout: join_drain(stdout, "stdout")?,
        stderr: join_drain(stderr, "stderr")?,
    })
}

/// Runs `program` with stderr folded into stdout through one shared pipe, so
/// the capture keeps the order the child wrote in.
///
/// # Errors
///
/// Returns an error when the pipe cannot be created, the program cannot be
/// spawned, or its output cannot be read.
pub fn run_command_combined(program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
    let (reader, writer) = io::pipe().context("failed to create output pipe")?;
    let mut cmd = command(program, args, cwd);
    cmd.stdout(writer.try_clone().context("failed to duplicate output pipe")?)
        .stderr(writer);
    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    // Our copies of the write end must close before the reader can see EOF.
    drop(cmd);

    let output = TailBuffer::drain(reader, capture_limit())
        .with_context(|| format!("failed to read output of {program}"))?;
    let status = wait(&mut child, program)?;
    Ok(RunOutput {
        code: exit_code(status),
        stdout: output,
        stderr: String::new(),
    })
}

fn command(program: &str, args: &[String], cwd: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(cwd).stdin(Stdio::null());
    cmd
}

fn wait(child: &mut Child, program: &str) -> Result<ExitStatus> {
    child
        .wait()
        .with_context(|| format!("failed to wait for {program}"))
}

/// Killed-by-signal children have no code; report them as -1.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

fn capture_limit() -> usize {
    std::env::var(CAPTURE_LIMIT_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_CAPTURE_LIMIT)
}

type Drain = Option<JoinHandle<io::Result<String>>>;

fn drain_on_thread<R: Read + Send + 'static>(pipe: Option<R>, limit: usize) -> Drain {
    pipe.map(|pipe| thread::spawn(move || TailBuffer::drain(pipe, limit)))
}

fn join_drain(handle: Drain, stream: &str) -> Result<String> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    handle
        .join()
        .map_err(|_| anyhow!("{stream} reader thread panicked"))?
        .with_context(|| format!("failed to read {stream}"))
}

/// Keeps only the newest `limit` bytes written to it.
struct TailBuffer {
    bytes: Vec<u8>,
    limit: usize,
    truncated: bool,
}

impl TailBuffer {
    fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
            truncated: false,
        }
    }

    fn drain(mut reader: impl Read, limit: usize) -> io::Result<String> {
        let mut buffer = Self::new(limit);
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk)? {
                0 => break,
                read => buffer.push(&chunk[..read]),
            }
        }
        Ok(buffer.into_string())
    }

    fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
        if self.bytes.len() > self.limit {
            let excess = self.bytes.len() - self.limit;
            self.bytes.drain(..excess);
            self.truncated = true;
        }
    }

    fn into_string(self) -> String {
        let mut text = String::from_utf8_lossy(&self.bytes).into_owned();
        if self.truncated {
            text.push_str(TRUNCATION_MARKER);
        }
        text
    }
}

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{ShellError, ShellResult};

/// Standard output redirection. The target is always created or truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub file: String,
}

/// A parsed command with arguments and redirections.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub args: Vec<String>,
    pub redirect_stdout: Option<Redirection>,
}

/// Parses tokens into a ParsedCommand, extracting `>` / `1>` operators.
///
/// The last redirection on the line wins. An operator with nothing after it is
/// kept as an ordinary argument.
pub fn parse_command(tokens: Vec<String>) -> ParsedCommand {
    let mut args = Vec::new();
    let mut redirect_stdout = None;
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        match token.as_str() {
            ">" | "1>" if tokens.peek().is_some() => {
                redirect_stdout = tokens.next().map(|file| Redirection { file });
            }
            _ => args.push(token),
        }
    }

    ParsedCommand {
        args,
        redirect_stdout,
    }
}

/// Writes builtin output followed by a newline, either to `out` or to the
/// redirection target resolved against `cwd`.
///
/// `None` output writes nothing to `out` but still creates the target file.
pub fn handle_output<W: Write>(
    output: Option<&[u8]>,
    redirection: Option<&Redirection>,
    cwd: &Path,
    out: &mut W,
) -> ShellResult<()> {
    match redirection {
        Some(redirection) => {
            let path = cwd.join(&redirection.file);
            log::debug!("redirecting output to {}", path.display());
            write_to_file(&path, output).map_err(|source| ShellError::Redirect { path, source })
        }
        None => match output {
            Some(bytes) => write_line(out, bytes).map_err(ShellError::Stdout),
            None => Ok(()),
        },
    }
}

fn write_to_file(path: &Path, output: Option<&[u8]>) -> io::Result<()> {
    let mut file = File::create(path)?;
    match output {
        Some(bytes) => write_line(&mut file, bytes),
        None => Ok(()),
    }
}

fn write_line<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    w.write_all(bytes)?;
    w.write_all(b"\n")?;
    w.flush()
}

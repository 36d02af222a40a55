use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use bytes::Bytes;

use crate::commands::Builtin;
use crate::error::ShellResult;
use crate::external;
use crate::path::SearchPath;
use crate::redirection::{handle_output, parse_command};
use crate::tokenize::tokenize;

/// Process state shared by every command: working directory, home directory and
/// search path. Only `cd` changes it.
#[derive(Debug, Clone)]
pub struct ShellContext {
    pub cwd: PathBuf,
    pub home: PathBuf,
    pub search_path: SearchPath,
}

impl ShellContext {
    pub fn new(cwd: PathBuf, home: PathBuf, search_path: SearchPath) -> Self {
        Self {
            cwd,
            home,
            search_path,
        }
    }

    /// Builds the context from `PATH`, `HOME` and the process working directory.
    pub fn from_env() -> io::Result<Self> {
        let cwd = env::current_dir()?;
        let home = env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        let search_path = env::var_os("PATH")
            .map(|path| SearchPath::parse(&path))
            .unwrap_or_default();
        Ok(Self::new(cwd, home, search_path))
    }
}

/// Result of dispatching one command.
#[derive(Debug)]
pub enum Outcome {
    /// Builtin text to route; `None` when the builtin printed nothing.
    Output(Option<Bytes>),
    /// An external program ran with the shell's own streams.
    Inherited,
    /// `exit` was called.
    Exit(i32),
}

/// What the prompt loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Exit(i32),
}

pub struct Shell {
    ctx: ShellContext,
}

impl Shell {
    pub fn new(ctx: ShellContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    /// Runs a builtin by exact name match, else an external program.
    pub fn dispatch(&mut self, args: &[String]) -> ShellResult<Outcome> {
        let Some(name) = args.first() else {
            return Ok(Outcome::Output(None));
        };

        match Builtin::from_name(name) {
            Some(builtin) => {
                log::debug!("builtin {:?}", builtin);
                builtin.execute(args, &mut self.ctx)
            }
            None => {
                external::run(name, &args[1..], &self.ctx)?;
                Ok(Outcome::Inherited)
            }
        }
    }

    /// Tokenizes, dispatches and routes the output of a single input line.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> ShellResult<Status> {
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return Ok(Status::Continue);
        }

        let parsed = parse_command(tokens);
        match self.dispatch(&parsed.args)? {
            Outcome::Output(output) => {
                handle_output(
                    output.as_deref(),
                    parsed.redirect_stdout.as_ref(),
                    &self.ctx.cwd,
                    out,
                )?;
                Ok(Status::Continue)
            }
            Outcome::Inherited => {
                if let Some(redirection) = &parsed.redirect_stdout {
                    log::debug!("ignoring redirection to {} for external command", redirection.file);
                }
                Ok(Status::Continue)
            }
            Outcome::Exit(code) => Ok(Status::Exit(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use std::fs;

    fn shell(cwd: PathBuf) -> Shell {
        Shell::new(ShellContext::new(cwd, PathBuf::from("/nonexistent-home"), SearchPath::default()))
    }

    fn run(shell: &mut Shell, line: &str) -> (ShellResult<Status>, String) {
        let mut out = Vec::<u8>::new();
        let status = shell.run_line(line, &mut out);
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_echo_quoted() {
        let mut sh = shell(PathBuf::from("/"));
        let (status, out) = run(&mut sh, "echo  \"a  b\"  c\n");
        assert_eq!(status.unwrap(), Status::Continue);
        assert_eq!(out, "a  b c\n");
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let mut sh = shell(PathBuf::from("/"));
        let (status, out) = run(&mut sh, "  \t\n");
        assert_eq!(status.unwrap(), Status::Continue);
        assert!(out.is_empty());
    }

    #[test]
    fn test_exit_signals_termination() {
        let mut sh = shell(PathBuf::from("/"));
        let (status, out) = run(&mut sh, "exit\n");
        assert_eq!(status.unwrap(), Status::Exit(0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_redirect_echo_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = shell(dir.path().to_path_buf());
        let (status, out) = run(&mut sh, "echo hi > out.txt");
        assert!(status.is_ok());
        assert!(out.is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hi\n");
    }

    #[test]
    fn test_cat_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one").unwrap();
        let mut sh = shell(dir.path().to_path_buf());

        let (status, out) = run(&mut sh, "cat a.txt missing.txt > out.txt");
        assert!(matches!(status, Err(ShellError::NoSuchFile { ref path }) if path == "missing.txt"));
        assert!(out.is_empty());
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_cat_binary_redirect_is_byte_exact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("img"), [0xffu8, 0xfe, 0x00, 0x41]).unwrap();
        let mut sh = shell(dir.path().to_path_buf());

        run(&mut sh, "cat img > copy").0.unwrap();
        assert_eq!(
            fs::read(dir.path().join("copy")).unwrap(),
            [0xff, 0xfe, 0x00, 0x41, b'\n']
        );
    }

    #[test]
    fn test_cd_failure_is_redirectable_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = shell(dir.path().to_path_buf());

        let (status, _) = run(&mut sh, "cd nowhere > err.txt");
        assert!(status.is_ok());
        let expected = format!(
            "cd: {}: No such file or directory\n",
            dir.path().join("nowhere").display()
        );
        assert_eq!(fs::read_to_string(dir.path().join("err.txt")).unwrap(), expected);
        assert_eq!(sh.context().cwd, dir.path());
    }

    #[test]
    fn test_cd_then_redirect_is_relative_to_new_cwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut sh = shell(dir.path().to_path_buf());

        let (_, out) = run(&mut sh, "cd sub");
        assert!(out.is_empty());
        let (_, out) = run(&mut sh, "pwd");
        assert_eq!(out, format!("{}\n", dir.path().join("sub").display()));
        run(&mut sh, "echo nested 1> note").0.unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("sub/note")).unwrap(), "nested\n");
    }

    #[test]
    fn test_unknown_command() {
        let mut sh = shell(PathBuf::from("/"));
        let (status, _) = run(&mut sh, "nosuchcmd arg");
        assert!(matches!(status, Err(ShellError::CommandNotFound { .. })));
    }
}

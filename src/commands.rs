use std::fs;
use std::path::PathBuf;

use bytes::{Bytes, BytesMut};

use crate::error::{ShellError, ShellResult};
use crate::path::normalize;
use crate::shell::{Outcome, ShellContext};

/// Commands implemented by the shell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
    Cat,
    Pwd,
    Cd,
}

impl Builtin {
    /// List of builtin command names
    pub const NAMES: &'static [&'static str] = &["exit", "echo", "type", "cat", "pwd", "cd"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "exit" => Some(Self::Exit),
            "echo" => Some(Self::Echo),
            "type" => Some(Self::Type),
            "cat" => Some(Self::Cat),
            "pwd" => Some(Self::Pwd),
            "cd" => Some(Self::Cd),
            _ => None,
        }
    }

    /// Executes the builtin with the full argument list (command name first).
    pub fn execute(self, args: &[String], ctx: &mut ShellContext) -> ShellResult<Outcome> {
        let output = match self {
            Self::Exit => return Ok(Outcome::Exit(0)),
            Self::Echo => Some(args.get(1..).unwrap_or_default().join(" ")),
            Self::Type => Some(execute_type(args, ctx)?),
            Self::Cat => return Ok(Outcome::Output(Some(execute_cat(args, ctx)?))),
            Self::Pwd => Some(ctx.cwd.display().to_string()),
            Self::Cd => execute_cd(args, ctx),
        };
        Ok(Outcome::Output(output.map(Bytes::from)))
    }
}

fn execute_type(args: &[String], ctx: &ShellContext) -> ShellResult<String> {
    let name = args.get(1).ok_or(ShellError::Usage("usage: type <command>"))?;

    if Builtin::from_name(name).is_some() {
        Ok(format!("{} is a shell builtin", name))
    } else {
        match ctx.search_path.resolve(name, &ctx.cwd) {
            Some(path) => Ok(format!("{} is {}", path.display(), name)),
            None => Ok(format!("{}: not found", name)),
        }
    }
}

/// Concatenates file contents verbatim; the first unreadable path aborts.
fn execute_cat(args: &[String], ctx: &ShellContext) -> ShellResult<Bytes> {
    if args.len() < 2 {
        return Err(ShellError::Usage("usage: cat <path>"));
    }

    let mut buf = BytesMut::new();
    for path in &args[1..] {
        let content = fs::read(ctx.cwd.join(path))
            .map_err(|_| ShellError::NoSuchFile { path: path.clone() })?;
        buf.extend_from_slice(&content);
    }
    Ok(buf.freeze())
}

/// Changes the context's working directory. Failure is reported as output.
fn execute_cd(args: &[String], ctx: &mut ShellContext) -> Option<String> {
    let Some(target) = args.get(1) else {
        return Some(ctx.cwd.display().to_string());
    };

    let resolved = if let Some(rest) = target.strip_prefix('~') {
        if ctx.home.as_os_str().is_empty() {
            return Some(format!("cd: {}: No such file or directory", rest));
        }
        PathBuf::from(format!("{}{}", ctx.home.display(), rest))
    } else if target.starts_with('/') {
        PathBuf::from(target)
    } else {
        normalize(&ctx.cwd.join(target))
    };

    let absolute = ctx.cwd.join(&resolved);
    match fs::metadata(&absolute) {
        Ok(m) if m.is_dir() => {
            ctx.cwd = normalize(&absolute);
            log::debug!("cwd is now {}", ctx.cwd.display());
            None
        }
        _ => Some(format!(
            "cd: {}: No such file or directory",
            resolved.display()
        )),
    }
}

use std::process::Command;

use crate::error::{ShellError, ShellResult};
use crate::shell::ShellContext;

/// Runs a program found on the search path in the foreground.
///
/// The child inherits stdin, stdout and stderr and sees `name` as `argv[0]`.
pub fn run(name: &str, args: &[String], ctx: &ShellContext) -> ShellResult<()> {
    let program = ctx
        .search_path
        .resolve(name, &ctx.cwd)
        .ok_or_else(|| ShellError::CommandNotFound {
            name: name.to_string(),
        })?;

    let mut command = Command::new(ctx.cwd.join(&program));
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.arg0(name);
    }
    command.args(args).current_dir(&ctx.cwd);

    log::debug!("spawning {} {:?}", program.display(), args);
    let status = command.status().map_err(|source| ShellError::Spawn {
        name: name.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ShellError::Exited {
            name: name.to_string(),
            status,
        })
    }
}

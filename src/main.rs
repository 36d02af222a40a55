use std::io;
use std::process::exit;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

mod commands;
mod completion;
mod error;
mod external;
mod path;
mod redirection;
mod shell;
mod tokenize;

use commands::Builtin;
use completion::ShellCompleter;
use shell::{Shell, ShellContext, Status};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let ctx = ShellContext::from_env().context("failed to initialise shell")?;
    let mut editor: Editor<ShellCompleter, DefaultHistory> =
        Editor::new().context("failed to initialise line editor")?;
    editor.set_helper(Some(ShellCompleter::new(
        Builtin::NAMES,
        ctx.search_path.clone(),
        ctx.cwd.clone(),
    )));

    let mut shell = Shell::new(ctx);
    log::debug!("starting in {}", shell.context().cwd.display());
    let mut stdout = io::stdout();

    loop {
        let line = match editor.readline("$ ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(e).context("error reading input"),
        };

        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(line.as_str()) {
            log::warn!("failed to record history: {}", e);
        }

        let status = shell.run_line(&line, &mut stdout);
        if let Some(helper) = editor.helper_mut() {
            helper.set_cwd(shell.context().cwd.clone());
        }

        match status {
            Ok(Status::Continue) => {}
            Ok(Status::Exit(code)) => exit(code),
            Err(e) => {
                log::debug!("command failed: {:?}", e);
                eprintln!("{}", e);
            }
        }
    }
}

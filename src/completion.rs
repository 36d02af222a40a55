use std::fs;
use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;

use crate::path::{is_executable, SearchPath};

/// Shell completer for tab completion.
///
/// Paths are completed against the shell's working directory, which the
/// prompt loop keeps in sync through [`ShellCompleter::set_cwd`].
pub struct ShellCompleter {
    builtins: Vec<String>,
    search_path: SearchPath,
    cwd: PathBuf,
}

impl ShellCompleter {
    pub fn new(builtins: &[&str], search_path: SearchPath, cwd: PathBuf) -> Self {
        Self {
            builtins: builtins.iter().map(|b| b.to_string()).collect(),
            search_path,
            cwd,
        }
    }

    pub fn set_cwd(&mut self, cwd: PathBuf) {
        self.cwd = cwd;
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let (start, word) = extract_word(line, pos);
        if line[..start].trim().is_empty() {
            (start, self.command_candidates(word))
        } else {
            (start, self.file_candidates(word))
        }
    }

    /// Builtins and executables on the search path starting with `word`.
    fn command_candidates(&self, word: &str) -> Vec<Pair> {
        let executables = self
            .search_path
            .dirs()
            .iter()
            .filter_map(|dir| fs::read_dir(self.cwd.join(dir)).ok())
            .flat_map(|entries| entries.flatten())
            .filter(|entry| {
                fs::metadata(entry.path())
                    .map(|m| is_executable(&m))
                    .unwrap_or(false)
            })
            .filter_map(|entry| entry.file_name().into_string().ok());

        let mut candidates: Vec<Pair> = self
            .builtins
            .iter()
            .cloned()
            .chain(executables)
            .filter(|name| name.starts_with(word))
            .map(|name| Pair {
                replacement: format!("{} ", name),
                display: name,
            })
            .collect();

        candidates.sort_by(|a, b| a.display.cmp(&b.display));
        candidates.dedup_by(|a, b| a.display == b.display);
        candidates
    }

    /// Entries of the directory named by `word` (relative to the cwd) whose
    /// names start with its last component.
    fn file_candidates(&self, word: &str) -> Vec<Pair> {
        let (dir, prefix) = match word.rfind('/') {
            Some(i) => (&word[..=i], &word[i + 1..]),
            None => ("", word),
        };
        let Ok(entries) = fs::read_dir(self.cwd.join(dir)) else {
            return Vec::new();
        };

        let mut candidates: Vec<Pair> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                if !name.starts_with(prefix) || (name.starts_with('.') && !prefix.starts_with('.')) {
                    return None;
                }
                let is_dir = fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false);
                Some(if is_dir {
                    Pair {
                        display: format!("{}/", name),
                        replacement: format!("{}{}/", dir, name),
                    }
                } else {
                    Pair {
                        replacement: format!("{}{} ", dir, name),
                        display: name,
                    }
                })
            })
            .collect();

        candidates.sort_by(|a, b| a.display.cmp(&b.display));
        candidates
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
        Ok(self.candidates(line, pos))
    }
}

fn extract_word(line: &str, pos: usize) -> (usize, &str) {
    let before = &line[..pos];
    let start = before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    (start, &line[start..pos])
}

impl Helper for ShellCompleter {}
impl Hinter for ShellCompleter {
    type Hint = String;
}
impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}

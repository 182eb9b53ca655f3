//! Interactive shell driving the runtime
//!
//! A thin stand-in for the evaluator: every line is a single native call
//! written as `name arg arg ...`. Arguments are integer literals, quoted
//! character literals (`'a'`, `'\n'`), or `$var` references to shell
//! globals; `let name <call>` binds the result. Meta commands start
//! with `:`.

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};

use crate::runtime::{Natives, RtResult, Runtime, RuntimeError, Value};

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".skink_history";

/// One line-driven runtime session, independent of any terminal
pub struct Session {
    runtime: Runtime,
    natives: Natives,
}

impl Session {
    pub fn new(runtime: Runtime) -> Self {
        Session {
            runtime,
            natives: Natives::with_defaults(),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn natives(&self) -> &Natives {
        &self.natives
    }

    /// Evaluate one `[let name] func args...` line. Returns the call's
    /// value, or `None` for a blank line or a `let` binding.
    pub fn eval_line(&mut self, line: &str) -> RtResult<Option<Value>> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(None);
        };

        let (binding, name) = if first == "let" {
            let name = words.next().ok_or_else(|| {
                RuntimeError::invalid_argument("let needs a variable name and a call")
            })?;
            let func = words.next().ok_or_else(|| {
                RuntimeError::invalid_argument("let needs a call after the variable name")
            })?;
            (Some(name.to_string()), func)
        } else {
            (None, first)
        };

        let mut args = Vec::new();
        for word in words {
            args.push(self.parse_atom(word)?);
        }

        let value = self.natives.call(name, &mut self.runtime, &args)?;
        match binding {
            Some(var) => {
                self.runtime.globals_mut().define(var, value);
                Ok(None)
            }
            None => Ok(Some(value)),
        }
    }

    /// Run a whole script of shell commands. Blank lines and `#` comments
    /// are skipped; values of unbound calls are printed.
    pub fn run_source(&mut self, source: &str) -> RtResult<()> {
        for (lineno, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.eval_line(line) {
                Ok(Some(value)) => println!("{value}"),
                Ok(None) => {}
                Err(e) => {
                    return Err(RuntimeError::invalid_argument(format!(
                        "line {}: {e}",
                        lineno + 1
                    )));
                }
            }
        }
        Ok(())
    }

    fn parse_atom(&self, word: &str) -> RtResult<Value> {
        if let Some(name) = word.strip_prefix('$') {
            return self.runtime.globals().get(name).ok_or_else(|| {
                RuntimeError::invalid_argument(format!("undefined variable: {name}"))
            });
        }
        if word.starts_with('\'') {
            return parse_char(word);
        }
        word.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| RuntimeError::invalid_argument(format!("cannot parse argument: {word}")))
    }
}

fn parse_char(word: &str) -> RtResult<Value> {
    let inner = word
        .strip_prefix('\'')
        .and_then(|w| w.strip_suffix('\''))
        .ok_or_else(|| {
            RuntimeError::invalid_argument(format!("unterminated character literal: {word}"))
        })?;
    let c = match inner {
        "\\n" => '\n',
        "\\t" => '\t',
        "\\r" => '\r',
        "\\0" => '\0',
        "\\\\" => '\\',
        "\\'" => '\'',
        _ => {
            let mut chars = inner.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(RuntimeError::invalid_argument(format!(
                        "bad character literal: {word}"
                    )));
                }
            }
        }
    };
    Ok(Value::Char(c))
}

/// REPL state
pub struct Shell {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Shell {
    /// Create a new shell around `runtime`
    pub fn new(runtime: Runtime) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = home_dir().map(|home| home.join(HISTORY_FILE));

        let mut shell = Shell {
            editor,
            session: Session::new(runtime),
            history_path,
        };

        if let Some(ref path) = shell.history_path {
            let _ = shell.editor.load_history(path);
        }

        Ok(shell)
    }

    /// Run the shell until EOF or `:quit`
    pub fn run(&mut self) -> RlResult<()> {
        println!("Skink runtime shell");
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    match self.session.eval_line(line) {
                        Ok(Some(value)) => println!("{value}"),
                        Ok(None) => {}
                        Err(e) => eprintln!("error: {e}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle meta commands (starting with :). Returns true to exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        let mut words = cmd.split_whitespace();
        match words.next().unwrap_or(cmd) {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":vars" => {
                self.print_vars();
                false
            }
            ":stats" => {
                self.print_json(&self.session.runtime().store().stats());
                false
            }
            ":dump" => {
                match words.next() {
                    Some(word) => self.dump_list(word),
                    None => println!("usage: :dump $var"),
                }
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn print_help(&self) {
        println!("Shell commands:");
        println!("  :help, :h, :?    Show this help");
        println!("  :vars            List shell variables");
        println!("  :stats           List store statistics as JSON");
        println!("  :dump $var       Dump a list's elements as JSON");
        println!("  :clear           Clear the screen");
        println!("  :quit, :q        Exit the shell");
        println!();
        println!("Calls:");
        println!("  <func> <args...>       Invoke a native, print its value");
        println!("  let <name> <func> ...  Invoke and bind the value to $name");
        println!();
        println!("Arguments: integers (42), characters ('a', '\\n'), $vars.");
        println!();
        println!("Registered natives:");
        for name in self.session.natives().names() {
            println!("  {name}");
        }
    }

    fn print_vars(&self) {
        let mut bindings: Vec<(&str, Value)> = self.session.runtime().globals().iter().collect();
        bindings.sort_unstable_by_key(|(name, _)| *name);
        for (name, value) in bindings {
            println!("{name} = {value}");
        }
    }

    fn print_json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    fn dump_list(&self, word: &str) {
        let runtime = self.session.runtime();
        let handle = word
            .strip_prefix('$')
            .and_then(|name| runtime.globals().get(name))
            .and_then(|value| value.as_list());
        match handle {
            Some(handle) => match runtime.store().resolve(handle) {
                Ok(list) => self.print_json(&list.values()),
                Err(e) => eprintln!("error: {e}"),
            },
            None => println!("usage: :dump $var   (where $var holds a list)"),
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

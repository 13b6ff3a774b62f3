//! Interactive console for Isaac Sim
//!
//! Each completed snippet is sent to the code-injection bridge as one script.

use std::path::PathBuf;

use anyhow::Result;
use dof_core::{ExchangeClient, robots, script};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, EditMode, Editor};
use tokio::runtime::Runtime;

/// REPL state
pub struct Repl<'a> {
    client: &'a ExchangeClient,
    runtime: &'a Runtime,
    editor: Editor<(), DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl<'a> Repl<'a> {
    /// Create a new REPL instance
    pub fn new(client: &'a ExchangeClient, runtime: &'a Runtime) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)?;

        let history_path = dirs_path();
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }

        Ok(Self {
            client,
            runtime,
            editor,
            history_path,
        })
    }

    /// Run the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", WELCOME_MESSAGE);
        println!("Connected to {}", self.client.config().addr());

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() { "isaac> " } else { "...> " };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.starts_with(':') && buffer.is_empty() {
                        match self.handle_command(trimmed) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                            CommandResult::Error(e) => {
                                eprintln!("Error: {}", e);
                                continue;
                            }
                        }
                    }

                    // A blank line ends an indented block
                    if !buffer.is_empty() && trimmed.is_empty() {
                        let input = std::mem::take(&mut buffer);
                        self.submit(&input);
                        continue;
                    }

                    buffer.push_str(line.strip_suffix('\\').unwrap_or(line.as_str()));
                    buffer.push('\n');

                    if needs_more(&buffer, &line) {
                        continue;
                    }

                    let input = std::mem::take(&mut buffer);
                    if !input.trim().is_empty() {
                        self.submit(&input);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    if buffer.is_empty() {
                        println!("Use :quit or Ctrl+D to exit");
                    } else {
                        println!("^C - input cancelled");
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Eof) => {
                    println!("\nGoodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Send a snippet and print the reply
    fn submit(&mut self, input: &str) {
        let _ = self.editor.add_history_entry(input.trim_end());
        match self.runtime.block_on(self.client.exchange(input)) {
            Ok(reply) => println!("=> {}", reply.trim_end()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    /// Handle REPL commands
    fn handle_command(&mut self, cmd: &str) -> CommandResult {
        let mut parts = cmd.splitn(2, ' ');
        let command = parts.next().unwrap_or_default();
        let args = parts.next().map(str::trim).filter(|s| !s.is_empty());

        match command {
            ":help" | ":h" | ":?" => {
                println!("{}", HELP_MESSAGE);
                CommandResult::Continue
            }
            ":quit" | ":q" | ":exit" => CommandResult::Exit,
            ":robots" => {
                for robot in robots::all() {
                    println!("  {:<8} {}", robot.id, robot.name);
                }
                CommandResult::Continue
            }
            ":list" => {
                self.submit(&script::list_robots());
                CommandResult::Continue
            }
            ":add" => match args.map(robots::lookup) {
                Some(Ok(robot)) => {
                    self.submit(&script::add_robot(robot));
                    CommandResult::Continue
                }
                Some(Err(e)) => CommandResult::Error(e.to_string()),
                None => {
                    println!("Usage: :add <robot>");
                    CommandResult::Continue
                }
            },
            ":load" | ":l" => match args {
                Some(path) => self.load_script(path),
                None => {
                    println!("Usage: :load <filename>");
                    CommandResult::Continue
                }
            },
            _ => CommandResult::Error(format!(
                "Unknown command: {}. Type :help for available commands.",
                command
            )),
        }
    }

    /// Send a script file
    fn load_script(&mut self, path: &str) -> CommandResult {
        let path = std::path::Path::new(path);

        match std::fs::read_to_string(path) {
            Ok(script) => {
                println!("Sending {}...", path.display());
                self.submit(&script);
                CommandResult::Continue
            }
            Err(e) => CommandResult::Error(format!("Failed to read {}: {}", path.display(), e)),
        }
    }
}

/// Result of handling a command
enum CommandResult {
    Continue,
    Exit,
    Error(String),
}

/// Whether the snippet in `buffer` is still open after `line`
///
/// Open brackets, a trailing backslash, a trailing colon or an indented block
/// keep the snippet going; an indented block is closed by a blank line.
fn needs_more(buffer: &str, line: &str) -> bool {
    let trimmed = line.trim_end();
    if trimmed.ends_with('\\') || trimmed.ends_with(':') || !is_balanced(buffer) {
        return true;
    }
    buffer.lines().skip(1).any(|l| l.starts_with([' ', '\t']))
}

/// Check if brackets are balanced outside of string literals
fn is_balanced(input: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut prev_char = '\0';

    for c in input.chars() {
        match quote {
            Some(q) if c == q && prev_char != '\\' => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '{' | '[' => depth += 1,
                ')' | '}' | ']' => depth -= 1,
                _ => {}
            },
        }
        prev_char = c;
    }

    depth <= 0
}

/// Get the history file path
fn dirs_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("dof").join("repl_history"))
}

const WELCOME_MESSAGE: &str = r#"
╔═══════════════════════════════════════════════════════════╗
║             DOF Isaac Sim Console                          ║
║                                                            ║
║  Type Python to run it inside Isaac Sim.                   ║
║  Type :help for commands.                                  ║
╚═══════════════════════════════════════════════════════════╝
"#;

const HELP_MESSAGE: &str = r#"
Commands:
  :help, :h, :?     - Show this help message
  :quit, :q, :exit  - Exit the console
  :robots           - Show robots that can be added
  :add <robot>      - Reference a robot into the stage
  :list             - List robots on the stage
  :load <file>      - Send a script file

Tips:
  - Lines ending in ':' or '\' continue on the next line
  - Finish an indented block with an empty line
  - Unclosed brackets continue on the next line
  - Each snippet runs as its own script; Python variables do not persist
  - Use Ctrl+C to cancel current input, Ctrl+D to exit
"#;

/// Entry point for the REPL command
pub fn run_repl(client: &ExchangeClient, runtime: &Runtime) -> Result<()> {
    let mut repl = Repl::new(client, runtime)?;
    repl.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced("print(1)"));
        assert!(!is_balanced("foo([1, 2"));
        assert!(is_balanced("s = ')'"));
        assert!(is_balanced("s = \"([\""));
    }

    #[test]
    fn test_needs_more() {
        assert!(!needs_more("print(1)\n", "print(1)"));
        assert!(needs_more("for i in range(3):\n", "for i in range(3):"));
        assert!(needs_more("for i in range(3):\n    print(i)\n", "    print(i)"));
        assert!(needs_more("x = [1,\n", "x = [1,"));
        assert!(!needs_more("x = [1,\n2]\n", "2]"));
    }
}

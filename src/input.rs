use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::{self, MatchingBracketValidator, Validator};
use rustyline::{CompletionType, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;

/// Rustyline helper: completes slash commands and, after `/open`, the
/// day-keyed conversation file names.
pub struct ChatHelper {
    commands: Vec<String>,
    chats_dir: PathBuf,
    highlighter: MatchingBracketHighlighter,
    hinter: HistoryHinter,
    validator: MatchingBracketValidator,
}

impl ChatHelper {
    pub fn new(dispatcher: &CommandDispatcher, chats_dir: PathBuf) -> Self {
        let mut commands = dispatcher.get_command_names();
        commands.sort();
        Self {
            commands,
            chats_dir,
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter {},
            validator: MatchingBracketValidator::new(),
        }
    }

    fn chat_file_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.chats_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("chat_") && n.ends_with(".json"))
            .collect();
        names.sort();
        names
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // File-name completion for the /open argument
        if let Some(arg) = line.strip_prefix("/open ") {
            let arg_start = line.len() - arg.len();
            let partial = &line[arg_start..pos.max(arg_start)];
            let matches: Vec<Pair> = self
                .chat_file_names()
                .into_iter()
                .filter(|name| name.starts_with(partial))
                .map(|name| Pair {
                    display: name.clone(),
                    replacement: name,
                })
                .collect();
            return Ok((arg_start, matches));
        }

        // Command-name completion right after '/'
        if line.starts_with('/') {
            let command_part = &line[1..pos.max(1)];
            let matches: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(command_part))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            return Ok((1, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Borrowed(hint)
    }
}

impl Validator for ChatHelper {
    fn validate(
        &self,
        ctx: &mut validate::ValidationContext,
    ) -> rustyline::Result<validate::ValidationResult> {
        self.validator.validate(ctx)
    }

    fn validate_while_typing(&self) -> bool {
        self.validator.validate_while_typing()
    }
}

/// Creates a configured rustyline editor with history loaded.
pub fn create_editor(
    dispatcher: &CommandDispatcher,
    chats_dir: PathBuf,
) -> Result<Editor<ChatHelper, FileHistory>, ChatError> {
    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;

    editor.set_helper(Some(ChatHelper::new(dispatcher, chats_dir)));

    let _ = editor.load_history(&Config::input_history_path());

    Ok(editor)
}

/// Reads one line; `None` means Ctrl+C/Ctrl+D.
pub fn read_input(
    editor: &mut Editor<ChatHelper, FileHistory>,
) -> Result<Option<String>, ChatError> {
    let prompt = style("> ").bold().cyan().to_string();
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor
                    .add_history_entry(&line)
                    .map_err(|e| ChatError::Input(format!("Failed to add history entry: {}", e)))?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(ChatError::Input(format!("Input error: {}", err))),
    }
}

/// Saves the editor history under the config directory.
pub fn save_history(editor: &mut Editor<ChatHelper, FileHistory>) -> Result<(), ChatError> {
    let history_path = Config::input_history_path();
    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
}

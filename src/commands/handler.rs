use super::ChatSession;
use crate::core::error::ChatError;

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, session: &mut ChatSession, args: &[&str])
    -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ModelCommand;
pub struct FilesCommand;
pub struct OpenCommand;
pub struct TodayCommand;
pub struct SaveCommand;
pub struct ClearCommand;
pub struct DeleteCommand;

impl CommandHandler for QuitCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        session.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            QuitCommand.help().to_string(),
            HelpCommand.help().to_string(),
            ModelCommand.help().to_string(),
            FilesCommand.help().to_string(),
            OpenCommand.help().to_string(),
            TodayCommand.help().to_string(),
            SaveCommand.help().to_string(),
            ClearCommand.help().to_string(),
            DeleteCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        if args.is_empty() {
            Ok(Some(format!("Current model: {}", session.model)))
        } else {
            session.model = args[0].to_string();
            Ok(Some(format!("Model changed to: {}", session.model)))
        }
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the current model"
    }
}

impl CommandHandler for FilesCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let names = session.store.list()?;
        let listing = names
            .iter()
            .map(|name| {
                if name == session.selected_file() {
                    format!("{} {}", style("*").bold().green(), name)
                } else {
                    format!("  {}", name)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Some(listing))
    }

    fn help(&self) -> &'static str {
        "/files - List conversation files by day"
    }
}

impl CommandHandler for OpenCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        if args.is_empty() {
            return Ok(Some("Please specify a file name (see /files)".to_string()));
        }

        session.select(args[0])?;
        Ok(Some(format!(
            "Selected file: {}",
            session.store.path(args[0]).display()
        )))
    }

    fn help(&self) -> &'static str {
        "/open <file> - Switch to another day's conversation"
    }
}

impl CommandHandler for TodayCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let today = session.select_today()?;
        Ok(Some(format!(
            "Selected file: {}",
            session.store.path(&today).display()
        )))
    }

    fn help(&self) -> &'static str {
        "/today - Switch to today's conversation, creating it if needed"
    }
}

impl CommandHandler for SaveCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        session.save_now()?;
        Ok(Some(format!(
            "Saved {} message(s) to {}",
            session.messages.len(),
            session.store.path(session.selected_file()).display()
        )))
    }

    fn help(&self) -> &'static str {
        "/save - Write the conversation to its file now"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        session.clear_current()?;
        Ok(Some("Conversation cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Empty the current conversation file"
    }
}

impl CommandHandler for DeleteCommand {
    fn execute(
        &self,
        session: &mut ChatSession,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let path = session.store.path(session.selected_file()).display().to_string();
        session.delete_current()?;
        Ok(Some(format!("Deleted {}", path)))
    }

    fn help(&self) -> &'static str {
        "/delete - Delete the current conversation file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;
    use crate::providers::Message;
    use crate::store::ConversationStore;
    use tempfile::TempDir;

    fn session() -> (TempDir, ChatSession) {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path()).unwrap();
        let session = ChatSession::new(store, "llama3.2:latest").unwrap();
        (dir, session)
    }

    #[test]
    fn model_command_shows_then_changes() {
        let (_dir, mut session) = session();
        let dispatcher = create_command_registry();

        let shown = dispatcher.execute("model", &[], &mut session).unwrap();
        assert_eq!(shown, Some("Current model: llama3.2:latest".to_string()));

        dispatcher
            .execute("model", &["qwen3:8b"], &mut session)
            .unwrap();
        assert_eq!(session.model, "qwen3:8b");
    }

    #[test]
    fn unknown_command_is_an_input_error() {
        let (_dir, mut session) = session();
        let dispatcher = create_command_registry();
        let err = dispatcher.execute("frobnicate", &[], &mut session);
        assert!(matches!(err, Err(ChatError::Input(_))));
    }

    #[test]
    fn clear_command_empties_file_and_memory() {
        let (_dir, mut session) = session();
        session.sync();
        session.messages.push(Message::user("hello"));
        session.messages.push(Message::assistant("hi"));
        session.save_now().unwrap();

        let dispatcher = create_command_registry();
        dispatcher.execute("clear", &[], &mut session).unwrap();

        assert!(session.messages.is_empty());
        assert!(session.store.load(session.selected_file()).is_empty());
    }

    #[test]
    fn delete_command_removes_the_file() {
        let (_dir, mut session) = session();
        session.sync();
        session.messages.push(Message::user("hello"));
        session.save_now().unwrap();

        let dispatcher = create_command_registry();
        dispatcher.execute("delete", &[], &mut session).unwrap();

        assert!(session.messages.is_empty());
        assert!(!session.store.path(session.selected_file()).exists());
    }

    #[test]
    fn open_command_switches_selection() {
        let (_dir, mut session) = session();
        session.store.save("chat_2020-01-01.json", &[]).unwrap();

        let dispatcher = create_command_registry();
        dispatcher
            .execute("open", &["chat_2020-01-01.json"], &mut session)
            .unwrap();
        assert_eq!(session.selected_file(), "chat_2020-01-01.json");
    }

    #[test]
    fn files_command_marks_the_selection() {
        let (_dir, mut session) = session();
        let dispatcher = create_command_registry();
        let listing = dispatcher
            .execute("files", &[], &mut session)
            .unwrap()
            .unwrap();
        assert!(listing.contains(session.selected_file()));
    }
}

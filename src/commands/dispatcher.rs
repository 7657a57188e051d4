use super::{
    ChatSession,
    handler::{
        ClearCommand, DeleteCommand, FilesCommand, HelpCommand, ModelCommand, OpenCommand,
        QuitCommand, SaveCommand, TodayCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::ChatError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        session: &mut ChatSession,
    ) -> Result<Option<String>, ChatError> {
        self.registry.execute(command, args, session)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("model", ModelCommand);
    registry.register("files", FilesCommand);
    registry.register("open", OpenCommand);
    registry.register("today", TodayCommand);
    registry.register("save", SaveCommand);
    registry.register("clear", ClearCommand);
    registry.register("delete", DeleteCommand);

    CommandDispatcher::new(Arc::new(registry))
}

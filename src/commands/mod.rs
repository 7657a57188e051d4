pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::core::error::ChatError;
use crate::providers::Message;
use crate::store::ConversationStore;
pub use dispatcher::create_command_registry;

/// Per-session state: which day file is selected, what is loaded in memory,
/// and the active model. The selected and loaded file can drift apart for
/// one cycle; `sync` reconciles them.
pub struct ChatSession {
    pub store: ConversationStore,
    pub messages: Vec<Message>,
    pub model: String,
    pub should_continue: bool,
    selected: String,
    loaded: Option<String>,
}

impl ChatSession {
    /// Opens a session on today's file, or the most recent one if today's
    /// does not exist yet.
    pub fn new(store: ConversationStore, model: &str) -> Result<Self, ChatError> {
        let names = store.list()?;
        let today = ConversationStore::today_file_name();
        let selected = if names.contains(&today) {
            today
        } else {
            names.last().cloned().unwrap_or(today)
        };

        Ok(Self {
            store,
            messages: Vec::new(),
            model: model.to_string(),
            should_continue: true,
            selected,
            loaded: None,
        })
    }

    pub fn selected_file(&self) -> &str {
        &self.selected
    }

    /// Reloads the in-memory list whenever the selected file identity has
    /// changed since the last load.
    pub fn sync(&mut self) {
        if self.loaded.as_deref() != Some(self.selected.as_str()) {
            self.messages = self.store.load(&self.selected);
            self.loaded = Some(self.selected.clone());
        }
    }

    /// Selects a file from the current directory listing.
    pub fn select(&mut self, name: &str) -> Result<(), ChatError> {
        let names = self.store.list()?;
        if !names.iter().any(|n| n == name) {
            return Err(ChatError::Input(format!(
                "No such conversation file: {} (see /files)",
                name
            )));
        }
        self.selected = name.to_string();
        Ok(())
    }

    /// Selects today's file, creating it empty if it does not exist yet.
    pub fn select_today(&mut self) -> Result<String, ChatError> {
        let today = ConversationStore::today_file_name();
        self.store.touch(&today)?;
        self.selected = today.clone();
        Ok(today)
    }

    /// Persists the in-memory list to the selected file.
    pub fn save_now(&self) -> Result<(), ChatError> {
        self.store.save(&self.selected, &self.messages)
    }

    /// Truncates the selected file to `[]` and empties the in-memory list.
    pub fn clear_current(&mut self) -> Result<(), ChatError> {
        self.store.clear(&self.selected)?;
        self.messages.clear();
        Ok(())
    }

    /// Deletes the selected file and empties the in-memory list. The file
    /// stays selected; the next save recreates it.
    pub fn delete_current(&mut self) -> Result<(), ChatError> {
        self.store.delete(&self.selected)?;
        self.messages.clear();
        Ok(())
    }
}

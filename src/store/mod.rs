use crate::core::error::ChatError;
use crate::display;
use crate::providers::Message;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "chat_";
const FILE_SUFFIX: &str = ".json";

/// Flat-file store of conversations, one pretty-printed JSON file per
/// calendar day. The whole file is the unit of storage: every save is a
/// full rewrite, last writer wins.
pub struct ConversationStore {
    dir: PathBuf,
}

impl ConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ChatError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// File name for today's conversation, e.g. `chat_2026-08-27.json`.
    pub fn today_file_name() -> String {
        let today = chrono::Local::now().date_naive();
        format!("{}{}{}", FILE_PREFIX, today.format("%Y-%m-%d"), FILE_SUFFIX)
    }

    /// Sorted names of the day-keyed files. An empty directory gets today's
    /// file created (empty, loads as `[]`) so there is always something to
    /// select.
    pub fn list(&self) -> Result<Vec<String>, ChatError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                names.push(name);
            }
        }

        if names.is_empty() {
            let today = Self::today_file_name();
            self.touch(&today)?;
            names.push(today);
        }

        names.sort();
        Ok(names)
    }

    /// Loads a conversation. An absent file or unparseable content yields an
    /// empty conversation; load never fails.
    pub fn load(&self, name: &str) -> Vec<Message> {
        let path = self.path(name);
        let Ok(contents) = fs::read_to_string(&path) else {
            return Vec::new();
        };
        if contents.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str(&contents) {
            Ok(messages) => messages,
            Err(_) => {
                display::warn(&format!(
                    "could not parse {}, starting with an empty conversation",
                    path.display()
                ));
                Vec::new()
            }
        }
    }

    /// Overwrites the file with the full serialized conversation.
    pub fn save(&self, name: &str, messages: &[Message]) -> Result<(), ChatError> {
        let json = serde_json::to_string_pretty(messages)?;
        fs::write(self.path(name), json)?;
        Ok(())
    }

    /// Truncates the file to an empty conversation.
    pub fn clear(&self, name: &str) -> Result<(), ChatError> {
        self.save(name, &[])
    }

    /// Removes the file entirely. Deleting an absent file is not an error.
    pub fn delete(&self, name: &str) -> Result<(), ChatError> {
        let path = self.path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Creates the file empty if it does not exist; never truncates.
    pub fn touch(&self, name: &str) -> Result<(), ChatError> {
        let path = self.path(name);
        if !path.exists() {
            fs::File::create(path)?;
        }
        Ok(())
    }
}

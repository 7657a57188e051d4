use crate::cli::Args;
use crate::commands::{ChatSession, dispatcher::CommandDispatcher};
use crate::config::Config;
use crate::core::error::ChatError;
use crate::display;
use crate::input;
use crate::providers::{ChatProvider, Message, ollama};
use crate::store::ConversationStore;
use is_terminal::IsTerminal;
use std::io::{self, Read};

pub struct Application {
    pub args: Args,
    pub config: Config,
    pub provider: Box<dyn ChatProvider>,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(
        args: Args,
        config: Config,
        provider: Box<dyn ChatProvider>,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, ChatError> {
        Ok(Self {
            args,
            config,
            provider,
            command_dispatcher,
        })
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        let chats_dir = self
            .args
            .chats_dir
            .clone()
            .or_else(|| self.config.chats_dir.clone())
            .unwrap_or_else(Config::default_chats_dir);
        let model = self
            .args
            .model
            .clone()
            .or_else(|| self.config.model.clone())
            .unwrap_or_else(|| ollama::DEFAULT_MODEL.to_string());

        let store = ConversationStore::new(chats_dir)?;
        let mut session = ChatSession::new(store, &model)?;

        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        if self.args.query.is_some() || context.is_some() {
            self.run_one_shot(&mut session, context).await
        } else {
            self.run_interactive(&mut session).await
        }
    }

    /// Runs a single turn against today's conversation and exits.
    async fn run_one_shot(
        &self,
        session: &mut ChatSession,
        context: Option<String>,
    ) -> Result<(), ChatError> {
        let input = match (self.args.query.as_deref(), context) {
            (Some(arg_q), Some(stdin_ctx)) => format!("<pipe>{}</pipe>\n\n{}", stdin_ctx, arg_q),
            (None, Some(stdin_ctx)) => format!("<pipe>{}</pipe>", stdin_ctx),
            (Some(arg_q), None) => arg_q.to_string(),
            (None, None) => {
                return Err(ChatError::Input("No query provided".to_string()));
            }
        };

        // One-shot turns always land in today's file, even when the session
        // opened on an older one.
        session.select_today()?;
        session.sync();
        self.run_turn(session, input).await?;

        if let Some(last) = session.messages.last() {
            display::display_reply(&last.content);
        }

        Ok(())
    }

    async fn run_interactive(&self, session: &mut ChatSession) -> Result<(), ChatError> {
        session.sync();
        display::display_banner(&session.store.path(session.selected_file()), &session.model);
        for message in &session.messages {
            display::display_turn(message);
        }

        let mut editor =
            input::create_editor(&self.command_dispatcher, session.store.dir().to_path_buf())?;

        loop {
            // Reload when the selected file changed during the last cycle.
            let before = session.selected_file().to_string();
            session.sync();

            let input = match input::read_input(&mut editor)? {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(rest) = input.strip_prefix('/') {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                if let Some((command, args)) = parts.split_first() {
                    match self.command_dispatcher.execute(command, args, session) {
                        Ok(Some(output)) => println!("{}", output),
                        Ok(None) => {}
                        Err(e) => eprintln!("Error executing command: {}", e),
                    }

                    if !session.should_continue {
                        break;
                    }

                    // Replay the conversation when the selection moved.
                    if session.selected_file() != before {
                        session.sync();
                        for message in &session.messages {
                            display::display_turn(message);
                        }
                    }
                }
                continue;
            }

            display::notice("Thinking...");
            if let Err(e) = self.run_turn(session, input).await {
                eprintln!("Error: {}", e);
                continue;
            }

            if let Some(last) = session.messages.last() {
                display::display_reply(&last.content);
            }
        }

        input::save_history(&mut editor)?;

        Ok(())
    }

    /// One full turn cycle: append the user message, persist, ask the
    /// endpoint, persist the reply. An inference failure becomes the
    /// assistant's reply text instead of an error, so it stays visible in
    /// the conversation.
    async fn run_turn(&self, session: &mut ChatSession, input: String) -> Result<(), ChatError> {
        session.messages.push(Message::user(input));
        session.save_now()?;

        let reply = match self
            .provider
            .chat(&session.messages, &session.model)
            .await
        {
            Ok(reply) => reply,
            Err(e) => format!("Error talking to Ollama: {}", e),
        };

        session.messages.push(Message::assistant(reply));
        session.save_now()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;
    use crate::providers::Role;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct CannedProvider {
        reply: Result<&'static str, ()>,
    }

    #[async_trait]
    impl ChatProvider for CannedProvider {
        async fn chat(&self, _messages: &[Message], _model: &str) -> Result<String, ChatError> {
            match self.reply {
                Ok(reply) => Ok(reply.to_string()),
                Err(()) => Err(ChatError::Network(
                    "Connection failed: connection refused".to_string(),
                )),
            }
        }
    }

    fn app(reply: Result<&'static str, ()>) -> Application {
        Application::new(
            Args::default(),
            Config::default(),
            Box::new(CannedProvider { reply }),
            create_command_registry(),
        )
        .unwrap()
    }

    fn session(dir: &TempDir) -> ChatSession {
        let store = ConversationStore::new(dir.path()).unwrap();
        let mut session = ChatSession::new(store, "llama3.2:latest").unwrap();
        session.sync();
        session
    }

    #[tokio::test]
    async fn successful_turn_persists_both_messages_in_order() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let app = app(Ok("hi there"));

        app.run_turn(&mut session, "hello".to_string()).await.unwrap();

        let stored = session.store.load(session.selected_file());
        assert_eq!(
            stored,
            vec![Message::user("hello"), Message::assistant("hi there")]
        );
    }

    #[tokio::test]
    async fn failed_turn_stores_a_readable_error_as_the_reply() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let app = app(Err(()));

        app.run_turn(&mut session, "hello".to_string()).await.unwrap();

        let stored = session.store.load(session.selected_file());
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].role, Role::Assistant);
        assert!(stored[1].content.contains("Error talking to Ollama"));
    }

    #[tokio::test]
    async fn one_shot_turn_lands_in_todays_file_not_the_most_recent() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path()).unwrap();
        let older = vec![Message::user("earlier"), Message::assistant("ok")];
        store.save("chat_2020-01-01.json", &older).unwrap();

        // With today's file absent the session opens on the older one.
        let mut session = ChatSession::new(store, "llama3.2:latest").unwrap();
        assert_eq!(session.selected_file(), "chat_2020-01-01.json");

        let mut app = app(Ok("hi there"));
        app.args.query = Some("hello".to_string());
        app.run_one_shot(&mut session, None).await.unwrap();

        let today = ConversationStore::today_file_name();
        assert_eq!(
            session.store.load(&today),
            vec![Message::user("hello"), Message::assistant("hi there")]
        );
        assert_eq!(session.store.load("chat_2020-01-01.json"), older);
    }

    #[tokio::test]
    async fn user_message_is_persisted_before_the_reply_arrives() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let app = app(Ok("hi there"));

        // After the cycle the file holds both; the first element is always
        // the user turn that was written before the endpoint call.
        app.run_turn(&mut session, "hello".to_string()).await.unwrap();
        let stored = session.store.load(session.selected_file());
        assert_eq!(stored[0], Message::user("hello"));
    }
}

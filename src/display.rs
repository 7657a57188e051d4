use crate::providers::{Message, Role};
use console::style;
use termimad::MadSkin;

/// Header shown when the interactive session starts.
pub fn display_banner(file: &std::path::Path, model: &str) {
    println!(
        "{} {}",
        style("Local LLM Chat").bold().magenta(),
        style(format!("({})", model)).dim()
    );
    println!("{} {}", style("File:").bold(), file.display());
    println!(
        "{}",
        style("Type /help for commands. Press Ctrl+D or type /quit to exit.").dim()
    );
}

/// Replays one persisted turn with a role prefix.
pub fn display_turn(message: &Message) {
    let prefix = match message.role {
        Role::User => style("You").bold().cyan(),
        Role::Assistant => style("Assistant").bold().green(),
    };
    println!("\n{}: {}", prefix, message.content);
}

/// Shows an assistant reply, rendering markdown when it looks like markdown.
pub fn display_reply(content: &str) {
    println!("\n{}:", style("Assistant").bold().green());
    if content.contains("```")
        || content.contains('*')
        || content.contains('`')
        || content.contains('#')
    {
        let skin = MadSkin::default();
        skin.print_text(content);
    } else {
        println!("{}", content);
    }
}

pub fn notice(text: &str) {
    println!("{}", style(text).dim());
}

pub fn warn(text: &str) {
    eprintln!("{} {}", style("Warning:").bold().yellow(), text);
}

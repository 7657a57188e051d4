use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// One-shot question; omit to start an interactive session
    pub query: Option<String>,

    /// Model to send with every request
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the inference endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Directory holding the day-keyed conversation files
    #[arg(long)]
    pub chats_dir: Option<PathBuf>,
}

//! Console adapter for development/testing

use async_trait::async_trait;
use crate::domain::entities::{Reply, Segment};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "picar-bot".to_string(),
                username: "console".to_string(),
            },
        }
    }

    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        use std::io::Write;
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok()?;
        Some(input.trim().to_string())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn send_reply(&self, chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        match reply {
            Reply::Text(text) => self.send_message(chat_id, text).await,
            Reply::Forward(nodes) => {
                println!("[BOT] forwarded message:");
                for node in nodes {
                    let mut line = format!("  [{}] ", node.author_name);
                    for segment in &node.segments {
                        match segment {
                            Segment::Text(text) => line.push_str(text),
                            Segment::Image(reference) => {
                                line.push_str(&format!("[image {}]", truncate_reference(reference)));
                            }
                        }
                    }
                    println!("{}", line.replace('\n', "\n        "));
                }
                Ok("console_msg".to_string())
            }
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Data URIs carry whole payloads; keep terminal lines readable
fn truncate_reference(reference: &str) -> String {
    const MAX: usize = 48;
    if reference.len() <= MAX {
        reference.to_string()
    } else {
        let cut: String = reference.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_references_are_truncated() {
        let long = format!("data:image/png;base64,{}", "A".repeat(200));
        let shown = truncate_reference(&long);
        assert!(shown.len() <= 51);
        assert!(shown.ends_with("..."));
        assert_eq!(truncate_reference("short.png"), "short.png");
    }
}

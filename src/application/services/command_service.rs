use crate::domain::entities::{Command, CommandRegistry, Message, Content, Reply};
use crate::application::errors::CommandError;

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        tracing::debug!("Registered command '{}'", command.name);
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        // Help command
        self.register(Command::new("help")
            .with_description("Show help message")
            .with_usage("/help")
            .with_handler(|_msg| {
                Ok(Reply::text(
                    "Available commands:\n\
                     /pic [tag] - Send a random stored picture\n\
                     /pic.list <tag> [page] - List pictures under a tag\n\
                     /pic.tags - List known tags\n\
                     /pic.add <tag> - Store the attached pictures under a tag\n\
                     /help - Show this message\n\
                     /version - Show version",
                ))
            }));

        // Version command
        self.register(Command::new("version")
            .with_description("Show bot version")
            .with_handler(|_| {
                Ok(Reply::text(format!("picar-bot v{}", env!("CARGO_PKG_VERSION"))))
            }));
    }

    pub fn handle(&self, message: &Message) -> Result<Option<Reply>, CommandError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        // Find command (without prefix)
        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        tracing::debug!("Executing command '{}'", cmd.name);

        // Execute handler
        if let Some(handler) = &cmd.handler {
            Ok(Some(handler(message.clone())?))
        } else {
            Ok(Some(Reply::text(format!("Command {} not implemented", cmd.name))))
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.get(name) {
                let mut help = format!("/{} - {}", cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}", usage));
                }
                return help;
            }
            return format!("Command /{} not found", name);
        }

        // List all commands
        let mut help = "Available commands:\n".to_string();
        for cmd in self.registry.all() {
            help.push_str(&format!("  /{} - {}\n", cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        help
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_registered_command() {
        let mut service = CommandService::new("/");
        service.register(Command::new("ping").with_handler(|_| Ok(Reply::text("pong"))));

        let msg = Message::from_command("console", "ping", vec![]);
        let reply = service.handle(&msg).unwrap().unwrap();
        assert_eq!(reply.as_text(), Some("pong"));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let service = CommandService::new("/");
        let msg = Message::from_command("console", "nope", vec![]);
        assert!(matches!(service.handle(&msg), Err(CommandError::NotFound(_))));
    }

    #[test]
    fn non_command_yields_nothing() {
        let service = CommandService::new("/");
        let msg = Message::from_text("console", "hello");
        assert!(service.handle(&msg).unwrap().is_none());
    }
}

use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::messaging::MessageParser;
use application::services::{CommandService, GalleryService};
use domain::entities::{Command, Reply, User};
use domain::traits::{Bot, ImageStore};
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::config::{Config, SourceConfig};
use infrastructure::database::Database;
use infrastructure::resolver::TemplateResolver;
use infrastructure::sources::SourceLister;

#[derive(Parser)]
#[command(name = "picar-bot")]
#[command(about = "A picture gallery chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config);
        }
        Commands::Version => {
            println!("picar-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting picar-bot: {}", config.bot.name);

    // Initialize database
    let store: Arc<dyn ImageStore> = match Database::new(&config.gallery.database_path) {
        Ok(db) => {
            tracing::info!("Database initialized");
            Arc::new(db)
        }
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            return;
        }
    };

    let resolver = Arc::new(TemplateResolver::new(SourceLister::new(
        config.gallery.picture_dir.clone(),
        config.gallery.cache_dir.clone(),
    )));

    // Initialize command service
    let mut commands = CommandService::new(&config.bot.prefix);
    commands.register_defaults();
    register_gallery_commands(&mut commands, store);
    register_source_commands(&mut commands, &config.sources, resolver);

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let bot = ConsoleAdapter::new();
        run_console_bot(bot, commands).await;
    });
}

/// The four tag store commands
fn register_gallery_commands(commands: &mut CommandService, store: Arc<dyn ImageStore>) {
    let gallery = Arc::new(GalleryService::new(store));

    let service = gallery.clone();
    commands.register(Command::new("pic")
        .with_description("Send a random stored picture")
        .with_usage("/pic [tag]")
        .with_handler(move |msg| service.random_image(msg.arg(0))));

    let service = gallery.clone();
    commands.register(Command::new("pic.list")
        .with_description("List pictures under a tag")
        .with_usage("/pic.list <tag> [page]")
        .with_handler(move |msg| service.list_page(msg.arg(0), msg.arg(1), msg.sender.as_ref())));

    let service = gallery.clone();
    commands.register(Command::new("pic.tags")
        .with_description("List known tags")
        .with_usage("/pic.tags")
        .with_handler(move |_msg| service.list_tags()));

    let service = gallery;
    commands.register(Command::new("pic.add")
        .with_description("Store the attached pictures under a tag")
        .with_usage("/pic.add <tag>")
        .with_handler(move |msg| service.add_images(msg.arg(0), &msg)));
}

/// One template command per configured source
fn register_source_commands(
    commands: &mut CommandService,
    sources: &[SourceConfig],
    resolver: Arc<TemplateResolver>,
) {
    for source in sources {
        tracing::debug!("Binding command '{}' to source '{}'", source.command, source.url);
        let resolver = resolver.clone();
        let name = source.command.clone();
        let url = source.url.clone();
        let template = source.template.clone();
        commands.register(Command::new(source.command.as_str())
            .with_description("Send a configured picture template")
            .with_handler(move |_msg| {
                tracing::debug!("Command '{}' resolving template against '{}'", name, url);
                Ok(Reply::Text(resolver.resolve(&template, &url)))
            }));
    }
}

async fn run_console_bot<B: Bot>(bot: B, commands: CommandService) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let parser = MessageParser::new(commands.prefix());

    // Main loop (for console mode)
    loop {
        if let Some(input) = ConsoleAdapter::new().read_line("> ").await {
            let input = input.trim();
            if input.is_empty() {
                continue;
            }

            let msg = parser.parse("console", input, Some(User::new("console")));
            if !msg.content.is_command() {
                continue;
            }

            match commands.handle(&msg) {
                Ok(Some(reply)) => {
                    let _ = bot.send_reply("console", &reply).await;
                }
                Ok(None) => {}
                Err(e) => {
                    let _ = bot.send_message("console", &format!("Error: {}", e)).await;
                }
            }
        }
    }
}

fn init_config() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Attachment;
    use crate::infrastructure::storage::MemoryStore;

    fn wired_commands(store: Arc<dyn ImageStore>) -> CommandService {
        let mut commands = CommandService::new("/");
        commands.register_defaults();
        register_gallery_commands(&mut commands, store);
        commands
    }

    #[test]
    fn gallery_commands_flow_from_parser_to_reply() {
        let store: Arc<dyn ImageStore> = Arc::new(MemoryStore::new());
        let commands = wired_commands(store);
        let parser = MessageParser::new(commands.prefix());

        // Store two pictures under a fresh tag
        let msg = parser
            .parse("console", "/pic.add cats", Some(User::new("9001").with_username("ada")))
            .with_attachment(Attachment::new("https://cdn.example/a.jpg"))
            .with_attachment(Attachment::new("https://cdn.example/b.jpg"));
        let reply = commands.handle(&msg).unwrap().unwrap();
        assert_eq!(reply.as_text(), Some("Added 2 picture(s) under tag 'cats'."));

        // The tag shows up in the listing
        let msg = parser.parse("console", "/pic.tags", None);
        let reply = commands.handle(&msg).unwrap().unwrap();
        assert_eq!(reply.as_text(), Some("- cats"));

        // A random picture comes back as inline image markup
        let msg = parser.parse("console", "/pic cats", None);
        let reply = commands.handle(&msg).unwrap().unwrap();
        assert!(reply.as_text().unwrap().starts_with("<img src=\"https://cdn.example/"));

        // The paginated listing is a forwarded message
        let msg = parser.parse("console", "/pic.list cats", Some(User::new("9001")));
        let reply = commands.handle(&msg).unwrap().unwrap();
        assert!(matches!(reply, Reply::Forward(ref nodes) if nodes.len() == 3));
    }

    #[test]
    fn source_commands_resolve_their_template() {
        let pics = tempfile::tempdir().unwrap();
        std::fs::write(pics.path().join("only.png"), b"png-bytes").unwrap();
        let cache = tempfile::tempdir().unwrap();

        let resolver = Arc::new(TemplateResolver::new(SourceLister::new(
            pics.path(),
            cache.path(),
        )));
        let mut commands = CommandService::new("/");
        let sources = vec![SourceConfig {
            command: "picar".to_string(),
            url: ".".to_string(),
            template: "daily pick: {pict}".to_string(),
        }];
        register_source_commands(&mut commands, &sources, resolver);

        let parser = MessageParser::new("/");
        let msg = parser.parse("console", "/picar", None);
        let reply = commands.handle(&msg).unwrap().unwrap();
        let text = reply.as_text().unwrap();
        assert!(text.starts_with("daily pick: <img src=\"data:image/png;base64,"));
    }
}

//! Binary entrypoint for the Meshfish CLI.
//!
//! Commands:
//! - `init` - write a starter `meshfish.toml` and create the data directory
//! - `fish --user <id> [--channel <name>]` - cast once and print the catch
//! - `bag --user <id>` - list the bag
//! - `sell --user <id> <target>` - sell by fish name, quality, or `all`
//! - `stats --user <id>` - rod level and counters
//! - `toggle --user <id> --channel <name>` - flip fishing for a channel (admins only)
//! - `shell --user <id> [--channel <name>]` - read chat lines from stdin and answer them
//!
//! See the library crate docs for module-level details: `meshfish::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use meshfish::app::FishingApp;
use meshfish::config::Config;

#[derive(Parser)]
#[command(name = "meshfish")]
#[command(about = "A chance-based fishing game for mesh chat channels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "meshfish.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Cast once
    Fish {
        #[arg(short, long)]
        user: String,
        /// Channel the cast happens in; omit for a direct conversation
        #[arg(long)]
        channel: Option<String>,
    },
    /// Show the bag
    Bag {
        #[arg(short, long)]
        user: String,
    },
    /// Sell fish by name, quality, or `all`
    Sell {
        #[arg(short, long)]
        user: String,
        /// Fish name, quality name, or `all`
        #[arg(num_args = 1.., required = true)]
        target: Vec<String>,
    },
    /// Show rod level and counters
    Stats {
        #[arg(short, long)]
        user: String,
    },
    /// Turn fishing on or off for a channel
    Toggle {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        channel: String,
    },
    /// Interactive line-oriented session
    Shell {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        channel: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `None` verb means the interactive shell
    let (user, channel, verb) = match cli.command {
        Commands::Init => return init_config(&cli.config, cli.verbose).await,
        Commands::Shell { user, channel } => (user, channel, None),
        Commands::Fish { user, channel } => (user, channel, Some("FISH".to_string())),
        Commands::Bag { user } => (user, None, Some("BAG".to_string())),
        Commands::Sell { user, target } => (user, None, Some(format!("SELL {}", target.join(" ")))),
        Commands::Stats { user } => (user, None, Some("STATS".to_string())),
        Commands::Toggle { user, channel } => (user, Some(channel), Some("FISHTOGGLE".to_string())),
    };

    let config = match Config::load_if_present(&cli.config).await? {
        Some(cfg) => cfg,
        None => {
            eprintln!(
                "{} not found (run `meshfish init` to create one); using defaults",
                cli.config
            );
            Config::default()
        }
    };
    init_logging(&Some(config.clone()), cli.verbose);

    let mut app = FishingApp::open(&config)?;
    let prefix = config.commands.prefix.clone();
    let Some(verb) = verb else {
        return run_shell(&mut app, &user, channel.as_deref(), &prefix).await;
    };

    let line = format!("{}{}", prefix, verb);
    let mut rng = rand::thread_rng();
    if let Some(reply) = app.processor.handle(&user, channel.as_deref(), &line, &mut rng) {
        tokio::time::sleep(reply.reveal_delay).await;
        println!("{}", reply.text);
    }
    Ok(())
}

async fn init_config(path: &str, verbosity: u8) -> Result<()> {
    init_logging(&None, verbosity);
    info!("Initializing new Meshfish configuration");
    if std::path::Path::new(path).exists() {
        warn!("{} already exists, leaving it untouched", path);
    } else {
        Config::create_default(path).await?;
        println!("Created default configuration at {}", path);
    }
    let config = Config::load(path).await?;
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;
    println!("Data directory: {}", config.storage.data_dir);
    Ok(())
}

async fn run_shell(app: &mut FishingApp, user: &str, channel: Option<&str>, prefix: &str) -> Result<()> {
    println!(
        "Fishing as {}. Type {}FISHHELP for commands, `quit` to leave.",
        user, prefix
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rng = rand::thread_rng();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        match app.processor.handle(user, channel, trimmed, &mut rng) {
            Some(reply) => {
                if !reply.reveal_delay.is_zero() {
                    println!("...");
                }
                tokio::time::sleep(reply.reveal_delay).await;
                println!("{}", reply.text);
            }
            None => println!("(not a fishing command, try {}FISHHELP)", prefix),
        }
    }
    let snap = meshfish::metrics::snapshot();
    info!(
        "Shell closed: {} catches, {} upgrades, {} downgrades, {} sales this session",
        snap.catches_total,
        snap.upgrades,
        snap.downgrades_total(),
        snap.sales
    );
    Ok(())
}

fn parse_level(level: &str) -> log::LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        "off" => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|cfg| parse_level(&cfg.logging.level))
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    let log_file = config.as_ref().and_then(|cfg| cfg.logging.file.clone());
    let opened = log_file.and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });
    match opened {
        Some(f) => {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Echo to the console only when attached to a terminal
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}

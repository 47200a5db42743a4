use anyhow::Context;
use clap::{Parser, Subcommand};
use hexclock::app::App;
use hexclock::config;
use hexclock::events;
use hexclock::sys::{runtime, server};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the one in the config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for events on a Unix socket and print engine output to stdout
    Run {
        #[arg(short, long)]
        socket: Option<PathBuf>,
    },
    /// Feed a JSON-lines event file through the engine
    Replay { file: PathBuf },
    /// Write the default configuration file if none exists
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Run { socket } => {
            let config = config::load_or_default(config_path);
            let watched = config::resolve_config_path(config_path)
                .inspect_err(|e| log::warn!("Config watching disabled: {}", e))
                .ok();
            let socket = server::socket_path_or_default(socket.as_deref());

            let (tx, rx) = async_channel::bounded(256);
            runtime::start_background_services(socket, watched, tx);

            let mut app = App::new(config, cli.config.clone(), io::stdout());
            while let Ok(event) = rx.recv_blocking() {
                app.handle(event);
                if rx.is_empty() {
                    app.flush();
                }
            }
        }
        Command::Replay { file } => {
            let config = config::load_or_default(config_path);
            let input = fs_err::read_to_string(&file)?;

            let mut app = App::new(config, cli.config.clone(), io::stdout());
            for (number, line) in input.lines().enumerate() {
                match events::parse_line(line) {
                    Ok(Some(event)) => app.handle(event),
                    Ok(None) => {}
                    Err(e) => log::warn!("{}:{}: {}", file.display(), number + 1, e),
                }
            }
            app.flush();
        }
        Command::InitConfig => {
            let path = config::write_default_config(config_path)
                .context("Failed to write default configuration")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

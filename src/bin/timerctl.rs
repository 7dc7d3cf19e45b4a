use clap::{Parser, Subcommand};
use ringtimer::sys::server::{SOCKET_PATH, Verb};
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "timerctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Arm the dial with a duration in seconds
    Start { seconds: u64 },
    /// Cancel the armed timer
    Cancel,
    /// Replace the text shown in the middle of the dial
    Text { text: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let line = match cli.command {
        Commands::Start { seconds } => format!("{} {}", Verb::Start, seconds),
        Commands::Cancel => Verb::Cancel.to_string(),
        Commands::Text { text } => {
            if text.contains('\n') {
                anyhow::bail!("Display text must fit on one line");
            }
            format!("{} {}", Verb::Text, text)
        }
    };

    send_command(&line)
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to ringtimer at {}: {}. Is ringtimer running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    log::debug!("Sent '{}'", cmd);
    Ok(())
}

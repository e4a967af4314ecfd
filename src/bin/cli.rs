//! strand CLI Client
//!
//! Command-line client for the strand daemon: encodes command batches and
//! writes them to the server socket.

use std::io::Write;
use std::net::TcpStream;

use clap::{Parser, Subcommand};

use strand::protocol::{encode_batch, Command};

/// strand CLI
#[derive(Parser, Debug)]
#[command(name = "strand-cli")]
#[command(about = "Client for the strand LED daemon")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7805")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn every LED off
    Clear {
        /// Render immediately after
        #[arg(long)]
        show: bool,
    },

    /// Set a single LED
    Set {
        /// LED index
        index: u8,
        red: u8,
        green: u8,
        blue: u8,

        /// Render immediately after
        #[arg(long)]
        show: bool,
    },

    /// Set every LED to one color
    Fill {
        red: u8,
        green: u8,
        blue: u8,

        /// Render immediately after
        #[arg(long)]
        show: bool,
    },

    /// Render the current buffer to the strip
    Show,

    /// Paint a color wheel across the strip and render it
    Rainbow {
        /// Number of LEDs to paint (the u8 wire index caps this at 256)
        #[arg(short, long, default_value = "189")]
        led_count: usize,
    },
}

fn main() {
    let args = Args::parse();

    let commands = match args.command {
        Commands::Clear { show } => with_show(vec![Command::Clear], show),
        Commands::Set { index, red, green, blue, show } => {
            with_show(vec![Command::SetPixel { index, red, green, blue }], show)
        }
        Commands::Fill { red, green, blue, show } => {
            with_show(vec![Command::FillAll { red, green, blue }], show)
        }
        Commands::Show => vec![Command::Show],
        Commands::Rainbow { led_count } => rainbow(led_count),
    };

    if let Err(e) = send(&args.server, &commands) {
        eprintln!("strand-cli: {e}");
        std::process::exit(1);
    }
}

fn send(server: &str, commands: &[Command]) -> strand::Result<()> {
    let mut stream = TcpStream::connect(server)?;
    stream.write_all(&encode_batch(commands))?;
    stream.flush()?;
    Ok(())
}

fn with_show(mut commands: Vec<Command>, show: bool) -> Vec<Command> {
    if show {
        commands.push(Command::Show);
    }
    commands
}

/// One batch painting a full color wheel, ending in a render.
fn rainbow(led_count: usize) -> Vec<Command> {
    let count = led_count.min(u8::MAX as usize + 1);
    let mut commands = Vec::with_capacity(count + 1);
    for i in 0..count {
        let (red, green, blue) = wheel(((i * 256 / count) & 0xff) as u8);
        commands.push(Command::SetPixel { index: i as u8, red, green, blue });
    }
    commands.push(Command::Show);
    commands
}

/// Map 0-255 to a color; the hues transition r → g → b → back to r.
fn wheel(pos: u8) -> (u8, u8, u8) {
    match pos {
        0..=84 => (255 - pos * 3, pos * 3, 0),
        85..=169 => {
            let pos = pos - 85;
            (0, 255 - pos * 3, pos * 3)
        }
        _ => {
            let pos = pos - 170;
            (pos * 3, 0, 255 - pos * 3)
        }
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::runtime::Builder;

use link_state_sim::commands::{self, Command, MENU, Reply};
use link_state_sim::{NetworkSimulator, SimulatorConfig, Topology};

#[derive(Parser)]
#[command(name = "link-state-sim", about = "Interactive link-state routing simulator")]
struct Cli {
    /// Topology file (line format, or JSON when it ends in .json)
    #[arg(long)]
    topology: Option<PathBuf>,

    /// JSON simulator configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hops an advertisement may travel
    #[arg(long)]
    ttl: Option<u32>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulatorConfig::default(),
    };
    config.apply_overrides(cli.topology, cli.ttl);
    config.validate()?;

    let topology = Topology::load(&config.topology_path)
        .with_context(|| format!("reading topology {}", config.topology_path.display()))?;
    let mut simulator = NetworkSimulator::new(&topology, config)?;
    println!("Network created with {} routers.", simulator.len());

    let rt = Builder::new_current_thread().enable_all().build()?;

    rt.block_on(async move {
        let mut stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            stdout.write_all(format!("\n{}", MENU).as_bytes()).await?;
            stdout.flush().await?;

            line.clear();
            if stdin.read_line(&mut line).await? == 0 {
                info!("Input closed");
                break;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(_) => {
                    println!("Invalid input.");
                    continue;
                }
            };

            match commands::execute(&mut simulator, command) {
                Ok(reply) => {
                    println!("{}", reply);
                    if reply == Reply::Quit {
                        return Ok(());
                    }
                }
                Err(e) => {
                    debug!("{:?} failed: {}", command, e);
                    println!("{}", e);
                }
            }
        }

        println!("{}", Reply::Quit);
        Ok::<(), anyhow::Error>(())
    })
}

//! Terminal driver for the dice race arena.
//!
//! Reads commands from stdin, forwards them to an ArenaActor and prints
//! the arena's notifications as they arrive.

use anyhow::Error;
use ctrlc::set_handler;
use dice_race::{ArenaActor, opponent::Roster, profile::ProfileStore};
use dr_cli::{
    commands::{USAGE, parse_command},
    config::{CliConfig, HELP},
    session::{Reply, dispatch},
};
use log::info;
use pico_args::Arguments;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let player: Option<String> = pargs.opt_value_from_str("--player")?;
    let profile_path: Option<PathBuf> = pargs.opt_value_from_str("--profile")?;
    let seed: Option<u64> = pargs.opt_value_from_str("--seed")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = CliConfig::from_env(player, profile_path, seed)?;
    config.validate()?;

    let profiles = match &config.profile_path {
        Some(path) => {
            info!("Loading profiles from {}", path.display());
            ProfileStore::load(path).await?
        }
        None => ProfileStore::in_memory(),
    };

    let (handle, task) = ArenaActor::spawn(
        config.player(),
        config.arena.clone(),
        Roster::default_roster(),
        profiles,
    )
    .map_err(Error::msg)?;
    info!("Arena ready for {}", config.player_id);

    let mut notifications = handle.subscribe("terminal", 64).await.map_err(Error::msg)?;
    tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            println!("* {notification}");
        }
    });

    print!("{USAGE}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match dispatch(&handle, command).await.map_err(Error::msg)? {
            Reply::Print(output) => {
                for line in output {
                    println!("{line}");
                }
            }
            Reply::Quit => break,
        }
    }

    handle.close().await.map_err(Error::msg)?;
    task.await?;
    Ok(())
}

use clap::{Args, Parser, Subcommand};
use shoeboard::config::{ConfigError, ConfigOverrides, DashboardConfig};
use shoeboard::net::types::Game;
use shoeboard::state::projection::SuitKeyMatch;
use shoeboard::{ActionOutcome, Dashboard, TransportError, render};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("game not found: {0}")]
    UnknownGame(String),
    #[error("{0}")]
    ActionFailed(String),
}

/// Connection flags override the matching `SHOEBOARD_*` variables, which
/// the config layer reads itself.
#[derive(Parser, Debug)]
#[command(name = "shoeboard", about = "Operator dashboard for the card shoe backend")]
struct Cli {
    /// Overrides `SHOEBOARD_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `SHOEBOARD_API_ROOT`.
    #[arg(long)]
    api_root: Option<String>,

    /// Overrides `SHOEBOARD_POLL_INTERVAL_MS`.
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Overrides `SHOEBOARD_SUIT_MATCH`.
    #[arg(long)]
    suit_match: Option<SuitKeyMatch>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe backend liveness.
    Ping,
    Games(GamesCommand),
    /// Shuffle the shoe of a game.
    Shuffle { game_id: String },
    /// Create a fresh deck and add it to a game's shoe.
    AddDeck { game_id: String },
    /// Add a player to a game.
    Join { game_id: String, name: String },
    /// Remove a player from a game.
    Leave { game_id: String, player_id: String },
    /// Deal one card to a player.
    Deal { game_id: String, player_id: String },
    /// Follow a game live.
    Watch {
        game_id: String,
        /// Stop after this many renders.
        #[arg(long)]
        cycles: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct GamesCommand {
    #[command(subcommand)]
    command: GamesSubcommand,
}

#[derive(Subcommand, Debug)]
enum GamesSubcommand {
    List,
    Create,
    Delete { game_id: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shoeboard=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dashboard = Dashboard::from_config(build_config(&cli)?)?;

    match cli.command {
        Command::Ping => {
            println!("{}", dashboard.health().await?);
            Ok(())
        }
        Command::Games(games) => run_games(&dashboard, games.command).await,
        Command::Shuffle { game_id } => {
            select(&dashboard, &game_id).await?;
            finish(&dashboard, dashboard.shuffle().await)
        }
        Command::AddDeck { game_id } => {
            select(&dashboard, &game_id).await?;
            finish(&dashboard, dashboard.add_deck().await)
        }
        Command::Join { game_id, name } => {
            select(&dashboard, &game_id).await?;
            dashboard.set_player_name_input(name);
            finish(&dashboard, dashboard.add_player().await)
        }
        Command::Leave { game_id, player_id } => {
            select(&dashboard, &game_id).await?;
            finish(&dashboard, dashboard.remove_player(&player_id).await)
        }
        Command::Deal { game_id, player_id } => {
            select(&dashboard, &game_id).await?;
            finish(&dashboard, dashboard.deal_one_card(&player_id).await)
        }
        Command::Watch { game_id, cycles } => run_watch(&dashboard, &game_id, cycles).await,
    }
}

/// Environment first, then any flag given on the command line.
fn build_config(cli: &Cli) -> Result<DashboardConfig, ConfigError> {
    DashboardConfig::from_env_with(&ConfigOverrides {
        base_url: cli.base_url.clone(),
        api_root: cli.api_root.clone(),
        poll_interval_ms: cli.poll_interval_ms,
        suit_match: cli.suit_match,
    })
}

async fn run_games(dashboard: &Dashboard, command: GamesSubcommand) -> Result<(), CliError> {
    let outcome = match command {
        GamesSubcommand::List => dashboard.refresh_games().await,
        GamesSubcommand::Create => dashboard.create_game().await,
        GamesSubcommand::Delete { game_id } => dashboard.delete_game(&game_id).await,
    };
    finish(dashboard, outcome)
}

/// Look the game up in a fresh list, select it and wait for its first cycle
/// so preconditions see real counts.
async fn select(dashboard: &Dashboard, game_id: &str) -> Result<Game, CliError> {
    if dashboard.refresh_games().await == ActionOutcome::Failed {
        return Err(failure(dashboard));
    }
    let game = dashboard
        .view()
        .games
        .find(game_id)
        .cloned()
        .ok_or_else(|| CliError::UnknownGame(game_id.to_owned()))?;
    dashboard.select(game.clone());
    dashboard.refresh().await;
    Ok(game)
}

fn failure(dashboard: &Dashboard) -> CliError {
    let message = dashboard.view().notice.map_or_else(|| "action failed".to_owned(), |n| n.message);
    CliError::ActionFailed(message)
}

fn finish(dashboard: &Dashboard, outcome: ActionOutcome) -> Result<(), CliError> {
    match outcome {
        ActionOutcome::Done => {
            print!("{}", render::view(&dashboard.view()));
            Ok(())
        }
        ActionOutcome::Skipped => {
            eprintln!("nothing to do");
            print!("{}", render::view(&dashboard.view()));
            Ok(())
        }
        ActionOutcome::Failed => Err(failure(dashboard)),
    }
}

async fn run_watch(dashboard: &Dashboard, game_id: &str, cycles: Option<u32>) -> Result<(), CliError> {
    let game = select(dashboard, game_id).await?;
    tracing::info!(game_id = %game.id, "watching");

    let period = dashboard.config().poll_interval;
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut rendered = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }
        println!("{}", render::view(&dashboard.view()));
        rendered += 1;
        if cycles.is_some_and(|n| rendered >= n) {
            break;
        }
    }

    dashboard.deselect();
    Ok(())
}

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use mnk_agent::ai::{HumanAgent, QLearningAgent};
use mnk_agent::checkpoint::{KnowledgeStore, ModelReport};
use mnk_agent::config::AppConfig;
use mnk_agent::error::{AgentError, GameError};
use mnk_agent::game::{Board, Outcome};
use mnk_agent::training::episode::RoundEvent;
use mnk_agent::training::trainer::{Trainer, TrainerConfig};
use mnk_agent::ui::BoardView;

/// Play an m,n,k-game against a learning agent.
#[derive(Parser)]
#[command(name = "mnk", about = "Play an m,n,k-game against a Q-learning agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Board width
    #[arg(short = 'm', long)]
    width: Option<usize>,

    /// Board height
    #[arg(short = 'n', long)]
    height: Option<usize>,

    /// Marks in a row needed to win
    #[arg(short = 'k', long)]
    win_length: Option<usize>,

    /// Play gomoku (19x19, five in a row)
    #[arg(long)]
    gomoku: bool,

    /// Number of rounds to play; asked for when omitted
    #[arg(long)]
    rounds: Option<usize>,

    /// Model file holding the learned values
    #[arg(long)]
    model: Option<PathBuf>,

    /// Play without updating the model
    #[arg(long)]
    no_learn: bool,

    /// Print a summary of the model file and exit
    #[arg(long)]
    status: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Some(m) = cli.width {
        config.game.m = m;
    }
    if let Some(n) = cli.height {
        config.game.n = n;
    }
    if let Some(k) = cli.win_length {
        config.game.k = k;
    }
    if cli.gomoku {
        config.game.gomoku = true;
    }
    if let Some(model) = &cli.model {
        config.training.model_path = model.clone();
    }
    if cli.no_learn {
        config.agent.learn = false;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn prompt_rounds() -> Result<usize> {
    print!("How many rounds? ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    match line.trim().parse::<usize>() {
        Ok(rounds) if rounds > 0 => Ok(rounds),
        _ => bail!("'{}' is not a positive number of rounds", line.trim()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = load_config(&cli)?;
    let store = KnowledgeStore::new(&config.training.model_path);

    if cli.status {
        let knowledge = store
            .load()
            .with_context(|| format!("reading {}", store.path().display()))?
            .unwrap_or_default();
        println!("{}", ModelReport::from_knowledge(&knowledge));
        return Ok(());
    }

    let (m, n, k) = config.game.dimensions();
    let mut board = Board::new(m, n, k).context("creating board")?;
    if config.agent.learn {
        store
            .check_writable()
            .with_context(|| format!("model file {} is not writable", store.path().display()))?;
    }

    let rounds = match cli.rounds {
        Some(rounds) => rounds,
        None => prompt_rounds()?,
    };

    let knowledge = store.load_or_fresh().into_shared();
    let mut human = HumanAgent::new(1, "X", io::stdin().lock(), io::stdout());
    let mut agent = QLearningAgent::new(2, "O", config.agent.clone(), knowledge.clone());

    let mut trainer = Trainer::new(TrainerConfig {
        rounds,
        save_interval: 1,
        log_interval: rounds,
        ..config.training.clone()
    });
    if config.agent.learn {
        trainer = trainer.with_store(store);
    }

    let view = BoardView::new([(1, "X"), (2, "O")]);
    info!(m, n, k, rounds, "Starting game");

    let session = trainer.run(&mut board, &mut [&mut human, &mut agent], &knowledge, |event| {
        match event {
            RoundEvent::Started { state, .. } => print!("\n{}", view.render(state)),
            RoundEvent::Moved { state, message, .. } => {
                print!("\n{}", view.render(state));
                if let Some(message) = message {
                    println!("Agent O: {message}");
                }
            }
            RoundEvent::Rejected { reason, .. } => println!("Invalid move: {reason}"),
            RoundEvent::Finished { result, .. } => match result.outcome {
                Outcome::Winner(1) => println!("You win!"),
                Outcome::Winner(_) => println!("Agent O wins!"),
                _ => println!("Draw!"),
            },
        }
    });

    match session {
        Ok(summary) => {
            println!("\n{}", view.scoreboard(&summary.metrics));
            Ok(())
        }
        Err(GameError::AgentAborted {
            source: AgentError::InputClosed,
            ..
        }) => {
            println!("\nInput closed, leaving.");
            Ok(())
        }
        Err(e) => Err(e).context("game aborted"),
    }
}

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use mnk_agent::ai::QLearningAgent;
use mnk_agent::checkpoint::KnowledgeStore;
use mnk_agent::config::AppConfig;
use mnk_agent::game::Board;
use mnk_agent::training::episode::RoundEvent;
use mnk_agent::training::trainer::Trainer;
use mnk_agent::ui::BoardView;

/// Train two Q-learning agents sharing one value table by self-play.
#[derive(Parser)]
#[command(name = "train", about = "Train an m,n,k-game agent by self-play")]
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

    /// Train on gomoku (19x19, five in a row)
    #[arg(long)]
    gomoku: bool,

    /// Override number of training rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Model file holding the learned values
    #[arg(long)]
    model: Option<PathBuf>,

    /// Do not draw the board after every move
    #[arg(long)]
    no_display: bool,

    /// Play without updating or saving the model
    #[arg(long)]
    no_learn: bool,

    /// Greedy games against a random opponent after training
    #[arg(long)]
    eval_games: Option<usize>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Set `flag` on the first Ctrl-C. The trainer polls it between rounds.
fn spawn_interrupt_listener(flag: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "Could not start interrupt listener");
                return;
            }
        };
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping after the current round...");
                    flag.store(true, Ordering::SeqCst);
                }
                Err(e) => warn!(error = %e, "Failed to listen for ctrl+c"),
            }
        });
    });
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
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
    if let Some(rounds) = cli.rounds {
        config.training.rounds = rounds;
    }
    if let Some(model) = cli.model {
        config.training.model_path = model;
    }
    if let Some(eval_games) = cli.eval_games {
        config.training.eval_games = eval_games;
    }
    if cli.no_learn {
        config.agent.learn = false;
    }
    config.validate().context("invalid configuration")?;

    let (m, n, k) = config.game.dimensions();
    let mut board = Board::new(m, n, k).context("creating board")?;

    let store = KnowledgeStore::new(&config.training.model_path);
    if config.agent.learn {
        store
            .check_writable()
            .with_context(|| format!("model file {} is not writable", store.path().display()))?;
    }
    let knowledge = store.load_or_fresh().into_shared();

    let mut first = QLearningAgent::new(1, "X", config.agent.clone(), knowledge.clone());
    let mut second = QLearningAgent::new(2, "O", config.agent.clone(), knowledge.clone());

    let mut trainer = Trainer::new(config.training.clone());
    if config.agent.learn {
        trainer = trainer.with_store(store);
    }
    spawn_interrupt_listener(trainer.cancel_flag());

    info!(
        m,
        n,
        k,
        rounds = config.training.rounds,
        model = %config.training.model_path.display(),
        "Training"
    );

    let view = BoardView::new([(1, "X"), (2, "O")]);
    let display = !cli.no_display;
    let summary = trainer
        .run(&mut board, &mut [&mut first, &mut second], &knowledge, |event| {
            if !display {
                return;
            }
            match event {
                RoundEvent::Moved { agent, state, message, .. } => {
                    print!("\n{}", view.render(state));
                    if let Some(message) = message {
                        println!("Agent {agent}: {message}");
                    }
                }
                RoundEvent::Finished { result, .. } => {
                    println!("Round over: {:?} after {} moves", result.outcome, result.moves);
                }
                _ => {}
            }
        })
        .context("training aborted")?;

    if summary.interrupted {
        println!("Interrupted after {} rounds", summary.rounds_played);
    }
    println!("{}", view.scoreboard(&summary.metrics));
    println!(
        "{}",
        BoardView::dispersion(&knowledge.borrow().random_dispersion)
    );

    if config.training.eval_games > 0 {
        let rate = trainer
            .evaluate(&mut board, &mut first, config.training.eval_games)
            .context("evaluation aborted")?;
        println!(
            "Eval vs Random ({} games): {:.1}% win rate",
            config.training.eval_games,
            rate * 100.0
        );
    }

    Ok(())
}

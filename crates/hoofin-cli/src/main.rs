use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "hoofin-cli", version, about = "Hoofin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Workout session control
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Training program inspection
    Program {
        #[command(subcommand)]
        action: commands::program::ProgramAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Saved resume position
    Position {
        #[command(subcommand)]
        action: commands::position::PositionAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Workout { action } => commands::workout::run(action),
        Commands::Program { action } => commands::program::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Position { action } => commands::position::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "hoofin-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

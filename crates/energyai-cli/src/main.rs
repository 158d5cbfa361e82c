use clap::{Parser, Subcommand};

mod commands;
mod style;

#[derive(Parser)]
#[command(name = "energyai", version, about = "EnergyAI Academy CLI")]
struct Cli {
    /// Log progression details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Course modules
    Module {
        #[command(subcommand)]
        action: commands::module::ModuleAction,
    },
    /// Start or complete microlessons
    Lesson {
        #[command(subcommand)]
        action: commands::lesson::LessonAction,
    },
    /// Record today's login and update the streak
    Login(commands::login::LoginArgs),
    /// Practice lab prompt templates and prompt tests
    Practice {
        #[command(subcommand)]
        action: commands::practice::PracticeAction,
    },
    /// Quiz results
    Quiz {
        #[command(subcommand)]
        action: commands::quiz::QuizAction,
    },
    /// Badges
    Achievement {
        #[command(subcommand)]
        action: commands::achievement::AchievementAction,
    },
    /// Ranked learners
    Leaderboard(commands::leaderboard::LeaderboardArgs),
    /// Learner progress, export and history
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Preferred interface language
    Lang {
        #[command(subcommand)]
        action: commands::lang::LangAction,
    },
    /// Serve the course web pages
    Serve(commands::serve::ServeArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let result = match cli.command {
        Commands::Module { action } => commands::module::run(action),
        Commands::Lesson { action } => commands::lesson::run(action),
        Commands::Login(args) => commands::login::run(args),
        Commands::Practice { action } => commands::practice::run(action),
        Commands::Quiz { action } => commands::quiz::run(action),
        Commands::Achievement { action } => commands::achievement::run(action),
        Commands::Leaderboard(args) => commands::leaderboard::run(args),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Lang { action } => commands::lang::run(action),
        Commands::Serve(args) => commands::serve::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

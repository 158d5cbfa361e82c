use clap::Args;

use super::session::Session;
use crate::style;

#[derive(Args)]
pub struct LeaderboardArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LeaderboardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let board = session.model.leaderboard();

    if args.json {
        println!("{}", serde_json::to_string_pretty(board.entries())?);
        return Ok(());
    }
    for e in board.entries() {
        let marker = if e.is_current_user { "*" } else { " " };
        println!(
            "{marker}{:>2}. {:<20} {:>6} điểm  {}",
            e.rank,
            e.name,
            e.points,
            style::change_marker(e.change)
        );
    }
    Ok(())
}

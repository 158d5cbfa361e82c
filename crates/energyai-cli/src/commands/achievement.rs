use clap::Subcommand;

use super::session::Session;

#[derive(Subcommand)]
pub enum AchievementAction {
    /// List badges
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a badge earned
    Unlock {
        /// Achievement id
        id: String,
    },
}

pub fn run(action: AchievementAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;

    match action {
        AchievementAction::List { json } => {
            let achievements = session.model.achievements();
            if json {
                println!("{}", serde_json::to_string_pretty(achievements)?);
                return Ok(());
            }
            for a in achievements {
                let earned = match a.earned_at {
                    Some(at) => format!("✓ {}", at.format("%Y-%m-%d")),
                    None => "·".to_string(),
                };
                println!("{} {:<24} {}  [{}]", a.icon, a.title, earned, a.id);
            }
        }
        AchievementAction::Unlock { id } => {
            if session.model.unlock_achievement(&id)? {
                session.commit(true)?;
            } else {
                println!("achievement {id} is already earned");
            }
        }
    }
    Ok(())
}

use clap::Subcommand;
use energyai_core::Status;

use super::session::Session;
use crate::style;

#[derive(Subcommand)]
pub enum ModuleAction {
    /// List all modules with their status and progress
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one module and its lessons
    Show {
        /// Module id
        id: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ModuleAction) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;
    let model = &session.model;

    match action {
        ModuleAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(model.modules())?);
                return Ok(());
            }
            for m in model.modules() {
                let line = format!(
                    "{}. {} {} {:>3}%  {} phút",
                    m.id,
                    m.title,
                    style::progress_bar(m.progress, 12),
                    (m.progress * 100.0).round() as u32,
                    m.duration_min()
                );
                println!("{}", style::status_line(m.status, &line));
                if m.status == Status::Locked {
                    if let Some(req) = &m.unlock {
                        println!("     {}", req.hint);
                    }
                }
            }
        }
        ModuleAction::Show { id, json } => {
            let m = model.module(id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(m)?);
                return Ok(());
            }
            println!("{} {}", m.icon, m.title);
            if let Some(description) = &m.description {
                println!("{description}");
            }
            if !m.learning_objectives.is_empty() {
                println!();
                for objective in &m.learning_objectives {
                    println!("  • {objective}");
                }
            }
            println!();
            for lesson in &m.lessons {
                let line = format!(
                    "{} {} ({} phút, {} điểm)",
                    lesson.id,
                    lesson.title,
                    lesson.duration_min(),
                    lesson.points
                );
                println!("  {}", style::status_line(lesson.status, &line));
            }
            if let Some(outcome) = &m.key_outcome {
                println!();
                println!("{outcome}");
            }
        }
    }
    Ok(())
}

use std::path::PathBuf;

use clap::Subcommand;
use energyai_core::ProgressExport;

use super::session::Session;
use crate::style;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show learner progress
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the progress export file
    Export {
        /// Destination file, or "-" for stdout
        #[arg(short, long, default_value = ProgressExport::FILE_NAME)]
        output: PathBuf,
    },
    /// Recent point awards
    History {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget all saved progress and start over from the course seed
    Reset,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open()?;

    match action {
        ProgressAction::Show { json } => {
            if json {
                let snapshot = session.model.export_progress_snapshot();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }
            let p = session.model.progress();
            let levels = session.model.levels();
            println!(
                "Cấp {} · {}  ({} điểm)",
                p.level, p.level_title, p.total_points
            );
            if let Some(missing) = levels.points_to_next(p.total_points) {
                println!("Còn {missing} điểm để lên cấp tiếp theo");
            }
            println!(
                "Tiến độ: {} {}%",
                style::progress_bar(p.overall_progress, 20),
                p.overall_percent()
            );
            println!(
                "Mô-đun: {}/{}   Bài học: {}",
                p.completed_modules, p.total_modules, p.completed_lessons
            );
            if let (Some(module), Some(lesson)) = (p.current_module, &p.current_lesson) {
                println!("Đang học: Mô-đun {module}, bài {lesson}");
            }
            println!("Chuỗi ngày học: {} ngày 🔥", p.streak_days);
            println!("Thời gian học: {} phút", p.study_minutes);
            println!(
                "Phòng thực hành: {} lần   Kiểm tra prompt: {}",
                p.practice_sessions, p.prompt_tests
            );
            println!(
                "Điểm kiểm tra trung bình: {:.0}% ({} bài)",
                p.average_quiz_score * 100.0,
                p.quiz_count
            );
        }
        ProgressAction::Export { output } => {
            let user_id = session.store.user_id()?;
            let export = session.model.export_progress(&user_id);
            let json = serde_json::to_string_pretty(&export)?;
            if output.as_os_str() == "-" {
                println!("{json}");
            } else {
                std::fs::write(&output, json)?;
                println!("exported to {}", output.display());
            }
        }
        ProgressAction::History { limit, json } => {
            let history = session.store.point_history(limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
                return Ok(());
            }
            for award in &history {
                println!(
                    "{}  +{:<4} {}",
                    award.awarded_at.format("%Y-%m-%d %H:%M"),
                    award.amount,
                    award.reason
                );
            }
        }
        ProgressAction::Reset => {
            session.store.reset_progress()?;
            println!("progress reset");
        }
    }
    Ok(())
}

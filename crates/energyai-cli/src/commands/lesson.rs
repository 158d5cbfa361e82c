use clap::Subcommand;
use energyai_core::ProgressError;

use super::session::Session;

#[derive(Subcommand)]
pub enum LessonAction {
    /// Open a lesson (first visit earns the start reward)
    Start {
        /// Module id
        module: u32,
        /// Lesson id (e.g. "2.3")
        lesson: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark the current lesson completed
    Complete {
        /// Module id
        module: u32,
        /// Lesson id (e.g. "2.3")
        lesson: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: LessonAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;

    match action {
        LessonAction::Start {
            module,
            lesson,
            json,
        } => {
            let start = session.model.start_or_resume_microlesson(module, &lesson)?;
            let title = session
                .model
                .module(module)?
                .lesson(&lesson)
                .map(|l| l.title.clone())
                .unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string_pretty(&start)?);
            } else if start.review {
                println!("Ôn tập bài {lesson}: {title}");
            } else {
                println!("Bắt đầu bài {lesson}: {title}");
            }
            session.commit(!json)?;
        }
        LessonAction::Complete {
            module,
            lesson,
            json,
        } => match session.model.complete_microlesson(module, &lesson) {
            Ok(done) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&done)?);
                } else {
                    println!("Đã hoàn thành bài {lesson}");
                    if let Some(next) = &done.unlocked_lesson {
                        println!("Bài tiếp theo: {next}");
                    }
                    if done.module_completed {
                        println!("Hoàn thành Mô-đun {module}!");
                    }
                    for id in &done.unlocked_modules {
                        println!("Đã mở khóa Mô-đun {id}");
                    }
                }
                session.commit(!json)?;
            }
            Err(e @ ProgressError::AlreadyCompleted(_)) => println!("{e}"),
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

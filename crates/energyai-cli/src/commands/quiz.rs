use clap::Subcommand;

use super::session::Session;

#[derive(Subcommand)]
pub enum QuizAction {
    /// Record a quiz result
    Record {
        /// Score between 0 and 1, or a percentage such as "85%"
        score: String,
    },
}

fn parse_score(raw: &str) -> Result<f64, String> {
    let (number, scale) = match raw.strip_suffix('%') {
        Some(percent) => (percent, 100.0),
        None => (raw, 1.0),
    };
    number
        .trim()
        .parse::<f64>()
        .map(|v| v / scale)
        .map_err(|_| format!("invalid score: {raw}"))
}

pub fn run(action: QuizAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuizAction::Record { score } => {
            let score = parse_score(&score)?;
            let mut session = Session::open()?;
            let awarded = session.model.record_quiz_score(score)?;
            let p = session.model.progress();
            if awarded == 0 {
                println!(
                    "Chưa đạt (cần {:.0}%)",
                    session.model.rewards().quiz_pass_score * 100.0
                );
            }
            println!(
                "Điểm trung bình: {:.0}% qua {} bài kiểm tra",
                p.average_quiz_score * 100.0,
                p.quiz_count
            );
            session.commit(true)?;
        }
    }
    Ok(())
}

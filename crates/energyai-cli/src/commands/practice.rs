use clap::Subcommand;
use energyai_core::practice::{find_template, TEMPLATES};
use energyai_core::PracticeLab;

use super::session::Session;

#[derive(Subcommand)]
pub enum PracticeAction {
    /// List prompt templates
    Templates,
    /// Load a template by name or number
    Use {
        /// Template name or 1-based number
        template: String,
    },
    /// Submit a prompt and wait for the simulated response
    Test {
        /// Prompt text
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
        /// Return immediately without waiting for the response
        #[arg(long)]
        no_wait: bool,
    },
}

pub fn run(action: PracticeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PracticeAction::Templates => {
            for (i, t) in TEMPLATES.iter().enumerate() {
                println!("{}. {}", i + 1, t.name);
                println!("   {}", t.prompt);
            }
        }
        PracticeAction::Use { template } => {
            let t = find_template(&template)
                .ok_or_else(|| format!("unknown template: {template}"))?;
            let mut session = Session::open()?;
            session.model.record_practice_attempt();
            println!("{}", t.prompt);
            session.commit(true)?;
        }
        PracticeAction::Test { prompt, no_wait } => {
            let lab = PracticeLab::new();
            let ticket = lab
                .submit(&prompt.join(" "))
                .ok_or("prompt is empty")?;

            let mut session = Session::open()?;
            session.model.record_prompt_test();
            let delay = session.config.practice.response_delay();
            session.commit(true)?;

            if no_wait {
                return Ok(());
            }
            println!("🤖 Đang xử lý prompt của bạn...");
            let runtime = tokio::runtime::Runtime::new()?;
            if let Some(response) = runtime.block_on(lab.deliver(ticket, delay)) {
                println!("{response}");
            }
        }
    }
    Ok(())
}

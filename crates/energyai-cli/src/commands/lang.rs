use clap::{Subcommand, ValueEnum};
use energyai_core::Store;

#[derive(Clone, Copy, ValueEnum)]
pub enum Language {
    /// Tiếng Việt
    Vi,
    /// English
    En,
}

impl Language {
    fn code(self) -> &'static str {
        match self {
            Language::Vi => "vi",
            Language::En => "en",
        }
    }
}

const DEFAULT_LANGUAGE: Language = Language::Vi;

#[derive(Subcommand)]
pub enum LangAction {
    /// Print the preferred language
    Get,
    /// Change the preferred language
    Set {
        #[arg(value_enum)]
        lang: Language,
    },
}

pub fn run(action: LangAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    match action {
        LangAction::Get => {
            let lang = store.preferred_language()?;
            println!("{}", lang.as_deref().unwrap_or(DEFAULT_LANGUAGE.code()));
        }
        LangAction::Set { lang } => {
            store.set_preferred_language(lang.code())?;
            println!("ok");
        }
    }
    Ok(())
}

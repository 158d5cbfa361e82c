//! Load the progression model for one CLI invocation and persist it after.

use energyai_core::{model_from_config, Config, Event, ProgressionModel, Store};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

pub struct Session {
    pub config: Config,
    pub store: Store,
    pub model: ProgressionModel,
    events: UnboundedReceiver<Event>,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let store = Store::open()?;
        let mut model = model_from_config(&config)?;
        store.load_into(&mut model)?;
        let events = model.subscribe_channel();
        debug!(
            seed_version = model.seed_version(),
            points = model.progress().total_points,
            "session opened"
        );
        Ok(Self {
            config,
            store,
            model,
            events,
        })
    }

    /// Persist the model and log point awards. With `announce`, print a
    /// line for everything that happened since the session was opened.
    pub fn commit(mut self, announce: bool) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        self.store.commit_session(&self.model, &events)?;
        if announce {
            for event in &events {
                notify(&self.model, event);
            }
        }
        Ok(events)
    }
}

fn notify(model: &ProgressionModel, event: &Event) {
    match event {
        Event::PointsAwarded { amount, reason, .. } => {
            println!("+{amount} điểm ({reason})");
        }
        Event::LevelUp {
            new_level, title, ..
        } => {
            println!("🎉 Lên cấp {new_level}: {title}");
        }
        Event::AchievementUnlocked { id, .. } => {
            let title = model
                .achievements()
                .iter()
                .find(|a| &a.id == id)
                .map_or(id.as_str(), |a| a.title.as_str());
            println!("🏆 Thành tích mới: {title}");
        }
    }
}

pub mod achievement;
pub mod config;
pub mod lang;
pub mod leaderboard;
pub mod lesson;
pub mod login;
pub mod module;
pub mod practice;
pub mod progress;
pub mod quiz;
pub mod serve;

mod session;

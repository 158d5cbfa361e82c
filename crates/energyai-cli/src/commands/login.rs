use chrono::NaiveDate;
use clap::Args;

use super::session::Session;

#[derive(Args)]
pub struct LoginArgs {
    /// Login date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn run(args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;
    let today = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match session.model.record_daily_login(today) {
        Some(login) => {
            println!("Chuỗi ngày học: {} ngày", login.streak_days);
            session.commit(true)?;
        }
        None => {
            println!(
                "Đã ghi nhận đăng nhập hôm nay. Chuỗi ngày học: {} ngày",
                session.model.progress().streak_days
            );
        }
    }
    Ok(())
}

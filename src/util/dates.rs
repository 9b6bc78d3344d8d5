use chrono::{DateTime, Datelike, Local};

pub fn local_date_yyyy_mm_dd() -> String {
    let now: DateTime<Local> = Local::now();
    now.format("%Y-%m-%d").to_string()
}

/// Event year used in leaderboard URLs when none is configured.
pub fn current_year() -> i32 {
    Local::now().year()
}

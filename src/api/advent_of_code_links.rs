pub fn leaderboard_url(base_url: &str, year: i32, leaderboard_id: &str) -> String {
    format!(
        "{}/{}/leaderboard/private/view/{}",
        base_url, year, leaderboard_id
    )
}

pub fn leaderboard_json_url(base_url: &str, year: i32, leaderboard_id: &str) -> String {
    format!("{}.json", leaderboard_url(base_url, year, leaderboard_id))
}

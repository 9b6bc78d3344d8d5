pub struct Emoji;

impl Emoji {
    pub const FIRST_PLACE: &'static str = ":first_place_medal:";
    pub const SECOND_PLACE: &'static str = ":second_place_medal:";
    pub const THIRD_PLACE: &'static str = ":third_place_medal:";
    pub const PUSHPIN: &'static str = ":round_pushpin:";
    pub const STAR: &'static str = ":star:";

    /// Rank marker for a 0-indexed leaderboard position.
    pub fn medal(position: usize) -> &'static str {
        match position {
            0 => Self::FIRST_PLACE,
            1 => Self::SECOND_PLACE,
            2 => Self::THIRD_PLACE,
            _ => Self::PUSHPIN,
        }
    }
}

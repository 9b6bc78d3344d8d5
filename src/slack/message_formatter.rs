use crate::fmt;
use crate::leaderboard::RankedEntry;

use super::blocks::{MessageBlock, TextObject};
use super::emoji::Emoji;
use super::mrkdwn;

pub const LEADERBOARD_LINK_TEXT: &str = "View Leaderboard Online";

/// Builds the message body for an already-truncated ranking:
/// a divider, then a section and divider per entry, then a link back to the board.
pub fn format_leader_message(entries: &[RankedEntry], leaderboard_url: &str) -> Vec<MessageBlock> {
    let mut blocks = Vec::with_capacity(2 + 2 * entries.len());
    blocks.push(MessageBlock::Divider);

    for (position, entry) in entries.iter().enumerate() {
        blocks.push(entry_section(position, entry));
        blocks.push(MessageBlock::Divider);
    }

    blocks.push(MessageBlock::section_text(TextObject::mrkdwn(
        mrkdwn::mask_link(leaderboard_url, LEADERBOARD_LINK_TEXT),
    )));

    blocks
}

fn entry_section(position: usize, entry: &RankedEntry) -> MessageBlock {
    let name = fmt!(
        "{}\t{}",
        Emoji::medal(position),
        mrkdwn::bold(entry.display_name())
    );
    let score = fmt!(
        "{} pts\t{} {}",
        entry.local_score,
        entry.stars,
        Emoji::STAR
    );

    MessageBlock::section_fields(vec![TextObject::mrkdwn(name), TextObject::mrkdwn(score)])
}

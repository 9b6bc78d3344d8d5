pub mod blocks;
pub mod emoji;
pub mod message_formatter;
pub mod mrkdwn;
pub mod webhook;

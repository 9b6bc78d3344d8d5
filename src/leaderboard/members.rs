use std::cmp::Reverse;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ShapeError;

pub const ANONYMOUS_NAME: &str = "(anonymous user)";

/// One participant as it appears under `members` in the leaderboard JSON.
/// Unknown fields (`id`, `global_score`, `completion_day_level`, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
struct MemberRecord {
    // Must be present, may be null.
    #[serde(deserialize_with = "required_nullable")]
    name: Option<String>,
    local_score: u64,
    stars: u64,
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub name: Option<String>,
    pub local_score: u64,
    pub stars: u64,
}

impl RankedEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(ANONYMOUS_NAME)
    }
}

impl MemberRecord {
    fn into_entry(self) -> RankedEntry {
        RankedEntry {
            name: self.name,
            local_score: self.local_score,
            stars: self.stars,
        }
    }
}

/// Extracts every member and orders them by score, then stars, both descending.
/// Members tied on both keep the order they had in the document.
pub fn parse_members(members: &Map<String, Value>) -> Result<Vec<RankedEntry>, ShapeError> {
    let mut entries = members
        .iter()
        .map(|(member_id, value)| {
            MemberRecord::deserialize(value)
                .map(MemberRecord::into_entry)
                .map_err(|source| ShapeError::Member {
                    member_id: member_id.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by_key is stable
    entries.sort_by_key(|e| (Reverse(e.local_score), Reverse(e.stars)));

    Ok(entries)
}

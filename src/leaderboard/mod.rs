pub mod members;

pub use members::{parse_members, RankedEntry};

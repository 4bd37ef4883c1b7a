// Core algorithm exports
pub mod distance;
pub mod matcher;

pub use distance::{distance_km, round_km};
pub use matcher::{find_closest, Closest, Located, MatchReport, Matcher};

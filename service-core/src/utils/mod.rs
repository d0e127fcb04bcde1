pub mod envelope;
pub mod search;

pub use envelope::Envelope;
pub use search::{clamp_limit, matches_query};

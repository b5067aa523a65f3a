// Two-way sync between the canonical resume.json and the remote content store.
// Every operation reads fresh state and either writes the whole document or nothing.

pub mod normalize;
pub mod pull;
pub mod push;

pub use pull::{fetch_resume, pull, PullSummary};
pub use push::{push, PushOutcome};

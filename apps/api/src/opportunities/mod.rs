// Swipe deck, match scoring, and the saved/applied tracker.

pub mod handlers;
pub mod matching;
pub mod tracker;

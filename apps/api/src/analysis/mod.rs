// Text analysis: section presence heuristics and lexical keyword matching.
// Pure and synchronous; callers run it inside spawn_blocking.

pub mod lexicon;
pub mod matcher;
pub mod stop_words;
pub mod structure;

pub use lexicon::Lexicon;
pub use matcher::match_keywords;
pub use structure::check_structure;

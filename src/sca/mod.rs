//! Sound-change application.
//!
//! Interprets ordered sets of context-sensitive rewrite rules over word
//! forms, the way historical sound change is usually notated:
//!
//! ```text
//! p → b / V_V        (literal target, context patterns with macros)
//! [+stop,+voiceless] → [+voiced]   (feature expressions over tokens)
//! ```
//!
//! Rules come in two explicit kinds. A [`LiteralRule`] carries
//! whitespace-separated target/replacement alternatives and regex-built
//! context patterns in which `#` marks a word boundary and macro names
//! (`V`, `C`, or user-defined) expand to alternations of inventory
//! phonemes. A [`FeatureRule`] matches tokenized phonemes against feature
//! expressions and rewrites them through closest-phoneme resolution.
//!
//! [`apply_sound_changes`] runs every rule set in ascending `order`,
//! threading the word through each rule in turn and recording one
//! [`StepLog`] entry per rule that actually changed it.

pub mod context;
pub mod engine;
pub mod types;

pub use context::PatternError;
pub use engine::{apply_sound_changes, apply_sound_changes_batch, BatchOutcome, SoundChangeOutcome};
pub use types::{
    macros_from_inventory, FeatureRule, LiteralRule, MacroTable, RuleKind, RuleSet,
    SoundChangeRule, StepLog,
};

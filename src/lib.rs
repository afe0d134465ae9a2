//! # soundlaw
//!
//! Phonological rule engine and phonetic similarity search for constructed
//! languages.
//!
//! The crate provides four cooperating subsystems:
//!
//! - [`features`] - a feature-based phonological model mapping IPA symbols
//!   to articulatory feature tags, with an inverted feature index for
//!   expression matching and closest-phoneme resolution
//! - [`tokenizer`] - greedy longest-match segmentation of words into
//!   phoneme tokens, correctly handling multi-character symbols
//! - [`sca`] - an ordered, context-sensitive sound-change rule interpreter
//!   with literal and feature-based matching modes and a step-by-step
//!   changelog
//! - [`similarity`] - a weighted phonetic distance metric over phoneme
//!   sequences and fuzzy lexicon search built on it
//!
//! All operations are pure functions over caller-supplied data. The only
//! shared state is the built-in feature model, reached through
//! [`FeatureModel::global`](features::FeatureModel::global), whose inverted
//! index is built once behind a single-initialization guard and never
//! invalidated.
//!
//! ## Example
//!
//! ```rust
//! use soundlaw::prelude::*;
//!
//! let model = FeatureModel::global();
//! let rule_sets = vec![RuleSet {
//!     ruleset_id: "lenition".to_string(),
//!     name: "Lenition".to_string(),
//!     order: 0,
//!     rules: vec![SoundChangeRule {
//!         rule_id: "p-to-b".to_string(),
//!         description: String::new(),
//!         exceptions: vec![],
//!         kind: RuleKind::Literal(LiteralRule {
//!             target: "p".to_string(),
//!             replacement: "b".to_string(),
//!             context_before: "#".to_string(),
//!             context_after: String::new(),
//!         }),
//!     }],
//! }];
//!
//! let outcome = apply_sound_changes(model, "pata", &rule_sets, &MacroTable::new(), &[] as &[&str]);
//! assert_eq!(outcome.result, "bata");
//! assert_eq!(outcome.changelog.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod features;
pub mod sca;
pub mod similarity;
pub mod tokenizer;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::features::{
        FeatureExpression, FeatureModel, FeatureReplacement, InventoryWarning,
    };
    pub use crate::sca::{
        apply_sound_changes, apply_sound_changes_batch, macros_from_inventory, BatchOutcome,
        FeatureRule, LiteralRule, MacroTable, RuleKind, RuleSet, SoundChangeOutcome,
        SoundChangeRule, StepLog,
    };
    pub use crate::similarity::{
        fuzzy_search, normalized_distance, phoneme_distance, weighted_edit_distance, LexiconEntry,
        SearchHit, Transcribed, DEFAULT_SEARCH_THRESHOLD, GAP_COST,
    };
    pub use crate::tokenizer::{join_phonemes, tokenize};
}

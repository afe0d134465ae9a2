//! Feature-based phonological model.
//!
//! A phoneme is an opaque string symbol carrying a set of categorical
//! feature tags describing its articulation: type (consonant or vowel),
//! manner, place, voicing, and for vowels height, backness, and rounding.
//! The model is fixed data owned for the process lifetime; symbols absent
//! from it are treated as opaque, featureless tokens by every consumer.
//!
//! Two lookup directions are supported:
//!
//! - symbol to features, via [`FeatureModel::features_of`]
//! - feature to symbols, via the inverted [`FeatureIndex`] built lazily
//!   (and exactly once) on first use
//!
//! On top of the index, [`FeatureExpression`] resolves positive/negative
//! feature constraints to matching phoneme sets, and
//! [`FeatureReplacement`] rewrites a phoneme by editing its feature set
//! and resolving the edited set back to the closest known symbol.

pub mod index;
pub mod model;

pub use index::{FeatureExpression, FeatureIndex, FeatureReplacement};
pub use model::{inventory_warnings, natural_pair, FeatureModel, InventoryWarning};

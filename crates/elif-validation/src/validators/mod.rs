//! Built-in validators for common validation scenarios

pub mod custom;
pub mod date;
pub mod email;
pub mod length;
pub mod list;
pub mod numeric;
pub mod pattern;
pub mod required;

pub use custom::CustomValidator;
pub use date::DateValidator;
pub use email::EmailValidator;
pub use length::LengthValidator;
pub use list::{DiffersValidator, InListValidator, MatchesValidator};
pub use numeric::{Comparison, ComparisonValidator, NumericKind, NumericValidator};
pub use pattern::{CharacterClass, CharacterClassValidator, PatternValidator, StringValidator};
pub use required::RequiredValidator;

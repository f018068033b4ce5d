//! # elif-validation
//!
//! Rule-expression validation for elif models. Rules are declared per field
//! as pipe-separated expressions (`"required|min_length[3]"`), evaluated
//! against a record of JSON values, and reported as one message per failing
//! field.
//!
//! ```rust
//! use elif_validation::{Messages, RuleEngine, RuleSet, ValidationEngine};
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .parse_field("name", "required|min_length[3]")
//!     .unwrap();
//! let data = json!({ "name": "ab" }).as_object().cloned().unwrap();
//!
//! let errors = RuleEngine::new().run(&rules, &data, &Messages::new()).unwrap();
//! assert_eq!(
//!     errors.message("name"),
//!     Some("The name field must be at least 3 characters in length.")
//! );
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod messages;
pub mod placeholders;
pub mod rules;
pub mod traits;
pub mod validators;

// Re-exports for easy access
pub use config::ValidationConfig;
pub use engine::{RuleEngine, ValidationEngine};
pub use error::{RuleError, ValidationError, ValidationErrors};
pub use messages::Messages;
pub use placeholders::fill_placeholders;
pub use rules::{FieldRules, Rule, RuleSet};
pub use traits::{Data, RuleContext, ValidationRule};

// Built-in validators
pub use validators::{
    custom::CustomValidator,
    date::DateValidator,
    email::EmailValidator,
    length::LengthValidator,
    list::{DiffersValidator, InListValidator, MatchesValidator},
    numeric::{ComparisonValidator, NumericValidator},
    pattern::{CharacterClassValidator, PatternValidator, StringValidator},
    required::RequiredValidator,
};

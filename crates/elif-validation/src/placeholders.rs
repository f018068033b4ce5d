//! `{field}` placeholders inside rule parameters

use crate::rules::RuleSet;
use crate::traits::{value_text, Data};
use regex::{Captures, Regex};

const PLACEHOLDER: &str = r"\{(\w+)\}";

/// Replace `{name}` in every rule parameter with the submitted value of
/// `name`. Placeholders naming fields absent from `data` are left as-is.
pub fn fill_placeholders(rules: &RuleSet, data: &Data) -> RuleSet {
    let mut filled = rules.clone();
    let Ok(pattern) = Regex::new(PLACEHOLDER) else {
        return filled;
    };

    for (_, field_rules) in filled.iter_mut() {
        for rule in field_rules.rules.iter_mut() {
            let Some(param) = rule.param.as_ref() else {
                continue;
            };
            if !param.contains('{') {
                continue;
            }
            let replaced = pattern.replace_all(param, |caps: &Captures| match data.get(&caps[1]) {
                Some(value) => value_text(value),
                None => caps[0].to_string(),
            });
            rule.param = Some(replaced.into_owned());
        }
    }

    filled
}

//! Rule expressions, per-field rule lists and rule sets

use crate::error::RuleError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One rule invocation: `min_length[3]` is `Rule { name: "min_length", param: Some("3") }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub param: Option<String>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: None,
        }
    }

    pub fn with_param(name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: Some(param.into()),
        }
    }

    fn parse_one(segment: &str) -> Result<Self, RuleError> {
        let segment = segment.trim();
        match segment.find('[') {
            None if segment.contains(']') => Err(RuleError::Malformed(segment.to_string())),
            None => Ok(Self::new(segment)),
            Some(open) => {
                if !segment.ends_with(']') || open == 0 {
                    return Err(RuleError::Malformed(segment.to_string()));
                }
                let name = &segment[..open];
                let param = &segment[open + 1..segment.len() - 1];
                Ok(Self::with_param(name.trim(), param))
            }
        }
    }

    /// Parse a pipe-separated expression. Pipes inside brackets belong to
    /// the parameter, so `regex_match[/a|b/]` stays one rule.
    pub fn parse_expression(expression: &str) -> Result<Vec<Self>, RuleError> {
        let mut rules = Vec::new();
        let mut depth = 0usize;
        let mut start = 0usize;

        for (index, ch) in expression.char_indices() {
            match ch {
                '[' => depth += 1,
                ']' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| RuleError::Malformed(expression.to_string()))?;
                }
                '|' if depth == 0 => {
                    let segment = &expression[start..index];
                    if !segment.trim().is_empty() {
                        rules.push(Self::parse_one(segment)?);
                    }
                    start = index + 1;
                }
                _ => {}
            }
        }

        if depth != 0 {
            return Err(RuleError::Malformed(expression.to_string()));
        }

        let tail = &expression[start..];
        if !tail.trim().is_empty() {
            rules.push(Self::parse_one(tail)?);
        }

        Ok(rules)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}[{}]", self.name, param),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Rules for a single field, with an optional label and inline messages.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawFieldRules")]
pub struct FieldRules {
    /// Human name substituted for `{field}` in messages
    pub label: Option<String>,
    pub rules: Vec<Rule>,
    /// Rule name to message; beats every other message source
    pub errors: BTreeMap<String, String>,
}

impl FieldRules {
    pub fn parse(expression: &str) -> Result<Self, RuleError> {
        Ok(Self {
            rules: Rule::parse_expression(expression)?,
            ..Self::default()
        })
    }

    pub fn from_list<S: AsRef<str>>(items: &[S]) -> Result<Self, RuleError> {
        let mut rules = Vec::new();
        for item in items {
            rules.extend(Rule::parse_expression(item.as_ref())?);
        }
        Ok(Self {
            rules,
            ..Self::default()
        })
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn error(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.insert(rule.into(), message.into());
        self
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name == name)
    }

    /// Render back to a pipe expression
    pub fn expression(&self) -> String {
        self.rules
            .iter()
            .map(Rule::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl FromStr for FieldRules {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRules {
    Expression(String),
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldRules {
    Detailed {
        #[serde(default)]
        label: Option<String>,
        rules: RawRules,
        #[serde(default)]
        errors: BTreeMap<String, String>,
    },
    Plain(RawRules),
}

impl RawRules {
    fn into_rules(self) -> Result<FieldRules, RuleError> {
        match self {
            RawRules::Expression(expression) => FieldRules::parse(&expression),
            RawRules::List(items) => FieldRules::from_list(&items),
        }
    }
}

impl TryFrom<RawFieldRules> for FieldRules {
    type Error = RuleError;

    fn try_from(raw: RawFieldRules) -> Result<Self, Self::Error> {
        match raw {
            RawFieldRules::Plain(rules) => rules.into_rules(),
            RawFieldRules::Detailed {
                label,
                rules,
                errors,
            } => {
                let mut field_rules = rules.into_rules()?;
                field_rules.label = label;
                field_rules.errors = errors;
                Ok(field_rules)
            }
        }
    }
}

/// Field name to rules. Ordered so evaluation and error maps are stable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    fields: BTreeMap<String, FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add already-built rules for a field
    pub fn field(mut self, field: impl Into<String>, rules: FieldRules) -> Self {
        self.fields.insert(field.into(), rules);
        self
    }

    /// Parse and add a pipe expression for a field
    pub fn parse_field(self, field: impl Into<String>, expression: &str) -> Result<Self, RuleError> {
        Ok(self.field(field, FieldRules::parse(expression)?))
    }

    pub fn insert(&mut self, field: impl Into<String>, rules: FieldRules) -> Option<FieldRules> {
        self.fields.insert(field.into(), rules)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldRules> {
        self.fields.get_mut(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldRules> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Keep only the fields the predicate accepts
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.fields.retain(|field, _| keep(field));
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldRules)> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut FieldRules)> {
        self.fields.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldRules)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, FieldRules)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

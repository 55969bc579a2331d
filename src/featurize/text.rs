//! Feature values and the prompts that render them.

use super::text_utils::{
    COMPLETION, COMPLETION_TEMPLATE, PROPERTY_NAME, REPR_STRING, REPR_SYSTEM, VERB,
};
use serde::Serialize;
use std::fmt;

/// One entry of a feature row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Numeric view; booleans map to 0/1 and text to `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(f64::from(u8::from(*v))),
            Value::Text(_) => None,
        }
    }

    /// `int`, `float`, `bool` or `text`.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

fn format_float(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let mut rounded = (v * 1e4).round() / 1e4;
    if rounded == 0.0 {
        // -0.0
        rounded = 0.0;
    }
    let text = rounded.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

/// Joins items English-style: `a`, `a and b`, `a, b, and c`.
pub fn join_english<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Serializable snapshot of a rendered [`Prompt`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRecord {
    pub representation: Vec<String>,
    pub representation_type: String,
    pub prompt_template: String,
    pub completion_template: String,
    pub completion_names: Vec<String>,
    pub completion_labels: Vec<String>,
    pub filled_prompt: String,
    pub filled_completion: String,
    pub constraint: Option<String>,
}

impl PromptRecord {
    /// One-line JSON object, as written to dataset files.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Writes one JSON object per record, newline separated.
///
/// # Errors
///
/// Returns the first serialization or write failure.
pub fn write_json_lines<W: std::io::Write>(
    mut writer: W,
    records: &[PromptRecord],
) -> serde_json::Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    }
    Ok(())
}

/// A question template together with the values that answer it.
///
/// `representation` holds one string for single-molecule prompts and one per
/// molecule for comparisons. `completion_names` are the phrases substituted
/// for `{PROPERTY_NAME}`.
///
/// # Examples
///
/// ```
/// use chemcaption::featurize::{Prompt, Value};
/// use chemcaption::featurize::text_utils::generate_template;
///
/// let prompt = Prompt {
///     completion: vec![Value::Int(4)],
///     representation: vec!["CCO".to_string()],
///     representation_type: "SMILES".to_string(),
///     completion_names: vec!["number of hydrogen bond acceptors".to_string()],
///     completion_labels: vec!["num_hydrogen_bond_acceptors".to_string()],
///     template: generate_template(),
///     constraint: None,
/// };
/// assert_eq!(
///     prompt.fill_prompt(),
///     "Question: What is the number of hydrogen bond acceptors of the molecule with SMILES CCO?"
/// );
/// assert_eq!(prompt.fill_completion(), "Answer: 4");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub completion: Vec<Value>,
    pub representation: Vec<String>,
    pub representation_type: String,
    pub completion_names: Vec<String>,
    pub completion_labels: Vec<String>,
    pub template: String,
    pub constraint: Option<String>,
}

impl Prompt {
    /// Kind of the completion values, or `mixed` when they differ.
    pub fn completion_type(&self) -> &'static str {
        let mut kinds = self.completion.iter().map(Value::kind);
        match kinds.next() {
            None => "empty",
            Some(first) if kinds.all(|k| k == first) => first,
            Some(_) => "mixed",
        }
    }

    fn verb(&self) -> &'static str {
        if self.completion.len() > 1 { "are" } else { "is" }
    }

    /// The question with every placeholder substituted and the constraint appended.
    pub fn fill_prompt(&self) -> String {
        let filled = self
            .template
            .replace(VERB, self.verb())
            .replace(PROPERTY_NAME, &join_english(&self.completion_names))
            .replace(REPR_SYSTEM, &self.representation_type)
            .replace(REPR_STRING, &join_english(&self.representation));
        match &self.constraint {
            Some(constraint) => format!("{filled}\nConstraint: {constraint}"),
            None => filled,
        }
    }

    pub fn fill_completion(&self) -> String {
        let values: Vec<String> = self.completion.iter().map(Value::to_string).collect();
        COMPLETION_TEMPLATE.replace(COMPLETION, &join_english(&values))
    }

    pub fn to_dict(&self) -> PromptRecord {
        PromptRecord {
            representation: self.representation.clone(),
            representation_type: self.representation_type.clone(),
            prompt_template: self.template.clone(),
            completion_template: COMPLETION_TEMPLATE.to_string(),
            completion_names: self.completion_names.clone(),
            completion_labels: self.completion_labels.clone(),
            filled_prompt: self.fill_prompt(),
            filled_completion: self.fill_completion(),
            constraint: self.constraint.clone(),
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.fill_prompt(), self.fill_completion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::featurize::text_utils::generate_template;

    fn prompt(values: Vec<Value>, names: &[&str]) -> Prompt {
        Prompt {
            completion: values,
            representation: vec!["c1ccccc1".to_string()],
            representation_type: "SMILES".to_string(),
            completion_names: names.iter().map(|s| s.to_string()).collect(),
            completion_labels: Vec::new(),
            template: generate_template(),
            constraint: None,
        }
    }

    #[test]
    fn floats_keep_four_decimals_and_one_digit() {
        assert_eq!(Value::Float(0.0).to_string(), "0.0");
        assert_eq!(Value::Float(-0.00001).to_string(), "0.0");
        assert_eq!(Value::Float(2.30154).to_string(), "2.3015");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::Float(12.0).to_string(), "12.0");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Int(-3).to_string(), "-3");
    }

    #[test]
    fn english_join() {
        assert_eq!(join_english::<&str>(&[]), "");
        assert_eq!(join_english(&["a"]), "a");
        assert_eq!(join_english(&["a", "b"]), "a and b");
        assert_eq!(join_english(&["a", "b", "c"]), "a, b, and c");
    }

    #[test]
    fn verb_follows_completion_length() {
        let one = prompt(vec![Value::Int(0)], &["number of rotatable bonds"]);
        assert_eq!(
            one.fill_prompt(),
            "Question: What is the number of rotatable bonds of the molecule with SMILES c1ccccc1?"
        );
        let two = prompt(
            vec![Value::Float(0.0), Value::Float(1.0)],
            &["proportions of rotatable and non-rotatable bonds"],
        );
        assert!(two.fill_prompt().starts_with("Question: What are the proportions"));
        assert_eq!(two.fill_completion(), "Answer: 0.0 and 1.0");
    }

    #[test]
    fn constraint_is_appended_on_its_own_line() {
        let mut p = prompt(vec![Value::Int(1)], &["x"]);
        p.constraint = Some("Return an integer.".to_string());
        assert!(p.fill_prompt().ends_with("?\nConstraint: Return an integer."));
        assert_eq!(p.to_dict().constraint.as_deref(), Some("Return an integer."));
    }

    #[test]
    fn record_serializes_to_json() {
        let p = prompt(vec![Value::Int(4), Value::Bool(false)], &["a", "b"]);
        let json = serde_json::to_value(p.to_dict()).unwrap();
        assert_eq!(json["filled_completion"], "Answer: 4 and False");
        assert_eq!(json["completion_template"], "Answer: {COMPLETION}");
        assert_eq!(json["representation"][0], "c1ccccc1");
        assert_eq!(p.completion_type(), "mixed");
    }

    #[test]
    fn json_lines_hold_one_record_per_line() {
        let records = vec![
            prompt(vec![Value::Int(1)], &["a"]).to_dict(),
            prompt(vec![Value::Float(0.5)], &["b"]).to_dict(),
        ];
        let mut buf = Vec::new();
        write_json_lines(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], records[1].to_json().unwrap());
        assert!(lines[0].contains("\"filled_completion\":\"Answer: 1\""));
    }
}

//! Consume outcomes

use serde::Serialize;
use serde_json::Value;

/// Successful result of consuming one fixture file or case
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "cases", rename_all = "snake_case")]
pub enum ConsumeOutcome {
    /// Per-case records emitted by the state-test runner, in emitted order
    State(Vec<Value>),
    /// Chain-test verdict: the binary exited 0 and emits nothing parseable
    Chain,
}

impl ConsumeOutcome {
    /// Raw per-case records (empty for chain tests)
    pub fn cases(&self) -> &[Value] {
        match self {
            ConsumeOutcome::State(cases) => cases,
            ConsumeOutcome::Chain => &[],
        }
    }

    /// Every record judged on its own, in emitted order
    pub fn case_records(&self) -> Vec<Result<StateCaseResult, MalformedCase>> {
        self.cases()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                StateCaseResult::from_record(record).map_err(|reason| MalformedCase {
                    index,
                    name: record.get("name").and_then(Value::as_str).map(str::to_string),
                    reason,
                })
            })
            .collect()
    }

    /// Typed view of the well-formed records
    pub fn case_results(&self) -> Vec<StateCaseResult> {
        self.case_records().into_iter().filter_map(Result::ok).collect()
    }

    /// Records without the expected shape
    pub fn malformed_cases(&self) -> Vec<MalformedCase> {
        self.case_records().into_iter().filter_map(Result::err).collect()
    }

    /// Cases that report `"pass": false`
    pub fn failed_cases(&self) -> Vec<StateCaseResult> {
        self.case_results()
            .into_iter()
            .filter(|case| !case.passed())
            .collect()
    }

    /// Overall verdict: no failed case and no malformed record
    pub fn passed(&self) -> bool {
        self.case_records()
            .iter()
            .all(|record| matches!(record, Ok(case) if case.passed()))
    }
}

/// Per-case record printed by `evm statetest`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCaseResult {
    /// Case name
    pub name: String,
    /// Whether the post-state matched
    pub pass: Option<bool>,
    /// Fork the case ran under
    pub fork: Option<String>,
    /// Client error text for this case
    pub error: Option<String>,
    /// Computed post-state root
    pub state_root: Option<String>,
}

impl StateCaseResult {
    /// Typed view of a raw record.
    ///
    /// Only the verdict is strict: a record must be an object and `pass`,
    /// when present, a boolean. Other fields of an unexpected type are kept
    /// as their JSON text.
    pub fn from_record(record: &Value) -> Result<Self, String> {
        let Value::Object(fields) = record else {
            return Err(format!("record is {}, not an object", json_kind(record)));
        };
        let pass = match fields.get("pass") {
            None | Some(Value::Null) => None,
            Some(Value::Bool(pass)) => Some(*pass),
            Some(other) => return Err(format!("\"pass\" is {}, not a boolean", json_kind(other))),
        };
        Ok(Self {
            name: text_field(fields.get("name")).unwrap_or_default(),
            pass,
            fork: text_field(fields.get("fork")),
            error: text_field(fields.get("error")),
            state_root: text_field(fields.get("stateRoot")),
        })
    }

    /// A case passes unless it explicitly reports `"pass": false`
    pub fn passed(&self) -> bool {
        self.pass != Some(false)
    }
}

/// A per-case record that could not be judged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedCase {
    /// Position in the emitted array
    pub index: usize,
    /// `name` field, when it is a string
    pub name: Option<String>,
    /// What is wrong with the record
    pub reason: String,
}

impl MalformedCase {
    /// Case name, or `#<index>` when the record has none
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{}", self.index))
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

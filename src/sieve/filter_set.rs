//! Parsing external filter input into conditions
//!
//! Query strings and JSON bodies carry operators as free-form text. This is
//! the boundary where that text is checked against the closed operator set;
//! terms that fail are kept aside as rejected, and a set with any rejected
//! term matches nothing.

use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::debug;

use super::coerce::number_to_string;
use super::eval::{evaluate_filters, FilterCondition};
use super::operator::Operator;

/// Operator tokens ordered longest first, so `>=` wins over `>` and `==*`
/// over `==` when both match at the same position.
const TOKENS_LONGEST_FIRST: [&str; 17] = [
    "==null", "!=null", "!_-=", "==*", "@=*", "_=*", "_-=", "!@=", "!_=", "==", "!=", ">=",
    "<=", "@=", "_=", ">", "<",
];

/// A condition as it arrives in a JSON body, operator still unchecked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCondition {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

/// A parsed list of ANDed conditions plus any terms that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    conditions: Vec<FilterCondition>,
    rejected: Vec<String>,
}

impl FilterSet {
    /// Wraps already-typed conditions; nothing is rejected.
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            rejected: Vec::new(),
        }
    }

    /// Parses a Sieve filter string such as
    /// `price>=100,price<=500,name@=*laptop,status!=deleted`.
    ///
    /// Terms are separated by `,`; write `\,` for a literal comma inside a
    /// value. Values are typed: integers and floats (when they print back
    /// unchanged, so `"01234"` stays text), `true`/`false`, `null`, otherwise
    /// strings.
    pub fn parse(filters: &str) -> Self {
        let mut set = Self::default();

        for term in split_terms(filters) {
            match parse_term(&term) {
                Some(condition) => set.conditions.push(condition),
                None => {
                    debug!(term = %term, "rejected unparseable filter term");
                    set.rejected.push(term);
                }
            }
        }

        set
    }

    /// Builds a set from JSON-supplied conditions.
    pub fn from_raw(raw: impl IntoIterator<Item = RawCondition>) -> Self {
        let mut set = Self::default();

        for condition in raw {
            match Operator::parse(&condition.operator) {
                Some(operator) => set.conditions.push(FilterCondition {
                    field: condition.field,
                    operator,
                    value: condition.value,
                }),
                None => {
                    debug!(
                        field = %condition.field,
                        operator = %condition.operator,
                        "rejected filter with unknown operator"
                    );
                    set.rejected
                        .push(format!("{}{}", condition.field, condition.operator));
                }
            }
        }

        set
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    /// Terms that did not parse, as written.
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.rejected.is_empty()
    }

    /// True if every term parsed; a set with rejected terms matches nothing.
    pub fn is_satisfiable(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Tests one record against all conditions.
    pub fn matches(&self, record: &Value) -> bool {
        self.is_satisfiable() && evaluate_filters(&self.conditions, record)
    }

    /// Returns the records that match, in their original order.
    pub fn filter<'a>(&self, records: &'a [Value]) -> Vec<&'a Value> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    /// Splits conditions into those a remote document store can evaluate
    /// natively and those that must be evaluated locally after fetching.
    pub fn split_pushdown(&self) -> (Vec<&FilterCondition>, Vec<&FilterCondition>) {
        self.conditions
            .iter()
            .partition(|condition| condition.operator.is_firestore_supported())
    }
}

fn split_terms(input: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                chars.next();
                current.push(',');
            }
            ',' => terms.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    terms.push(current);

    terms
        .into_iter()
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Splits `{field}{operator}{value}` at the earliest operator token.
fn parse_term(term: &str) -> Option<FilterCondition> {
    for (pos, _) in term.char_indices().skip(1) {
        let rest = &term[pos..];
        for token in TOKENS_LONGEST_FIRST {
            let Some(value) = rest.strip_prefix(token) else {
                continue;
            };
            let Some(operator) = Operator::parse(token) else {
                continue;
            };
            if operator.is_unary() && !value.is_empty() {
                continue;
            }

            let field = term[..pos].trim();
            if field.is_empty() {
                return None;
            }
            let value = if operator.is_unary() {
                Value::Null
            } else {
                parse_value(value)
            };
            return Some(FilterCondition::new(field, operator, value));
        }
    }
    None
}

/// Types a raw query-string value.
pub fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    let number = raw
        .parse::<i64>()
        .ok()
        .map(Number::from)
        .or_else(|| raw.parse::<f64>().ok().and_then(Number::from_f64));

    match number {
        Some(n) if number_to_string(&n) == raw => Value::Number(n),
        _ => Value::String(raw.to_string()),
    }
}

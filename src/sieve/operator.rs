//! Sieve operator tokens

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Comparison operators understood by the filter evaluator.
///
/// This is a closed set. Unknown tokens are turned away by [`Operator::parse`],
/// which is the only place free-form operator text is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `==*`
    EqualsCaseInsensitive,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `@=`
    Contains,
    /// `@=*`
    ContainsCaseInsensitive,
    /// `_=`
    StartsWith,
    /// `_=*`
    StartsWithCaseInsensitive,
    /// `_-=`
    EndsWith,
    /// `!@=`
    NotContains,
    /// `!_=`
    NotStartsWith,
    /// `!_-=`
    NotEndsWith,
    /// `==null`
    IsNull,
    /// `!=null`
    IsNotNull,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 17] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::EqualsCaseInsensitive,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Contains,
        Operator::ContainsCaseInsensitive,
        Operator::StartsWith,
        Operator::StartsWithCaseInsensitive,
        Operator::EndsWith,
        Operator::NotContains,
        Operator::NotStartsWith,
        Operator::NotEndsWith,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Parse an operator token. Returns None for anything outside the set.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Operator::Equals),
            "!=" => Some(Operator::NotEquals),
            "==*" => Some(Operator::EqualsCaseInsensitive),
            ">" => Some(Operator::GreaterThan),
            ">=" => Some(Operator::GreaterThanOrEqual),
            "<" => Some(Operator::LessThan),
            "<=" => Some(Operator::LessThanOrEqual),
            "@=" => Some(Operator::Contains),
            "@=*" => Some(Operator::ContainsCaseInsensitive),
            "_=" => Some(Operator::StartsWith),
            "_=*" => Some(Operator::StartsWithCaseInsensitive),
            "_-=" => Some(Operator::EndsWith),
            "!@=" => Some(Operator::NotContains),
            "!_=" => Some(Operator::NotStartsWith),
            "!_-=" => Some(Operator::NotEndsWith),
            "==null" => Some(Operator::IsNull),
            "!=null" => Some(Operator::IsNotNull),
            _ => None,
        }
    }

    /// The wire token for this operator.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::EqualsCaseInsensitive => "==*",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Contains => "@=",
            Operator::ContainsCaseInsensitive => "@=*",
            Operator::StartsWith => "_=",
            Operator::StartsWithCaseInsensitive => "_=*",
            Operator::EndsWith => "_-=",
            Operator::NotContains => "!@=",
            Operator::NotStartsWith => "!_=",
            Operator::NotEndsWith => "!_-=",
            Operator::IsNull => "==null",
            Operator::IsNotNull => "!=null",
        }
    }

    /// True if a remote document store can evaluate this operator natively,
    /// so the condition can be pushed down instead of filtered locally.
    pub fn is_firestore_supported(self) -> bool {
        matches!(
            self,
            Operator::Equals
                | Operator::NotEquals
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
        )
    }

    /// True for `==null` and `!=null`, which take no value.
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

/// Token-level form of [`Operator::is_firestore_supported`]; unknown tokens
/// are never supported.
pub fn is_firestore_supported(token: &str) -> bool {
    Operator::parse(token).is_some_and(Operator::is_firestore_supported)
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error for operator text outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sieve operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::parse(s).ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = UnknownOperator;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.token().to_string()
    }
}

//! Sieve Module
//!
//! Field/operator/value filtering over JSON records, plus the query-string
//! parsing, sorting and pagination built on top of it.
//!
//! # Operators
//! `==` `!=` `==*` `>` `>=` `<` `<=` `@=` `@=*` `_=` `_=*` `_-=` `!@=` `!_=`
//! `!_-=` `==null` `!=null`

mod coerce;
mod eval;
mod filter_set;
mod operator;
mod query;


pub use coerce::{is_nullish, to_canonical_string};
pub use eval::{evaluate_filter, evaluate_filters, resolve_field, FilterCondition};
pub use filter_set::{parse_value, FilterSet, RawCondition};
pub use operator::{is_firestore_supported, Operator, UnknownOperator};
pub use query::{SieveParams, SievePage, SieveQuery, SortSpec, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

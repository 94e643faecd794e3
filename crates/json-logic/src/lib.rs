//! JsonLogic rule evaluation.
//!
//! A rule is plain JSON: an object with a single key is an operation
//! (`{"op": [operands...]}`), arrays evaluate element-wise, and everything
//! else is a literal. Rules are evaluated against a data value that `var`
//! reads from.
//!
//! Operators live in an [`OperatorRegistry`] owned by each [`Evaluator`], so
//! custom operations registered for one session never leak into another.
//!
//! # Example
//!
//! ```
//! use json_logic::{Evaluator, JsValue};
//! use serde_json::json;
//!
//! let evaluator = Evaluator::with_builtins();
//! let rule = json!({"and": [
//!     {">": [{"var": "age"}, 18]},
//!     {"in": [{"var": "country"}, ["DE", "FR"]]}
//! ]});
//! let result = evaluator.apply(&rule, &json!({"age": 30, "country": "FR"})).unwrap();
//! assert_eq!(result, JsValue::from(true));
//! ```

pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod operators;
pub mod registry;
pub mod types;
pub mod util;

pub use error::EvalError;
pub use eval_ctx::EvalCtx;
pub use evaluate::{evaluate, Evaluator};
pub use registry::OperatorRegistry;
pub use types::{Arity, CustomFn, EvalFn, Implementation, JsValue, OperatorDefinition};

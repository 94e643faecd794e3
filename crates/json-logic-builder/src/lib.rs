//! Expression-tree model and mutation engine for building JsonLogic rules
//! by drag and drop.
//!
//! The document is a single JSON value: `{}` while nothing is built, else a
//! one-key object whose key is the root operation. Every edit goes through
//! [`mutation`] or [`placement`], takes the current document by reference
//! and returns a fresh one, so a rejected edit never leaves a half-applied
//! tree behind. [`BuilderController`] ties a session together: the live
//! document, drag state, test data, the palette and the evaluator.
//!
//! # Example
//!
//! ```
//! use json_logic_builder::{BuilderConfig, BuilderController, DropTarget, Evaluation};
//! use json_logic::JsValue;
//! use json_logic_path::path;
//! use serde_json::json;
//!
//! let config = BuilderConfig {
//!     template: json!({}),
//!     test_data: json!({"age": 30}),
//!     ..BuilderConfig::default()
//! };
//! let mut session = BuilderController::new(config).unwrap();
//! session.begin_drag(">", "palette").unwrap();
//! session.drop_on(&DropTarget::root()).unwrap();
//! session.edit_value(&path![">", 0], "age").unwrap();
//! session.toggle_variable(&path![">", 0]).unwrap();
//! session.edit_value(&path![">", 1], "18").unwrap();
//!
//! assert_eq!(session.document(), &json!({">": [{"var": "age"}, 18]}));
//! assert_eq!(session.result(), &Evaluation::Value(JsValue::from(true)));
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod custom;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod mutation;
pub mod placement;
pub mod variables;

pub use catalog::{Category, Operation, OperationCatalog};
pub use config::BuilderConfig;
pub use controller::{BuilderController, BuilderEvent, DragState, Evaluation};
pub use custom::{CustomOperation, CustomOperationConfig};
pub use document::Node;
pub use error::{BuilderError, Result};
pub use evaluator::ExpressionEvaluator;
pub use mutation::RootPolicy;
pub use placement::{DropTarget, DropTargetKind};
pub use variables::VariableBinding;

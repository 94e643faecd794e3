//! Session orchestration.
//!
//! [`BuilderController`] owns the one live document of an editing session.
//! User events become mutation-engine or placement calls; each accepted edit
//! swaps in the new document and recomputes the derived state (evaluation
//! result, variable bindings) against it before returning, so nothing ever
//! observes a document paired with stale results.

use std::collections::HashMap;

use json_logic::{Evaluator, JsValue};
use json_logic_path::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::OperationCatalog;
use crate::config::BuilderConfig;
use crate::custom::{CustomOperation, CustomOperationConfig};
use crate::document::{self, coerce_scalar};
use crate::error::{BuilderError, Result};
use crate::evaluator::ExpressionEvaluator;
use crate::mutation::{self, RootPolicy};
use crate::placement::{self, DropTarget};
use crate::variables::{extract_variable_names, resolve_variables, VariableBinding};

/// Drag-and-drop state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { operation: String, source: String },
}

/// Outcome of evaluating the current document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    Value(JsValue),
    Failed(String),
}

/// A user event, in the serializable form session scripts use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuilderEvent {
    BeginDrag {
        operation: String,
        #[serde(default = "palette_source")]
        source: String,
    },
    Drop {
        target: DropTarget,
    },
    CancelDrag,
    EditValue {
        path: Path,
        text: String,
    },
    SetValue {
        path: Path,
        value: Value,
    },
    RemoveItem {
        path: Path,
        index: usize,
    },
    Remove {
        path: Path,
    },
    AddValue {
        path: Path,
    },
    ToggleVariable {
        path: Path,
    },
    ToggleCollapse {
        path: Path,
    },
    CollapseAll,
    ExpandAll,
    Reset,
    Clear,
    SetTestData {
        text: String,
    },
    FormatTestData,
    AddCustomOperation(CustomOperationConfig),
}

fn palette_source() -> String {
    "palette".to_string()
}

pub struct BuilderController<E: ExpressionEvaluator = Evaluator> {
    document: Value,
    template: Value,
    root_policy: RootPolicy,
    drag: DragState,
    catalog: OperationCatalog,
    evaluator: E,
    test_data_text: String,
    test_data: Value,
    test_data_error: Option<String>,
    collapsed_all: bool,
    collapse_overrides: HashMap<Path, bool>,
    result: Evaluation,
    variables: Vec<VariableBinding>,
}

impl BuilderController<Evaluator> {
    /// A session over the bundled evaluator with its built-in operators.
    pub fn new(config: BuilderConfig) -> Result<Self> {
        Self::with_evaluator(config, Evaluator::with_builtins())
    }
}

impl<E: ExpressionEvaluator> BuilderController<E> {
    /// A session over `evaluator`. Configured custom operations are
    /// registered with it before the first evaluation.
    pub fn with_evaluator(config: BuilderConfig, evaluator: E) -> Result<Self> {
        config.validate()?;
        let root_policy = config.root_policy();
        let BuilderConfig {
            template,
            test_data,
            custom_operations,
            ..
        } = config;
        let mut controller = BuilderController {
            document: template.clone(),
            template,
            root_policy,
            drag: DragState::Idle,
            catalog: OperationCatalog::default(),
            evaluator,
            test_data_text: document::to_pretty_json(&test_data),
            test_data,
            test_data_error: None,
            collapsed_all: false,
            collapse_overrides: HashMap::new(),
            result: Evaluation::Value(JsValue::Undefined),
            variables: Vec::new(),
        };
        for op in &custom_operations {
            controller.register_custom(CustomOperation::from_config(op)?);
        }
        controller.recompute();
        Ok(controller)
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn root_policy(&self) -> RootPolicy {
        self.root_policy
    }

    pub fn result(&self) -> &Evaluation {
        &self.result
    }

    pub fn variables(&self) -> &[VariableBinding] {
        &self.variables
    }

    pub fn test_data_text(&self) -> &str {
        &self.test_data_text
    }

    /// The last test data that parsed.
    pub fn test_data(&self) -> &Value {
        &self.test_data
    }

    /// Why the current test-data text was rejected, if it was.
    pub fn test_data_error(&self) -> Option<&str> {
        self.test_data_error.as_deref()
    }

    /// The document as pretty-printed JSON.
    pub fn json_output(&self) -> String {
        document::to_pretty_json(&self.document)
    }

    /// Starts dragging a palette operation. Unknown ids leave the state `Idle`.
    pub fn begin_drag(&mut self, operation: &str, source: &str) -> Result<()> {
        if !self.catalog.contains(operation) {
            self.drag = DragState::Idle;
            tracing::warn!(operation, "drag of unknown operation rejected");
            return Err(BuilderError::UnknownOperation(operation.to_string()));
        }
        tracing::debug!(operation, source, "drag started");
        self.drag = DragState::Dragging {
            operation: operation.to_string(),
            source: source.to_string(),
        };
        Ok(())
    }

    /// Drops the dragged operation on `target`. The drag ends whether or not
    /// placement succeeds.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn drop_on(&mut self, target: &DropTarget) -> Result<()> {
        let operation = match std::mem::replace(&mut self.drag, DragState::Idle) {
            DragState::Dragging { operation, .. } => operation,
            DragState::Idle => {
                return Err(BuilderError::InvalidDropTarget("no operation is being dragged".to_string()));
            }
        };
        let next = placement::place_operation(&self.document, &operation, target);
        self.commit(next)
    }

    pub fn cancel_drag(&mut self) {
        if self.drag != DragState::Idle {
            tracing::debug!("drag cancelled");
        }
        self.drag = DragState::Idle;
    }

    /// Sets the slot at `path` from field text, coercing it to a scalar.
    pub fn edit_value(&mut self, path: &Path, text: &str) -> Result<()> {
        self.set_value(path, coerce_scalar(text))
    }

    pub fn set_value(&mut self, path: &Path, value: Value) -> Result<()> {
        let next = mutation::set_value_at(&self.document, path, value, self.root_policy);
        self.commit(next)
    }

    /// Removes element `index` of the sequence at `path`.
    pub fn remove_item(&mut self, path: &Path, index: usize) -> Result<()> {
        let next = mutation::remove_from_sequence(&self.document, path, index);
        self.commit(next)
    }

    pub fn remove(&mut self, path: &Path) -> Result<()> {
        let next = mutation::remove_at_path(&self.document, path, self.root_policy);
        self.commit(next)
    }

    /// Appends an empty placeholder to the sequence at `path`.
    pub fn add_value(&mut self, path: &Path) -> Result<()> {
        let next = mutation::add_placeholder(&self.document, path);
        self.commit(next)
    }

    pub fn toggle_variable(&mut self, path: &Path) -> Result<()> {
        let next = mutation::toggle_variable_wrapper(&self.document, path, self.root_policy);
        self.commit(next)
    }

    /// Back to the configured template.
    pub fn reset(&mut self) {
        let template = self.template.clone();
        self.replace_document(template);
    }

    /// Deletes the root operation, leaving `{}`.
    pub fn clear(&mut self) -> Result<()> {
        let next = mutation::remove_at_path(&self.document, &Path::root(), self.root_policy);
        self.commit(next)
    }

    pub fn is_collapsed(&self, path: &Path) -> bool {
        self.collapse_overrides.get(path).copied().unwrap_or(self.collapsed_all)
    }

    pub fn toggle_collapse(&mut self, path: &Path) {
        let collapsed = !self.is_collapsed(path);
        self.collapse_overrides.insert(path.clone(), collapsed);
    }

    pub fn collapse_all(&mut self) {
        self.collapsed_all = true;
        self.collapse_overrides.clear();
    }

    pub fn expand_all(&mut self) {
        self.collapsed_all = false;
        self.collapse_overrides.clear();
    }

    /// Replaces the test-data text.
    ///
    /// Malformed JSON is kept as text and reported, while the last valid data
    /// and the last result stay in force.
    pub fn set_test_data(&mut self, text: &str) -> Result<()> {
        self.test_data_text = text.to_string();
        match serde_json::from_str::<Value>(text) {
            Ok(data) => {
                self.test_data = data;
                self.test_data_error = None;
                self.recompute();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "test data rejected");
                self.test_data_error = Some(e.to_string());
                Err(BuilderError::InvalidTestData(e.to_string()))
            }
        }
    }

    /// Re-indents the test-data text.
    pub fn format_test_data(&mut self) -> Result<()> {
        let data: Value =
            serde_json::from_str(&self.test_data_text).map_err(|e| BuilderError::InvalidTestData(e.to_string()))?;
        self.test_data_text = document::to_pretty_json(&data);
        Ok(())
    }

    /// Registers `op` with this session's evaluator and palette.
    pub fn add_custom_operation(&mut self, op: CustomOperation) {
        self.register_custom(op);
        self.recompute();
    }

    fn register_custom(&mut self, op: CustomOperation) {
        tracing::debug!(id = op.id(), "custom operation registered");
        self.evaluator.register_operation(op.to_definition());
        self.catalog.add_custom(op.catalog_entry());
    }

    /// Routes one event to its handler.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn dispatch(&mut self, event: BuilderEvent) -> Result<()> {
        match event {
            BuilderEvent::BeginDrag { operation, source } => self.begin_drag(&operation, &source),
            BuilderEvent::Drop { target } => self.drop_on(&target),
            BuilderEvent::CancelDrag => {
                self.cancel_drag();
                Ok(())
            }
            BuilderEvent::EditValue { path, text } => self.edit_value(&path, &text),
            BuilderEvent::SetValue { path, value } => self.set_value(&path, value),
            BuilderEvent::RemoveItem { path, index } => self.remove_item(&path, index),
            BuilderEvent::Remove { path } => self.remove(&path),
            BuilderEvent::AddValue { path } => self.add_value(&path),
            BuilderEvent::ToggleVariable { path } => self.toggle_variable(&path),
            BuilderEvent::ToggleCollapse { path } => {
                self.toggle_collapse(&path);
                Ok(())
            }
            BuilderEvent::CollapseAll => {
                self.collapse_all();
                Ok(())
            }
            BuilderEvent::ExpandAll => {
                self.expand_all();
                Ok(())
            }
            BuilderEvent::Reset => {
                self.reset();
                Ok(())
            }
            BuilderEvent::Clear => self.clear(),
            BuilderEvent::SetTestData { text } => self.set_test_data(&text),
            BuilderEvent::FormatTestData => self.format_test_data(),
            BuilderEvent::AddCustomOperation(config) => {
                let op = CustomOperation::from_config(&config)?;
                self.add_custom_operation(op);
                Ok(())
            }
        }
    }

    fn commit(&mut self, next: Result<Value>) -> Result<()> {
        match next {
            Ok(document) => {
                self.replace_document(document);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "edit rejected");
                Err(e)
            }
        }
    }

    fn replace_document(&mut self, document: Value) {
        self.document = document;
        self.collapse_overrides.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.result = match self.evaluator.apply(&self.document, &self.test_data) {
            Ok(value) => Evaluation::Value(value),
            Err(e) => Evaluation::Failed(e.to_string()),
        };
        let names = extract_variable_names(&self.document);
        self.variables = resolve_variables(&names, &self.evaluator, &self.test_data);
        tracing::debug!(result = ?self.result, variables = self.variables.len(), "recomputed");
    }
}

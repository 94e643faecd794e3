use serde_json::Value;

use crate::registry::OperatorRegistry;

/// The execution context passed to every operator.
///
/// `data` is the value `var` reads from. Scoped operators (`map`, `filter`,
/// `reduce`, ...) evaluate their body in a child context whose data is the
/// current item.
pub struct EvalCtx<'a> {
    pub data: &'a Value,
    pub registry: &'a OperatorRegistry,
}

impl<'a> EvalCtx<'a> {
    pub fn new(data: &'a Value, registry: &'a OperatorRegistry) -> Self {
        EvalCtx { data, registry }
    }

    /// A child context over `data`, sharing this context's registry.
    pub fn scoped<'b>(&self, data: &'b Value) -> EvalCtx<'b>
    where
        'a: 'b,
    {
        EvalCtx {
            data,
            registry: self.registry,
        }
    }
}

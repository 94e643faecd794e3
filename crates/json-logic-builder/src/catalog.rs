//! The operation palette.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Logic,
    Comparison,
    Math,
    DataAccess,
    Array,
    String,
    Custom,
}

impl Category {
    /// Palette order.
    pub const ALL: [Category; 7] = [
        Category::Logic,
        Category::Comparison,
        Category::Math,
        Category::DataAccess,
        Category::Array,
        Category::String,
        Category::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Logic => "Logic",
            Category::Comparison => "Comparison",
            Category::Math => "Math",
            Category::DataAccess => "Data Access",
            Category::Array => "Array",
            Category::String => "String",
            Category::Custom => "Custom",
        }
    }
}

/// One palette entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub description: String,
    pub category: Category,
}

impl Operation {
    pub fn new(id: &str, description: &str, category: Category) -> Self {
        Operation {
            id: id.to_string(),
            description: description.to_string(),
            category,
        }
    }
}

const DEFAULT_PALETTE: &[(&str, &str, Category)] = &[
    ("and", "All conditions must be true", Category::Logic),
    ("or", "Any condition must be true", Category::Logic),
    ("if", "Conditional logic (if-then-else)", Category::Logic),
    ("!", "Logical NOT", Category::Logic),
    ("!!", "Convert to boolean", Category::Logic),
    ("==", "Equal (type coercion)", Category::Comparison),
    ("===", "Strictly equal (no type coercion)", Category::Comparison),
    ("!=", "Not equal (type coercion)", Category::Comparison),
    ("!==", "Strictly not equal (no type coercion)", Category::Comparison),
    (">", "Greater than", Category::Comparison),
    (">=", "Greater than or equal", Category::Comparison),
    ("<", "Less than", Category::Comparison),
    ("<=", "Less than or equal", Category::Comparison),
    ("+", "Addition", Category::Math),
    ("-", "Subtraction", Category::Math),
    ("*", "Multiplication", Category::Math),
    ("/", "Division", Category::Math),
    ("%", "Remainder (modulo)", Category::Math),
    ("min", "Minimum value", Category::Math),
    ("max", "Maximum value", Category::Math),
    ("abs", "Absolute value", Category::Math),
    ("var", "Access variable", Category::DataAccess),
    ("missing", "Check for missing keys", Category::DataAccess),
    ("missing_some", "Check if some keys are missing", Category::DataAccess),
    ("map", "Apply logic to each item", Category::Array),
    ("filter", "Filter array by condition", Category::Array),
    ("reduce", "Reduce array to single value", Category::Array),
    ("all", "Check if all items match condition", Category::Array),
    ("none", "Check if no items match condition", Category::Array),
    ("some", "Check if any items match condition", Category::Array),
    ("merge", "Merge arrays", Category::Array),
    ("cat", "Concatenate strings", Category::String),
    ("substr", "Get substring", Category::String),
    ("afterDate", "Check if date is after another date", Category::Custom),
    ("beforeDate", "Check if date is before another date", Category::Custom),
];

/// The operations a user can drag into the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationCatalog {
    operations: Vec<Operation>,
}

impl Default for OperationCatalog {
    fn default() -> Self {
        OperationCatalog {
            operations: DEFAULT_PALETTE
                .iter()
                .map(|(id, description, category)| Operation::new(id, description, *category))
                .collect(),
        }
    }
}

impl OperationCatalog {
    /// A catalog with no operations at all.
    pub fn empty() -> Self {
        OperationCatalog { operations: Vec::new() }
    }

    pub fn find(&self, id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(move |op| op.category == category)
    }

    /// Non-empty categories in palette order.
    pub fn grouped(&self) -> Vec<(Category, Vec<&Operation>)> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.by_category(category).collect::<Vec<_>>()))
            .filter(|(_, ops)| !ops.is_empty())
            .collect()
    }

    /// Adds `op` to the Custom category, replacing any entry with the same id.
    pub fn add_custom(&mut self, mut op: Operation) {
        op.category = Category::Custom;
        self.operations.retain(|existing| existing.id != op.id);
        self.operations.push(op);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_logic::OperatorRegistry;

    #[test]
    fn test_every_palette_entry_is_evaluable() {
        let registry = OperatorRegistry::with_builtins();
        for op in OperationCatalog::default().iter() {
            assert!(registry.contains(&op.id), "{} has no evaluator", op.id);
        }
    }

    #[test]
    fn test_grouped_in_palette_order() {
        let catalog = OperationCatalog::default();
        let groups = catalog.grouped();
        let labels: Vec<&str> = groups.iter().map(|(c, _)| c.label()).collect();
        assert_eq!(labels, vec!["Logic", "Comparison", "Math", "Data Access", "Array", "String", "Custom"]);
        assert_eq!(groups[0].1.len(), 5);
    }

    #[test]
    fn test_add_custom_replaces_same_id() {
        let mut catalog = OperationCatalog::default();
        let before = catalog.len();
        catalog.add_custom(Operation::new("double", "Doubles", Category::Math));
        catalog.add_custom(Operation::new("double", "Doubles again", Category::Custom));
        assert_eq!(catalog.len(), before + 1);
        let op = catalog.find("double").unwrap();
        assert_eq!(op.description, "Doubles again");
        assert_eq!(op.category, Category::Custom);
    }
}

//! Declaration model accumulated during traversal

use crate::classify::FieldKind;
use crate::names;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One field of a generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    /// Python attribute name
    pub attribute: String,
    /// Binding construct
    pub kind: FieldKind,
    /// XPath query relative to the owning object
    pub query: String,
    /// Referenced class for nested kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Text observed in the sample document, for value kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
}

impl FieldDecl {
    /// Default expression passed to the runtime field
    pub fn default_expr(&self) -> String {
        match (self.kind, &self.target) {
            (FieldKind::ListValue, _) => "[]".to_string(),
            (FieldKind::Object | FieldKind::ListObject, Some(target)) => format!("{}()", target),
            _ => "''".to_string(),
        }
    }

    /// Render the declaration line, without indentation
    pub fn render(&self) -> String {
        let runtime = self.kind.runtime_class();
        let default = self.default_expr();
        match (&self.target, self.kind) {
            (Some(target), FieldKind::ListObject) => format!(
                "{}: List[{}] = base.{}('{}', {}, default={})",
                self.attribute, target, runtime, self.query, target, default
            ),
            (Some(target), _) => format!(
                "{}: {} = base.{}('{}', {}, default={})",
                self.attribute, target, runtime, self.query, target, default
            ),
            (None, _) => {
                let line = format!(
                    "{} = base.{}('{}', default={})",
                    self.attribute, runtime, self.query, default
                );
                match self.observed.as_deref() {
                    Some(observed) if !observed.is_empty() => format!("{}  # {}", line, observed),
                    _ => line,
                }
            }
        }
    }
}

/// One generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDecl {
    /// Python class name
    pub class_name: String,
    /// Fields in first-visited order
    pub fields: Vec<FieldDecl>,
}

impl ClassDecl {
    /// Create an empty class for a node name
    pub fn new(node_name: &str) -> Self {
        Self {
            class_name: names::class_name(node_name),
            fields: Vec::new(),
        }
    }

    /// Check if a field with this attribute name is already declared
    pub fn has_field(&self, attribute: &str) -> bool {
        self.fields.iter().any(|f| f.attribute == attribute)
    }

    /// Append a field unless its attribute name is taken
    ///
    /// Returns `false` when the field was dropped as a duplicate.
    pub fn push_field(&mut self, field: FieldDecl) -> bool {
        if self.has_field(&field.attribute) {
            return false;
        }
        self.fields.push(field);
        true
    }

    /// Header line of the class block
    pub fn header(&self) -> String {
        format!("class {}(base.BaseXmlParser):", self.class_name)
    }
}

/// Classes keyed by node name, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassModel {
    classes: IndexMap<String, ClassDecl>,
    #[serde(skip)]
    class_names: HashSet<String>,
}

impl ClassModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Class for a node name, created on first use
    ///
    /// Distinct node names that sanitize to the same Python name (`item` and
    /// `Item`, `line-item` and `line_item`) get a numeric suffix on the later
    /// class so that neither definition shadows the other.
    pub fn class_entry(&mut self, node_name: &str) -> &mut ClassDecl {
        match self.classes.entry(node_name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut class = ClassDecl::new(node_name);
                if self.class_names.contains(&class.class_name) {
                    let taken = class.class_name.clone();
                    let mut suffix = 2;
                    while self.class_names.contains(&format!("{}_{}", taken, suffix)) {
                        suffix += 1;
                    }
                    class.class_name = format!("{}_{}", taken, suffix);
                    tracing::warn!(
                        element = %node_name,
                        taken = %taken,
                        class = %class.class_name,
                        "class name already in use, renamed"
                    );
                }
                self.class_names.insert(class.class_name.clone());
                entry.insert(class)
            }
        }
    }

    /// Look up the class of a node name
    pub fn get(&self, node_name: &str) -> Option<&ClassDecl> {
        self.classes.get(node_name)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no class was declared
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Classes in first-seen order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &ClassDecl)> {
        self.classes.iter().map(|(name, class)| (name.as_str(), class))
    }

    /// Classes in emission order: nested classes before the classes using them
    ///
    /// Starts from reverse first-seen order and pulls every referenced class
    /// in front of the first class using it. References closing a cycle are
    /// skipped since no order can satisfy them.
    pub fn emission_order(&self) -> impl Iterator<Item = &ClassDecl> {
        let classes: Vec<&ClassDecl> = self.classes.values().collect();
        let mut by_class_name: HashMap<&str, usize> = HashMap::new();
        for (index, class) in classes.iter().enumerate() {
            by_class_name.entry(class.class_name.as_str()).or_insert(index);
        }

        let mut state = vec![Mark::Unvisited; classes.len()];
        let mut order = Vec::with_capacity(classes.len());

        for seed in (0..classes.len()).rev() {
            if state[seed] != Mark::Unvisited {
                continue;
            }
            state[seed] = Mark::InProgress;
            // (class, next field to look at)
            let mut stack = vec![(seed, 0usize)];

            while let Some((index, next)) = stack.pop() {
                let fields = &classes[index].fields;
                let target = fields[next..]
                    .iter()
                    .position(|f| f.kind.is_nested())
                    .map(|offset| next + offset);

                match target {
                    Some(field_index) => {
                        stack.push((index, field_index + 1));
                        let dependency = fields[field_index]
                            .target
                            .as_deref()
                            .and_then(|name| by_class_name.get(name).copied());
                        if let Some(dependency) = dependency {
                            if state[dependency] == Mark::Unvisited {
                                state[dependency] = Mark::InProgress;
                                stack.push((dependency, 0));
                            }
                        }
                    }
                    None => {
                        state[index] = Mark::Done;
                        order.push(classes[index]);
                    }
                }
            }
        }
        order.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(attribute: &str, observed: &str) -> FieldDecl {
        FieldDecl {
            attribute: attribute.to_string(),
            kind: FieldKind::Value,
            query: format!("./{}", attribute),
            target: None,
            observed: Some(observed.to_string()),
        }
    }

    #[test]
    fn test_render_value_kinds() {
        assert_eq!(
            value("Name", "Ellen Adams").render(),
            "Name = base.ValueField('./Name', default='')  # Ellen Adams"
        );

        let date = FieldDecl {
            kind: FieldKind::DateTime,
            ..value("ShipDate", "1999-05-21")
        };
        assert_eq!(
            date.render(),
            "ShipDate = base.DateTimeField('./ShipDate', default='')  # 1999-05-21"
        );

        let list = FieldDecl {
            attribute: "Tags".to_string(),
            kind: FieldKind::ListValue,
            query: "./Tag".to_string(),
            target: None,
            observed: Some("red".to_string()),
        };
        assert_eq!(
            list.render(),
            "Tags = base.ListValueField('./Tag', default=[])  # red"
        );

        assert_eq!(
            value("Empty", "").render(),
            "Empty = base.ValueField('./Empty', default='')"
        );
    }

    #[test]
    fn test_render_nested_kinds() {
        let object = FieldDecl {
            attribute: "Items".to_string(),
            kind: FieldKind::Object,
            query: "./Items".to_string(),
            target: Some("Items".to_string()),
            observed: None,
        };
        assert_eq!(
            object.render(),
            "Items: Items = base.ObjectField('./Items', Items, default=Items())"
        );

        let list = FieldDecl {
            attribute: "Items".to_string(),
            kind: FieldKind::ListObject,
            query: "./Item".to_string(),
            target: Some("Item".to_string()),
            observed: None,
        };
        assert_eq!(
            list.render(),
            "Items: List[Item] = base.ListObjectField('./Item', Item, default=Item())"
        );
    }

    #[test]
    fn test_duplicate_fields_dropped() {
        let mut class = ClassDecl::new("address");
        assert_eq!(class.class_name, "Address");
        assert!(class.push_field(value("Name", "first")));
        assert!(!class.push_field(value("Name", "second")));
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.fields[0].observed.as_deref(), Some("first"));
        assert_eq!(class.header(), "class Address(base.BaseXmlParser):");
    }

    #[test]
    fn test_model_order() {
        let mut model = ClassModel::new();
        model.class_entry("root");
        model.class_entry("a");
        model.class_entry("b");
        model.class_entry("a").push_field(value("x", "1"));

        assert_eq!(model.len(), 3);
        let first_seen: Vec<_> = model.iter().map(|(name, _)| name).collect();
        assert_eq!(first_seen, vec!["root", "a", "b"]);
        let emitted: Vec<_> = model.emission_order().map(|c| c.class_name.as_str()).collect();
        assert_eq!(emitted, vec!["B", "A", "Root"]);
        assert_eq!(model.get("a").map(|c| c.fields.len()), Some(1));
    }

    fn nested(attribute: &str, target: &str) -> FieldDecl {
        FieldDecl {
            attribute: attribute.to_string(),
            kind: FieldKind::Object,
            query: format!("./{}", attribute),
            target: Some(target.to_string()),
            observed: None,
        }
    }

    fn emitted(model: &ClassModel) -> Vec<&str> {
        model.emission_order().map(|c| c.class_name.as_str()).collect()
    }

    #[test]
    fn test_late_reference_pulls_class_forward() {
        // <r><c><d>1</d></c><p><c><d>2</d></c></p></r>
        let mut model = ClassModel::new();
        model.class_entry("r").push_field(nested("c", "C"));
        model.class_entry("c").push_field(value("d", "1"));
        model.class_entry("r").push_field(nested("p", "P"));
        model.class_entry("p").push_field(nested("c", "C"));

        assert_eq!(emitted(&model), vec!["C", "P", "R"]);
    }

    #[test]
    fn test_valid_reverse_order_is_kept() {
        let mut model = ClassModel::new();
        model.class_entry("order").push_field(nested("address", "Address"));
        model.class_entry("address").push_field(value("name", "n"));
        model.class_entry("order").push_field(nested("items", "Items"));
        model.class_entry("items").push_field(nested("item", "Item"));
        model.class_entry("item").push_field(value("sku", "s"));

        assert_eq!(emitted(&model), vec!["Item", "Items", "Address", "Order"]);
    }

    #[test]
    fn test_cycles_do_not_loop() {
        let mut model = ClassModel::new();
        model.class_entry("a").push_field(nested("b", "B"));
        model.class_entry("b").push_field(nested("a", "A"));
        model.class_entry("b").push_field(nested("b", "B"));

        let order = emitted(&model);
        assert_eq!(order.len(), 2);
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_colliding_class_names_are_renamed() {
        let mut model = ClassModel::new();
        assert_eq!(model.class_entry("item").class_name, "Item");
        assert_eq!(model.class_entry("Item").class_name, "Item_2");
        assert_eq!(model.class_entry("line-item").class_name, "Line_item");
        assert_eq!(model.class_entry("line_item").class_name, "Line_item_2");
        assert_eq!(model.class_entry("Line-item").class_name, "Line_item_3");

        // Repeated lookups keep the assigned name
        assert_eq!(model.class_entry("Item").class_name, "Item_2");
        assert_eq!(model.len(), 5);
    }
}

use std::collections::{BTreeMap, BTreeSet};

use crate::conditions::{get_dependent_field_ids, has_dependencies};
use crate::spec::field::FieldConfig;
use crate::spec::form::FormSchema;

/// Reverse index from a source field to the fields whose conditional state reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    dependents: BTreeMap<String, BTreeSet<String>>,
    reactive: Vec<String>,
}

impl DependencyGraph {
    pub fn from_schema(schema: &FormSchema) -> Self {
        Self::from_fields(schema.steps.iter().flat_map(|step| step.fields.iter()))
    }

    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a FieldConfig>) -> Self {
        let mut graph = Self::default();
        for field in fields {
            let rules = [
                field.conditional_visibility.as_ref(),
                field.conditional_required.as_ref(),
                field.conditional_disabled.as_ref(),
            ];
            if !has_dependencies(rules[0], rules[1], rules[2]) {
                continue;
            }
            graph.reactive.push(field.field_id.clone());
            for source in rules.into_iter().flat_map(get_dependent_field_ids) {
                graph
                    .dependents
                    .entry(source)
                    .or_default()
                    .insert(field.field_id.clone());
            }
        }
        graph
    }

    /// Fields to recompute after `field_id` changes.
    pub fn dependents_of(&self, field_id: &str) -> Vec<&str> {
        self.dependents
            .get(field_id)
            .map(|targets| targets.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Fields carrying at least one dependency, in schema order.
    pub fn reactive_fields(&self) -> &[String] {
        &self.reactive
    }

    pub fn is_empty(&self) -> bool {
        self.reactive.is_empty()
    }
}

use std::collections::HashMap;

use crate::spec::Field;

/// Fields sharing a group label, in input order.
///
/// `label` is `None` for the bucket collecting every ungrouped field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroup<'a> {
    pub label: Option<&'a str>,
    pub fields: Vec<&'a Field>,
}

impl FieldGroup<'_> {
    pub fn is_ungrouped(&self) -> bool {
        self.label.is_none()
    }
}

/// Partitions fields by group label in one stable pass.
///
/// Groups come out in order of first appearance. Ungrouped fields share one
/// bucket placed where the first ungrouped field appeared.
pub fn group_fields(fields: &[Field]) -> Vec<FieldGroup<'_>> {
    let mut slots: HashMap<Option<&str>, usize> = HashMap::new();
    let mut groups: Vec<FieldGroup<'_>> = Vec::new();

    for field in fields {
        let label = field.group_label();
        let slot = *slots.entry(label).or_insert_with(|| {
            groups.push(FieldGroup {
                label,
                fields: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].fields.push(field);
    }

    groups
}

/// Concatenates groups back into a single order.
pub fn flatten<'a>(groups: &[FieldGroup<'a>]) -> Vec<&'a Field> {
    groups
        .iter()
        .flat_map(|group| group.fields.iter().copied())
        .collect()
}

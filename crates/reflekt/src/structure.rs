//! Struct builder: semi-structured input to a container of elements
//!
//! Every element is constructed positionally from a `(key, value, extras)`
//! triple. Keys are stringified, values are passed through untouched, and
//! extras is either `Null` or a map of the remaining entries of a
//! multi-entry item.

use reflekt_types::ReflectResult;

use crate::builtins::builtins;
use crate::reflector::Reflector;
use crate::ty::TypeRef;
use crate::value::{Value, ValueMap};

impl Reflector {
    /// Build a `container` of `element` instances from `input`.
    ///
    /// - a map yields one element per entry;
    /// - a list yields one element per item: single-entry maps by their
    ///   entry, multi-entry maps by their first entry with the rest as
    ///   extras, empty maps nothing, anything else keyed by its text;
    /// - any other input is a one-item list.
    ///
    /// The container is then constructed from the element list.
    pub fn build_struct(&self, container: &TypeRef, element: &TypeRef, input: &Value) -> ReflectResult<Value> {
        let mut items = Vec::new();

        if let Some(map) = entries_of(input) {
            for (key, value) in map.iter() {
                items.push(self.element(element, key, value, Value::Null)?);
            }
        } else if let Value::List(list) = input {
            for item in list {
                match entries_of(item) {
                    Some(map) => {
                        let mut entries = map.iter();
                        let Some((key, value)) = entries.next() else {
                            continue;
                        };

                        let extras = if map.len() == 1 {
                            Value::Null
                        } else {
                            let rest = entries
                                .map(|(k, v)| Ok((self.text(k)?, v.clone())))
                                .collect::<ReflectResult<ValueMap>>()?;
                            Value::Map(rest)
                        };

                        items.push(self.element(element, key, value, extras)?);
                    }
                    None => items.push(self.scalar_element(element, item)?),
                }
            }
        } else {
            items.push(self.scalar_element(element, input)?);
        }

        tracing::trace!(
            container = container.name(),
            element = element.name(),
            count = items.len(),
            "building struct"
        );
        self.new_instance_with(container, &[Value::List(items)])
    }

    fn element(&self, element: &TypeRef, key: &Value, value: &Value, extras: Value) -> ReflectResult<Value> {
        self.new_instance_with(element, &[self.text(key)?, value.clone(), extras])
    }

    fn scalar_element(&self, element: &TypeRef, item: &Value) -> ReflectResult<Value> {
        self.new_instance_with(element, &[self.text(item)?, Value::Null, Value::Null])
    }

    fn text(&self, value: &Value) -> ReflectResult<Value> {
        self.converter().convert(value, &builtins().string)
    }
}

fn entries_of(value: &Value) -> Option<ValueMap> {
    match value {
        Value::Map(map) => Some(map.clone()),
        Value::ConcurrentMap(map) => Some(map.snapshot()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{ConstructorDescriptor, TypeDescriptor};

    #[test]
    fn test_single_scalar_input() {
        let b = builtins();
        let entry = TypeDescriptor::class("app.Entry")
            .constructor(ConstructorDescriptor::new(
                vec![b.string.clone(), b.object.clone(), b.map.clone()],
                |_, args| Ok(Value::List(args.to_vec())),
            ))
            .build();

        let built = Reflector::new()
            .build_struct(&b.array_list, &entry, &Value::Int(7))
            .unwrap();

        assert_eq!(
            built,
            Value::List(vec![Value::List(vec![
                Value::str("7"),
                Value::Null,
                Value::Null
            ])])
        );
    }
}

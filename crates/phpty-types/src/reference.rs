//! Reference sets: several storage locations sharing one value
//!
//! When a value is assigned through a reference, every typed location in
//! the set coerces it independently. The assignment only happens if all of
//! them agree on the resulting representation.

use crate::coercion::{Coerced, CoercionResolver};
use crate::error::TypeError;
use crate::ty::Type;
use crate::value::Value;
use tracing::debug;

/// A storage location participating in a reference set
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSlot {
    /// Variable or property name, without `$`
    pub name: String,
    /// Declared type; `None` accepts anything
    pub declared: Option<Type>,
}

impl ReferenceSlot {
    /// A typed location
    pub fn typed(name: impl Into<String>, declared: Type) -> Self {
        ReferenceSlot {
            name: name.into(),
            declared: Some(declared),
        }
    }

    /// An untyped location
    pub fn untyped(name: impl Into<String>) -> Self {
        ReferenceSlot {
            name: name.into(),
            declared: None,
        }
    }
}

/// Locations bound to one shared value
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    value: Value,
    slots: Vec<ReferenceSlot>,
}

impl ReferenceSet {
    /// Create an empty set holding `value`
    pub fn new(value: Value) -> Self {
        ReferenceSet {
            value,
            slots: Vec::new(),
        }
    }

    /// Current shared value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Bound locations
    pub fn slots(&self) -> &[ReferenceSlot] {
        &self.slots
    }

    /// Whether more than one location shares the value
    pub fn is_shared(&self) -> bool {
        self.slots.len() > 1
    }

    /// Bind a location to the set
    ///
    /// A typed location only joins if it accepts the current value exactly
    /// as it is; binding never converts the shared value.
    pub fn bind(&mut self, slot: ReferenceSlot, resolver: &CoercionResolver<'_>) -> Result<(), TypeError> {
        if let Some(declared) = &slot.declared {
            let coerced = resolver.coerce(&self.value, declared)?;
            if !coerced.value.same_representation(&self.value) {
                return Err(TypeError::ReferenceConflict {
                    slot: slot.name,
                    reason: format!(
                        "{} would have to change to {} to satisfy {}",
                        self.value, coerced.value, declared
                    ),
                });
            }
        }
        self.slots.push(slot);
        Ok(())
    }

    /// Remove a location by name
    pub fn unbind(&mut self, name: &str) -> Option<ReferenceSlot> {
        let index = self.slots.iter().position(|slot| slot.name == name)?;
        Some(self.slots.remove(index))
    }

    /// Assign through the reference
    ///
    /// Every typed location coerces `value` on its own. A failed coercion is
    /// returned as is; differing results fail with
    /// [`TypeError::ReferenceConflict`]. On any error the shared value is
    /// left untouched.
    pub fn assign(&mut self, value: Value, resolver: &CoercionResolver<'_>) -> Result<Coerced, TypeError> {
        let mut agreed: Option<(Coerced, &ReferenceSlot)> = None;

        for slot in &self.slots {
            let Some(declared) = &slot.declared else {
                continue;
            };
            let coerced = resolver.coerce(&value, declared)?;

            match &agreed {
                Some((first, first_slot)) if !first.value.same_representation(&coerced.value) => {
                    return Err(TypeError::ReferenceConflict {
                        slot: slot.name.clone(),
                        reason: format!(
                            "${} would hold {} but ${} would hold {}",
                            first_slot.name, first.value, slot.name, coerced.value
                        ),
                    });
                }
                Some(_) => {}
                None => agreed = Some((coerced, slot)),
            }
        }

        let coerced = match agreed {
            Some((coerced, _)) => coerced,
            None => Coerced { value, notice: None },
        };

        debug!(value = %coerced.value, slots = self.slots.len(), "reference assignment committed");
        self.value = coerced.value.clone();
        Ok(coerced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::CoercionMode;
    use crate::hierarchy::ClassTable;
    use crate::subtyping::SubtypingContext;

    fn union(members: Vec<Type>) -> Type {
        Type::union(members).unwrap()
    }

    #[test]
    fn test_agreeing_slots_commit() {
        let table = ClassTable::new();
        let resolver = CoercionResolver::new(SubtypingContext::new(&table), CoercionMode::Weak);
        let mut set = ReferenceSet::new(Value::Int(0));
        set.bind(ReferenceSlot::typed("a", Type::int()), &resolver).unwrap();
        set.bind(ReferenceSlot::typed("b", union(vec![Type::int(), Type::string()])), &resolver)
            .unwrap();
        set.bind(ReferenceSlot::untyped("c"), &resolver).unwrap();
        assert!(set.is_shared());

        let result = set.assign(Value::Float(7.0), &resolver).unwrap();
        assert_eq!(result.value, Value::Int(7));
        assert_eq!(set.value(), &Value::Int(7));
    }

    #[test]
    fn test_conflicting_slots_leave_value_untouched() {
        let table = ClassTable::new();
        let resolver = CoercionResolver::new(SubtypingContext::new(&table), CoercionMode::Weak);
        let mut set = ReferenceSet::new(Value::Int(1));
        set.bind(ReferenceSlot::typed("i", Type::int()), &resolver).unwrap();
        let err = set.bind(ReferenceSlot::typed("f", Type::float()), &resolver).unwrap_err();
        assert!(matches!(err, TypeError::ReferenceConflict { .. }));
        assert_eq!(set.slots().len(), 1);

        let mut mixed = ReferenceSet::new(Value::Int(2));
        mixed.bind(ReferenceSlot::typed("i", union(vec![Type::int(), Type::bool()])), &resolver).unwrap();
        mixed.bind(ReferenceSlot::typed("s", union(vec![Type::string(), Type::int()])), &resolver).unwrap();

        let err = mixed.assign(Value::Bool(true), &resolver).unwrap_err();
        assert!(matches!(err, TypeError::ReferenceConflict { ref slot, .. } if slot == "s"));
        assert_eq!(mixed.value(), &Value::Int(2));
    }

    #[test]
    fn test_failed_coercion_leaves_value_untouched() {
        let table = ClassTable::new();
        let resolver = CoercionResolver::new(SubtypingContext::new(&table), CoercionMode::Weak);
        let mut set = ReferenceSet::new(Value::Int(3));
        set.bind(ReferenceSlot::typed("n", Type::int()), &resolver).unwrap();

        let err = set.assign(Value::Array(vec![]), &resolver).unwrap_err();
        assert!(matches!(err, TypeError::NotCoercible { .. }));
        assert_eq!(set.value(), &Value::Int(3));
    }

    #[test]
    fn test_unbind() {
        let table = ClassTable::new();
        let resolver = CoercionResolver::new(SubtypingContext::new(&table), CoercionMode::Weak);
        let mut set = ReferenceSet::new(Value::Int(3));
        set.bind(ReferenceSlot::typed("n", Type::int()), &resolver).unwrap();
        set.bind(ReferenceSlot::untyped("m"), &resolver).unwrap();

        assert!(set.unbind("n").is_some());
        assert!(set.unbind("n").is_none());
        assert!(!set.is_shared());

        set.assign(Value::string("free"), &resolver).unwrap();
        assert_eq!(set.value(), &Value::string("free"));
    }
}

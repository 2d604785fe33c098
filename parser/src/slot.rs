//! @ai:module:intent Writable destinations that the dispatch parser stores parsed values into
//! @ai:module:layer domain
//! @ai:module:public_api Slot, Rejection
//! @ai:module:depends_on value
//! @ai:module:stateless true

use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// @ai:intent Reason a destination refused a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The integer does not fit the destination width.
    Overflow { target: &'static str },
    /// The destination cannot hold this kind of value at all.
    Mismatch {
        destination: &'static str,
        found: &'static str,
    },
}

/// @ai:intent A caller-owned location that parsed argument values are written into
///
/// Every setter defaults to rejecting the value, so an implementation only
/// overrides what its type can hold. Sequence and map setters replace the
/// previous contents.
pub trait Slot {
    /// Human readable destination type, used in diagnostics.
    fn slot_name(&self) -> &'static str;

    fn set_bool(&mut self, _value: bool) -> Result<(), Rejection> {
        Err(self.mismatch("bool"))
    }

    fn set_signed(&mut self, _value: i64) -> Result<(), Rejection> {
        Err(self.mismatch("integer"))
    }

    fn set_unsigned(&mut self, _value: u64) -> Result<(), Rejection> {
        Err(self.mismatch("integer"))
    }

    fn set_string(&mut self, _value: String) -> Result<(), Rejection> {
        Err(self.mismatch("string"))
    }

    fn set_raw(&mut self, _value: &[u8]) -> Result<(), Rejection> {
        Err(self.mismatch("raw bytes"))
    }

    /// Clears the destination and prepares it to receive items.
    fn begin_slice(&mut self) -> Result<(), Rejection> {
        Err(self.mismatch("slice"))
    }

    /// Appends a default item and returns it for the item grammar to fill.
    fn push_item(&mut self) -> Result<&mut dyn Slot, Rejection> {
        Err(self.mismatch("slice"))
    }

    /// Clears the destination and prepares it to receive entries.
    fn begin_map(&mut self) -> Result<(), Rejection> {
        Err(self.mismatch("map"))
    }

    /// Resets the entry for `key` to its default and returns it.
    fn map_entry(&mut self, _key: String) -> Result<&mut dyn Slot, Rejection> {
        Err(self.mismatch("map"))
    }

    /// @ai:intent Store an inferred value by replaying it through the typed setters
    fn set_value(&mut self, value: Value) -> Result<(), Rejection> {
        match value {
            Value::Null => Err(self.mismatch("null")),
            Value::Bool(b) => self.set_bool(b),
            Value::Int(i) => self.set_signed(i),
            Value::Uint(u) => self.set_unsigned(u),
            Value::String(s) => self.set_string(s),
            Value::Slice(items) => {
                self.begin_slice()?;
                for item in items {
                    self.push_item()?.set_value(item)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                self.begin_map()?;
                for (key, value) in entries {
                    self.map_entry(key)?.set_value(value)?;
                }
                Ok(())
            }
        }
    }

    fn mismatch(&self, found: &'static str) -> Rejection {
        Rejection::Mismatch {
            destination: self.slot_name(),
            found,
        }
    }
}

impl Slot for bool {
    fn slot_name(&self) -> &'static str {
        "bool"
    }

    fn set_bool(&mut self, value: bool) -> Result<(), Rejection> {
        *self = value;
        Ok(())
    }
}

macro_rules! integer_slot {
    ($($ty:ty),*) => {
        $(
            impl Slot for $ty {
                fn slot_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn set_signed(&mut self, value: i64) -> Result<(), Rejection> {
                    *self = <$ty>::try_from(value).map_err(|_| Rejection::Overflow {
                        target: stringify!($ty),
                    })?;
                    Ok(())
                }

                fn set_unsigned(&mut self, value: u64) -> Result<(), Rejection> {
                    *self = <$ty>::try_from(value).map_err(|_| Rejection::Overflow {
                        target: stringify!($ty),
                    })?;
                    Ok(())
                }
            }
        )*
    };
}

integer_slot!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Slot for String {
    fn slot_name(&self) -> &'static str {
        "String"
    }

    fn set_string(&mut self, value: String) -> Result<(), Rejection> {
        *self = value;
        Ok(())
    }
}

impl<T: Slot + Default> Slot for Vec<T> {
    fn slot_name(&self) -> &'static str {
        "Vec"
    }

    /// Raw bytes land one per item, which makes `Vec<u8>` the raw destination.
    fn set_raw(&mut self, value: &[u8]) -> Result<(), Rejection> {
        self.begin_slice()?;
        for byte in value {
            self.push_item()?.set_unsigned(u64::from(*byte))?;
        }
        Ok(())
    }

    fn begin_slice(&mut self) -> Result<(), Rejection> {
        self.clear();
        Ok(())
    }

    fn push_item(&mut self) -> Result<&mut dyn Slot, Rejection> {
        let index = self.len();
        self.push(T::default());
        Ok(&mut self[index])
    }
}

impl<V: Slot + Default, S: BuildHasher> Slot for HashMap<String, V, S> {
    fn slot_name(&self) -> &'static str {
        "HashMap<String, _>"
    }

    fn begin_map(&mut self) -> Result<(), Rejection> {
        self.clear();
        Ok(())
    }

    fn map_entry(&mut self, key: String) -> Result<&mut dyn Slot, Rejection> {
        let entry = self.entry(key).or_default();
        *entry = V::default();
        Ok(entry)
    }
}

impl<V: Slot + Default> Slot for BTreeMap<String, V> {
    fn slot_name(&self) -> &'static str {
        "BTreeMap<String, _>"
    }

    fn begin_map(&mut self) -> Result<(), Rejection> {
        self.clear();
        Ok(())
    }

    fn map_entry(&mut self, key: String) -> Result<&mut dyn Slot, Rejection> {
        let entry = self.entry(key).or_default();
        *entry = V::default();
        Ok(entry)
    }
}

impl<T: Slot + ?Sized> Slot for Box<T> {
    fn slot_name(&self) -> &'static str {
        (**self).slot_name()
    }

    fn set_bool(&mut self, value: bool) -> Result<(), Rejection> {
        (**self).set_bool(value)
    }

    fn set_signed(&mut self, value: i64) -> Result<(), Rejection> {
        (**self).set_signed(value)
    }

    fn set_unsigned(&mut self, value: u64) -> Result<(), Rejection> {
        (**self).set_unsigned(value)
    }

    fn set_string(&mut self, value: String) -> Result<(), Rejection> {
        (**self).set_string(value)
    }

    fn set_raw(&mut self, value: &[u8]) -> Result<(), Rejection> {
        (**self).set_raw(value)
    }

    fn begin_slice(&mut self) -> Result<(), Rejection> {
        (**self).begin_slice()
    }

    fn push_item(&mut self) -> Result<&mut dyn Slot, Rejection> {
        (**self).push_item()
    }

    fn begin_map(&mut self) -> Result<(), Rejection> {
        (**self).begin_map()
    }

    fn map_entry(&mut self, key: String) -> Result<&mut dyn Slot, Rejection> {
        (**self).map_entry(key)
    }

    fn set_value(&mut self, value: Value) -> Result<(), Rejection> {
        (**self).set_value(value)
    }
}

impl Slot for Value {
    fn slot_name(&self) -> &'static str {
        "any"
    }

    fn set_bool(&mut self, value: bool) -> Result<(), Rejection> {
        *self = Value::Bool(value);
        Ok(())
    }

    fn set_signed(&mut self, value: i64) -> Result<(), Rejection> {
        *self = Value::Int(value);
        Ok(())
    }

    fn set_unsigned(&mut self, value: u64) -> Result<(), Rejection> {
        *self = Value::from(value);
        Ok(())
    }

    fn set_string(&mut self, value: String) -> Result<(), Rejection> {
        *self = Value::String(value);
        Ok(())
    }

    fn set_raw(&mut self, value: &[u8]) -> Result<(), Rejection> {
        *self = Value::String(String::from_utf8_lossy(value).into_owned());
        Ok(())
    }

    fn begin_slice(&mut self) -> Result<(), Rejection> {
        *self = Value::Slice(Vec::new());
        Ok(())
    }

    fn push_item(&mut self) -> Result<&mut dyn Slot, Rejection> {
        match self {
            Value::Slice(items) => {
                let index = items.len();
                items.push(Value::Null);
                Ok(&mut items[index])
            }
            other => Err(Rejection::Mismatch {
                destination: other.kind_name(),
                found: "slice item",
            }),
        }
    }

    fn begin_map(&mut self) -> Result<(), Rejection> {
        *self = Value::Map(BTreeMap::new());
        Ok(())
    }

    fn map_entry(&mut self, key: String) -> Result<&mut dyn Slot, Rejection> {
        match self {
            Value::Map(entries) => {
                let entry = entries.entry(key).or_default();
                *entry = Value::Null;
                Ok(entry)
            }
            other => Err(Rejection::Mismatch {
                destination: other.kind_name(),
                found: "map entry",
            }),
        }
    }

    fn set_value(&mut self, value: Value) -> Result<(), Rejection> {
        *self = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_width_is_checked() {
        let mut small = 0i8;
        assert_eq!(small.set_signed(-128), Ok(()));
        assert_eq!(small, -128);
        assert_eq!(
            small.set_signed(128),
            Err(Rejection::Overflow { target: "i8" })
        );
        assert_eq!(small, -128);

        let mut unsigned = 0u16;
        assert_eq!(
            unsigned.set_signed(-1),
            Err(Rejection::Overflow { target: "u16" })
        );
    }

    #[test]
    fn test_vec_of_bytes_accepts_raw() {
        let mut bytes = vec![9u8];
        bytes.set_raw(b"ab").unwrap();
        assert_eq!(bytes, b"ab".to_vec());
    }

    #[test]
    fn test_map_entry_resets_duplicate() {
        let mut map: HashMap<String, Vec<i32>> = HashMap::new();
        map.map_entry("a".to_string()).unwrap().push_item().unwrap().set_signed(1).unwrap();
        let entry = map.map_entry("a".to_string()).unwrap();
        entry.push_item().unwrap().set_signed(2).unwrap();
        assert_eq!(map["a"], vec![2]);
    }

    #[test]
    fn test_set_value_replays_into_typed_destination() {
        let mut target: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), Value::from(vec![1i64, 2, 3]));
        target.set_value(Value::Map(entries)).unwrap();
        assert_eq!(target["k"], vec![1, 2, 3]);
    }

    #[test]
    fn test_value_keeps_full_unsigned_range() {
        let mut value = Value::Null;
        value.set_unsigned(u64::MAX).unwrap();
        assert_eq!(value, Value::Uint(u64::MAX));

        let mut target = 0u64;
        target.set_value(value).unwrap();
        assert_eq!(target, u64::MAX);

        let mut narrow = 0i64;
        assert_eq!(
            narrow.set_value(Value::Uint(u64::MAX)),
            Err(Rejection::Overflow { target: "i64" })
        );
    }

    #[test]
    fn test_mismatch_names_destination() {
        let mut flag = false;
        assert_eq!(
            flag.set_string("x".to_string()),
            Err(Rejection::Mismatch {
                destination: "bool",
                found: "string"
            })
        );
    }
}

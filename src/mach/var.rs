use super::Val;
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

const MAX_ELEMENTS: usize = 1 << 20;

/// ## Variable memory
///
/// One flat namespace shared by every language in a run. Names are stored
/// as written; lookups fall back to the upper-cased name so BASIC and PILOT
/// programs can mix case.

#[derive(Debug, Default, Clone)]
pub struct Var {
    vars: HashMap<String, Val>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The key a lookup of `name` resolves to, if any.
    fn resolve(&self, name: &str) -> Option<String> {
        if self.vars.contains_key(name) {
            return Some(name.to_string());
        }
        let upper = name.to_ascii_uppercase();
        if self.vars.contains_key(&upper) {
            return Some(upper);
        }
        None
    }

    pub fn fetch(&self, name: &str) -> Option<&Val> {
        self.vars
            .get(name)
            .or_else(|| self.vars.get(&name.to_ascii_uppercase()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fetch(name).is_some()
    }

    /// Writes to an existing entry under whichever case it was created with.
    pub fn store(&mut self, name: &str, value: Val) {
        let key = self.resolve(name).unwrap_or_else(|| name.to_string());
        self.vars.insert(key, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Val> {
        let key = self.resolve(name)?;
        self.vars.remove(&key)
    }

    pub fn dimension(&mut self, name: &str, bounds: &[usize]) -> Result<()> {
        if bounds.is_empty() || bounds.len() > 2 {
            return Err(error!(SubscriptOutOfRange; "ONE OR TWO DIMENSIONS ONLY"));
        }
        let elements = bounds
            .iter()
            .try_fold(1usize, |n, b| b.checked_add(1).and_then(|b| n.checked_mul(b)));
        match elements {
            Some(n) if n <= MAX_ELEMENTS => {}
            _ => return Err(error!(OutOfMemory; name)),
        }
        self.store(name, Val::dimensioned(bounds));
        Ok(())
    }

    pub fn is_array(&self, name: &str) -> bool {
        matches!(self.fetch(name), Some(Val::Array(_)))
    }

    pub fn fetch_element(&self, name: &str, indices: &[usize]) -> Result<Val> {
        let mut val = match self.fetch(name) {
            Some(v) => v,
            None => return Err(error!(UndefinedVariable; name)),
        };
        for &i in indices {
            val = match val {
                Val::Array(items) => match items.get(i) {
                    Some(v) => v,
                    None => return Err(error!(SubscriptOutOfRange)),
                },
                _ => return Err(error!(SubscriptOutOfRange)),
            };
        }
        Ok(val.clone())
    }

    pub fn store_element(&mut self, name: &str, indices: &[usize], value: Val) -> Result<()> {
        let key = match self.resolve(name) {
            Some(k) => k,
            None => return Err(error!(UndefinedVariable; name)),
        };
        let mut slot = match self.vars.get_mut(&key) {
            Some(v) => v,
            None => return Err(error!(UndefinedVariable; name)),
        };
        for &i in indices {
            slot = match slot {
                Val::Array(items) => match items.get_mut(i) {
                    Some(v) => v,
                    None => return Err(error!(SubscriptOutOfRange)),
                },
                _ => return Err(error!(SubscriptOutOfRange)),
            };
        }
        if matches!(*slot, Val::Array(_)) {
            return Err(error!(SubscriptOutOfRange));
        }
        *slot = value;
        Ok(())
    }

    /// Sorted names, for listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vars.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Val)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_case_fallback() {
        let mut v = Var::new();
        v.store("COUNT", Val::Int(1));
        assert_eq!(v.fetch("count"), Some(&Val::Int(1)));
        v.store("count", Val::Int(2));
        assert_eq!(v.names(), vec!["COUNT"]);
        v.store("size", Val::Int(3));
        assert_eq!(v.fetch("SIZE"), None);
        assert_eq!(v.fetch("size"), Some(&Val::Int(3)));
    }

    #[test]
    fn test_arrays() {
        let mut v = Var::new();
        v.dimension("M", &[2, 3]).unwrap();
        v.store_element("M", &[2, 3], Val::Int(9)).unwrap();
        assert_eq!(v.fetch_element("M", &[2, 3]), Ok(Val::Int(9)));
        assert_eq!(v.fetch_element("M", &[0, 0]), Ok(Val::Int(0)));
        assert!(v.fetch_element("M", &[3, 0]).is_err());
        assert!(v.store_element("M", &[1], Val::Int(1)).is_err());
        assert!(v.dimension("Q", &[1, 1, 1]).is_err());
    }

    #[test]
    fn test_dimension_limit() {
        let mut v = Var::new();
        let e = v.dimension("BIG", &[100_000, 100_000]).unwrap_err();
        assert_eq!(e.code(), ErrorCode::OutOfMemory);
        assert!(!v.contains("BIG"));
        assert!(v.dimension("HUGE", &[usize::MAX]).is_err());
        assert!(v.dimension("OK", &[1023, 1023]).is_ok());
    }
}

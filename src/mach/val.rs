use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Runtime value
///
/// Everything a variable can hold. Arrays made by `DIM` nest one `Array`
/// per dimension.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Array(Vec<Val>),
}

impl Val {
    /// Text typed by a user becomes a number when it reads as one.
    pub fn from_input(s: &str) -> Val {
        let t = s.trim();
        if let Ok(n) = t.parse::<i64>() {
            return Val::Int(n);
        }
        match t.parse::<f64>() {
            Ok(f) if f.is_finite() => Val::Float(f),
            _ => Val::Str(s.to_string()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Val::Int(n) => *n != 0,
            Val::Float(f) => *f != 0.0,
            Val::Str(s) => !s.is_empty(),
            Val::Bool(b) => *b,
            Val::Array(v) => !v.is_empty(),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Val::Int(n) => Ok(*n as f64),
            Val::Float(f) => Ok(*f),
            Val::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Val::Str(_) | Val::Array(_) => Err(error!(TypeMismatch; "EXPECTED NUMBER")),
        }
    }

    /// Truncating conversion used for loop bounds, subscripts and counts.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Val::Int(n) => Ok(*n),
            Val::Float(f) => {
                if f.is_finite() && f.abs() < i64::MAX as f64 {
                    Ok(f.trunc() as i64)
                } else {
                    Err(error!(Overflow))
                }
            }
            Val::Bool(b) => Ok(*b as i64),
            Val::Str(_) | Val::Array(_) => Err(error!(TypeMismatch; "EXPECTED NUMBER")),
        }
    }

    pub fn as_index(&self) -> Result<usize> {
        let n = self.as_i64()?;
        if n < 0 {
            return Err(error!(SubscriptOutOfRange));
        }
        Ok(n as usize)
    }

    /// Zero-filled array with the given dimension bounds (inclusive).
    pub fn dimensioned(bounds: &[usize]) -> Val {
        match bounds.split_first() {
            None => Val::Int(0),
            Some((first, rest)) => Val::Array(vec![Val::dimensioned(rest); first + 1]),
        }
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Int(n) => write!(f, "{}", n),
            Val::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{}.0", n),
            Val::Float(n) => write!(f, "{}", n),
            Val::Str(s) => write!(f, "{}", s),
            Val::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Val::Array(v) => {
                let items: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<i64> for Val {
    fn from(n: i64) -> Val {
        Val::Int(n)
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Val {
        Val::Float(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Val {
        Val::Str(s.to_string())
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Val {
        Val::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input() {
        assert_eq!(Val::from_input(" 42 "), Val::Int(42));
        assert_eq!(Val::from_input("2.5"), Val::Float(2.5));
        assert_eq!(Val::from_input("Bob"), Val::Str("Bob".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Val::Float(3.0).to_string(), "3.0");
        assert_eq!(Val::Float(-2.0).to_string(), "-2.0");
        assert_eq!(Val::Float(0.25).to_string(), "0.25");
        assert_eq!(Val::Bool(true).to_string(), "TRUE");
        assert_eq!(Val::dimensioned(&[2]).to_string(), "[0, 0, 0]");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Val::Float(-3.7).as_i64(), Ok(-3));
        assert!(Val::Str("x".into()).as_f64().is_err());
        assert!(Val::Int(-1).as_index().is_err());
    }
}

use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Bounded stack
///
/// Backs the GOSUB/`U:` return stack, the BASIC `FOR` frames and the Forth
/// data stack. Pushing past the limit fails with `Overflow` and the given
/// message; popping an empty stack fails with `StackUnderflow`.

pub struct Stack<T> {
    overflow_message: &'static str,
    limit: usize,
    items: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Stack<T> {
    pub fn new(overflow_message: &'static str) -> Stack<T> {
        Stack::with_limit(overflow_message, u16::MAX as usize)
    }

    pub fn with_limit(overflow_message: &'static str, limit: usize) -> Stack<T> {
        Stack {
            overflow_message,
            limit,
            items: vec![],
        }
    }

    pub fn clear(&mut self) {
        self.items.clear()
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Index of the topmost entry matching `pred`.
    pub fn rposition<P: FnMut(&T) -> bool>(&self, pred: P) -> Option<usize> {
        self.items.iter().rposition(pred)
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        if self.items.len() >= self.limit {
            return Err(error!(Overflow; self.overflow_message));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or_else(|| error!(StackUnderflow))
    }

    /// The top two entries as `(second, top)`.
    pub fn pop_2(&mut self) -> Result<(T, T)> {
        if self.items.len() < 2 {
            return Err(error!(StackUnderflow));
        }
        let top = self.pop()?;
        let second = self.pop()?;
        Ok((second, top))
    }

    /// The top `n` entries, deepest first.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<T>> {
        match self.items.len().checked_sub(n) {
            Some(start) => Ok(self.items.drain(start..).collect()),
            None => Err(error!(StackUnderflow)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit() {
        let mut s: Stack<u8> = Stack::with_limit("DEPTH", 2);
        assert!(s.push(1).is_ok());
        assert!(s.push(2).is_ok());
        assert_eq!(s.push(3).unwrap_err().text(), "DEPTH");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_underflow() {
        let mut s: Stack<u8> = Stack::new("");
        s.push(7).unwrap();
        assert!(s.pop_2().is_err());
        assert_eq!(s.len(), 1);
        assert_eq!(s.pop_n(1).unwrap(), vec![7]);
        assert!(s.pop().is_err());
    }

    #[test]
    fn test_rposition() {
        let mut s: Stack<&str> = Stack::new("");
        for v in &["I", "J", "I"] {
            s.push(v).unwrap();
        }
        assert_eq!(s.rposition(|v| *v == "I"), Some(2));
        assert_eq!(s.rposition(|v| *v == "K"), None);
    }
}

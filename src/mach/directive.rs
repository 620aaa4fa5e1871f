/// What the dispatcher does after a line runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Advance to the next line.
    Continue,
    /// Stop the program.
    End,
    /// Go to this line index without advancing.
    Jump(usize),
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Directive::Continue => write!(f, "continue"),
            Directive::End => write!(f, "end"),
            Directive::Jump(index) => write!(f, "jump:{}", index),
        }
    }
}

impl std::str::FromStr for Directive {
    type Err = ();

    fn from_str(s: &str) -> Result<Directive, ()> {
        match s.trim() {
            "continue" => Ok(Directive::Continue),
            "end" => Ok(Directive::End),
            other => match other.strip_prefix("jump:") {
                Some(index) => index.parse().map(Directive::Jump).map_err(|_| ()),
                None => Err(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings() {
        assert_eq!(Directive::Jump(12).to_string(), "jump:12");
        assert_eq!("jump:3".parse(), Ok(Directive::Jump(3)));
        assert_eq!("end".parse(), Ok(Directive::End));
        assert_eq!("jump:x".parse::<Directive>(), Err(()));
    }
}

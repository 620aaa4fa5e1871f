#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    line: Option<usize>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            line: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    /// Attach the program line index. An index already present wins so that
    /// errors raised deep inside a block keep the line they came from.
    pub fn in_line(self, line: usize) -> Error {
        Error {
            line: self.line.or(Some(line)),
            ..self
        }
    }

    pub fn message(self, message: &str) -> Error {
        Error {
            message: message.to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SyntaxError = 2,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    SubscriptOutOfRange = 9,
    DivisionByZero = 11,
    TypeMismatch = 13,
    UndefinedVariable = 24,
    UndefinedProcedure = 27,
    RecursionDetected = 28,
    ExpansionTooLarge = 31,
    StackUnderflow = 32,
    InternalError = 51,
    BadFileNumber = 52,
    FileNotFound = 53,
    DiskIoError = 57,
    NotSupported = 70,
    Break = 71,
    StepLimit = 72,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let code_str = match self.code {
            SyntaxError => "SYNTAX ERROR",
            IllegalFunctionCall => "ILLEGAL FUNCTION CALL",
            Overflow => "OVERFLOW",
            OutOfMemory => "OUT OF MEMORY",
            SubscriptOutOfRange => "SUBSCRIPT OUT OF RANGE",
            DivisionByZero => "DIVISION BY ZERO",
            TypeMismatch => "TYPE MISMATCH",
            UndefinedVariable => "UNDEFINED VARIABLE",
            UndefinedProcedure => "UNDEFINED PROCEDURE",
            RecursionDetected => "RECURSION DETECTED",
            ExpansionTooLarge => "EXPANSION TOO LARGE",
            StackUnderflow => "STACK UNDERFLOW",
            InternalError => "INTERNAL ERROR",
            BadFileNumber => "BAD FILE NUMBER",
            FileNotFound => "FILE NOT FOUND",
            DiskIoError => "DISK I/O ERROR",
            NotSupported => "NOT SUPPORTED",
            Break => "BREAK",
            StepLimit => "STEP LIMIT",
        };
        let mut suffix = String::new();
        if let Some(line) = self.line {
            suffix.push_str(&format!(" {}", line));
        }
        if !self.message.is_empty() {
            suffix.push_str(&format!("; {}", self.message));
        }
        if suffix.starts_with(' ') {
            write!(f, "{} IN{}", code_str, suffix)
        } else {
            write!(f, "{}{}", code_str, suffix)
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(SyntaxError).to_string(), "SYNTAX ERROR");
        assert_eq!(error!(Overflow, 20).to_string(), "OVERFLOW IN 20");
        assert_eq!(
            error!(TypeMismatch; "EXPECTED NUMBER").to_string(),
            "TYPE MISMATCH; EXPECTED NUMBER"
        );
        assert_eq!(
            error!(UndefinedVariable, 3; "TOTAL").to_string(),
            "UNDEFINED VARIABLE IN 3; TOTAL"
        );
    }

    #[test]
    fn test_first_line_wins() {
        let e = error!(SyntaxError, 4).in_line(9);
        assert_eq!(e.line(), Some(4));
    }
}

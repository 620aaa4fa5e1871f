use std::collections::HashMap;

thread_local!(
    static STRING_TO_OPERATOR: HashMap<&'static str, Operator> = Operator::ALL
        .iter()
        .map(|op| (op.symbol(), op.clone()))
        .chain(
            [
                ("==", Operator::Equal),
                ("!=", Operator::NotEqual),
                ("%", Operator::Modulus),
                ("DIV", Operator::DivideInt),
                ("&&", Operator::And),
                ("||", Operator::Or),
                ("!", Operator::Not),
            ]
            .iter()
            .cloned(),
        )
        .collect();
);

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Literal(Literal),
    Operator(Operator),
    Ident(String),
    LParen,
    RParen,
    Comma,
}

impl Token {
    /// Operator spelled by `s`, symbols and reserved words alike.
    pub fn from_string(s: &str) -> Option<Token> {
        let upper = s.to_ascii_uppercase();
        STRING_TO_OPERATOR.with(|sto| sto.get(upper.as_str()).cloned().map(Token::Operator))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Literal(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Comma => write!(f, ","),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(String),
    Float(String),
    String(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            Integer(s) => write!(f, "{}", s),
            Float(s) => write!(f, "{}", s),
            String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operator {
    Caret,
    Multiply,
    Divide,
    DivideInt,
    Modulus,
    Plus,
    Minus,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
}

impl Operator {
    const ALL: [Operator; 16] = [
        Operator::Caret,
        Operator::Multiply,
        Operator::Divide,
        Operator::DivideInt,
        Operator::Modulus,
        Operator::Plus,
        Operator::Minus,
        Operator::Equal,
        Operator::NotEqual,
        Operator::Less,
        Operator::LessEqual,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Not,
        Operator::And,
        Operator::Or,
    ];

    pub fn symbol(&self) -> &'static str {
        use Operator::*;
        match self {
            Caret => "^",
            Multiply => "*",
            Divide => "/",
            DivideInt => "\\",
            Modulus => "MOD",
            Plus => "+",
            Minus => "-",
            Equal => "=",
            NotEqual => "<>",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Not => "NOT",
            And => "AND",
            Or => "OR",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

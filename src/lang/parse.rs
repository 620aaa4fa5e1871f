use super::{ast::*, lex::lex, token::*, Error};

type Result<T> = std::result::Result<T, Error>;

const PRECEDENCE_UNARY_NOT: usize = 3;
const PRECEDENCE_UNARY_MINUS: usize = 7;
const MAX_NESTING: usize = 200;

/// Parse a complete expression. Trailing tokens are a syntax error.
pub fn parse(s: &str) -> Result<Expression> {
    let tokens = lex(s);
    Parser::parse(&tokens)
}

struct Parser<'a> {
    token_stream: std::slice::Iter<'a, Token>,
    peeked: Option<&'a Token>,
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn parse(tokens: &'a [Token]) -> Result<Expression> {
        let mut parse = Parser {
            token_stream: tokens.iter(),
            peeked: None,
            nesting: 0,
        };
        if parse.peek().is_none() {
            return Err(error!(SyntaxError; "EXPECTED EXPRESSION"));
        }
        let expr = parse.expression()?;
        match parse.next() {
            None => Ok(expr),
            Some(t) => Err(error!(SyntaxError; &format!("UNEXPECTED {}", t))),
        }
    }

    fn next(&mut self) -> Option<&'a Token> {
        if self.peeked.is_some() {
            return self.peeked.take();
        }
        self.token_stream.next()
    }

    fn peek(&mut self) -> Option<&&'a Token> {
        if self.peeked.is_none() {
            self.peeked = self.token_stream.next();
        }
        self.peeked.as_ref()
    }

    fn expression(&mut self) -> Result<Expression> {
        self.climb(0)
    }

    /// Bounds the height of the tree being built: one level per nested
    /// climb and one per operator folded into a chain.
    fn nest(&mut self) -> Result<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(error!(SyntaxError; "EXPRESSION TOO COMPLEX"));
        }
        Ok(())
    }

    fn climb(&mut self, precedence: usize) -> Result<Expression> {
        let outer = self.nesting;
        let result = self.nest().and_then(|_| self.climb_chain(precedence));
        self.nesting = outer;
        result
    }

    fn climb_chain(&mut self, precedence: usize) -> Result<Expression> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Operator(op)) => op.clone(),
                _ => break,
            };
            let op_precedence = match Expression::op_precedence(&op) {
                Some(p) => p,
                None => break,
            };
            if op_precedence < precedence {
                break;
            }
            self.next();
            self.nest()?;
            let next_precedence = if op == Operator::Caret {
                op_precedence
            } else {
                op_precedence + 1
            };
            let rhs = self.climb(next_precedence)?;
            lhs = Expression::for_binary_op(&op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expression> {
        match self.peek() {
            Some(Token::Operator(Operator::Minus)) => {
                self.next();
                if let Some(n) = self.most_negative() {
                    return Ok(Expression::Integer(n));
                }
                let expr = self.climb(PRECEDENCE_UNARY_MINUS)?;
                Ok(Expression::Negation(Box::new(expr)))
            }
            Some(Token::Operator(Operator::Plus)) => {
                self.next();
                self.climb(PRECEDENCE_UNARY_MINUS)
            }
            Some(Token::Operator(Operator::Not)) => {
                self.next();
                let expr = self.climb(PRECEDENCE_UNARY_NOT)?;
                Ok(Expression::Not(Box::new(expr)))
            }
            _ => self.primary(),
        }
    }

    /// `-9223372036854775808` only fits as a negative literal. Folded here
    /// unless a `^` binds the literal first.
    fn most_negative(&mut self) -> Option<i64> {
        let digits = match self.peek() {
            Some(Token::Literal(Literal::Integer(s))) => s.clone(),
            _ => return None,
        };
        if digits.parse::<i64>().is_ok() {
            return None;
        }
        let n = format!("-{}", digits).parse::<i64>().ok()?;
        if let Some(Token::Operator(Operator::Caret)) = self.token_stream.clone().next() {
            return None;
        }
        self.next();
        Some(n)
    }

    fn primary(&mut self) -> Result<Expression> {
        match self.next() {
            Some(Token::LParen) => {
                let expr = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Ident(name)) => match self.peek() {
                Some(&&Token::LParen) => Ok(Expression::Call(name.clone(), self.expression_list()?)),
                _ => Ok(Expression::Var(name.clone())),
            },
            Some(Token::Literal(lit)) => Ok(Expression::for_literal(lit)),
            _ => Err(error!(SyntaxError; "EXPECTED EXPRESSION")),
        }
    }

    fn expression_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(Token::LParen)?;
        let mut v: Vec<Expression> = vec![];
        if let Some(&&Token::RParen) = self.peek() {
            self.next();
            return Ok(v);
        }
        loop {
            v.push(self.expression()?);
            match self.next() {
                Some(Token::RParen) => return Ok(v),
                Some(Token::Comma) => continue,
                _ => return Err(error!(SyntaxError; "EXPECTED END OR SEPARATOR")),
            }
        }
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if let Some(t) = self.next() {
            if *t == token {
                return Ok(());
            }
        }
        use Token::*;
        Err(error!(SyntaxError;
            match token {
                Unknown(_) => "UNEXPECTED TOKEN",
                Literal(_) => "EXPECTED LITERAL",
                Operator(_) => "EXPECTED OPERATOR",
                Ident(_) => "EXPECTED IDENTIFIER",
                LParen => "EXPECTED LEFT PARENTHESIS",
                RParen => "EXPECTED RIGHT PARENTHESIS",
                Comma => "EXPECTED COMMA",
            }
        ))
    }
}

impl Expression {
    fn for_binary_op(op: &Operator, lhs: Expression, rhs: Expression) -> Expression {
        use Operator::*;
        let (l, r) = (Box::new(lhs), Box::new(rhs));
        match op {
            Caret => Expression::Power(l, r),
            Multiply => Expression::Multiply(l, r),
            Divide => Expression::Divide(l, r),
            DivideInt => Expression::DivideInt(l, r),
            Modulus => Expression::Modulus(l, r),
            Plus => Expression::Add(l, r),
            Minus => Expression::Subtract(l, r),
            Equal => Expression::Equal(l, r),
            NotEqual => Expression::NotEqual(l, r),
            Less => Expression::Less(l, r),
            LessEqual => Expression::LessEqual(l, r),
            Greater => Expression::Greater(l, r),
            GreaterEqual => Expression::GreaterEqual(l, r),
            And => Expression::And(l, r),
            Or => Expression::Or(l, r),
            // Not is unary only; op_precedence keeps it out of here.
            Not => Expression::Not(r),
        }
    }

    fn op_precedence(op: &Operator) -> Option<usize> {
        use Operator::*;
        match op {
            Or => Some(1),
            And => Some(2),
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => Some(4),
            Plus | Minus => Some(5),
            Multiply | Divide | DivideInt | Modulus => Some(6),
            Caret => Some(8),
            Not => None,
        }
    }

    fn for_literal(lit: &Literal) -> Expression {
        match lit {
            Literal::Integer(s) => match s.parse::<i64>() {
                Ok(n) => Expression::Integer(n),
                Err(_) => Expression::Float(s.parse().unwrap_or(f64::INFINITY)),
            },
            Literal::Float(s) => Expression::Float(s.parse().unwrap_or(0.0)),
            Literal::String(s) => Expression::String(s.to_string()),
        }
    }
}

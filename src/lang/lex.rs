use super::token::*;

/// Tokenize an expression. Whitespace is dropped; anything the lexer
/// cannot classify comes back as `Token::Unknown` for the parser to reject.
pub fn lex(s: &str) -> Vec<Token> {
    ExpressionLexer {
        chars: s.chars().peekable(),
    }
    .collect()
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r' || c == '\n'
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>>;

    fn number(&mut self) -> Option<Token> {
        let mut s = String::new();
        let mut decimal = false;
        let mut exp = false;
        while let Some(&ch) = self.chars().peek() {
            if is_digit(ch) {
                s.push(ch);
            } else if ch == '.' && !decimal && !exp {
                decimal = true;
                s.push(ch);
            } else if (ch == 'e' || ch == 'E') && !exp && !s.is_empty() {
                let mut ahead = self.chars().clone();
                ahead.next();
                let next = ahead.next();
                let signed_digit = match next {
                    Some('+') | Some('-') => ahead.next().map_or(false, is_digit),
                    Some(c) => is_digit(c),
                    None => false,
                };
                if !signed_digit {
                    break;
                }
                exp = true;
                s.push('E');
                self.chars().next();
                if let Some(&sign) = self.chars().peek() {
                    if sign == '+' || sign == '-' {
                        s.push(sign);
                        self.chars().next();
                    }
                }
                continue;
            } else {
                break;
            }
            self.chars().next();
        }
        if decimal || exp {
            Some(Token::Literal(Literal::Float(s)))
        } else {
            Some(Token::Literal(Literal::Integer(s)))
        }
    }

    fn string(&mut self, quote: char) -> Option<Token> {
        let mut s = String::new();
        self.chars().next();
        while let Some(ch) = self.chars().next() {
            if ch == quote {
                // Pascal doubles the quote to embed it.
                if quote == '\'' && self.chars().peek() == Some(&'\'') {
                    self.chars().next();
                    s.push(ch);
                    continue;
                }
                break;
            }
            s.push(ch);
        }
        Some(Token::Literal(Literal::String(s)))
    }

    fn alphabetic(&mut self) -> Option<Token> {
        let mut s = String::new();
        while let Some(&ch) = self.chars().peek() {
            if is_ident_char(ch) {
                s.push(ch);
                self.chars().next();
            } else {
                break;
            }
        }
        if let Some(&ch) = self.chars().peek() {
            if ch == '$' || ch == '%' {
                s.push(ch);
                self.chars().next();
            }
        }
        if let Some(token) = Token::from_string(&s) {
            return Some(token);
        }
        Some(Token::Ident(s))
    }

    fn minutia(&mut self) -> Option<Token> {
        let ch = self.chars().next()?;
        match ch {
            '(' => return Some(Token::LParen),
            ')' => return Some(Token::RParen),
            ',' => return Some(Token::Comma),
            _ => {}
        }
        if let Some(&pk) = self.chars().peek() {
            let pair: String = [ch, pk].iter().collect();
            if let Some(t) = Token::from_string(&pair) {
                self.chars().next();
                return Some(t);
            }
        }
        let single = ch.to_string();
        match Token::from_string(&single) {
            Some(t) => Some(t),
            None => Some(Token::Unknown(single)),
        }
    }
}

struct ExpressionLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Tokenizers<'a> for ExpressionLexer<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>> {
        &mut self.chars
    }
}

impl<'a> Iterator for ExpressionLexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&pk) = self.chars.peek() {
            if is_whitespace(pk) {
                self.chars.next();
            } else {
                break;
            }
        }
        let pk = *self.chars.peek()?;
        if is_digit(pk) {
            return self.number();
        }
        if pk == '.' {
            let mut ahead = self.chars.clone();
            ahead.next();
            if ahead.next().map_or(false, is_digit) {
                return self.number();
            }
        }
        if is_ident_start(pk) {
            return self.alphabetic();
        }
        if pk == '"' || pk == '\'' {
            return self.string(pk);
        }
        // Sigils used by PILOT ($NAME, #NAME) and Logo (:NAME).
        if pk == '$' || pk == '#' || pk == ':' {
            let mut ahead = self.chars.clone();
            ahead.next();
            if ahead.next().map_or(false, is_ident_start) {
                self.chars.next();
                return self.alphabetic();
            }
        }
        self.minutia()
    }
}

//! Bracketed block lexing for Logo.
//!
//! Source is lexed into a flat stream of words and bracket lexemes, then a
//! small recursive-descent pass folds `[ ... ]` into nested lists. Splitting
//! a block into commands is left to the executor, which knows arities.

use super::Error;

type Result<T> = std::result::Result<T, Error>;

const MAX_NESTING: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Word(String),
    List(Vec<Node>),
}

impl Node {
    pub fn word(&self) -> Option<&str> {
        match self {
            Node::Word(w) => Some(w),
            Node::List(_) => None,
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Node::Word(w) => write!(f, "{}", w),
            Node::List(nodes) => write!(f, "[ {} ]", render(nodes)),
        }
    }
}

/// Nodes back to source text, single spaced.
pub fn render(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Open,
    Close,
    Word(String),
}

fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '=' | '<' | '>' | '^' | '(' | ')')
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '[' || c == ']' || is_operator(c)
}

/// Drop a `;` comment, ignoring semicolons inside `"words`.
fn strip_comment(s: &str) -> &str {
    let mut in_word = false;
    let mut prev = ' ';
    for (i, c) in s.char_indices() {
        if c == '"' && (prev.is_whitespace() || prev == '[') {
            in_word = true;
        } else if c.is_whitespace() {
            in_word = false;
        } else if c == ';' && !in_word {
            return &s[..i];
        }
        prev = c;
    }
    s
}

fn lex(s: &str) -> Vec<Lexeme> {
    let chars: Vec<char> = strip_comment(s).chars().collect();
    let mut out = vec![];
    let mut i = 0;
    // True when a '-' here would be a sign rather than subtraction.
    let mut operand_expected = true;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '[' {
            out.push(Lexeme::Open);
            operand_expected = true;
            i += 1;
            continue;
        }
        if c == ']' {
            out.push(Lexeme::Close);
            operand_expected = false;
            i += 1;
            continue;
        }
        if c == '-' {
            let next = chars.get(i + 1).copied().unwrap_or(' ');
            let after_space = i == 0 || chars[i - 1].is_whitespace();
            let numeric = next.is_ascii_digit() || next == '.' || next == ':';
            if numeric && (operand_expected || after_space) {
                let start = i;
                i += 1;
                while i < chars.len() && !is_delimiter(chars[i]) {
                    i += 1;
                }
                out.push(Lexeme::Word(chars[start..i].iter().collect()));
                operand_expected = false;
                continue;
            }
        }
        if is_operator(c) {
            let mut op = c.to_string();
            if let Some(&n) = chars.get(i + 1) {
                if (c == '<' && (n == '=' || n == '>')) || (c == '>' && n == '=') {
                    op.push(n);
                    i += 1;
                }
            }
            i += 1;
            operand_expected = c != ')';
            out.push(Lexeme::Word(op));
            continue;
        }
        let start = i;
        if c == '"' {
            i += 1;
            while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '[' && chars[i] != ']' {
                i += 1;
            }
        } else {
            while i < chars.len() && !is_delimiter(chars[i]) {
                i += 1;
            }
        }
        out.push(Lexeme::Word(chars[start..i].iter().collect()));
        operand_expected = false;
    }
    out
}

/// Lex and fold brackets into nested lists.
pub fn parse(s: &str) -> Result<Vec<Node>> {
    let lexemes = lex(s);
    let mut iter = lexemes.into_iter();
    let nodes = parse_list(&mut iter, 0)?;
    Ok(nodes)
}

/// `depth` is zero at top level.
fn parse_list(iter: &mut std::vec::IntoIter<Lexeme>, depth: usize) -> Result<Vec<Node>> {
    if depth > MAX_NESTING {
        return Err(error!(SyntaxError; "BRACKETS NESTED TOO DEEPLY"));
    }
    let mut nodes = vec![];
    while let Some(lexeme) = iter.next() {
        match lexeme {
            Lexeme::Word(w) => nodes.push(Node::Word(w)),
            Lexeme::Open => nodes.push(Node::List(parse_list(iter, depth + 1)?)),
            Lexeme::Close => {
                if depth > 0 {
                    return Ok(nodes);
                }
                return Err(error!(SyntaxError; "UNEXPECTED ]"));
            }
        }
    }
    if depth > 0 {
        Err(error!(SyntaxError; "MISSING ]"))
    } else {
        Ok(nodes)
    }
}

/// Net bracket depth contributed by one line.
pub fn depth(s: &str) -> i32 {
    lex(s).iter().fold(0, |d, l| match l {
        Lexeme::Open => d + 1,
        Lexeme::Close => d - 1,
        Lexeme::Word(_) => d,
    })
}

/// Join physical lines into logical lines by tracking bracket depth, so a
/// block opened on one line continues until its bracket closes. Each result
/// carries the index of its first physical line.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> Vec<(usize, String)> {
    let mut out = vec![];
    let mut pending: Option<(usize, String)> = None;
    let mut open = 0;
    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match pending.as_mut() {
            Some((_, text)) => {
                text.push(' ');
                text.push_str(line);
            }
            None => pending = Some((index, line.to_string())),
        }
        open += depth(line);
        if open <= 0 {
            open = 0;
            out.extend(pending.take());
        }
    }
    out.extend(pending);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Node {
        Node::Word(s.to_string())
    }

    #[test]
    fn test_nested() {
        assert_eq!(
            parse("REPEAT 2 [ FD 10 REPEAT 3 [RT 120] ]").unwrap(),
            vec![
                w("REPEAT"),
                w("2"),
                Node::List(vec![
                    w("FD"),
                    w("10"),
                    w("REPEAT"),
                    w("3"),
                    Node::List(vec![w("RT"), w("120")]),
                ]),
            ]
        );
    }

    #[test]
    fn test_operators_and_signs() {
        assert_eq!(
            parse("FD :SIZE*2 RT -90 SETXY 10 -5 FD 7 - 2").unwrap(),
            vec![
                w("FD"),
                w(":SIZE"),
                w("*"),
                w("2"),
                w("RT"),
                w("-90"),
                w("SETXY"),
                w("10"),
                w("-5"),
                w("FD"),
                w("7"),
                w("-"),
                w("2"),
            ]
        );
    }

    #[test]
    fn test_unbalanced() {
        assert!(parse("REPEAT 4 [ FD 10").is_err());
        assert!(parse("FD 10 ]").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "[".repeat(100_000), "]".repeat(100_000));
        assert!(parse(&deep).is_err());
        let fine = format!("{}{}", "[".repeat(20), "]".repeat(20));
        assert!(parse(&fine).is_ok());
    }

    #[test]
    fn test_join_lines() {
        let lines = ["REPEAT 4 [", "  FORWARD 50", "  RIGHT 90", "]", "PENUP"];
        assert_eq!(
            join_lines(&lines),
            vec![
                (0, "REPEAT 4 [ FORWARD 50 RIGHT 90 ]".to_string()),
                (4, "PENUP".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(parse("FD 10 ; go [").unwrap(), vec![w("FD"), w("10")]);
        assert_eq!(render(&parse("PRINT [a  b]").unwrap()), "PRINT [ a b ]");
    }
}

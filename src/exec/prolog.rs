use super::Executor;
use crate::error;
use crate::lang::Error;
use crate::mach::{Context, Directive};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

const DEPTH_LIMIT: usize = 1_000;
const MAX_SOLUTIONS: usize = 100;
const INFERENCE_LIMIT: usize = 1_000_000;
const NEGATION_LIMIT: usize = 64;
const MAX_NESTING: usize = 500;
const SYMBOLS: &str = "+-*/\\^<>=~:.?@#&$";

#[derive(Debug, Clone, PartialEq)]
enum Term {
    Atom(String),
    Int(i64),
    Var(String),
    Compound(String, Vec<Term>),
}

impl Term {
    fn atom(name: &str) -> Term {
        Term::Atom(name.to_string())
    }

    fn cons(head: Term, tail: Term) -> Term {
        Term::Compound(".".to_string(), vec![head, tail])
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{}", name),
            Term::Int(n) => write!(f, "{}", n),
            Term::Var(name) if name.contains('#') || name.starts_with("_G") => write!(f, "_"),
            Term::Var(name) => write!(f, "{}", name),
            Term::Compound(name, args) if name == "." && args.len() == 2 => {
                write!(f, "[{}", args[0])?;
                let mut tail = &args[1];
                loop {
                    match tail {
                        Term::Compound(name, args) if name == "." && args.len() == 2 => {
                            write!(f, ",{}", args[0])?;
                            tail = &args[1];
                        }
                        Term::Atom(name) if name == "[]" => break,
                        other => {
                            write!(f, "|{}", other)?;
                            break;
                        }
                    }
                }
                write!(f, "]")
            }
            Term::Compound(name, args) if args.len() == 2 && infix(name).is_some() => {
                if name.chars().all(|c| c.is_ascii_alphabetic()) {
                    write!(f, "{} {} {}", args[0], name, args[1])
                } else {
                    write!(f, "{}{}{}", args[0], name, args[1])
                }
            }
            Term::Compound(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Assoc {
    Xfx,
    Xfy,
    Yfx,
}

fn infix(name: &str) -> Option<(u32, Assoc)> {
    match name {
        ":-" => Some((1200, Assoc::Xfx)),
        ";" => Some((1100, Assoc::Xfy)),
        "," => Some((1000, Assoc::Xfy)),
        "=" | "\\=" | "==" | "\\==" | "is" | "<" | ">" | "=<" | ">=" | "=:=" | "=\\=" => {
            Some((700, Assoc::Xfx))
        }
        "+" | "-" => Some((500, Assoc::Yfx)),
        "*" | "/" | "//" | "mod" => Some((400, Assoc::Yfx)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Atom(String),
    Var(String),
    Int(i64),
    Open,
    Close,
    Comma,
    LBracket,
    RBracket,
    Bar,
    End,
}

fn tokenize(text: &str) -> Result<Vec<Tok>> {
    let chars: Vec<char> = text.chars().collect();
    let mut toks = vec![];
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '%' {
            break;
        }
        let start = i;
        if c.is_ascii_digit() {
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let digits: String = chars[start..i].iter().collect();
            let n = digits.parse::<i64>().map_err(|_| error!(Overflow))?;
            toks.push(Tok::Int(n));
        } else if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            if c.is_uppercase() || c == '_' {
                toks.push(Tok::Var(name));
            } else {
                toks.push(Tok::Atom(name));
            }
        } else if c == '\'' || c == '"' {
            let mut name = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(error!(SyntaxError; "UNTERMINATED QUOTE")),
                    Some(&q) if q == c => {
                        if chars.get(i + 1) == Some(&c) {
                            name.push(c);
                            i += 2;
                        } else {
                            i += 1;
                            break;
                        }
                    }
                    Some(&ch) => {
                        name.push(ch);
                        i += 1;
                    }
                }
            }
            toks.push(Tok::Atom(name));
        } else if c == '.' && chars.get(i + 1).map_or(true, |n| n.is_whitespace() || *n == '%') {
            toks.push(Tok::End);
            i += 1;
        } else if SYMBOLS.contains(c) {
            while i < chars.len() && SYMBOLS.contains(chars[i]) {
                i += 1;
            }
            toks.push(Tok::Atom(chars[start..i].iter().collect()));
        } else {
            i += 1;
            toks.push(match c {
                '(' => Tok::Open,
                ')' => Tok::Close,
                ',' => Tok::Comma,
                '[' => Tok::LBracket,
                ']' => Tok::RBracket,
                '|' => Tok::Bar,
                '!' | ';' => Tok::Atom(c.to_string()),
                _ => return Err(error!(SyntaxError; &format!("UNEXPECTED {}", c))),
            });
        }
    }
    Ok(toks)
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
    anonymous: usize,
    nesting: usize,
}

impl Parser {
    fn new(toks: Vec<Tok>) -> Parser {
        Parser {
            toks,
            pos: 0,
            anonymous: 0,
            nesting: 0,
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, tok: Tok, what: &str) -> Result<()> {
        if self.next() == Some(tok) {
            Ok(())
        } else {
            Err(error!(SyntaxError; &format!("EXPECTED {}", what)))
        }
    }

    /// Every clause up to the end of the text.
    fn clauses(&mut self) -> Result<Vec<Term>> {
        let mut out = vec![];
        while self.peek().is_some() {
            out.push(self.expr(1200)?);
            match self.next() {
                Some(Tok::End) | None => {}
                Some(_) => return Err(error!(SyntaxError; "EXPECTED .")),
            }
        }
        Ok(out)
    }

    fn infix(&self) -> Option<(String, u32, Assoc)> {
        match self.peek()? {
            Tok::Comma => Some((",".to_string(), 1000, Assoc::Xfy)),
            Tok::Atom(name) => infix(name).map(|(p, a)| (name.clone(), p, a)),
            _ => None,
        }
    }

    /// Term height grows by one per nested `expr`, per folded operator and
    /// per list element.
    fn nest(&mut self, levels: usize) -> Result<()> {
        self.nesting += levels;
        if self.nesting > MAX_NESTING {
            return Err(error!(SyntaxError; "TERM NESTED TOO DEEPLY"));
        }
        Ok(())
    }

    fn expr(&mut self, max: u32) -> Result<Term> {
        let outer = self.nesting;
        let result = self.nest(1).and_then(|_| self.operators(max));
        self.nesting = outer;
        result
    }

    fn operators(&mut self, max: u32) -> Result<Term> {
        let mut left = self.primary()?;
        let mut left_prec = 0;
        while let Some((op, prec, assoc)) = self.infix() {
            let (left_max, right_max) = match assoc {
                Assoc::Xfx => (prec - 1, prec - 1),
                Assoc::Xfy => (prec - 1, prec),
                Assoc::Yfx => (prec, prec - 1),
            };
            if prec > max || left_prec > left_max {
                break;
            }
            self.next();
            self.nest(1)?;
            let right = self.expr(right_max)?;
            left = Term::Compound(op, vec![left, right]);
            left_prec = prec;
        }
        Ok(left)
    }

    fn primary(&mut self) -> Result<Term> {
        match self.next() {
            Some(Tok::Int(n)) => Ok(Term::Int(n)),
            Some(Tok::Var(name)) if name == "_" => {
                self.anonymous += 1;
                Ok(Term::Var(format!("_G{}", self.anonymous)))
            }
            Some(Tok::Var(name)) => Ok(Term::Var(name)),
            Some(Tok::Open) => {
                let term = self.expr(1200)?;
                self.expect(Tok::Close, ")")?;
                Ok(term)
            }
            Some(Tok::LBracket) => self.list(),
            Some(Tok::Atom(name)) => {
                if self.peek() == Some(&Tok::Open) {
                    self.next();
                    let mut args = vec![self.expr(999)?];
                    while self.peek() == Some(&Tok::Comma) {
                        self.next();
                        args.push(self.expr(999)?);
                    }
                    self.expect(Tok::Close, ")")?;
                    return Ok(Term::Compound(name, args));
                }
                match name.as_str() {
                    "-" => match self.peek() {
                        Some(&Tok::Int(n)) => {
                            self.next();
                            Ok(Term::Int(-n))
                        }
                        Some(Tok::Var(_)) | Some(Tok::Open) => {
                            let operand = self.expr(200)?;
                            Ok(Term::Compound(name, vec![operand]))
                        }
                        _ => Ok(Term::Atom(name)),
                    },
                    "\\+" => {
                        let goal = self.expr(900)?;
                        Ok(Term::Compound(name, vec![goal]))
                    }
                    "?-" | ":-" => {
                        let goal = self.expr(1199)?;
                        Ok(Term::Compound(name, vec![goal]))
                    }
                    _ => Ok(Term::Atom(name)),
                }
            }
            Some(_) => Err(error!(SyntaxError; "UNEXPECTED TOKEN")),
            None => Err(error!(SyntaxError; "UNEXPECTED END OF CLAUSE")),
        }
    }

    fn list(&mut self) -> Result<Term> {
        if self.peek() == Some(&Tok::RBracket) {
            self.next();
            return Ok(Term::atom("[]"));
        }
        let mut items = vec![self.expr(999)?];
        while self.peek() == Some(&Tok::Comma) {
            self.next();
            self.nest(1)?;
            items.push(self.expr(999)?);
        }
        let tail = if self.peek() == Some(&Tok::Bar) {
            self.next();
            self.expr(999)?
        } else {
            Term::atom("[]")
        };
        self.expect(Tok::RBracket, "]")?;
        Ok(items.into_iter().rev().fold(tail, |tail, head| Term::cons(head, tail)))
    }
}

fn parse_clauses(text: &str) -> Result<Vec<Term>> {
    Parser::new(tokenize(text)?).clauses()
}

/// `a, b, c` as a goal list.
fn conjunction(term: Term, out: &mut Vec<Term>) {
    match term {
        Term::Compound(name, mut args) if name == "," && args.len() == 2 => {
            let right = args.pop();
            let left = args.pop();
            for part in left.into_iter().chain(right) {
                conjunction(part, out);
            }
        }
        term => out.push(term),
    }
}

/// Named query variables in order of first appearance.
fn variables(term: &Term, out: &mut Vec<String>) {
    match term {
        Term::Var(name) if !name.starts_with('_') && !out.contains(name) => out.push(name.clone()),
        Term::Compound(_, args) => args.iter().for_each(|a| variables(a, out)),
        _ => {}
    }
}

#[derive(Debug, Clone, Default)]
struct Bindings(HashMap<String, Term>);

impl Bindings {
    fn walk(&self, term: &Term) -> Term {
        let mut term = term.clone();
        while let Term::Var(name) = &term {
            match self.0.get(name) {
                Some(bound) => term = bound.clone(),
                None => break,
            }
        }
        term
    }

    fn resolve(&self, term: &Term) -> Term {
        match self.walk(term) {
            Term::Compound(name, args) => {
                Term::Compound(name, args.iter().map(|a| self.resolve(a)).collect())
            }
            term => term,
        }
    }

    fn unify(&mut self, a: &Term, b: &Term) -> bool {
        match (self.walk(a), self.walk(b)) {
            (Term::Var(x), Term::Var(y)) if x == y => true,
            (Term::Var(x), t) | (t, Term::Var(x)) => {
                self.0.insert(x, t);
                true
            }
            (Term::Compound(f, xs), Term::Compound(g, ys)) => {
                f == g
                    && xs.len() == ys.len()
                    && xs.iter().zip(ys.iter()).all(|(x, y)| self.unify(x, y))
            }
            (a, b) => a == b,
        }
    }
}

fn arithmetic(bindings: &Bindings, term: &Term) -> Result<i64> {
    match bindings.walk(term) {
        Term::Int(n) => Ok(n),
        Term::Var(_) => Err(error!(TypeMismatch; "ARGUMENTS NOT SUFFICIENTLY INSTANTIATED")),
        Term::Compound(op, args) if args.len() == 2 => {
            let a = arithmetic(bindings, &args[0])?;
            let b = arithmetic(bindings, &args[1])?;
            if b == 0 && matches!(op.as_str(), "/" | "//" | "mod") {
                return Err(error!(DivisionByZero));
            }
            let value = match op.as_str() {
                "+" => a.checked_add(b),
                "-" => a.checked_sub(b),
                "*" => a.checked_mul(b),
                "/" | "//" => a.checked_div(b),
                "mod" => a.checked_rem_euclid(b),
                "max" => Some(a.max(b)),
                "min" => Some(a.min(b)),
                _ => return Err(error!(TypeMismatch; &format!("UNKNOWN FUNCTION {}/2", op))),
            };
            value.ok_or_else(|| error!(Overflow))
        }
        Term::Compound(op, args) if args.len() == 1 => {
            let a = arithmetic(bindings, &args[0])?;
            match op.as_str() {
                "-" => a.checked_neg().ok_or_else(|| error!(Overflow)),
                "abs" => a.checked_abs().ok_or_else(|| error!(Overflow)),
                _ => Err(error!(TypeMismatch; &format!("UNKNOWN FUNCTION {}/1", op))),
            }
        }
        other => Err(error!(TypeMismatch; &format!("NOT A NUMBER {}", other))),
    }
}

#[derive(Debug, Clone)]
struct Clause {
    head: Term,
    body: Vec<Term>,
}

impl Clause {
    fn key(&self) -> (&str, usize) {
        match &self.head {
            Term::Compound(name, args) => (name, args.len()),
            Term::Atom(name) => (name, 0),
            _ => ("", 0),
        }
    }
}

/// ## Prolog
///
/// A clause database consulted one clause at a time. `?- goal.` runs a
/// depth-bounded SLD resolution and prints each answer's bindings followed
/// by `Yes`, or `No` when nothing is found.

#[derive(Debug, Default)]
pub struct Prolog {
    clauses: Vec<Clause>,
    fresh: usize,
    halted: bool,
    pruned: bool,
    inferences: usize,
    negations: usize,
}

impl Executor for Prolog {
    fn execute(&mut self, ctx: &mut Context, line: &str) -> Result<Directive> {
        for term in parse_clauses(line)? {
            match term {
                Term::Compound(name, mut args) if name == "?-" && args.len() == 1 => {
                    self.query(ctx, args.remove(0), true)?
                }
                Term::Compound(name, mut args) if name == ":-" && args.len() == 1 => {
                    self.query(ctx, args.remove(0), false)?
                }
                Term::Compound(name, mut args) if name == ":-" && args.len() == 2 => {
                    let mut body = vec![];
                    conjunction(args.remove(1), &mut body);
                    self.assert(args.remove(0), body)?;
                }
                fact => self.assert(fact, vec![])?,
            }
            if self.halted {
                return Ok(Directive::End);
            }
        }
        Ok(Directive::Continue)
    }

    fn reset(&mut self) {
        *self = Prolog::default();
    }
}

impl Prolog {
    fn assert(&mut self, head: Term, body: Vec<Term>) -> Result<()> {
        match head {
            Term::Atom(_) | Term::Compound(_, _) => {
                self.clauses.push(Clause { head, body });
                Ok(())
            }
            _ => Err(error!(SyntaxError; "CLAUSE HEAD MUST BE CALLABLE")),
        }
    }

    fn query(&mut self, ctx: &mut Context, goal: Term, answer: bool) -> Result<()> {
        let mut names = vec![];
        variables(&goal, &mut names);
        let mut goals = vec![];
        conjunction(goal, &mut goals);
        let mut found = vec![];
        self.pruned = false;
        self.inferences = 0;
        self.solve(ctx, goals, Bindings::default(), 0, &mut found, MAX_SOLUTIONS)?;
        ctx.flush();
        if !answer || self.halted {
            return Ok(());
        }
        for solution in &found {
            for name in &names {
                let value = solution.resolve(&Term::Var(name.clone()));
                ctx.log(&format!("{} = {}", name, value));
            }
        }
        ctx.log(if found.is_empty() { "No" } else { "Yes" });
        Ok(())
    }

    fn rename(&mut self, term: &Term) -> Term {
        match term {
            Term::Var(name) => Term::Var(format!("{}#{}", name, self.fresh)),
            Term::Compound(name, args) => {
                Term::Compound(name.clone(), args.iter().map(|a| self.rename(a)).collect())
            }
            term => term.clone(),
        }
    }

    /// Depth-first search over an explicit stack of choice points. Only
    /// clause resolutions count toward the depth limit.
    fn solve(
        &mut self,
        ctx: &mut Context,
        goals: Vec<Term>,
        bindings: Bindings,
        depth: usize,
        found: &mut Vec<Bindings>,
        limit: usize,
    ) -> Result<()> {
        let mut stack = vec![Frame {
            goals,
            bindings,
            depth,
        }];
        while let Some(Frame {
            mut goals,
            bindings,
            depth,
        }) = stack.pop()
        {
            if found.len() >= limit || self.halted {
                break;
            }
            if goals.is_empty() {
                found.push(bindings);
                continue;
            }
            self.inferences += 1;
            if self.inferences > INFERENCE_LIMIT {
                return Err(error!(StepLimit; "TOO MANY INFERENCES"));
            }
            let goal = bindings.walk(&goals.remove(0));
            let rest = goals;
            let (name, args) = match &goal {
                Term::Atom(name) => (name.as_str(), &[][..]),
                Term::Compound(name, args) => (name.as_str(), args.as_slice()),
                Term::Var(_) => return Err(error!(TypeMismatch; "UNBOUND GOAL")),
                Term::Int(_) => return Err(error!(TypeMismatch; "GOAL IS A NUMBER")),
            };
            let next = |goals: Vec<Term>, bindings: Bindings| Frame {
                goals,
                bindings,
                depth,
            };
            match (name, args.len()) {
                ("true", 0) | ("!", 0) => stack.push(next(rest, bindings)),
                ("fail", 0) | ("false", 0) => {}
                ("halt", 0) => self.halted = true,
                ("nl", 0) => {
                    ctx.log("");
                    stack.push(next(rest, bindings));
                }
                ("write", 1) | ("print", 1) => {
                    ctx.print_partial(&bindings.resolve(&args[0]).to_string());
                    stack.push(next(rest, bindings));
                }
                (",", 2) => {
                    stack.push(next(prepend(&args[..], rest), bindings));
                }
                (";", 2) => {
                    stack.push(next(prepend(&args[1..], rest.clone()), bindings.clone()));
                    stack.push(next(prepend(&args[..1], rest), bindings));
                }
                ("=", 2) => {
                    let mut unified = bindings;
                    if unified.unify(&args[0], &args[1]) {
                        stack.push(next(rest, unified));
                    }
                }
                ("\\=", 2) => {
                    if !bindings.clone().unify(&args[0], &args[1]) {
                        stack.push(next(rest, bindings));
                    }
                }
                ("==", 2) | ("\\==", 2) => {
                    let same = bindings.resolve(&args[0]) == bindings.resolve(&args[1]);
                    if same == (name == "==") {
                        stack.push(next(rest, bindings));
                    }
                }
                ("\\+", 1) => {
                    if self.negations >= NEGATION_LIMIT {
                        return Err(error!(Overflow; "NEGATION NESTED TOO DEEPLY"));
                    }
                    self.negations += 1;
                    let mut inner = vec![];
                    let outcome =
                        self.solve(ctx, vec![args[0].clone()], bindings.clone(), depth, &mut inner, 1);
                    self.negations -= 1;
                    outcome?;
                    if inner.is_empty() {
                        stack.push(next(rest, bindings));
                    }
                }
                ("is", 2) => {
                    let value = arithmetic(&bindings, &args[1])?;
                    let mut unified = bindings;
                    if unified.unify(&args[0], &Term::Int(value)) {
                        stack.push(next(rest, unified));
                    }
                }
                ("<", 2) | (">", 2) | ("=<", 2) | (">=", 2) | ("=:=", 2) | ("=\\=", 2) => {
                    let a = arithmetic(&bindings, &args[0])?;
                    let b = arithmetic(&bindings, &args[1])?;
                    let holds = match name {
                        "<" => a < b,
                        ">" => a > b,
                        "=<" => a <= b,
                        ">=" => a >= b,
                        "=:=" => a == b,
                        _ => a != b,
                    };
                    if holds {
                        stack.push(next(rest, bindings));
                    }
                }
                (name, arity) => {
                    if depth >= DEPTH_LIMIT {
                        if !self.pruned {
                            ctx.debug(&format!("Search depth limit of {} reached", DEPTH_LIMIT));
                            self.pruned = true;
                        }
                        continue;
                    }
                    let candidates: Vec<Clause> = self
                        .clauses
                        .iter()
                        .filter(|c| c.key() == (name, arity))
                        .cloned()
                        .collect();
                    if candidates.is_empty() {
                        ctx.debug(&format!("Unknown procedure {}/{}", name, arity));
                        continue;
                    }
                    let mut alternatives = vec![];
                    for clause in candidates {
                        self.fresh += 1;
                        let head = self.rename(&clause.head);
                        let mut unified = bindings.clone();
                        if unified.unify(&head, &goal) {
                            let mut body: Vec<Term> =
                                clause.body.iter().map(|g| self.rename(g)).collect();
                            body.extend_from_slice(&rest);
                            alternatives.push(Frame {
                                goals: body,
                                bindings: unified,
                                depth: depth + 1,
                            });
                        }
                    }
                    stack.extend(alternatives.into_iter().rev());
                }
            }
        }
        Ok(())
    }
}

/// One pending branch of the search.
struct Frame {
    goals: Vec<Term>,
    bindings: Bindings,
    depth: usize,
}

fn prepend(first: &[Term], rest: Vec<Term>) -> Vec<Term> {
    let mut goals = first.to_vec();
    goals.extend(rest);
    goals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(text: &str) -> Term {
        parse_clauses(text).unwrap().remove(0)
    }

    #[test]
    fn test_parse_rule() {
        let rule = term("grandparent(X, Z) :- parent(X, Y), parent(Y, Z).");
        assert_eq!(rule.to_string(), "grandparent(X,Z):-parent(X,Y),parent(Y,Z)");
        assert_eq!(term("X is 1 + 2 * 3").to_string(), "X is 1+2*3");
        assert_eq!(term("[a, b | T]").to_string(), "[a,b|T]");
        assert_eq!(term("[_]").to_string(), "[_]");
        assert_eq!(term("[]").to_string(), "[]");
    }

    #[test]
    fn test_two_clauses_one_line() {
        assert_eq!(parse_clauses("a. b(1).").unwrap().len(), 2);
        assert!(parse_clauses("foo(").is_err());
    }

    #[test]
    fn test_unify() {
        let mut b = Bindings::default();
        assert!(b.unify(&term("f(X, b)"), &term("f(a, Y)")));
        assert_eq!(b.resolve(&term("g(X, Y)")).to_string(), "g(a,b)");
        assert!(!b.unify(&term("X"), &term("c")));
    }

    #[test]
    fn test_arithmetic() {
        let b = Bindings::default();
        assert_eq!(arithmetic(&b, &term("7 - 2 - 1")).unwrap(), 4);
        assert_eq!(arithmetic(&b, &term("-7 mod 3")).unwrap(), 2);
        assert!(arithmetic(&b, &term("1 / 0")).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}a{}.", "f(".repeat(50_000), ")".repeat(50_000));
        assert!(parse_clauses(&deep).is_err());
        let long = format!("[{}].", vec!["1"; 5_000].join(","));
        assert!(parse_clauses(&long).is_err());
        let sum = format!("X is {}.", vec!["1"; 5_000].join("+"));
        assert!(parse_clauses(&sum).is_err());
        assert!(parse_clauses(&format!("[{}].", vec!["1"; 100].join(","))).is_ok());
    }
}

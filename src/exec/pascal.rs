use super::{keyword, Executor};
use crate::error;
use crate::lang::split::{find_keyword, split_keyword, split_list, split_top_level};
use crate::lang::Error;
use crate::mach::{Context, Directive, Val};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Type {
    Integer,
    Real,
    Text,
    Boolean,
}

impl Type {
    fn from_name(name: &str) -> Type {
        match name.trim().to_ascii_lowercase().as_str() {
            "real" | "double" | "single" => Type::Real,
            "string" | "char" => Type::Text,
            "boolean" => Type::Boolean,
            _ => Type::Integer,
        }
    }

    fn zero(self) -> Val {
        match self {
            Type::Integer => Val::Int(0),
            Type::Real => Val::Float(0.0),
            Type::Text => Val::Str(String::new()),
            Type::Boolean => Val::Bool(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Code,
    Var,
    Const,
}

/// ## Pascal
///
/// Declarations and statements one source line at a time. Identifiers are
/// case-insensitive and stored upper-cased. Loops and compound statements
/// run in place when they fit on one line.

#[derive(Debug)]
pub struct Pascal {
    section: Section,
    types: HashMap<String, Type>,
    budget: usize,
    nesting: usize,
}

impl Default for Pascal {
    fn default() -> Pascal {
        Pascal {
            section: Section::Code,
            types: HashMap::new(),
            budget: 0,
            nesting: 0,
        }
    }
}

impl Executor for Pascal {
    fn execute(&mut self, ctx: &mut Context, line: &str) -> Result<Directive> {
        let line = strip_comments(line);
        let line = line.trim();
        if line.is_empty() {
            return Ok(Directive::Continue);
        }
        self.budget = 0;
        self.nesting = 0;
        let (word, rest) = keyword(line);
        match word.as_str() {
            "PROGRAM" | "USES" => return Ok(Directive::Continue),
            "VAR" => {
                self.section = Section::Var;
                return self.declarations(ctx, rest);
            }
            "CONST" => {
                self.section = Section::Const;
                return self.declarations(ctx, rest);
            }
            "BEGIN" => self.section = Section::Code,
            _ => {}
        }
        if self.section != Section::Code {
            return self.declarations(ctx, line);
        }
        for statement in split_statements(line) {
            match self.statement(ctx, &statement)? {
                Directive::Continue => {}
                directive => return Ok(directive),
            }
        }
        Ok(Directive::Continue)
    }

    fn reset(&mut self) {
        *self = Pascal::default();
    }
}

/// Drop `{ }`, `(* *)` and `//` comments outside string literals.
fn strip_comments(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut quoted = false;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        if quoted {
            quoted = c != '\'';
            out.push(c);
            i += 1;
        } else if c == '\'' {
            quoted = true;
            out.push(c);
            i += 1;
        } else if c == '{' {
            i += chars[i..].iter().position(|&c| c == '}').map_or(chars.len(), |p| p + 1);
        } else if c == '(' && next == Some('*') {
            let end = (i + 2..chars.len().saturating_sub(1))
                .find(|&j| chars[j] == '*' && chars[j + 1] == ')')
                .map_or(chars.len(), |j| j + 2);
            i = end;
        } else if c == '/' && next == Some('/') {
            break;
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

fn nesting(piece: &str) -> i32 {
    piece
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .fold(0, |depth, word| {
            if word.eq_ignore_ascii_case("BEGIN") {
                depth + 1
            } else if word.eq_ignore_ascii_case("END") {
                depth - 1
            } else {
                depth
            }
        })
}

/// Split on top-level `;`, keeping `begin … end` blocks whole.
fn split_statements(text: &str) -> Vec<String> {
    let mut out = vec![];
    let mut pending = String::new();
    let mut depth = 0;
    for (piece, sep) in split_top_level(text, &[';']) {
        if !pending.is_empty() {
            pending.push(';');
        }
        pending.push_str(&piece);
        depth += nesting(&piece);
        if depth <= 0 || sep.is_none() {
            let statement = std::mem::take(&mut pending).trim().to_string();
            if !statement.is_empty() {
                out.push(statement);
            }
            depth = 0;
        }
    }
    out
}

impl Pascal {
    fn declarations(&mut self, ctx: &mut Context, text: &str) -> Result<Directive> {
        for decl in split_top_level(text, &[';']).into_iter().map(|(d, _)| d) {
            let decl = decl.trim();
            if decl.is_empty() {
                continue;
            }
            if self.section == Section::Const {
                let (name, value) = match decl.split_once('=') {
                    Some(parts) => parts,
                    None => return Err(error!(SyntaxError; "EXPECTED =")),
                };
                let value = ctx.eval(value)?;
                ctx.vars.store(&name.trim().to_ascii_uppercase(), value);
                continue;
            }
            let (names, type_name) = match decl.split_once(':') {
                Some(parts) => parts,
                None => return Err(error!(SyntaxError; "EXPECTED :")),
            };
            let ty = Type::from_name(type_name);
            for name in split_list(names) {
                let name = name.to_ascii_uppercase();
                ctx.vars.store(&name, ty.zero());
                self.types.insert(name, ty);
            }
        }
        Ok(Directive::Continue)
    }

    fn statement(&mut self, ctx: &mut Context, text: &str) -> Result<Directive> {
        if self.nesting >= MAX_NESTING {
            return Err(error!(ExpansionTooLarge; "STATEMENTS NESTED TOO DEEPLY"));
        }
        self.nesting += 1;
        let result = self.simple_or_structured(ctx, text);
        self.nesting -= 1;
        result
    }

    fn simple_or_structured(&mut self, ctx: &mut Context, text: &str) -> Result<Directive> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Directive::Continue);
        }
        self.budget += 1;
        if self.budget > ctx.config.max_commands_per_line {
            return Err(error!(ExpansionTooLarge; "TOO MANY STATEMENTS ON ONE LINE"));
        }
        let (word, rest) = keyword(text);
        match word.as_str() {
            "END." => Ok(Directive::End),
            "END" | "BEGIN" if rest.is_empty() => Ok(Directive::Continue),
            "BEGIN" => self.compound(ctx, rest),
            "HALT" => Ok(Directive::End),
            "WRITE" => self.write(ctx, rest, false),
            "WRITELN" => self.write(ctx, rest, true),
            "READLN" | "READ" => self.read(ctx, rest),
            "IF" => self.if_then(ctx, rest),
            "FOR" => self.for_loop(ctx, rest),
            "WHILE" => self.while_loop(ctx, rest),
            _ => match text.find(":=") {
                Some(at) => self.assign(ctx, &text[..at], &text[at + 2..]),
                None => Err(error!(SyntaxError; &format!("UNKNOWN STATEMENT {}", word))),
            },
        }
    }

    /// `begin a; b end` on one line.
    fn compound(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let inner = rest.trim().trim_end_matches(';').trim();
        let (inner, ends_program) = match inner.len().checked_sub(4) {
            Some(at) if inner[at..].eq_ignore_ascii_case("end.") => (&inner[..at], true),
            _ => match inner.len().checked_sub(3) {
                Some(at) if inner[at..].eq_ignore_ascii_case("end") => (&inner[..at], false),
                _ => (inner, false),
            },
        };
        for statement in split_statements(inner) {
            match self.statement(ctx, &statement)? {
                Directive::Continue => {}
                directive => return Ok(directive),
            }
        }
        Ok(if ends_program {
            Directive::End
        } else {
            Directive::Continue
        })
    }

    fn assign(&mut self, ctx: &mut Context, target: &str, expr: &str) -> Result<Directive> {
        let name = target.trim().to_ascii_uppercase();
        if name.is_empty() {
            return Err(error!(SyntaxError; "EXPECTED VARIABLE"));
        }
        let value = ctx.eval(expr)?;
        let value = match (self.types.get(&name), value) {
            (Some(Type::Real), Val::Int(n)) => Val::Float(n as f64),
            (_, v) => v,
        };
        ctx.vars.store(&name, value);
        Ok(Directive::Continue)
    }

    fn write(&mut self, ctx: &mut Context, rest: &str, newline: bool) -> Result<Directive> {
        let args = rest.trim();
        let args = match args.strip_prefix('(') {
            Some(inner) => inner.strip_suffix(')').unwrap_or(inner),
            None => "",
        };
        let mut text = String::new();
        for arg in split_list(args) {
            text.push_str(&format_arg(ctx, &arg)?);
        }
        if newline {
            ctx.log(&text);
        } else {
            ctx.print_partial(&text);
        }
        Ok(Directive::Continue)
    }

    fn read(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let inner = rest.trim().trim_start_matches('(').trim_end_matches(')');
        for name in split_list(inner) {
            let name = name.to_ascii_uppercase();
            let answer = ctx.input("");
            let value = match self.types.get(&name) {
                Some(Type::Text) => Val::Str(answer),
                Some(Type::Real) => match Val::from_input(&answer) {
                    Val::Int(n) => Val::Float(n as f64),
                    v => v,
                },
                _ => Val::from_input(&answer),
            };
            ctx.vars.store(&name, value);
        }
        Ok(Directive::Continue)
    }

    fn if_then(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let (condition, branches) = match split_keyword(rest, "THEN") {
            Some(parts) => parts,
            None => return Err(error!(SyntaxError; "EXPECTED THEN")),
        };
        let (then_branch, else_branch) = match split_keyword(branches, "ELSE") {
            Some((t, e)) => (t, Some(e)),
            None => (branches, None),
        };
        if ctx.eval(condition)?.is_truthy() {
            self.statement(ctx, then_branch)
        } else {
            match else_branch {
                Some(e) => self.statement(ctx, e),
                None => Ok(Directive::Continue),
            }
        }
    }

    fn for_loop(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let at = match rest.find(":=") {
            Some(at) => at,
            None => return Err(error!(SyntaxError; "EXPECTED :=")),
        };
        let var = rest[..at].trim().to_ascii_uppercase();
        let range = &rest[at + 2..];
        let (downward, split) = match find_keyword(range, "DOWNTO") {
            Some(_) => (true, split_keyword(range, "DOWNTO")),
            None => (false, split_keyword(range, "TO")),
        };
        let (start, tail) = match split {
            Some(parts) => parts,
            None => return Err(error!(SyntaxError; "EXPECTED TO")),
        };
        let (end, body) = match split_keyword(tail, "DO") {
            Some(parts) => parts,
            None => return Err(error!(SyntaxError; "EXPECTED DO")),
        };
        let start = ctx.eval(start)?.as_i64()?;
        let end = ctx.eval(end)?.as_i64()?;
        let mut i = start;
        while (!downward && i <= end) || (downward && i >= end) {
            ctx.vars.store(&var, Val::Int(i));
            match self.statement(ctx, body)? {
                Directive::Continue => {}
                directive => return Ok(directive),
            }
            i += if downward { -1 } else { 1 };
        }
        Ok(Directive::Continue)
    }

    fn while_loop(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let (condition, body) = match split_keyword(rest, "DO") {
            Some(parts) => parts,
            None => return Err(error!(SyntaxError; "EXPECTED DO")),
        };
        while ctx.eval(condition)?.is_truthy() {
            match self.statement(ctx, body)? {
                Directive::Continue => {}
                directive => return Ok(directive),
            }
        }
        Ok(Directive::Continue)
    }
}

/// `expr[:width[:decimals]]`
fn format_arg(ctx: &mut Context, arg: &str) -> Result<String> {
    let parts: Vec<String> = split_top_level(arg, &[':'])
        .into_iter()
        .map(|(p, _)| p)
        .collect();
    let value = ctx.eval(&parts[0])?;
    let width = match parts.get(1) {
        Some(w) => ctx.eval(w)?.as_index()?,
        None => 0,
    };
    let text = match parts.get(2) {
        Some(d) => {
            let decimals = ctx.eval(d)?.as_index()?;
            format!("{:.*}", decimals, value.as_f64()?)
        }
        None => value.to_string(),
    };
    Ok(format!("{:>width$}", text, width = width))
}

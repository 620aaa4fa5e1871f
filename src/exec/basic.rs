use super::{keyword, Executor, Handler};
use crate::error;
use crate::lang::split::{find_keyword, find_top_level, split_keyword, split_list, split_top_level};
use crate::lang::{Error, ErrorCode};
use crate::mach::{Context, Directive, ForFrame, Mode, Val};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

const MAX_NESTING: usize = 64;

thread_local!(
    static STATEMENTS: HashMap<&'static str, Handler<Basic>> = {
        let table: &[(&'static str, Handler<Basic>)] = &[
            ("REM", Basic::remark),
            ("LET", Basic::assign),
            ("PRINT", Basic::print),
            ("INPUT", Basic::input),
            ("IF", Basic::if_then),
            ("GOTO", Basic::goto),
            ("GOSUB", Basic::gosub),
            ("RETURN", Basic::return_),
            ("ON", Basic::on),
            ("FOR", Basic::for_loop),
            ("NEXT", Basic::next),
            ("DIM", Basic::dim),
            ("RANDOMIZE", Basic::randomize),
            ("CLS", Basic::cls),
            ("END", Basic::end),
            ("STOP", Basic::end),
            ("OPEN", Basic::open),
            ("CLOSE", Basic::close),
        ];
        table.iter().cloned().collect()
    };
);

/// ## BASIC
///
/// Line-numbered BASIC. Several statements may share a line separated by
/// `:`; `IF` and `REM` take the rest of the line.

#[derive(Debug, Default)]
pub struct Basic {
    nesting: usize,
}

impl Executor for Basic {
    fn execute(&mut self, ctx: &mut Context, line: &str) -> Result<Directive> {
        self.nesting = 0;
        let line = line.trim();
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        self.statements(ctx, line[digits..].trim())
    }
}

impl Basic {
    fn statements(&mut self, ctx: &mut Context, text: &str) -> Result<Directive> {
        let mut rest = text.trim();
        while !rest.is_empty() {
            let (word, _) = keyword(rest);
            let whole = word == "IF" || word == "REM" || rest.starts_with('\'');
            let (statement, tail) = match find_top_level(rest, ':') {
                Some(at) if !whole => (&rest[..at], &rest[at + 1..]),
                _ => (rest, ""),
            };
            match self.statement(ctx, statement.trim())? {
                Directive::Continue => rest = tail.trim(),
                directive => return Ok(directive),
            }
        }
        Ok(Directive::Continue)
    }

    fn statement(&mut self, ctx: &mut Context, text: &str) -> Result<Directive> {
        if text.is_empty() || text.starts_with('\'') {
            return Ok(Directive::Continue);
        }
        if let Some(rest) = text.strip_prefix('?') {
            return self.print(ctx, rest.trim());
        }
        let (word, rest) = keyword(text);
        if let Some(handler) = STATEMENTS.with(|s| s.get(word.as_str()).copied()) {
            return handler(self, ctx, rest);
        }
        if find_top_level(text, '=').is_some() {
            return self.assign(ctx, text);
        }
        Err(error!(SyntaxError; &format!("UNKNOWN STATEMENT {}", word)))
    }

    fn remark(&mut self, _ctx: &mut Context, _rest: &str) -> Result<Directive> {
        Ok(Directive::Continue)
    }

    fn end(&mut self, _ctx: &mut Context, _rest: &str) -> Result<Directive> {
        Ok(Directive::End)
    }

    fn cls(&mut self, ctx: &mut Context, _rest: &str) -> Result<Directive> {
        ctx.debug("CLS");
        Ok(Directive::Continue)
    }

    fn assign(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let at = match find_top_level(rest, '=') {
            Some(at) => at,
            None => return Err(error!(SyntaxError; "EXPECTED =")),
        };
        let value = ctx.eval(&rest[at + 1..])?;
        store_target(ctx, &rest[..at], value)?;
        Ok(Directive::Continue)
    }

    fn print(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        if let Some(file) = rest.strip_prefix('#') {
            return print_file(ctx, file);
        }
        let (text, held) = format_print_list(ctx, rest);
        if held {
            ctx.print_partial(&text);
        } else {
            ctx.log(&text);
        }
        Ok(Directive::Continue)
    }

    fn input(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        if let Some(file) = rest.strip_prefix('#') {
            return input_file(ctx, file);
        }
        let mut prompt = "? ".to_string();
        let mut targets = rest;
        if rest.starts_with('"') {
            let pieces = split_top_level(rest, &[';', ',']);
            if let Some((literal, sep)) = pieces.first() {
                if let Val::Str(s) = ctx.eval(literal)? {
                    prompt = match sep {
                        Some(';') => format!("{}? ", s),
                        _ => s,
                    };
                }
                targets = rest[literal.len()..].trim_start_matches(&[';', ','][..]);
            }
        }
        let names = split_list(targets);
        if names.is_empty() {
            return Err(error!(SyntaxError; "EXPECTED VARIABLE"));
        }
        let answer = ctx.input(&prompt);
        let mut answers: Vec<&str> = if names.len() > 1 {
            answer.split(',').collect()
        } else {
            vec![answer.as_str()]
        };
        answers.resize(names.len(), "");
        for (name, text) in names.iter().zip(answers) {
            let value = if name.ends_with('$') {
                Val::Str(text.trim().to_string())
            } else {
                Val::from_input(text)
            };
            store_target(ctx, name, value)?;
        }
        Ok(Directive::Continue)
    }

    fn if_then(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let (condition, branches) = match split_keyword(rest, "THEN") {
            Some(parts) => parts,
            None => match find_keyword(rest, "GOTO") {
                Some(at) => (rest[..at].trim(), rest[at..].trim()),
                None => return Err(error!(SyntaxError; "EXPECTED THEN")),
            },
        };
        let (then_branch, else_branch) = match split_keyword(branches, "ELSE") {
            Some((t, e)) => (t, Some(e)),
            None => (branches, None),
        };
        let taken = if ctx.eval(condition)?.is_truthy() {
            Some(then_branch)
        } else {
            else_branch
        };
        match taken {
            Some(branch) if is_line_number(branch) => self.goto(ctx, branch),
            Some(branch) => {
                if self.nesting >= MAX_NESTING {
                    return Err(error!(SyntaxError; "IF NESTED TOO DEEPLY"));
                }
                self.nesting += 1;
                let result = self.statements(ctx, branch);
                self.nesting -= 1;
                result
            }
            None => Ok(Directive::Continue),
        }
    }

    fn goto(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        match resolve_line(ctx, rest)? {
            Some(index) => Ok(Directive::Jump(index)),
            None => Ok(Directive::Continue),
        }
    }

    fn gosub(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        match resolve_line(ctx, rest)? {
            Some(index) => {
                ctx.calls.push(ctx.current_line + 1)?;
                Ok(Directive::Jump(index))
            }
            None => Ok(Directive::Continue),
        }
    }

    fn return_(&mut self, ctx: &mut Context, _rest: &str) -> Result<Directive> {
        match ctx.calls.pop() {
            Ok(index) => Ok(Directive::Jump(index)),
            Err(_) => {
                ctx.debug("RETURN without GOSUB");
                Ok(Directive::Continue)
            }
        }
    }

    fn on(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let (selector, targets, is_gosub) = match split_keyword(rest, "GOSUB") {
            Some((s, t)) => (s, t, true),
            None => match split_keyword(rest, "GOTO") {
                Some((s, t)) => (s, t, false),
                None => return Err(error!(SyntaxError; "EXPECTED GOTO OR GOSUB")),
            },
        };
        let choice = ctx.eval(selector)?.as_i64()?;
        let targets = split_list(targets);
        if choice < 1 || choice as usize > targets.len() {
            return Ok(Directive::Continue);
        }
        let target = &targets[choice as usize - 1];
        if is_gosub {
            self.gosub(ctx, target)
        } else {
            self.goto(ctx, target)
        }
    }

    fn for_loop(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let at = match find_top_level(rest, '=') {
            Some(at) => at,
            None => return Err(error!(SyntaxError; "EXPECTED =")),
        };
        let var = rest[..at].trim().to_string();
        let (start, bounds) = match split_keyword(&rest[at + 1..], "TO") {
            Some(parts) => parts,
            None => return Err(error!(SyntaxError; "EXPECTED TO")),
        };
        let (end, step) = match split_keyword(bounds, "STEP") {
            Some((e, s)) => (e, Some(s)),
            None => (bounds, None),
        };
        let start = ctx.eval(start)?.as_i64()?;
        let end = ctx.eval(end)?.as_i64()?;
        let step = match step {
            Some(s) => ctx.eval(s)?.as_i64()?,
            None => 1,
        };
        if step == 0 {
            return Err(error!(IllegalFunctionCall; "STEP 0"));
        }
        ctx.vars.store(&var, Val::Int(start));
        if let Some(pos) = ctx.loops.rposition(|f| f.var.eq_ignore_ascii_case(&var)) {
            ctx.loops.truncate(pos);
        }
        ctx.loops.push(ForFrame {
            var,
            end,
            step,
            line: ctx.current_line,
        })?;
        Ok(Directive::Continue)
    }

    fn next(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let name = rest.split(',').next().unwrap_or("").trim();
        let pos = if name.is_empty() {
            ctx.loops.len().checked_sub(1)
        } else {
            ctx.loops.rposition(|f| f.var.eq_ignore_ascii_case(name))
        };
        let frame = match pos.and_then(|p| ctx.loops.get(p)) {
            Some(frame) => frame.clone(),
            None => {
                ctx.report("NEXT without FOR");
                return Ok(Directive::Continue);
            }
        };
        let pos = pos.unwrap_or(0);
        let current = match ctx.vars.fetch(&frame.var) {
            Some(v) => v.as_i64()?,
            None => frame.end,
        };
        let value = current.saturating_add(frame.step);
        ctx.vars.store(&frame.var, Val::Int(value));
        let more = if frame.step > 0 {
            value <= frame.end
        } else {
            value >= frame.end
        };
        if more {
            ctx.loops.truncate(pos + 1);
            Ok(Directive::Jump(frame.line + 1))
        } else {
            ctx.loops.truncate(pos);
            Ok(Directive::Continue)
        }
    }

    fn dim(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        for item in split_list(rest) {
            let (name, args) = match split_subscript(&item) {
                Some(parts) => parts,
                None => return Err(error!(SyntaxError; "EXPECTED SUBSCRIPT")),
            };
            let mut bounds = vec![];
            for arg in split_list(args) {
                bounds.push(ctx.eval(&arg)?.as_index()?);
            }
            ctx.vars.dimension(name, &bounds)?;
        }
        Ok(Directive::Continue)
    }

    fn randomize(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        if rest.is_empty() {
            ctx.reseed(None);
        } else {
            let seed = ctx.eval(rest)?.as_i64()?;
            ctx.reseed(Some(seed as u64));
        }
        Ok(Directive::Continue)
    }

    fn open(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        let (path, spec) = match split_keyword(rest, "FOR") {
            Some(parts) => parts,
            None => return Err(error!(SyntaxError; "EXPECTED FOR")),
        };
        let (mode, number) = match split_keyword(spec, "AS") {
            Some(parts) => parts,
            None => return Err(error!(SyntaxError; "EXPECTED AS")),
        };
        let mode = match mode.to_ascii_uppercase().as_str() {
            "INPUT" => Mode::Input,
            "OUTPUT" => Mode::Output,
            "APPEND" => Mode::Append,
            _ => return Err(error!(SyntaxError; "EXPECTED INPUT, OUTPUT OR APPEND")),
        };
        let path = ctx.eval(path)?.to_string();
        let number = file_number(ctx, number)?;
        match ctx.files.open(number, &path, mode) {
            Ok(()) => ctx.vars.store("FILE_OPEN_SUCCESS", Val::Int(1)),
            Err(e) => {
                ctx.vars.store("FILE_OPEN_SUCCESS", Val::Int(0));
                ctx.debug(&e.to_string());
            }
        }
        Ok(Directive::Continue)
    }

    fn close(&mut self, ctx: &mut Context, rest: &str) -> Result<Directive> {
        if rest.is_empty() {
            ctx.files.close_all();
            return Ok(Directive::Continue);
        }
        for item in split_list(rest) {
            let number = file_number(ctx, &item)?;
            if let Err(e) = ctx.files.close(number) {
                ctx.debug(&e.to_string());
            }
        }
        Ok(Directive::Continue)
    }
}

fn is_line_number(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Line index for a GOTO target. A missing line is reported and yields
/// `None`.
fn resolve_line(ctx: &mut Context, target: &str) -> Result<Option<usize>> {
    let target = target.trim();
    let number = match target.parse::<u32>() {
        Ok(n) => n,
        Err(_) => return Err(error!(SyntaxError; "EXPECTED LINE NUMBER")),
    };
    match ctx.program.find_line_number(number) {
        Some(index) => Ok(Some(index)),
        None => {
            ctx.report(&format!("Line {} not found", number));
            Ok(None)
        }
    }
}

/// `NAME(args)` into its name and the text between the parentheses.
fn split_subscript(s: &str) -> Option<(&str, &str)> {
    let s = s.trim();
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    let (last, body) = match rest.split_last() {
        Some((l, b)) => (Some(*l), b),
        None => (None, &rest[..]),
    };
    body.iter().all(|c| c.is_ascii_alphanumeric() || *c == '_')
        && last.map_or(true, |c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '%')
}

/// Store into a plain variable or an array element.
fn store_target(ctx: &mut Context, target: &str, value: Val) -> Result<()> {
    let target = target.trim();
    if let Some((name, args)) = split_subscript(target) {
        let mut indices = vec![];
        for arg in split_list(args) {
            indices.push(ctx.eval(&arg)?.as_index()?);
        }
        return ctx.vars.store_element(name, &indices, value);
    }
    if !is_identifier(target) {
        return Err(error!(SyntaxError; "EXPECTED VARIABLE"));
    }
    ctx.vars.store(target, value);
    Ok(())
}

fn file_number(ctx: &mut Context, s: &str) -> Result<i64> {
    ctx.eval(s.trim().trim_start_matches('#'))?.as_i64()
}

/// Evaluate a PRINT list. `;` joins items directly and `,` with a space.
/// The flag is set when a trailing separator holds the line open.
fn format_print_list(ctx: &mut Context, list: &str) -> (String, bool) {
    let pieces = split_top_level(list, &[';', ',']);
    let mut text = String::new();
    for (piece, sep) in &pieces {
        let piece = piece.trim();
        if !piece.is_empty() {
            text.push_str(&print_item(ctx, piece));
        }
        if *sep == Some(',') {
            text.push(' ');
        }
    }
    let held = pieces.len() > 1 && pieces.last().map_or(false, |(last, _)| last.trim().is_empty());
    (text, held)
}

/// An item that fails to evaluate falls back to a raw variable, then to its
/// own text.
fn print_item(ctx: &mut Context, item: &str) -> String {
    match ctx.eval(item) {
        Ok(v) => v.to_string(),
        Err(e) if e.code() == ErrorCode::IllegalFunctionCall => String::new(),
        Err(e) => {
            ctx.debug(&e.to_string());
            match ctx.vars.fetch(item) {
                Some(v) => v.to_string(),
                None => item.trim_matches('"').to_string(),
            }
        }
    }
}

fn print_file(ctx: &mut Context, rest: &str) -> Result<Directive> {
    let (number, list) = match find_top_level(rest, ',') {
        Some(at) => (&rest[..at], &rest[at + 1..]),
        None => (rest, ""),
    };
    let number = file_number(ctx, number)?;
    let (text, _) = format_print_list(ctx, list);
    ctx.files.write_line(number, &text)?;
    Ok(Directive::Continue)
}

fn input_file(ctx: &mut Context, rest: &str) -> Result<Directive> {
    let (number, targets) = match find_top_level(rest, ',') {
        Some(at) => (&rest[..at], &rest[at + 1..]),
        None => return Err(error!(SyntaxError; "EXPECTED VARIABLE")),
    };
    let number = file_number(ctx, number)?;
    for name in split_list(targets) {
        match ctx.files.read_line(number) {
            Ok(Some(line)) => {
                let value = if name.ends_with('$') {
                    Val::Str(line)
                } else {
                    Val::from_input(&line)
                };
                store_target(ctx, &name, value)?;
                ctx.vars.store("FILE_READ_SUCCESS", Val::Int(1));
            }
            Ok(None) => {
                ctx.vars.store("FILE_READ_SUCCESS", Val::Int(0));
                break;
            }
            Err(e) => {
                ctx.vars.store("FILE_READ_SUCCESS", Val::Int(0));
                ctx.debug(&e.to_string());
                break;
            }
        }
    }
    Ok(Directive::Continue)
}

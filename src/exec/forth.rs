use super::Executor;
use crate::error;
use crate::lang::Error;
use crate::mach::{Context, Directive, Stack};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Item {
    Word(String),
    Text(String),
}

impl Item {
    fn is(&self, name: &str) -> bool {
        matches!(self, Item::Word(w) if w == name)
    }
}

#[derive(Debug, Clone)]
enum Definition {
    Colon(Vec<Item>),
    Variable(usize),
    Constant(i64),
}

/// Words separated by whitespace. `." text"` becomes a text item; `\` and
/// `( … )` are comments.
fn tokenize(line: &str) -> Result<Vec<Item>> {
    let mut items = vec![];
    let mut rest = line;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..end];
        rest = &rest[end..];
        match word {
            "\\" => break,
            "(" => match rest.find(')') {
                Some(at) => rest = &rest[at + 1..],
                None => break,
            },
            ".\"" => {
                let text = rest.get(1..).unwrap_or("");
                match text.find('"') {
                    Some(at) => {
                        items.push(Item::Text(text[..at].to_string()));
                        rest = &text[at + 1..];
                    }
                    None => return Err(error!(SyntaxError; "UNTERMINATED STRING")),
                }
            }
            _ => items.push(Item::Word(word.to_ascii_uppercase())),
        }
    }
    Ok(items)
}

/// Offset of the word closing a structure opened just before `body`, and
/// of a top-level `ELSE` when `middle` names one.
fn closing(
    body: &[Item],
    open: &str,
    close: &[&str],
    middle: Option<&str>,
) -> Result<(Option<usize>, usize)> {
    let mut depth = 0;
    let mut middle_at = None;
    for (i, item) in body.iter().enumerate() {
        if item.is(open) {
            depth += 1;
        } else if close.iter().any(|c| item.is(c)) {
            if depth == 0 {
                return Ok((middle_at, i));
            }
            depth -= 1;
        } else if depth == 0 && middle.map_or(false, |m| item.is(m)) {
            middle_at = Some(i);
        }
    }
    Err(error!(SyntaxError; &format!("{} WITHOUT {}", open, close.join(" OR "))))
}

fn flag(b: bool) -> i64 {
    if b {
        -1
    } else {
        0
    }
}

/// ## Forth
///
/// An integer data stack and a dictionary of colon definitions, variables
/// and constants. A definition left open at the end of a line continues on
/// the next one.

#[derive(Debug)]
pub struct Forth {
    stack: Stack<i64>,
    loops: Vec<i64>,
    dictionary: HashMap<String, Definition>,
    memory: Vec<i64>,
    compiling: Option<(String, Vec<Item>)>,
    budget: usize,
    nesting: usize,
}

impl Default for Forth {
    fn default() -> Forth {
        Forth {
            stack: Stack::new("STACK OVERFLOW"),
            loops: vec![],
            dictionary: HashMap::new(),
            memory: vec![],
            compiling: None,
            budget: 0,
            nesting: 0,
        }
    }
}

impl Executor for Forth {
    fn execute(&mut self, ctx: &mut Context, line: &str) -> Result<Directive> {
        let mut items = tokenize(line)?;
        self.budget = 0;
        self.nesting = 0;
        self.loops.clear();
        if let Some((name, mut body)) = self.compiling.take() {
            match items.iter().position(|i| i.is(";")) {
                Some(at) => {
                    body.extend(items.drain(..=at).take(at));
                    self.dictionary.insert(name, Definition::Colon(body));
                }
                None => {
                    body.extend(items);
                    self.compiling = Some((name, body));
                    return Ok(Directive::Continue);
                }
            }
        }
        if items.first().map_or(false, |i| i.is("BYE")) {
            return Ok(Directive::End);
        }
        self.run(ctx, &items, 0)?;
        Ok(Directive::Continue)
    }

    fn reset(&mut self) {
        *self = Forth::default();
    }
}

impl Forth {
    fn pop(&mut self) -> Result<i64> {
        self.stack.pop()
    }

    fn push(&mut self, n: i64) -> Result<()> {
        self.stack.push(n)
    }

    fn tick(&mut self, ctx: &Context) -> Result<()> {
        self.budget += 1;
        if self.budget > ctx.config.max_commands_per_line {
            return Err(error!(ExpansionTooLarge; "TOO MANY WORDS ON ONE LINE"));
        }
        Ok(())
    }

    fn name_after(items: &[Item], at: usize) -> Result<String> {
        match items.get(at + 1) {
            Some(Item::Word(name)) => Ok(name.clone()),
            _ => Err(error!(SyntaxError; "EXPECTED NAME")),
        }
    }

    /// Control structures and word calls each add a level of nesting.
    fn run(&mut self, ctx: &mut Context, items: &[Item], depth: usize) -> Result<()> {
        if self.nesting >= MAX_NESTING {
            return Err(error!(Overflow; "NESTED TOO DEEPLY"));
        }
        self.nesting += 1;
        let result = self.run_items(ctx, items, depth);
        self.nesting -= 1;
        result
    }

    fn run_items(&mut self, ctx: &mut Context, items: &[Item], depth: usize) -> Result<()> {
        let mut pc = 0;
        while pc < items.len() {
            self.tick(ctx)?;
            let word = match &items[pc] {
                Item::Text(text) => {
                    ctx.print_partial(text);
                    pc += 1;
                    continue;
                }
                Item::Word(word) => word.as_str(),
            };
            let body = &items[pc + 1..];
            match word {
                "IF" => {
                    let (else_at, then_at) = closing(body, "IF", &["THEN"], Some("ELSE"))?;
                    if self.pop()? != 0 {
                        self.run(ctx, &body[..else_at.unwrap_or(then_at)], depth)?;
                    } else if let Some(else_at) = else_at {
                        self.run(ctx, &body[else_at + 1..then_at], depth)?;
                    }
                    pc += then_at + 2;
                }
                "DO" => {
                    let (_, end) = closing(body, "DO", &["LOOP", "+LOOP"], None)?;
                    let counted = body[end].is("+LOOP");
                    let (limit, mut index) = self.stack.pop_2()?;
                    loop {
                        self.loops.push(index);
                        self.run(ctx, &body[..end], depth)?;
                        self.loops.pop();
                        let step = if counted { self.pop()? } else { 1 };
                        if step == 0 {
                            return Err(error!(IllegalFunctionCall; "+LOOP STEP OF ZERO"));
                        }
                        index += step;
                        if (step > 0 && index >= limit) || (step < 0 && index < limit) {
                            break;
                        }
                    }
                    pc += end + 2;
                }
                "BEGIN" => {
                    let (_, end) = closing(body, "BEGIN", &["UNTIL"], None)?;
                    loop {
                        self.run(ctx, &body[..end], depth)?;
                        if self.pop()? != 0 {
                            break;
                        }
                    }
                    pc += end + 2;
                }
                ":" => {
                    let name = Forth::name_after(items, pc)?;
                    let rest = &items[pc + 2..];
                    match rest.iter().position(|i| i.is(";")) {
                        Some(end) => {
                            self.dictionary
                                .insert(name, Definition::Colon(rest[..end].to_vec()));
                            pc += end + 3;
                        }
                        None => {
                            self.compiling = Some((name, rest.to_vec()));
                            return Ok(());
                        }
                    }
                }
                "VARIABLE" => {
                    let name = Forth::name_after(items, pc)?;
                    self.memory.push(0);
                    let address = self.memory.len() - 1;
                    self.dictionary.insert(name, Definition::Variable(address));
                    pc += 2;
                }
                "CONSTANT" => {
                    let name = Forth::name_after(items, pc)?;
                    let value = self.pop()?;
                    self.dictionary.insert(name, Definition::Constant(value));
                    pc += 2;
                }
                _ => {
                    self.word(ctx, word, depth)?;
                    pc += 1;
                }
            }
        }
        Ok(())
    }

    fn word(&mut self, ctx: &mut Context, word: &str, depth: usize) -> Result<()> {
        match self.dictionary.get(word).cloned() {
            Some(Definition::Colon(body)) => {
                if depth >= ctx.config.max_procedure_depth {
                    return Err(error!(RecursionDetected; word));
                }
                return self.run(ctx, &body, depth + 1);
            }
            Some(Definition::Variable(address)) => return self.push(address as i64),
            Some(Definition::Constant(value)) => return self.push(value),
            None => {}
        }
        if self.primitive(ctx, word)? {
            return Ok(());
        }
        match word.parse::<i64>() {
            Ok(n) => self.push(n),
            Err(_) => Err(error!(UndefinedProcedure; &format!("{} ?", word))),
        }
    }

    fn cell(&self, address: i64) -> Result<usize> {
        match usize::try_from(address) {
            Ok(a) if a < self.memory.len() => Ok(a),
            _ => Err(error!(SubscriptOutOfRange; "INVALID ADDRESS")),
        }
    }

    /// Built-in words. False when `word` is not one of them.
    fn primitive(&mut self, ctx: &mut Context, word: &str) -> Result<bool> {
        match word {
            "+" | "-" | "*" | "/" | "MOD" | "MAX" | "MIN" | "=" | "<>" | "<" | ">" | "AND"
            | "OR" => {
                let (a, b) = self.stack.pop_2()?;
                if b == 0 && (word == "/" || word == "MOD") {
                    return Err(error!(DivisionByZero));
                }
                let value = match word {
                    "+" => a.checked_add(b),
                    "-" => a.checked_sub(b),
                    "*" => a.checked_mul(b),
                    "/" => a.checked_div(b),
                    "MOD" => a.checked_rem(b),
                    "MAX" => Some(a.max(b)),
                    "MIN" => Some(a.min(b)),
                    "=" => Some(flag(a == b)),
                    "<>" => Some(flag(a != b)),
                    "<" => Some(flag(a < b)),
                    ">" => Some(flag(a > b)),
                    "AND" => Some(a & b),
                    _ => Some(a | b),
                };
                self.push(value.ok_or_else(|| error!(Overflow))?)?;
            }
            "NEGATE" => {
                let a = self.pop()?;
                self.push(a.checked_neg().ok_or_else(|| error!(Overflow))?)?;
            }
            "ABS" => {
                let a = self.pop()?;
                self.push(a.checked_abs().ok_or_else(|| error!(Overflow))?)?;
            }
            "0=" => {
                let a = self.pop()?;
                self.push(flag(a == 0))?;
            }
            "1+" | "1-" => {
                let a = self.pop()?;
                let delta = if word == "1+" { 1 } else { -1 };
                self.push(a.checked_add(delta).ok_or_else(|| error!(Overflow))?)?;
            }
            "DUP" => {
                let a = self.pop()?;
                self.push(a)?;
                self.push(a)?;
            }
            "DROP" => {
                self.pop()?;
            }
            "SWAP" => {
                let (a, b) = self.stack.pop_2()?;
                self.push(b)?;
                self.push(a)?;
            }
            "OVER" => {
                let (a, b) = self.stack.pop_2()?;
                self.push(a)?;
                self.push(b)?;
                self.push(a)?;
            }
            "ROT" => {
                let abc = self.stack.pop_n(3)?;
                self.push(abc[1])?;
                self.push(abc[2])?;
                self.push(abc[0])?;
            }
            "." => {
                let a = self.pop()?;
                ctx.print_partial(&format!("{} ", a));
            }
            ".S" => {
                let items: Vec<String> = self.stack.iter().map(|n| n.to_string()).collect();
                ctx.print_partial(&format!("<{}> {} ", items.len(), items.join(" ")));
            }
            "CR" => ctx.log(""),
            "EMIT" => {
                let a = self.pop()?;
                match u32::try_from(a).ok().and_then(char::from_u32) {
                    Some(c) => ctx.print_partial(&c.to_string()),
                    None => return Err(error!(IllegalFunctionCall; "EMIT NEEDS A CHARACTER CODE")),
                }
            }
            "I" | "J" => {
                let back = if word == "I" { 1 } else { 2 };
                match self.loops.len().checked_sub(back).map(|i| self.loops[i]) {
                    Some(index) => self.push(index)?,
                    None => return Err(error!(SyntaxError; &format!("{} OUTSIDE DO LOOP", word))),
                }
            }
            "!" => {
                let (value, address) = self.stack.pop_2()?;
                let cell = self.cell(address)?;
                self.memory[cell] = value;
            }
            "@" => {
                let address = self.pop()?;
                let cell = self.cell(address)?;
                self.push(self.memory[cell])?;
            }
            "+!" => {
                let (value, address) = self.stack.pop_2()?;
                let cell = self.cell(address)?;
                self.memory[cell] = self.memory[cell]
                    .checked_add(value)
                    .ok_or_else(|| error!(Overflow))?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .map(|i| match i {
                Item::Word(w) => w.clone(),
                Item::Text(t) => format!("<{}>", t),
            })
            .collect()
    }

    #[test]
    fn test_tokenize() {
        let items = tokenize(r#"1 2 + ." sum is" . \ trailing"#).unwrap();
        assert_eq!(words(&items), vec!["1", "2", "+", "<sum is>", "."]);
        let items = tokenize("dup ( n -- n n ) *").unwrap();
        assert_eq!(words(&items), vec!["DUP", "*"]);
        assert!(tokenize(r#"." open"#).is_err());
    }

    #[test]
    fn test_closing() {
        let items = tokenize("1 IF 2 ELSE 3 THEN 4 THEN").unwrap();
        assert_eq!(
            closing(&items, "IF", &["THEN"], Some("ELSE")).unwrap(),
            (None, 7)
        );
        let items = tokenize("2 ELSE 3 THEN").unwrap();
        assert_eq!(
            closing(&items, "IF", &["THEN"], Some("ELSE")).unwrap(),
            (Some(1), 3)
        );
        assert!(closing(&items, "DO", &["LOOP"], None).is_err());
    }
}

use super::{keyword, Executor};
use crate::error;
use crate::lang::block::{self, render, Node};
use crate::lang::Error;
use crate::mach::{Context, Directive, Function, Val};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// What a primitive expects in each input slot.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    /// Arithmetic over numbers, `:vars` and `"words`.
    Expr,
    /// A bracketed list.
    List,
    /// A bare or quoted word, taken literally.
    Word,
    /// A list if one follows, otherwise an expression.
    Any,
}

#[derive(Debug, Clone)]
enum Arg {
    Expr(Vec<String>),
    List(Vec<Node>),
    Word(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Normal,
    /// STOP: leave the current procedure.
    Stop,
    /// BYE: end the program.
    Bye,
    /// A guard tripped; unwind the whole line.
    Abort,
}

type Primitive = fn(&mut Logo, &mut Context, &[Arg]) -> Result<Flow>;

#[derive(Clone, Copy)]
enum Kind {
    Primitive(Primitive),
    Procedure,
}

struct Command {
    name: String,
    args: Vec<Arg>,
    kind: Kind,
}

thread_local!(
    static PRIMITIVES: HashMap<&'static str, (&'static [Shape], Primitive)> = {
        use Shape::*;
        let table: &[(&'static str, &'static [Shape], Primitive)] = &[
            ("FORWARD", &[Expr], Logo::forward),
            ("FD", &[Expr], Logo::forward),
            ("BACK", &[Expr], Logo::back),
            ("BK", &[Expr], Logo::back),
            ("LEFT", &[Expr], Logo::left),
            ("LT", &[Expr], Logo::left),
            ("RIGHT", &[Expr], Logo::right),
            ("RT", &[Expr], Logo::right),
            ("PENUP", &[], Logo::pen_up),
            ("PU", &[], Logo::pen_up),
            ("PENDOWN", &[], Logo::pen_down),
            ("PD", &[], Logo::pen_down),
            ("HOME", &[], Logo::home),
            ("CLEARSCREEN", &[], Logo::clear_screen),
            ("CS", &[], Logo::clear_screen),
            ("SETXY", &[Expr, Expr], Logo::set_xy),
            ("SETX", &[Expr], Logo::set_x),
            ("SETY", &[Expr], Logo::set_y),
            ("SETHEADING", &[Expr], Logo::set_heading),
            ("SETH", &[Expr], Logo::set_heading),
            ("SETCOLOR", &[Any], Logo::set_color),
            ("SETPENCOLOR", &[Any], Logo::set_color),
            ("SETPC", &[Any], Logo::set_color),
            ("SETPENSIZE", &[Expr], Logo::set_pen_size),
            ("SETWIDTH", &[Expr], Logo::set_pen_size),
            ("CIRCLE", &[Expr], Logo::circle),
            ("HIDETURTLE", &[], Logo::hide),
            ("HT", &[], Logo::hide),
            ("SHOWTURTLE", &[], Logo::show),
            ("ST", &[], Logo::show),
            ("PRINT", &[Any], Logo::print),
            ("PR", &[Any], Logo::print),
            ("MAKE", &[Word, Any], Logo::make),
            ("REPEAT", &[Expr, List], Logo::repeat),
            ("IF", &[Expr, List], Logo::if_),
            ("IFELSE", &[Expr, List, List], Logo::if_else),
            ("DEFINE", &[Word, List], Logo::define),
            ("CALL", &[Word], Logo::call),
            ("STOP", &[], Logo::stop),
            ("BYE", &[], Logo::bye),
        ];
        table.iter().map(|(n, s, p)| (*n, (*s, *p))).collect()
    };
);

#[derive(Debug, Clone, PartialEq)]
struct Procedure {
    params: Vec<String>,
    body: Vec<String>,
}

/// A `TO` being recorded line by line until its `END`.
#[derive(Debug)]
struct Recording {
    name: String,
    procedure: Procedure,
}

/// ## Logo
///
/// Each logical line is lexed into words and bracketed lists, then parsed
/// command by command using the input shapes above. User procedures take
/// as many expression inputs as they have parameters.

#[derive(Debug, Default)]
pub struct Logo {
    procedures: HashMap<String, Procedure>,
    recording: Option<Recording>,
    macro_stack: Vec<String>,
    repcounts: Vec<i64>,
    depth: usize,
    budget: usize,
}

impl Executor for Logo {
    fn execute(&mut self, ctx: &mut Context, line: &str) -> Result<Directive> {
        let line = line.trim();
        if let Some(recording) = self.recording.as_mut() {
            if line.eq_ignore_ascii_case("END") {
                if let Some(done) = self.recording.take() {
                    ctx.debug(&format!("Defined procedure {}", done.name));
                    self.procedures.insert(done.name, done.procedure);
                }
            } else if !line.is_empty() {
                recording.procedure.body.push(line.to_string());
            }
            return Ok(Directive::Continue);
        }
        let (word, _) = keyword(line);
        if word == "TO" {
            let (name, params, inline) = match parse_header(line) {
                Some(header) => header,
                None => return Err(error!(SyntaxError; "TO NEEDS A NAME")),
            };
            let procedure = Procedure {
                params,
                body: inline.clone().into_iter().collect(),
            };
            if inline.is_some() {
                self.procedures.insert(name, procedure);
            } else {
                self.recording = Some(Recording { name, procedure });
            }
            return Ok(Directive::Continue);
        }
        if word == "END" {
            return Ok(Directive::Continue);
        }
        self.macro_stack.clear();
        self.repcounts.clear();
        self.depth = 0;
        self.budget = 0;
        let nodes = block::parse(line)?;
        match self.run_nodes(ctx, &nodes)? {
            Flow::Bye => Ok(Directive::End),
            _ => Ok(Directive::Continue),
        }
    }

    fn reset(&mut self) {
        *self = Logo::default();
    }
}

/// `TO name :a :b [body... END]` into name, parameters and a one-line body.
fn parse_header(line: &str) -> Option<(String, Vec<String>, Option<String>)> {
    let mut words = line.split_whitespace().skip(1).peekable();
    let name = words.next()?.to_ascii_uppercase();
    let mut params = vec![];
    while let Some(w) = words.peek() {
        match w.strip_prefix(':') {
            Some(p) => {
                params.push(p.to_ascii_uppercase());
                words.next();
            }
            None => break,
        }
    }
    let rest: Vec<&str> = words.collect();
    let inline = match rest.split_last() {
        Some((last, body)) if last.eq_ignore_ascii_case("END") => Some(body.join(" ")),
        _ => None,
    };
    Some((name, params, inline))
}

fn is_binary_operator(w: &str) -> bool {
    matches!(
        w,
        "+" | "-" | "*" | "/" | "^" | "=" | "<" | ">" | "<=" | ">=" | "<>"
    )
}

fn collect_expression(nodes: &[Node], i: &mut usize) -> Result<Vec<String>> {
    let mut parts = vec![];
    collect_operand(nodes, i, &mut parts)?;
    while let Some(Node::Word(w)) = nodes.get(*i) {
        if !is_binary_operator(w) {
            break;
        }
        parts.push(w.clone());
        *i += 1;
        collect_operand(nodes, i, &mut parts)?;
    }
    Ok(parts)
}

fn collect_operand(nodes: &[Node], i: &mut usize, parts: &mut Vec<String>) -> Result<()> {
    match nodes.get(*i) {
        Some(Node::Word(w)) if w == "-" || w == "+" => {
            parts.push(w.clone());
            *i += 1;
            collect_operand(nodes, i, parts)
        }
        Some(Node::Word(w)) if w == "(" => collect_group(nodes, i, parts),
        Some(Node::Word(w)) if is_binary_operator(w) || w == ")" => {
            Err(error!(SyntaxError; &format!("UNEXPECTED {}", w)))
        }
        Some(Node::Word(w)) => {
            parts.push(w.clone());
            *i += 1;
            let is_function = Function::arity(w).is_some();
            if is_function && nodes.get(*i).and_then(Node::word) == Some("(") {
                collect_group(nodes, i, parts)?;
            }
            Ok(())
        }
        Some(Node::List(_)) => Err(error!(SyntaxError; "UNEXPECTED LIST")),
        None => Err(error!(SyntaxError; "NOT ENOUGH INPUTS")),
    }
}

/// A parenthesized group, copied through to the expression parser.
fn collect_group(nodes: &[Node], i: &mut usize, parts: &mut Vec<String>) -> Result<()> {
    let mut depth = 0;
    while let Some(node) = nodes.get(*i) {
        let w = match node {
            Node::Word(w) => w,
            Node::List(_) => return Err(error!(SyntaxError; "UNEXPECTED LIST")),
        };
        if w == "(" {
            depth += 1;
        } else if w == ")" {
            depth -= 1;
        }
        parts.push(w.clone());
        *i += 1;
        if depth == 0 {
            return Ok(());
        }
    }
    Err(error!(SyntaxError; "MISSING )"))
}

fn parse_arg(nodes: &[Node], i: &mut usize, shape: Shape, name: &str) -> Result<Arg> {
    match (shape, nodes.get(*i)) {
        (Shape::List, Some(Node::List(list))) | (Shape::Any, Some(Node::List(list))) => {
            *i += 1;
            Ok(Arg::List(list.clone()))
        }
        (Shape::List, _) => Err(error!(SyntaxError; &format!("{} EXPECTS A LIST", name))),
        (Shape::Word, Some(Node::Word(w))) => {
            *i += 1;
            Ok(Arg::Word(w.trim_start_matches('"').to_string()))
        }
        (Shape::Word, _) => Err(error!(SyntaxError; &format!("{} EXPECTS A NAME", name))),
        (Shape::Expr, _) | (Shape::Any, _) => Ok(Arg::Expr(collect_expression(nodes, i)?)),
    }
}

impl Logo {
    fn run_nodes(&mut self, ctx: &mut Context, nodes: &[Node]) -> Result<Flow> {
        let mut i = 0;
        while i < nodes.len() {
            let command = self.parse_command(ctx, nodes, &mut i)?;
            let flow = self.run_command(ctx, command)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn run_lines(&mut self, ctx: &mut Context, lines: &[String]) -> Result<Flow> {
        for line in lines {
            let nodes = block::parse(line)?;
            let flow = self.run_nodes(ctx, &nodes)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn parse_command(&mut self, ctx: &Context, nodes: &[Node], i: &mut usize) -> Result<Command> {
        let word = match nodes.get(*i) {
            Some(Node::Word(w)) => w.clone(),
            Some(list) => return Err(error!(SyntaxError; &format!("UNEXPECTED {}", list))),
            None => return Err(error!(SyntaxError; "EXPECTED COMMAND")),
        };
        *i += 1;
        let name = word.to_ascii_uppercase();
        let primitive = PRIMITIVES.with(|p| p.get(name.as_str()).copied());
        let (shapes, kind) = match primitive {
            Some((shapes, p)) => (shapes.to_vec(), Kind::Primitive(p)),
            None => match self.procedure_arity(ctx, &name) {
                Some(arity) => (vec![Shape::Expr; arity], Kind::Procedure),
                None => {
                    return Err(error!(UndefinedProcedure; &format!("I don't know how to {}", word)))
                }
            },
        };
        let mut args = Vec::with_capacity(shapes.len());
        for shape in shapes {
            args.push(parse_arg(nodes, i, shape, &name)?);
        }
        Ok(Command { name, args, kind })
    }

    /// Parameter count of a user procedure, hoisting its definition from
    /// the program when it has not been reached yet.
    fn procedure_arity(&mut self, ctx: &Context, name: &str) -> Option<usize> {
        if let Some(p) = self.procedures.get(name) {
            return Some(p.params.len());
        }
        let index = ctx.label(name)?;
        let header = ctx.program.line(index)?.text.clone();
        let (found, params, inline) = parse_header(&header)?;
        let body = match inline {
            Some(body) => vec![body],
            None => ctx.program.lines()[index + 1..]
                .iter()
                .map(|l| l.text.trim())
                .take_while(|t| !t.eq_ignore_ascii_case("END"))
                .map(str::to_string)
                .collect(),
        };
        let arity = params.len();
        self.procedures.insert(found, Procedure { params, body });
        Some(arity)
    }

    fn run_command(&mut self, ctx: &mut Context, command: Command) -> Result<Flow> {
        self.budget += 1;
        if self.budget > ctx.config.max_commands_per_line {
            let limit = ctx.config.max_commands_per_line;
            ctx.report(&format!(
                "Execution aborted: more than {} commands on one line",
                limit
            ));
            return Ok(Flow::Abort);
        }
        match command.kind {
            Kind::Primitive(p) => p(self, ctx, &command.args),
            Kind::Procedure => self.call_procedure(ctx, &command.name, &command.args),
        }
    }

    fn call_procedure(&mut self, ctx: &mut Context, name: &str, args: &[Arg]) -> Result<Flow> {
        let procedure = match self.procedures.get(name) {
            Some(p) => p.clone(),
            None => return Err(error!(UndefinedProcedure; name)),
        };
        if self.depth >= ctx.config.max_procedure_depth {
            return Err(error!(RecursionDetected; &format!("{} nested too deeply", name)));
        }
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.value(ctx, arg)?);
        }
        let saved: Vec<(String, Option<Val>)> = procedure
            .params
            .iter()
            .map(|p| (p.clone(), ctx.vars.fetch(p).cloned()))
            .collect();
        for (param, value) in procedure.params.iter().zip(values) {
            ctx.vars.store(param, value);
        }
        self.depth += 1;
        let result = self.run_lines(ctx, &procedure.body);
        self.depth -= 1;
        for (param, old) in saved {
            match old {
                Some(v) => ctx.vars.store(&param, v),
                None => {
                    ctx.vars.remove(&param);
                }
            }
        }
        match result? {
            Flow::Stop => Ok(Flow::Normal),
            flow => Ok(flow),
        }
    }

    fn value(&mut self, ctx: &mut Context, arg: &Arg) -> Result<Val> {
        match arg {
            Arg::List(list) => Ok(Val::Str(render(list))),
            Arg::Word(w) => Ok(Val::Str(w.clone())),
            Arg::Expr(parts) => self.eval_parts(ctx, parts),
        }
    }

    fn eval_parts(&mut self, ctx: &mut Context, parts: &[String]) -> Result<Val> {
        if let [only] = parts {
            if let Some(word) = only.strip_prefix('"') {
                return Ok(Val::Str(word.to_string()));
            }
        }
        let text: Vec<String> = parts
            .iter()
            .map(|p| {
                if let Some(word) = p.strip_prefix('"') {
                    format!("\"{}\"", word.replace('"', ""))
                } else if p.eq_ignore_ascii_case("REPCOUNT") {
                    self.repcounts.last().copied().unwrap_or(0).to_string()
                } else {
                    p.clone()
                }
            })
            .collect();
        match ctx.eval(&text.join(" ")) {
            Ok(v) => Ok(v),
            Err(e) => match parts {
                [only] if only.chars().all(|c| c.is_ascii_alphabetic()) => {
                    Ok(Val::Str(only.clone()))
                }
                _ => Err(e),
            },
        }
    }

    fn number(&mut self, ctx: &mut Context, arg: &Arg) -> Result<f64> {
        self.value(ctx, arg)?.as_f64()
    }

    fn list<'a>(&self, arg: &'a Arg) -> Result<&'a [Node]> {
        match arg {
            Arg::List(list) => Ok(list),
            _ => Err(error!(SyntaxError; "EXPECTED A LIST")),
        }
    }

    fn word<'a>(&self, arg: &'a Arg) -> Result<&'a str> {
        match arg {
            Arg::Word(w) => Ok(w),
            _ => Err(error!(SyntaxError; "EXPECTED A NAME")),
        }
    }

    /// Split a list body into one string per command.
    fn split_commands(&mut self, ctx: &Context, nodes: &[Node]) -> Result<Vec<String>> {
        let mut commands = vec![];
        let mut i = 0;
        while i < nodes.len() {
            let start = i;
            self.parse_command(ctx, nodes, &mut i)?;
            commands.push(render(&nodes[start..i]));
        }
        Ok(commands)
    }

    fn forward(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let d = self.number(ctx, &args[0])?;
        ctx.turtle.forward(d);
        Ok(Flow::Normal)
    }

    fn back(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let d = self.number(ctx, &args[0])?;
        ctx.turtle.back(d);
        Ok(Flow::Normal)
    }

    fn left(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let a = self.number(ctx, &args[0])?;
        ctx.turtle.turn(-a);
        Ok(Flow::Normal)
    }

    fn right(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let a = self.number(ctx, &args[0])?;
        ctx.turtle.turn(a);
        Ok(Flow::Normal)
    }

    fn pen_up(&mut self, ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        ctx.turtle.pen_up();
        Ok(Flow::Normal)
    }

    fn pen_down(&mut self, ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        ctx.turtle.pen_down();
        Ok(Flow::Normal)
    }

    fn home(&mut self, ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        ctx.turtle.home();
        Ok(Flow::Normal)
    }

    fn clear_screen(&mut self, ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        ctx.turtle.clear_screen();
        Ok(Flow::Normal)
    }

    fn set_xy(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let x = self.number(ctx, &args[0])?;
        let y = self.number(ctx, &args[1])?;
        ctx.turtle.set_xy(x, y);
        Ok(Flow::Normal)
    }

    fn set_x(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let x = self.number(ctx, &args[0])?;
        let y = ctx.turtle.pose().y;
        ctx.turtle.set_xy(x, y);
        Ok(Flow::Normal)
    }

    fn set_y(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let y = self.number(ctx, &args[0])?;
        let x = ctx.turtle.pose().x;
        ctx.turtle.set_xy(x, y);
        Ok(Flow::Normal)
    }

    fn set_heading(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let h = self.number(ctx, &args[0])?;
        ctx.turtle.set_heading(h);
        Ok(Flow::Normal)
    }

    fn set_color(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let color = self.value(ctx, &args[0])?.to_string();
        ctx.turtle.set_color(&color);
        Ok(Flow::Normal)
    }

    fn set_pen_size(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let size = self.number(ctx, &args[0])?;
        ctx.turtle.set_pen_size(size);
        Ok(Flow::Normal)
    }

    fn circle(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let r = self.number(ctx, &args[0])?;
        ctx.turtle.circle(r);
        Ok(Flow::Normal)
    }

    fn hide(&mut self, ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        ctx.turtle.set_visible(false);
        Ok(Flow::Normal)
    }

    fn show(&mut self, ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        ctx.turtle.set_visible(true);
        Ok(Flow::Normal)
    }

    fn print(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let text = self.value(ctx, &args[0])?.to_string();
        ctx.log(&text);
        Ok(Flow::Normal)
    }

    fn make(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let name = self.word(&args[0])?.to_ascii_uppercase();
        let value = self.value(ctx, &args[1])?;
        ctx.vars.store(&name, value);
        Ok(Flow::Normal)
    }

    fn repeat(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let count = self.value(ctx, &args[0])?.as_i64()?.max(0) as usize;
        let body = self.list(&args[1])?.to_vec();
        let commands = self.split_commands(ctx, &body)?.len();
        if count.saturating_mul(commands) > ctx.config.max_repeat_expansion {
            ctx.report("REPEAT aborted: expansion too large");
            return Ok(Flow::Abort);
        }
        for n in 1..=count {
            self.repcounts.push(n as i64);
            let flow = self.run_nodes(ctx, &body);
            self.repcounts.pop();
            match flow? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn if_(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        if self.value(ctx, &args[0])?.is_truthy() {
            let body = self.list(&args[1])?.to_vec();
            return self.run_nodes(ctx, &body);
        }
        Ok(Flow::Normal)
    }

    fn if_else(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let branch = if self.value(ctx, &args[0])?.is_truthy() {
            &args[1]
        } else {
            &args[2]
        };
        let body = self.list(branch)?.to_vec();
        self.run_nodes(ctx, &body)
    }

    fn define(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let name = self.word(&args[0])?.to_ascii_uppercase();
        let body = self.list(&args[1])?.to_vec();
        let commands = self.split_commands(ctx, &body)?;
        ctx.debug(&format!("Defined macro {} ({} commands)", name, commands.len()));
        ctx.macros.insert(name, commands);
        Ok(Flow::Normal)
    }

    fn call(&mut self, ctx: &mut Context, args: &[Arg]) -> Result<Flow> {
        let name = self.word(&args[0])?.to_ascii_uppercase();
        // Only a macro calling itself is caught here; longer cycles run
        // into the depth limit.
        if self.macro_stack.last() == Some(&name) {
            ctx.report(&format!("Recursion detected in macro {}", name));
            return Ok(Flow::Abort);
        }
        if self.macro_stack.len() >= ctx.config.max_macro_depth {
            let limit = ctx.config.max_macro_depth;
            ctx.report(&format!("Macro depth limit of {} exceeded", limit));
            return Ok(Flow::Abort);
        }
        let body = match ctx.macros.get(&name) {
            Some(body) => body.clone(),
            None => return Err(error!(UndefinedProcedure; &format!("Macro {} not defined", name))),
        };
        self.macro_stack.push(name);
        let result = self.run_lines(ctx, &body);
        self.macro_stack.pop();
        result
    }

    fn stop(&mut self, _ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        Ok(Flow::Stop)
    }

    fn bye(&mut self, _ctx: &mut Context, _args: &[Arg]) -> Result<Flow> {
        Ok(Flow::Bye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(s: &str) -> Vec<Node> {
        block::parse(s).unwrap()
    }

    #[test]
    fn test_collect_expression() {
        let n = nodes("FD :SIZE * 2 RT 90");
        let mut i = 1;
        assert_eq!(collect_expression(&n, &mut i).unwrap(), vec![":SIZE", "*", "2"]);
        assert_eq!(i, 4);
        let n = nodes("SETXY 10 -5");
        let mut i = 1;
        assert_eq!(collect_expression(&n, &mut i).unwrap(), vec!["10"]);
        assert_eq!(collect_expression(&n, &mut i).unwrap(), vec!["-5"]);
        let n = nodes("FD SQRT(16) + (2 * 3)");
        let mut i = 1;
        assert_eq!(
            collect_expression(&n, &mut i).unwrap(),
            vec!["SQRT", "(", "16", ")", "+", "(", "2", "*", "3", ")"]
        );
    }

    #[test]
    fn test_missing_input() {
        let n = nodes("FD");
        let mut i = 1;
        assert!(collect_expression(&n, &mut i).is_err());
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("TO square :n :m"),
            Some(("SQUARE".to_string(), vec!["N".to_string(), "M".to_string()], None))
        );
        assert_eq!(
            parse_header("TO dash FD 5 PU FD 5 PD END"),
            Some(("DASH".to_string(), vec![], Some("FD 5 PU FD 5 PD".to_string())))
        );
        assert_eq!(parse_header("TO"), None);
    }
}

use super::{Executor, Handler};
use crate::error;
use crate::lang::Error;
use crate::mach::{Context, Directive, Val};
use regex::Regex;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

thread_local!(
    static COMMANDS: HashMap<&'static str, Handler<Pilot>> = {
        let table: &[(&'static str, Handler<Pilot>)] = &[
            ("T", Pilot::type_text),
            ("TY", Pilot::type_text),
            ("TN", Pilot::type_text),
            ("A", Pilot::accept),
            ("M", Pilot::match_answer),
            ("Y", Pilot::yes),
            ("N", Pilot::no),
            ("J", Pilot::jump),
            ("JY", Pilot::jump),
            ("JN", Pilot::jump),
            ("C", Pilot::compute),
            ("U", Pilot::use_),
            ("E", Pilot::end),
            ("R", Pilot::remark),
        ];
        table.iter().cloned().collect()
    };

    // COMMAND[(condition)]:payload
    static STATEMENT: Option<Regex> =
        Regex::new(r"^([A-Za-z]{1,2})\s*(?:\((.*)\))?\s*:(.*)$").ok();
);

/// ## PILOT
///
/// `X:payload` commands. A condition set by `Y:`, `N:` or `M:` waits for
/// the next `T:` or `J:`, which skips when it is false and clears it.
/// `TY:`/`JY:` need it true and `TN:`/`JN:` need it false; they leave it
/// in place so a `TY:`/`TN:` pair can follow one `M:`. A taken `JY:`/`JN:`
/// jump clears it.

#[derive(Debug, Default)]
pub struct Pilot {}

impl Executor for Pilot {
    fn execute(&mut self, ctx: &mut Context, line: &str) -> Result<Directive> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('*') {
            return Ok(Directive::Continue);
        }
        let (command, inline, payload) = parse_statement(line)?;
        let handler = match COMMANDS.with(|c| c.get(command.as_str()).copied()) {
            Some(h) => h,
            None => return Err(error!(SyntaxError; &format!("UNKNOWN COMMAND {}:", command))),
        };
        let mut run = match command.as_str() {
            "T" | "J" => ctx.take_condition() != Some(false),
            "TY" | "JY" => ctx.condition() == Some(true),
            "TN" | "JN" => ctx.condition() == Some(false),
            _ => true,
        };
        if let Some(condition) = inline {
            run = run && condition_holds(ctx, &condition);
        }
        if !run {
            return Ok(Directive::Continue);
        }
        if command == "JY" || command == "JN" {
            ctx.take_condition();
        }
        handler(self, ctx, &payload)
    }
}

fn parse_statement(line: &str) -> Result<(String, Option<String>, String)> {
    let captures = STATEMENT.with(|re| {
        re.as_ref().and_then(|re| {
            re.captures(line).map(|c| {
                (
                    c.get(1).map_or("", |m| m.as_str()).to_ascii_uppercase(),
                    c.get(2).map(|m| m.as_str().to_string()),
                    c.get(3).map_or("", |m| m.as_str()).to_string(),
                )
            })
        })
    });
    match captures {
        Some(parts) => Ok(parts),
        None => Err(error!(SyntaxError; "EXPECTED COMMAND:")),
    }
}

/// Evaluation failure counts as false.
fn condition_holds(ctx: &mut Context, condition: &str) -> bool {
    match ctx.eval(condition) {
        Ok(v) => v.is_truthy(),
        Err(e) => {
            ctx.debug(&format!("Condition '{}' failed: {}", condition, e));
            false
        }
    }
}

fn variable_name(s: &str) -> &str {
    s.trim().trim_start_matches(&['#', '$', '*'][..]).trim_end_matches('*')
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace `*VAR*` and `$VAR` with variable values. Unknown names are left
/// as written.
fn interpolate(ctx: &Context, text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '*' {
            let close = chars[i + 1..].iter().position(|&c| c == '*');
            if let Some(len) = close {
                let name: String = chars[i + 1..i + 1 + len].iter().collect();
                if !name.is_empty() && name.chars().all(is_name_char) {
                    if let Some(v) = ctx.vars.fetch(&name) {
                        out.push_str(&v.to_string());
                        i += len + 2;
                        continue;
                    }
                }
            }
        } else if c == '$' {
            let len = chars[i + 1..].iter().take_while(|&&c| is_name_char(c)).count();
            if len > 0 {
                let name: String = chars[i + 1..i + 1 + len].iter().collect();
                if let Some(v) = ctx.vars.fetch(&name) {
                    out.push_str(&v.to_string());
                    i += len + 1;
                    continue;
                }
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

impl Pilot {
    fn remark(&mut self, _ctx: &mut Context, _payload: &str) -> Result<Directive> {
        Ok(Directive::Continue)
    }

    fn type_text(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let text = interpolate(ctx, payload);
        ctx.log(&text);
        Ok(Directive::Continue)
    }

    fn accept(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let answer = ctx.input("");
        let name = variable_name(payload);
        let value = if name.ends_with('$') {
            Val::Str(answer.clone())
        } else {
            Val::from_input(&answer)
        };
        if !name.is_empty() {
            ctx.vars.store(name, value);
        }
        ctx.vars.store("ANSWER", Val::Str(answer));
        Ok(Directive::Continue)
    }

    /// Match the last answer against comma separated alternatives.
    fn match_answer(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let answer = match ctx.vars.fetch("ANSWER") {
            Some(v) => v.to_string().to_lowercase(),
            None => String::new(),
        };
        let matched = payload
            .split(',')
            .map(|alt| alt.trim().to_lowercase())
            .filter(|alt| !alt.is_empty())
            .any(|alt| answer.contains(&alt));
        ctx.set_condition(matched);
        Ok(Directive::Continue)
    }

    fn yes(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let holds = condition_holds(ctx, payload);
        ctx.set_condition(holds);
        Ok(Directive::Continue)
    }

    fn no(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let holds = condition_holds(ctx, payload);
        ctx.set_condition(!holds);
        Ok(Directive::Continue)
    }

    fn jump(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let label = variable_name(payload);
        match ctx.label(label) {
            Some(index) => Ok(Directive::Jump(index)),
            None => {
                ctx.report(&format!("Label not found: {}", label));
                Ok(Directive::Continue)
            }
        }
    }

    /// `C:` alone returns from `U:`; `C:VAR=expr` assigns.
    fn compute(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let payload = payload.trim();
        if payload.is_empty() {
            return match ctx.calls.pop() {
                Ok(index) => Ok(Directive::Jump(index)),
                Err(_) => Ok(Directive::Continue),
            };
        }
        let at = match payload.find('=') {
            Some(at) => at,
            None => return Err(error!(SyntaxError; "EXPECTED =")),
        };
        let name = variable_name(&payload[..at]);
        if name.is_empty() {
            return Err(error!(SyntaxError; "EXPECTED VARIABLE"));
        }
        let value = ctx.eval(&payload[at + 1..])?;
        ctx.vars.store(name, value);
        Ok(Directive::Continue)
    }

    fn use_(&mut self, ctx: &mut Context, payload: &str) -> Result<Directive> {
        let label = variable_name(payload);
        match ctx.label(label) {
            Some(index) => {
                ctx.calls.push(ctx.current_line + 1)?;
                Ok(Directive::Jump(index))
            }
            None => {
                ctx.report(&format!("Label not found: {}", label));
                Ok(Directive::Continue)
            }
        }
    }

    /// End the program, or return when inside a `U:` subroutine.
    fn end(&mut self, ctx: &mut Context, _payload: &str) -> Result<Directive> {
        match ctx.calls.pop() {
            Ok(index) => Ok(Directive::Jump(index)),
            Err(_) => Ok(Directive::End),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statement() {
        assert_eq!(
            parse_statement("T:Hello").unwrap(),
            ("T".to_string(), None, "Hello".to_string())
        );
        assert_eq!(
            parse_statement("j(X > 5):DONE").unwrap(),
            ("J".to_string(), Some("X > 5".to_string()), "DONE".to_string())
        );
        assert_eq!(
            parse_statement("TY: well done").unwrap(),
            ("TY".to_string(), None, " well done".to_string())
        );
        assert!(parse_statement("hello there").is_err());
    }

    #[test]
    fn test_variable_name() {
        assert_eq!(variable_name(" #NAME "), "NAME");
        assert_eq!(variable_name("*LOOP"), "LOOP");
        assert_eq!(variable_name("$X"), "X");
    }
}

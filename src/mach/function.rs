use super::Val;
use crate::error;
use crate::lang::Error;
use chrono::{Local, Timelike};
use rand::rngs::StdRng;
use rand::Rng;
use std::ops::RangeInclusive;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions
///
/// Trigonometry works in degrees. Names ending in `$` return strings.

pub struct Function {}

impl Function {
    pub fn arity(func_name: &str) -> Option<RangeInclusive<usize>> {
        let arity = match func_name.to_ascii_uppercase().as_str() {
            "TIMER" | "DATE$" | "TIME$" | "PI" | "TRUE" | "FALSE" => 0..=0,
            "RND" => 0..=1,
            "SIN" | "COS" | "TAN" | "ATN" | "SQRT" | "SQR" | "ABS" | "INT" | "SGN" | "EXP"
            | "LOG" | "LEN" | "STR$" | "VAL" | "CHR$" | "ASC" | "UPPER$" | "UCASE$"
            | "LOWER$" | "LCASE$" => 1..=1,
            "LEFT$" | "RIGHT$" => 2..=2,
            "MID$" => 2..=3,
            "MAX" | "MIN" => 1..=usize::MAX,
            _ => return None,
        };
        Some(arity)
    }

    /// `None` when `func_name` is not a built-in.
    pub fn call(func_name: &str, args: Vec<Val>, rng: &mut StdRng) -> Option<Result<Val>> {
        let name = func_name.to_ascii_uppercase();
        let arity = Function::arity(&name)?;
        if !arity.contains(&args.len()) {
            return Some(Err(error!(SyntaxError; &format!(
                "WRONG NUMBER OF ARGUMENTS TO {}",
                name
            ))));
        }
        Some(Function::dispatch(&name, &args, rng))
    }

    fn dispatch(name: &str, args: &[Val], rng: &mut StdRng) -> Result<Val> {
        let num = |i: usize| args[i].as_f64();
        match name {
            "PI" => Ok(Val::Float(std::f64::consts::PI)),
            "TRUE" => Ok(Val::Bool(true)),
            "FALSE" => Ok(Val::Bool(false)),
            "SIN" => Ok(Val::Float(num(0)?.to_radians().sin())),
            "COS" => Ok(Val::Float(num(0)?.to_radians().cos())),
            "TAN" => Ok(Val::Float(num(0)?.to_radians().tan())),
            "ATN" => Ok(Val::Float(num(0)?.atan().to_degrees())),
            "SQRT" | "SQR" => {
                let n = num(0)?;
                if n < 0.0 {
                    return Err(error!(IllegalFunctionCall; "SQRT requires non-negative value"));
                }
                Ok(Val::Float(n.sqrt()))
            }
            "ABS" => match &args[0] {
                Val::Int(n) => Ok(n
                    .checked_abs()
                    .map(Val::Int)
                    .unwrap_or(Val::Float((*n as f64).abs()))),
                v => Ok(Val::Float(v.as_f64()?.abs())),
            },
            "INT" => match &args[0] {
                Val::Int(n) => Ok(Val::Int(*n)),
                v => Ok(Val::Int(Val::Float(v.as_f64()?.floor()).as_i64()?)),
            },
            "SGN" => {
                let n = num(0)?;
                Ok(Val::Int(if n > 0.0 {
                    1
                } else if n < 0.0 {
                    -1
                } else {
                    0
                }))
            }
            "EXP" => Ok(Val::Float(num(0)?.exp())),
            "LOG" => {
                let n = num(0)?;
                if n <= 0.0 {
                    return Err(error!(IllegalFunctionCall));
                }
                Ok(Val::Float(n.ln()))
            }
            "RND" => {
                let n = match args.first() {
                    Some(v) => v.as_f64()?,
                    None => 1.0,
                };
                if n > 1.0 {
                    Ok(Val::Int(rng.gen_range(1..=n as i64)))
                } else {
                    Ok(Val::Float(rng.gen::<f64>()))
                }
            }
            "MAX" | "MIN" => {
                let mut best = args[0].clone();
                for v in &args[1..] {
                    let (b, x) = (best.as_f64()?, v.as_f64()?);
                    if (name == "MAX" && x > b) || (name == "MIN" && x < b) {
                        best = v.clone();
                    }
                }
                best.as_f64()?;
                Ok(best)
            }
            "TIMER" => {
                let now = Local::now();
                let secs = now.num_seconds_from_midnight() as f64
                    + now.nanosecond() as f64 / 1_000_000_000.0;
                Ok(Val::Float(secs))
            }
            "DATE$" => Ok(Val::Str(Local::now().format("%m-%d-%Y").to_string())),
            "TIME$" => Ok(Val::Str(Local::now().format("%H:%M:%S").to_string())),
            "LEN" => Ok(Val::Int(text(&args[0])?.chars().count() as i64)),
            "STR$" => Ok(Val::Str(args[0].to_string())),
            "VAL" => match Val::from_input(text(&args[0])?) {
                Val::Str(_) => Ok(Val::Int(0)),
                v => Ok(v),
            },
            "CHR$" => {
                let code = args[0].as_i64()?;
                match u32::try_from(code).ok().and_then(std::char::from_u32) {
                    Some(c) => Ok(Val::Str(c.to_string())),
                    None => Err(error!(IllegalFunctionCall)),
                }
            }
            "ASC" => match text(&args[0])?.chars().next() {
                Some(c) => Ok(Val::Int(c as i64)),
                None => Err(error!(IllegalFunctionCall)),
            },
            "UPPER$" | "UCASE$" => Ok(Val::Str(text(&args[0])?.to_uppercase())),
            "LOWER$" | "LCASE$" => Ok(Val::Str(text(&args[0])?.to_lowercase())),
            "LEFT$" => {
                let n = args[1].as_index()?;
                Ok(Val::Str(text(&args[0])?.chars().take(n).collect()))
            }
            "RIGHT$" => {
                let s = text(&args[0])?;
                let n = args[1].as_index()?;
                let len = s.chars().count();
                Ok(Val::Str(s.chars().skip(len.saturating_sub(n)).collect()))
            }
            "MID$" => {
                let s = text(&args[0])?;
                let start = args[1].as_index()?;
                if start == 0 {
                    return Err(error!(IllegalFunctionCall));
                }
                let len = match args.get(2) {
                    Some(v) => v.as_index()?,
                    None => usize::MAX,
                };
                Ok(Val::Str(s.chars().skip(start - 1).take(len).collect()))
            }
            _ => Err(error!(InternalError; "UNKNOWN FUNCTION")),
        }
    }
}

fn text(val: &Val) -> Result<&str> {
    match val {
        Val::Str(s) => Ok(s),
        _ => Err(error!(TypeMismatch; "EXPECTED STRING")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn call(name: &str, args: Vec<Val>) -> Result<Val> {
        let mut rng = StdRng::seed_from_u64(1);
        Function::call(name, args, &mut rng).unwrap()
    }

    #[test]
    fn test_degrees() {
        let v = call("SIN", vec![Val::Int(90)]).unwrap().as_f64().unwrap();
        assert!((v - 1.0).abs() < 1e-9);
        let v = call("cos", vec![Val::Int(180)]).unwrap().as_f64().unwrap();
        assert!((v + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sqrt_negative() {
        let e = call("SQRT", vec![Val::Int(-4)]).unwrap_err();
        assert_eq!(e.text(), "SQRT requires non-negative value");
        assert_eq!(call("SQRT", vec![Val::Int(16)]), Ok(Val::Float(4.0)));
    }

    #[test]
    fn test_strings() {
        let s = || Val::Str("HELLO".into());
        assert_eq!(call("LEFT$", vec![s(), Val::Int(2)]), Ok(Val::from("HE")));
        assert_eq!(call("RIGHT$", vec![s(), Val::Int(3)]), Ok(Val::from("LLO")));
        assert_eq!(
            call("MID$", vec![s(), Val::Int(2), Val::Int(3)]),
            Ok(Val::from("ELL"))
        );
        assert_eq!(call("LEN", vec![s()]), Ok(Val::Int(5)));
        assert_eq!(call("VAL", vec![Val::from("12")]), Ok(Val::Int(12)));
        assert!(call("LEN", vec![Val::Int(5)]).is_err());
    }

    #[test]
    fn test_rnd_and_arity() {
        for _ in 0..20 {
            let v = call("RND", vec![Val::Int(6)]).unwrap().as_i64().unwrap();
            assert!((1..=6).contains(&v));
        }
        let f = call("RND", vec![]).unwrap().as_f64().unwrap();
        assert!((0.0..1.0).contains(&f));
        assert!(call("SIN", vec![]).is_err());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Function::call("NOPE", vec![], &mut rng).is_none());
    }
}

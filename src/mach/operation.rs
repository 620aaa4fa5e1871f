use super::Val;
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Arithmetic and comparison on runtime values
///
/// Integers stay integers while the result fits, then promote to float.

pub struct Operation {}

enum Num {
    Int(i64),
    Float(f64),
}

fn num(val: &Val) -> Result<Num> {
    match val {
        Val::Int(n) => Ok(Num::Int(*n)),
        Val::Bool(b) => Ok(Num::Int(*b as i64)),
        Val::Float(f) => Ok(Num::Float(*f)),
        Val::Str(_) | Val::Array(_) => Err(error!(TypeMismatch)),
    }
}

fn arith(
    lhs: &Val,
    rhs: &Val,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Val> {
    match (num(lhs)?, num(rhs)?) {
        (Num::Int(l), Num::Int(r)) => match int_op(l, r) {
            Some(n) => Ok(Val::Int(n)),
            None => Ok(Val::Float(float_op(l as f64, r as f64))),
        },
        (l, r) => Ok(Val::Float(float_op(as_f64(l), as_f64(r)))),
    }
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

fn is_zero(val: &Val) -> Result<bool> {
    Ok(match num(val)? {
        Num::Int(n) => n == 0,
        Num::Float(f) => f == 0.0,
    })
}

impl Operation {
    pub fn negate(val: Val) -> Result<Val> {
        match num(&val)? {
            Num::Int(n) => Ok(n
                .checked_neg()
                .map(Val::Int)
                .unwrap_or(Val::Float(-(n as f64)))),
            Num::Float(f) => Ok(Val::Float(-f)),
        }
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::Bool(!val.is_truthy()))
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        match (&lhs, &rhs) {
            (Val::Str(_), _) | (_, Val::Str(_)) => Ok(Val::Str(format!("{}{}", lhs, rhs))),
            _ => arith(&lhs, &rhs, i64::checked_add, |l, r| l + r),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        arith(&lhs, &rhs, i64::checked_sub, |l, r| l - r)
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        arith(&lhs, &rhs, i64::checked_mul, |l, r| l * r)
    }

    /// Integers divide exactly into an integer, otherwise into a float.
    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        if is_zero(&rhs)? {
            return Err(error!(DivisionByZero));
        }
        arith(
            &lhs,
            &rhs,
            |l, r| match l.checked_rem(r) {
                Some(0) => l.checked_div(r),
                _ => None,
            },
            |l, r| l / r,
        )
    }

    pub fn int_divide(lhs: Val, rhs: Val) -> Result<Val> {
        if is_zero(&rhs)? {
            return Err(error!(DivisionByZero));
        }
        match arith(&lhs, &rhs, i64::checked_div, |l, r| (l / r).trunc())? {
            Val::Float(f) => Val::Float(f).as_i64().map(Val::Int),
            v => Ok(v),
        }
    }

    pub fn modulus(lhs: Val, rhs: Val) -> Result<Val> {
        if is_zero(&rhs)? {
            return Err(error!(DivisionByZero));
        }
        arith(&lhs, &rhs, i64::checked_rem, |l, r| l % r)
    }

    pub fn power(lhs: Val, rhs: Val) -> Result<Val> {
        arith(
            &lhs,
            &rhs,
            |l, r| {
                if r < 0 || r > u32::MAX as i64 {
                    None
                } else {
                    l.checked_pow(r as u32)
                }
            },
            f64::powf,
        )
    }

    fn compare(lhs: &Val, rhs: &Val) -> Result<Option<Ordering>> {
        match (lhs, rhs) {
            (Val::Str(l), Val::Str(r)) => Ok(Some(l.cmp(r))),
            (Val::Str(_), _) | (_, Val::Str(_)) => Ok(None),
            _ => match (num(lhs)?, num(rhs)?) {
                (Num::Int(l), Num::Int(r)) => Ok(Some(l.cmp(&r))),
                (l, r) => Ok(as_f64(l).partial_cmp(&as_f64(r))),
            },
        }
    }

    fn ordered(lhs: &Val, rhs: &Val) -> Result<Ordering> {
        match Operation::compare(lhs, rhs)? {
            Some(o) => Ok(o),
            None => Err(error!(TypeMismatch)),
        }
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(
            Operation::compare(&lhs, &rhs)? == Some(Ordering::Equal),
        ))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(
            Operation::compare(&lhs, &rhs)? != Some(Ordering::Equal),
        ))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::ordered(&lhs, &rhs)? == Ordering::Less))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::ordered(&lhs, &rhs)? != Ordering::Greater))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::ordered(&lhs, &rhs)? == Ordering::Greater))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(Operation::ordered(&lhs, &rhs)? != Ordering::Less))
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(lhs.is_truthy() && rhs.is_truthy()))
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Bool(lhs.is_truthy() || rhs.is_truthy()))
    }
}

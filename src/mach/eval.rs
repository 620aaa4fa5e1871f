use super::{Function, Operation, Val, Var};
use crate::error;
use crate::lang::{ast::Expression, parse, Error};
use rand::rngs::StdRng;

type Result<T> = std::result::Result<T, Error>;

/// ## Expression evaluator
///
/// Walks a parsed `Expression` against variable memory. Variables win over
/// zero-argument built-ins, and array elements win over function calls, so a
/// program may shadow `TIMER` or `MAX` with its own data.

pub struct Evaluator<'a> {
    vars: &'a Var,
    rng: &'a mut StdRng,
}

impl<'a> Evaluator<'a> {
    pub fn new(vars: &'a Var, rng: &'a mut StdRng) -> Evaluator<'a> {
        Evaluator { vars, rng }
    }

    pub fn eval_str(&mut self, s: &str) -> Result<Val> {
        let expr = parse(s)?;
        self.eval(&expr)
    }

    pub fn eval(&mut self, expr: &Expression) -> Result<Val> {
        match expr {
            Expression::Integer(n) => Ok(Val::Int(*n)),
            Expression::Float(f) => Ok(Val::Float(*f)),
            Expression::String(s) => Ok(Val::Str(s.clone())),
            Expression::Var(name) => self.variable(name),
            Expression::Call(name, args) => self.call(name, args),
            Expression::Negation(e) => Operation::negate(self.eval(e)?),
            Expression::Not(e) => Operation::not(self.eval(e)?),
            Expression::Power(l, r) => self.binary(l, r, Operation::power),
            Expression::Multiply(l, r) => self.binary(l, r, Operation::multiply),
            Expression::Divide(l, r) => self.binary(l, r, Operation::divide),
            Expression::DivideInt(l, r) => self.binary(l, r, Operation::int_divide),
            Expression::Modulus(l, r) => self.binary(l, r, Operation::modulus),
            Expression::Add(l, r) => self.binary(l, r, Operation::sum),
            Expression::Subtract(l, r) => self.binary(l, r, Operation::subtract),
            Expression::Equal(l, r) => self.binary(l, r, Operation::equal),
            Expression::NotEqual(l, r) => self.binary(l, r, Operation::not_equal),
            Expression::Less(l, r) => self.binary(l, r, Operation::less),
            Expression::LessEqual(l, r) => self.binary(l, r, Operation::less_equal),
            Expression::Greater(l, r) => self.binary(l, r, Operation::greater),
            Expression::GreaterEqual(l, r) => self.binary(l, r, Operation::greater_equal),
            Expression::And(l, r) => self.binary(l, r, Operation::and),
            Expression::Or(l, r) => self.binary(l, r, Operation::or),
        }
    }

    fn binary(
        &mut self,
        lhs: &Expression,
        rhs: &Expression,
        op: fn(Val, Val) -> Result<Val>,
    ) -> Result<Val> {
        let l = self.eval(lhs)?;
        let r = self.eval(rhs)?;
        op(l, r)
    }

    fn variable(&mut self, name: &str) -> Result<Val> {
        if let Some(val) = self.vars.fetch(name) {
            return Ok(val.clone());
        }
        if let Some(arity) = Function::arity(name) {
            if arity.contains(&0) {
                if let Some(result) = Function::call(name, vec![], self.rng) {
                    return result;
                }
            }
        }
        Err(error!(UndefinedVariable; name))
    }

    fn call(&mut self, name: &str, args: &[Expression]) -> Result<Val> {
        let mut vals = Vec::with_capacity(args.len());
        for arg in args {
            vals.push(self.eval(arg)?);
        }
        if self.vars.is_array(name) {
            let mut indices = Vec::with_capacity(vals.len());
            for v in &vals {
                indices.push(v.as_index()?);
            }
            return self.vars.fetch_element(name, &indices);
        }
        match Function::call(name, vals, self.rng) {
            Some(result) => result,
            None => Err(error!(UndefinedVariable; &format!("{}()", name))),
        }
    }
}

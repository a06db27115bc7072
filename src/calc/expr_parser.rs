use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Number(f64),
    Constant(String),
    Call(String, Vec<Expr>),
    Neg(Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Parse the longest arithmetic expression at the start of `input`.
///
/// Returns the expression and the number of bytes it spans, trailing
/// whitespace excluded.
pub(super) fn parse_prefix(input: &str) -> Option<(Expr, usize)> {
    let (rest, parsed) = expr(input).ok()?;
    Some((parsed, input.len() - rest.len()))
}

/// Parse `input` as one complete expression.
pub(super) fn parse_complete(input: &str) -> Result<Expr> {
    let invalid = |reason: &str| Error::InvalidExpression {
        expression: input.to_owned(),
        reason: reason.to_owned(),
    };

    match delimited(multispace0, expr, multispace0).parse(input) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rest, _)) => Err(invalid(&format!("unexpected input {rest:?}"))),
        Err(_) => Err(invalid("not an arithmetic expression")),
    }
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(
        operator(alt((
            map(char('+'), |_| BinaryOp::Add),
            map(char('-'), |_| BinaryOp::Sub),
        ))),
        term,
    ))
    .parse(input)?;
    Ok((input, fold(first, rest)))
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(
        operator(alt((
            map(char('*'), |_| BinaryOp::Mul),
            map(char('/'), |_| BinaryOp::Div),
            map(char('%'), |_| BinaryOp::Rem),
        ))),
        unary,
    ))
    .parse(input)?;
    Ok((input, fold(first, rest)))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(pair(char('-'), multispace0), unary), |inner| {
            Expr::Neg(Box::new(inner))
        }),
        preceded(pair(char('+'), multispace0), unary),
        atom,
    ))
    .parse(input)
}

fn atom(input: &str) -> IResult<&str, Expr> {
    alt((number, math_member, parenthesized)).parse(input)
}

fn number(input: &str) -> IResult<&str, Expr> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            recognize(pair(char('.'), digit1)),
        )),
        |text: &str| text.parse().map(Expr::Number),
    )
    .parse(input)
}

/// `Math.PI` or `Math.sqrt(2)`.
fn math_member(input: &str) -> IResult<&str, Expr> {
    let (input, name) = preceded(
        tag("Math."),
        recognize(pair(
            alpha1,
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
    )
    .parse(input)?;
    let (input, args) = opt(delimited(
        pair(multispace0, char('(')),
        separated_list1(operator(char(',')), delimited(multispace0, expr, multispace0)),
        char(')'),
    ))
    .parse(input)?;

    let name = name.to_owned();
    Ok((
        input,
        match args {
            Some(args) => Expr::Call(name, args),
            None => Expr::Constant(name),
        },
    ))
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(
        pair(char('('), multispace0),
        expr,
        pair(multispace0, char(')')),
    )
    .parse(input)
}

/// An operator with optional whitespace on both sides.
fn operator<'a, O, P>(
    inner: P,
) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn fold(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |lhs, (op, rhs)| {
        Expr::Binary(Box::new(lhs), op, Box::new(rhs))
    })
}

// ============================================================================
// Evaluation
// ============================================================================

impl Expr {
    pub(super) fn eval(&self) -> Result<f64> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Constant(name) => constant(name),
            Expr::Call(name, args) => {
                let args = args.iter().map(Expr::eval).collect::<Result<Vec<_>>>()?;
                call(name, &args)
            }
            Expr::Neg(inner) => Ok(-inner.eval()?),
            Expr::Binary(lhs, op, rhs) => {
                let (lhs, rhs) = (lhs.eval()?, rhs.eval()?);
                match op {
                    BinaryOp::Add => Ok(lhs + rhs),
                    BinaryOp::Sub => Ok(lhs - rhs),
                    BinaryOp::Mul => Ok(lhs * rhs),
                    BinaryOp::Div | BinaryOp::Rem if rhs == 0.0 => Err(Error::DivisionByZero),
                    BinaryOp::Div => Ok(lhs / rhs),
                    BinaryOp::Rem => Ok(lhs % rhs),
                }
            }
        }
    }
}

fn constant(name: &str) -> Result<f64> {
    use std::f64::consts;

    Ok(match name {
        "PI" => consts::PI,
        "E" => consts::E,
        "LN2" => consts::LN_2,
        "LN10" => consts::LN_10,
        "LOG2E" => consts::LOG2_E,
        "LOG10E" => consts::LOG10_E,
        "SQRT2" => consts::SQRT_2,
        "SQRT1_2" => consts::FRAC_1_SQRT_2,
        _ => return Err(Error::UnknownFunction(name.to_owned())),
    })
}

fn call(name: &str, args: &[f64]) -> Result<f64> {
    let arity = |expected: usize| -> Result<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(Error::InvalidExpression {
                expression: format!("Math.{name}(...)"),
                reason: format!("expected {expected} argument(s), found {}", args.len()),
            })
        }
    };

    let one = |f: fn(f64) -> f64| -> Result<f64> {
        arity(1)?;
        Ok(f(args[0]))
    };
    let two = |f: fn(f64, f64) -> f64| -> Result<f64> {
        arity(2)?;
        Ok(f(args[0], args[1]))
    };

    match name {
        "abs" => one(f64::abs),
        "acos" => one(f64::acos),
        "asin" => one(f64::asin),
        "atan" => one(f64::atan),
        "cbrt" => one(f64::cbrt),
        "ceil" => one(f64::ceil),
        "cos" => one(f64::cos),
        "cosh" => one(f64::cosh),
        "exp" => one(f64::exp),
        "floor" => one(f64::floor),
        "log" => one(f64::ln),
        "log10" => one(f64::log10),
        "log2" => one(f64::log2),
        "round" => one(|x| (x + 0.5).floor()),
        "sign" => one(|x| if x == 0.0 || x.is_nan() { x } else { x.signum() }),
        "sin" => one(f64::sin),
        "sinh" => one(f64::sinh),
        "sqrt" => one(f64::sqrt),
        "tan" => one(f64::tan),
        "tanh" => one(f64::tanh),
        "trunc" => one(f64::trunc),
        "atan2" => two(f64::atan2),
        "hypot" => two(f64::hypot),
        "pow" => two(f64::powf),
        "max" if !args.is_empty() => Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        "min" if !args.is_empty() => Ok(args.iter().copied().fold(f64::INFINITY, f64::min)),
        "max" | "min" => arity(1).map(|()| 0.0),
        _ => Err(Error::UnknownFunction(name.to_owned())),
    }
}

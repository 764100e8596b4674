use std::cmp::Ordering;

use super::value::{Numeric, Value};
use crate::error::EvalError;

/// Largest list or string a repetition or `range` may build.
pub const MAX_SEQUENCE_LEN: usize = 1 << 26;

/// Applies a binary operator with Python semantics.
pub fn binary(op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        "==" | "===" => Ok(Value::Bool(left.equals(right))),
        "!=" | "!==" | "<>" => Ok(Value::Bool(!left.equals(right))),
        "<" | "<=" | ">" | ">=" => compare(op, left, right).map(Value::Bool),
        "+" => add(left, right),
        "*" => multiply(left, right),
        "-" | "/" | "//" | "%" | "**" => arithmetic(op, left, right),
        "&" | "|" | "^" | "<<" | ">>" => bitwise(op, left, right),
        _ => Err(EvalError::Unsupported {
            node: format!("operator '{op}'"),
        }),
    }
}

fn mismatch(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op: op.to_string(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

pub fn overflow(op: &str) -> EvalError {
    EvalError::Overflow { op: op.to_string() }
}

pub fn compare(op: &str, left: &Value, right: &Value) -> Result<bool, EvalError> {
    let ordering = ordering(op, left, right)?;
    Ok(match ordering {
        None => false,
        Some(ordering) => match op {
            "<" => ordering == Ordering::Less,
            "<=" => ordering != Ordering::Greater,
            ">" => ordering == Ordering::Greater,
            _ => ordering != Ordering::Less,
        },
    })
}

/// `None` when the values are unordered (NaN).
fn ordering(op: &str, left: &Value, right: &Value) -> Result<Option<Ordering>, EvalError> {
    if let (Some(a), Some(b)) = (left.as_numeric(), right.as_numeric()) {
        return Ok(match (a, b) {
            (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        });
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            for (x, y) in a.iter().zip(b.iter()) {
                if !x.equals(y) {
                    return ordering(op, x, y);
                }
            }
            Ok(Some(a.len().cmp(&b.len())))
        }
        _ => Err(mismatch(op, left, right)),
    }
}

fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let (Some(a), Some(b)) = (left.as_numeric(), right.as_numeric()) {
        return match (a, b) {
            (Numeric::Int(a), Numeric::Int(b)) => {
                a.checked_add(b).map(Value::Int).ok_or_else(|| overflow("+"))
            }
            (a, b) => Ok(Value::Float(a.as_f64() + b.as_f64())),
        };
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        _ => Err(mismatch("+", left, right)),
    }
}

fn multiply(left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let (Some(a), Some(b)) = (left.as_numeric(), right.as_numeric()) {
        return match (a, b) {
            (Numeric::Int(a), Numeric::Int(b)) => {
                a.checked_mul(b).map(Value::Int).ok_or_else(|| overflow("*"))
            }
            (a, b) => Ok(Value::Float(a.as_f64() * b.as_f64())),
        };
    }
    let (sequence, count) = match (left.as_numeric(), right.as_numeric()) {
        (_, Some(Numeric::Int(count))) => (left, count),
        (Some(Numeric::Int(count)), _) => (right, count),
        _ => return Err(mismatch("*", left, right)),
    };
    let count = usize::try_from(count).unwrap_or(0);
    match sequence {
        Value::Str(text) => {
            repeated_len(text.len(), count)?;
            Ok(Value::Str(text.repeat(count)))
        }
        Value::List(items) => {
            let items = items.borrow();
            let mut repeated = Vec::with_capacity(repeated_len(items.len(), count)?);
            if !items.is_empty() {
                for _ in 0..count {
                    repeated.extend(items.iter().cloned());
                }
            }
            Ok(Value::list(repeated))
        }
        _ => Err(mismatch("*", left, right)),
    }
}

fn repeated_len(len: usize, count: usize) -> Result<usize, EvalError> {
    len.checked_mul(count)
        .filter(|total| *total <= MAX_SEQUENCE_LEN)
        .ok_or_else(|| overflow("*"))
}

fn arithmetic(op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_numeric(), right.as_numeric()) else {
        return Err(mismatch(op, left, right));
    };

    if op == "/" {
        if b.as_f64() == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(Value::Float(a.as_f64() / b.as_f64()));
    }

    match (a, b) {
        (Numeric::Int(a), Numeric::Int(b)) => integer_arithmetic(op, a, b),
        (a, b) => float_arithmetic(op, a.as_f64(), b.as_f64()),
    }
}

fn integer_arithmetic(op: &str, a: i64, b: i64) -> Result<Value, EvalError> {
    match op {
        "-" => a.checked_sub(b).map(Value::Int).ok_or_else(|| overflow(op)),
        "//" => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let quotient = a.checked_div(b).ok_or_else(|| overflow(op))?;
            let rounds_toward_zero = a % b != 0 && ((a < 0) != (b < 0));
            Ok(Value::Int(if rounds_toward_zero { quotient - 1 } else { quotient }))
        }
        "%" => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let remainder = a.wrapping_rem(b);
            let takes_divisor_sign = remainder != 0 && ((remainder < 0) != (b < 0));
            Ok(Value::Int(if takes_divisor_sign { remainder + b } else { remainder }))
        }
        _ => {
            if b < 0 {
                if a == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                return Ok(Value::Float((a as f64).powf(b as f64)));
            }
            u32::try_from(b)
                .ok()
                .and_then(|exponent| a.checked_pow(exponent))
                .map(Value::Int)
                .ok_or_else(|| overflow(op))
        }
    }
}

fn float_arithmetic(op: &str, a: f64, b: f64) -> Result<Value, EvalError> {
    let value = match op {
        "-" => a - b,
        "//" => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            (a / b).floor()
        }
        "%" => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            let remainder = a % b;
            if remainder == 0.0 {
                0.0_f64.copysign(b)
            } else if (remainder < 0.0) != (b < 0.0) {
                remainder + b
            } else {
                remainder
            }
        }
        _ => {
            if a == 0.0 && b < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a.powf(b)
        }
    };
    Ok(Value::Float(value))
}

fn bitwise(op: &str, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
        match op {
            "&" => return Ok(Value::Bool(a & b)),
            "|" => return Ok(Value::Bool(a | b)),
            "^" => return Ok(Value::Bool(a ^ b)),
            _ => {}
        }
    }
    let (Some(Numeric::Int(a)), Some(Numeric::Int(b))) = (left.as_numeric(), right.as_numeric())
    else {
        return Err(mismatch(op, left, right));
    };

    match op {
        "&" => Ok(Value::Int(a & b)),
        "|" => Ok(Value::Int(a | b)),
        "^" => Ok(Value::Int(a ^ b)),
        _ if b < 0 => Err(EvalError::BadOperand {
            op: op.to_string(),
            operand: "negative shift count",
        }),
        "<<" => {
            if a == 0 {
                return Ok(Value::Int(0));
            }
            if b >= 64 {
                return Err(overflow(op));
            }
            let shifted = i128::from(a) << b;
            i64::try_from(shifted).map(Value::Int).map_err(|_| overflow(op))
        }
        _ => Ok(Value::Int(if b >= 64 {
            if a < 0 {
                -1
            } else {
                0
            }
        } else {
            a >> b
        })),
    }
}

/// Python subscript on lists and strings, negative indices counting from the
/// end.
pub fn index(collection: &Value, index: &Value) -> Result<Value, EvalError> {
    let position = match index.as_numeric() {
        Some(Numeric::Int(position)) => position,
        _ => return Err(mismatch("[]", collection, index)),
    };
    match collection {
        Value::List(items) => {
            let items = items.borrow();
            let slot = resolve_index(position, items.len())?;
            Ok(items[slot].clone())
        }
        Value::Str(text) => {
            let len = text.chars().count();
            let slot = resolve_index(position, len)?;
            Ok(text
                .chars()
                .nth(slot)
                .map(|ch| Value::Str(ch.to_string()))
                .unwrap_or(Value::None))
        }
        other => Err(EvalError::BadOperand {
            op: "[]".to_string(),
            operand: other.type_name(),
        }),
    }
}

pub fn resolve_index(position: i64, len: usize) -> Result<usize, EvalError> {
    let out_of_bounds = EvalError::IndexOutOfBounds { index: position, len };
    let len = i64::try_from(len).map_err(|_| out_of_bounds.clone())?;
    let resolved = if position < 0 { position + len } else { position };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).map_err(|_| out_of_bounds)
    } else {
        Err(out_of_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> Value {
        Value::Int(value)
    }

    #[test]
    fn floor_division_and_modulo_follow_the_divisor() {
        assert_eq!(binary("//", &int(7), &int(-2)), Ok(int(-4)));
        assert_eq!(binary("//", &int(-7), &int(2)), Ok(int(-4)));
        assert_eq!(binary("%", &int(-7), &int(3)), Ok(int(2)));
        assert_eq!(binary("%", &int(7), &int(-3)), Ok(int(-2)));
        assert_eq!(binary("%", &Value::Float(-1.5), &int(1)), Ok(Value::Float(0.5)));
    }

    #[test]
    fn true_division_always_yields_float() {
        assert_eq!(binary("/", &int(6), &int(3)), Ok(Value::Float(2.0)));
        assert_eq!(binary("/", &int(1), &int(0)), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn power() {
        assert_eq!(binary("**", &int(2), &int(10)), Ok(int(1024)));
        assert_eq!(binary("**", &int(2), &int(-1)), Ok(Value::Float(0.5)));
        assert_eq!(
            binary("**", &int(10), &int(30)),
            Err(EvalError::Overflow { op: "**".to_string() })
        );
    }

    #[test]
    fn sequences() {
        let text = Value::Str("ab".to_string());
        assert_eq!(binary("*", &text, &int(3)), Ok(Value::Str("ababab".to_string())));
        assert_eq!(binary("*", &int(-1), &text), Ok(Value::Str(String::new())));
        let joined = binary("+", &Value::list(vec![int(1)]), &Value::list(vec![int(2)]));
        assert_eq!(joined, Ok(Value::list(vec![int(1), int(2)])));
    }

    #[test]
    fn comparisons() {
        assert_eq!(binary("<", &int(1), &Value::Float(1.5)), Ok(Value::Bool(true)));
        assert_eq!(
            binary(">=", &Value::Str("b".to_string()), &Value::Str("a".to_string())),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            binary("<", &Value::list(vec![int(1), int(2)]), &Value::list(vec![int(1), int(3)])),
            Ok(Value::Bool(true))
        );
        assert!(matches!(
            binary("<", &int(1), &Value::Str("a".to_string())),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn shifts_and_bits() {
        assert_eq!(binary("<<", &int(1), &int(4)), Ok(int(16)));
        assert_eq!(binary(">>", &int(-9), &int(1)), Ok(int(-5)));
        assert_eq!(binary("^", &int(6), &int(3)), Ok(int(5)));
        assert_eq!(binary("&", &Value::Bool(true), &Value::Bool(false)), Ok(Value::Bool(false)));
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let list = Value::list(vec![int(1), int(2), int(3)]);
        assert_eq!(index(&list, &int(-1)), Ok(int(3)));
        assert_eq!(
            index(&list, &int(3)),
            Err(EvalError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(index(&Value::Str("héllo".to_string()), &int(1)), Ok(Value::Str("é".to_string())));
    }
}

//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(d) => write!(f, "Int({:?})", d),
            Value::Float(d) => write!(f, "Float({:?})", d),
            Value::Mask(d) => write!(f, "Mask({:?})", d),
            Value::String(s) => write!(f, "{:?}", s.as_ref()),
            Value::List(l) => write!(f, "{:?}", l),
            Value::Expression(e) => write!(f, "Expression({:?})", e.as_ref()),
            Value::Primitive(h) => write!(f, "<primitive {} on {}>", h.site(), h.locality()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(d) => write!(f, "{}", d),
            Value::Float(d) => write!(f, "{}", d),
            Value::Mask(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
            Value::List(l) => write!(f, "{}", l),
            Value::Expression(e) => write!(f, "{}", e),
            Value::Primitive(h) => write!(f, "<primitive {}>", h.site()),
        }
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ref() {
            write!(f, "&")?;
        }
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match item {
                Value::String(s) => write!(f, "{:?}", s.as_ref())?,
                other => write!(f, "{}", other)?,
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_values() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::int(42).to_string(), "42");
        assert_eq!(Value::vector(vec![1.5, 2.0]).to_string(), "[1.5, 2]");
        assert_eq!(Value::mask(vec![true, false]).to_string(), "[1, 0]");
        assert_eq!(
            Value::list(vec![Value::int(1), Value::string("a")]).to_string(),
            "(1, \"a\")"
        );
    }

    #[test]
    fn test_debug_marks_views() {
        let shared = Value::list(vec![Value::Bool(true)]).share();
        assert_eq!(format!("{:?}", shared), "&[true]");
    }
}

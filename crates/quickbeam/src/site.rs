//! Diagnostic labels attached to primitives

use std::fmt;
use std::sync::Arc;

/// The `(name, codename)` label a compiler attaches to every primitive.
///
/// `name` is the operator name (e.g. `"__add"`), `codename` the source label
/// (file and position). Primitives created through an
/// [`Engine`](crate::Engine) also get a per-name sequence number, which forms
/// the instrumentation key `"<name>$<sequence>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    name: Arc<str>,
    codename: Arc<str>,
    sequence: Option<u64>,
}

impl Site {
    /// Create a label without a sequence number.
    pub fn new(name: impl AsRef<str>, codename: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            codename: Arc::from(codename.as_ref()),
            sequence: None,
        }
    }

    /// Attach a sequence number (builder pattern).
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// The operator name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source label
    pub fn codename(&self) -> &str {
        &self.codename
    }

    /// The per-name sequence number, if assigned
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Instrumentation key: `"<name>$<sequence>"`, or just the name when no
    /// sequence number was assigned.
    pub fn key(&self) -> String {
        match self.sequence {
            Some(seq) => format!("{}${}", self.name, seq),
            None => self.name.to_string(),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(seq) = self.sequence {
            write!(f, "${}", seq)?;
        }
        if !self.codename.is_empty() {
            write!(f, "({})", self.codename)?;
        }
        Ok(())
    }
}

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::{self, Display};
use core::slice::Iter;

// -----------------------------------------------------------------------------
// Severity

/// How bad a modeling finding is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The model stays usable; the finding is suspicious but not wrong.
    Warning,
    /// The offending type cannot be modeled and is excluded from the set.
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.pad("warning"),
            Severity::Error => f.pad("error"),
        }
    }
}

// -----------------------------------------------------------------------------
// Diagnostic

/// One finding about a type or member that could not be modeled cleanly.
///
/// The location is the offending type plus, where one applies, the member or
/// arm the finding is about.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    severity: Severity,
    type_name: &'static str,
    member: Option<&'static str>,
    message: Box<str>,
}

impl Diagnostic {
    /// Creates an [`Error`](Severity::Error) finding on a type.
    pub fn error(type_name: &'static str, message: impl Display) -> Self {
        Diagnostic {
            severity: Severity::Error,
            type_name,
            member: None,
            message: alloc::format!("{message}").into_boxed_str(),
        }
    }

    /// Creates a [`Warning`](Severity::Warning) finding on a type.
    pub fn warning(type_name: &'static str, message: impl Display) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            type_name,
            member: None,
            message: alloc::format!("{message}").into_boxed_str(),
        }
    }

    /// Narrows the location to one member or arm of the type.
    pub fn with_member(mut self, member: &'static str) -> Self {
        self.member = Some(member);
        self
    }

    #[inline]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub const fn member(&self) -> Option<&'static str> {
        self.member
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.member {
            Some(member) => write!(
                f,
                "{}: `{}::{member}`: {}",
                self.severity, self.type_name, self.message
            ),
            None => write!(f, "{}: `{}`: {}", self.severity, self.type_name, self.message),
        }
    }
}

// -----------------------------------------------------------------------------
// Diagnostics

/// The batched findings of one collection run.
///
/// Modeling never aborts on the first problem; everything wrong with the
/// graph is reported in one pass, the way a compiler frontend reports a
/// whole translation unit.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub const fn new() -> Self {
        Diagnostics { entries: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any finding is an [`Error`](Severity::Error).
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|diagnostic| diagnostic.severity() == Severity::Error)
    }

    /// The number of [`Error`](Severity::Error) findings so far.
    pub fn error_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Error)
            .count()
    }

    pub fn iter(&self) -> Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Iterates the [`Error`](Severity::Error) findings only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Error)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.entries {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn findings_render_their_location() {
        let plain = Diagnostic::error("Order", "no constructor binding");
        assert_eq!(plain.to_string(), "error: `Order`: no constructor binding");

        let member = Diagnostic::warning("Order", "member is neither readable nor writable")
            .with_member("internal");
        assert_eq!(
            member.to_string(),
            "warning: `Order::internal`: member is neither readable nor writable"
        );
    }

    #[test]
    fn error_detection_ignores_warnings() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::warning("A", "odd"));
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.error_len(), 0);

        diagnostics.push(Diagnostic::error("B", "broken"));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.error_len(), 1);
        assert_eq!(diagnostics.len(), 2);
    }
}

//! Warnings and errors recorded while analyzing an inventory.

/// Ordered diagnostics for one analysis run.
///
/// Errors make a host unfit for deployment. Warnings are reported but do not
/// block rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Diagnostics {
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Recorded warning");
        self.warnings.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Recorded error");
        self.errors.push(message);
    }

    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.warn("first");
        diagnostics.warn(String::from("second"));
        assert!(!diagnostics.is_fatal());

        diagnostics.error("broken");
        assert!(diagnostics.is_fatal());
        assert_eq!(diagnostics.warnings, vec!["first", "second"]);
        assert_eq!(diagnostics.errors, vec!["broken"]);
    }
}

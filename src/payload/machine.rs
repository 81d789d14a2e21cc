use serde::{Deserialize, Serialize};

/// Host the error occurred on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub hostname: String,
}

impl Machine {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// Resolves the local hostname; an empty machine if that fails.
    pub fn current() -> Self {
        hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.hostname.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_is_stable() {
        assert_eq!(Machine::current(), Machine::current());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Machine::default().is_empty());
        assert!(!Machine::new("web-1").is_empty());
    }
}

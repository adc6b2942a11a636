//! Assistant configuration.

/// Construction-time settings of an [`Assistant`](crate::Assistant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Window title used when the current page has none.
    pub title: Option<String>,
    /// Initial padding hint of pages inserted through the assistant.
    pub default_has_padding: bool,
    /// Refuse button intents whose action is not currently offered.
    pub enforce_action_state: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            title: None,
            default_has_padding: true,
            enforce_action_state: true,
        }
    }
}

impl AssistantConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback window title using builder pattern.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the default padding hint using builder pattern.
    pub fn with_default_has_padding(mut self, has_padding: bool) -> Self {
        self.default_has_padding = has_padding;
        self
    }

    /// Set whether delivered intents are checked against the action state.
    pub fn with_enforce_action_state(mut self, enforce: bool) -> Self {
        self.enforce_action_state = enforce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AssistantConfig::new();
        assert_eq!(config.title, None);
        assert!(config.default_has_padding);
        assert!(config.enforce_action_state);
    }

    #[test]
    fn test_builder() {
        let config = AssistantConfig::new()
            .with_title("Setup")
            .with_default_has_padding(false)
            .with_enforce_action_state(false);
        assert_eq!(config.title.as_deref(), Some("Setup"));
        assert!(!config.default_has_padding);
        assert!(!config.enforce_action_state);
    }
}

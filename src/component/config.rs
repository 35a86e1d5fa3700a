//! Component configuration, built with the same validated-builder pattern
//! the teacher crate uses for its system configuration.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
// (none)

// Layer 3: Internal
use super::error::ComponentError;

/// Configuration for a running [`super::Component`].
#[derive(Debug, Clone)]
pub struct ComponentConfig {
    /// Capacity of each subscribed process's offer mailbox (§4.5).
    pub offer_buffer: usize,
    /// Capacity of the channel carrying `want_to_send` requests to the
    /// Coordinator task (§4.4).
    pub send_request_buffer: usize,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            offer_buffer: 16,
            send_request_buffer: 16,
        }
    }
}

impl ComponentConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ComponentConfigBuilder {
        ComponentConfigBuilder::default()
    }
}

/// Builder for [`ComponentConfig`].
#[derive(Debug, Default)]
pub struct ComponentConfigBuilder {
    offer_buffer: Option<usize>,
    send_request_buffer: Option<usize>,
}

impl ComponentConfigBuilder {
    /// Set the per-process offer mailbox capacity.
    pub fn offer_buffer(mut self, value: usize) -> Self {
        self.offer_buffer = Some(value);
        self
    }

    /// Set the send-request channel capacity.
    pub fn send_request_buffer(mut self, value: usize) -> Self {
        self.send_request_buffer = Some(value);
        self
    }

    /// Validate and produce the final configuration.
    pub fn build(self) -> Result<ComponentConfig, ComponentError> {
        let config = ComponentConfig {
            offer_buffer: self.offer_buffer.unwrap_or(16),
            send_request_buffer: self.send_request_buffer.unwrap_or(16),
        };
        config.validate()?;
        Ok(config)
    }
}

impl ComponentConfig {
    /// Check the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), ComponentError> {
        if self.offer_buffer == 0 {
            return Err(ComponentError::invalid_config(
                "offer_buffer must be at least 1",
            ));
        }
        if self.send_request_buffer == 0 {
            return Err(ComponentError::invalid_config(
                "send_request_buffer must be at least 1",
            ));
        }
        Ok(())
    }
}

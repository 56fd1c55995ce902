//! # Heliovis environment state
//!
//! This module defines [`HeliovisEnv`], the shared environment object used across
//! the `heliovis` library. It manages a persistent **HTTP client** used to query
//! the trajectory service for spacecraft positions.
//!
//! The object is cheaply cloneable and passed to the routines that need access
//! to external data sources. Every request carries a global timeout so that a
//! stalled service surfaces as
//! [`HeliovisError::ServiceUnreachable`](crate::heliovis_errors::HeliovisError::ServiceUnreachable)
//! instead of blocking the caller indefinitely.
//!
//! ## Structure
//!
//! ```text
//! HeliovisEnv
//! └── http_client  (ureq::Agent)
//! ```

use std::time::Duration;

use ureq::Agent;

use crate::heliovis_errors::HeliovisError;

/// Shared environment holding the HTTP client used for ephemeris lookups.
#[derive(Debug, Clone)]
pub struct HeliovisEnv {
    pub http_client: Agent,
}

impl Default for HeliovisEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl HeliovisEnv {
    /// Create a new environment with an HTTP client using default settings
    /// (10 second global timeout).
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .build();
        let agent: Agent = config.into();

        HeliovisEnv { http_client: agent }
    }

    /// Send a POST request with form-encoded parameters and return the response body.
    ///
    /// Arguments
    /// ---------
    /// * `url`: the endpoint to query
    /// * `form`: the form key/value pairs
    ///
    /// Return
    /// ------
    /// * The response body as a string, or a `ServiceUnreachable` error when the
    ///   request fails or the body cannot be read.
    pub(crate) fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<String, HeliovisError> {
        let mut response = self.http_client.post(url).send_form(form.iter().copied())?;
        Ok(response.body_mut().read_to_string()?)
    }
}

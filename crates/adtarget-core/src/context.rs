//! Request context
//!
//! The context a targeting decision is made for. It is built once per inbound
//! request and then shared read-only (behind an `Arc`) with every predicate
//! evaluation, so nothing here takes `&mut self` after construction.

use crate::error::{PredicateError, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One inbound targeting decision request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Customer making the request, if signed in
    #[serde(default)]
    pub customer_id: Option<String>,

    /// Marketplace the request originated from
    #[serde(default)]
    pub marketplace_id: Option<String>,

    /// Browsing session identifier
    #[serde(default)]
    pub session_id: Option<String>,

    /// Request-specific attributes read by predicates
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl RequestContext {
    /// Create an empty (anonymous) request context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the customer id
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Builder method to set the marketplace id
    pub fn with_marketplace_id(mut self, marketplace_id: impl Into<String>) -> Self {
        self.marketplace_id = Some(marketplace_id.into());
        self
    }

    /// Builder method to set the session id
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Builder method to add one attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder method to add many attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, Value>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Whether the request comes from a recognized (signed-in) customer.
    ///
    /// Pure query: true iff a non-blank customer id is present.
    pub fn is_recognized_customer(&self) -> bool {
        self.customer_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    /// Look up an attribute
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Look up an attribute a predicate cannot do without
    pub fn require_attribute(&self, key: &str) -> Result<&Value> {
        self.attributes
            .get(key)
            .ok_or_else(|| PredicateError::MissingAttribute(key.to_string()))
    }
}

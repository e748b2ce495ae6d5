//! Ready-made predicate wrappers

use super::{PredicateResult, TargetingPredicate};
use crate::context::RequestContext;
use crate::error::Result;
use async_trait::async_trait;

/// Inverts the result of the wrapped predicate.
///
/// Errors pass through untouched, as does `Indeterminate`.
pub struct Inverted<P> {
    name: String,
    inner: P,
}

impl<P: TargetingPredicate> Inverted<P> {
    pub fn new(inner: P) -> Self {
        Self {
            name: format!("not({})", inner.name()),
            inner,
        }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

#[async_trait]
impl<P: TargetingPredicate> TargetingPredicate for Inverted<P> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, ctx: &RequestContext) -> Result<PredicateResult> {
        self.inner.evaluate(ctx).await.map(PredicateResult::invert)
    }
}

/// Predicate backed by a synchronous closure.
///
/// Meant for cheap checks over request attributes; slow blocking work belongs
/// in a dedicated async implementation.
pub struct FnPredicate<F> {
    name: String,
    func: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&RequestContext) -> Result<PredicateResult> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> TargetingPredicate for FnPredicate<F>
where
    F: Fn(&RequestContext) -> Result<PredicateResult> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, ctx: &RequestContext) -> Result<PredicateResult> {
        (self.func)(ctx)
    }
}

/// Predicate that always yields the same result
#[derive(Debug, Clone)]
pub struct ConstantPredicate {
    name: String,
    result: PredicateResult,
}

impl ConstantPredicate {
    pub fn new(name: impl Into<String>, result: PredicateResult) -> Self {
        Self {
            name: name.into(),
            result,
        }
    }

    pub fn always_true() -> Self {
        Self::new("always_true", PredicateResult::True)
    }

    pub fn always_false() -> Self {
        Self::new("always_false", PredicateResult::False)
    }
}

#[async_trait]
impl TargetingPredicate for ConstantPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, _ctx: &RequestContext) -> Result<PredicateResult> {
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredicateError;

    #[tokio::test]
    async fn test_constant_predicate() {
        let ctx = RequestContext::new();
        let p = ConstantPredicate::always_false();
        assert_eq!(p.name(), "always_false");
        assert_eq!(p.evaluate(&ctx).await.unwrap(), PredicateResult::False);
    }

    #[tokio::test]
    async fn test_inverted_predicate() {
        let ctx = RequestContext::new();
        let p = Inverted::new(ConstantPredicate::always_true());

        assert_eq!(p.name(), "not(always_true)");
        assert_eq!(p.evaluate(&ctx).await.unwrap(), PredicateResult::False);
    }

    #[tokio::test]
    async fn test_inverted_keeps_errors() {
        let ctx = RequestContext::new();
        let failing = FnPredicate::new("broken", |_ctx: &RequestContext| {
            Err(PredicateError::failed("backend down"))
        });
        let p = Inverted::new(failing);

        assert!(p.evaluate(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_fn_predicate_reads_attributes() {
        let in_us = FnPredicate::new("country_is_us", |ctx: &RequestContext| {
            let country = ctx.require_attribute("country")?;
            Ok(PredicateResult::from(country.as_str() == Some("US")))
        });

        let us = RequestContext::new().with_attribute("country", "US");
        let de = RequestContext::new().with_attribute("country", "DE");
        let unknown = RequestContext::new();

        assert_eq!(in_us.evaluate(&us).await.unwrap(), PredicateResult::True);
        assert_eq!(in_us.evaluate(&de).await.unwrap(), PredicateResult::False);
        assert!(matches!(
            in_us.evaluate(&unknown).await,
            Err(PredicateError::MissingAttribute(_))
        ));
    }
}

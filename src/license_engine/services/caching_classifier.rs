use super::{Classification, ExpressionResolver, LicenseClassifier};
use crate::license_engine::domain::ChangeSeverityRules;
use dashmap::DashMap;

/// CachingPolicyClassifier wraps a LicenseClassifier and memoizes results.
///
/// Many packages share the same license string, so each distinct raw string
/// is resolved and classified once. Classification is pure, which makes the
/// memo safe to share across the fan-out workers.
pub struct CachingPolicyClassifier<C: LicenseClassifier> {
    inner: C,
    cache: DashMap<String, Classification>,
}

impl<C: LicenseClassifier> CachingPolicyClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Number of distinct license strings classified so far
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl<C: LicenseClassifier> LicenseClassifier for CachingPolicyClassifier<C> {
    fn classify_license(&self, raw_license: &str) -> Classification {
        let key = raw_license.trim();
        if let Some(cached) = self.cache.get(key) {
            return cached.clone();
        }

        let classification = self.inner.classify_license(key);
        self.cache.insert(key.to_string(), classification.clone());
        classification
    }

    fn resolver(&self) -> &ExpressionResolver {
        self.inner.resolver()
    }

    fn change_severity(&self) -> ChangeSeverityRules {
        self.inner.change_severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license_engine::domain::{LicenseExpression, PolicyVerdict};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how often the wrapped classifier is reached
    struct CountingClassifier {
        calls: AtomicUsize,
        resolver: ExpressionResolver,
    }

    impl LicenseClassifier for CountingClassifier {
        fn classify_license(&self, raw_license: &str) -> Classification {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Classification {
                resolved_expression: self.resolver.resolve_lenient(raw_license),
                verdict: PolicyVerdict::Approved,
                category: None,
                required_approvers: Vec::new(),
                conditions: Vec::new(),
                reason: String::new(),
                compatibility_issues: Vec::new(),
                expression_error: None,
            }
        }

        fn resolver(&self) -> &ExpressionResolver {
            &self.resolver
        }
    }

    fn counting() -> CountingClassifier {
        CountingClassifier {
            calls: AtomicUsize::new(0),
            resolver: ExpressionResolver::new(),
        }
    }

    #[test]
    fn test_repeated_strings_hit_cache() {
        let caching = CachingPolicyClassifier::new(counting());

        let first = caching.classify_license("MIT");
        let second = caching.classify_license("MIT");
        let _ = caching.classify_license("  MIT  ");
        let _ = caching.classify_license("Apache-2.0");

        assert_eq!(first, second);
        assert_eq!(first.resolved_expression, LicenseExpression::spdx("MIT"));
        assert_eq!(caching.inner().calls.load(Ordering::SeqCst), 2);
        assert_eq!(caching.cache_size(), 2);
    }

    #[test]
    fn test_concurrent_access() {
        let caching = CachingPolicyClassifier::new(counting());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for license in ["MIT", "ISC", "Zlib"] {
                        caching.classify_license(license);
                    }
                });
            }
        });
        assert_eq!(caching.cache_size(), 3);
    }
}

#[test]
fn internal_api_key_env_name_is_stable() {
    let cfg = course_checkout::config::AppConfig::from_env();
    assert!(!cfg.internal_api_key.is_empty());
    assert!(cfg.rate_limit_per_minute > 0);
    assert!(!cfg.checkout_currency.is_empty());
}

#[test]
fn operational_endpoints_exist_in_readme() {
    let readme = std::fs::read_to_string("README.md").unwrap_or_default();
    assert!(readme.contains("/ops/readiness"));
    assert!(readme.contains("/ops/liveness"));
    assert!(readme.contains("/webhooks/gateway"));
    assert!(readme.contains("/checkout/sessions/:session_id/confirm"));
}

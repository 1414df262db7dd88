//! Metric key normalization.
//!
//! Detection backends report metric names like `metrics/precision(B)` or
//! `train/box_loss`. Downstream dashboards expect flat, suffix-free names,
//! so every key is rewritten before transmission: the literal `(B)` marker
//! is stripped and path separators become underscores.

/// Normalize a raw backend metric key for the tracking service.
#[must_use]
pub fn normalize_metric_key(key: &str) -> String {
    key.replace("(B)", "").replace('/', "_")
}

/// Normalized key for an end-of-run metric. The `final_` prefix keeps
/// summary values apart from their per-epoch series.
#[must_use]
pub fn final_metric_key(key: &str) -> String {
    format!("final_{}", normalize_metric_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_box_suffix_marker() {
        assert_eq!(normalize_metric_key("precision(B)"), "precision");
        assert_eq!(normalize_metric_key("metrics/mAP50-95(B)"), "metrics_mAP50-95");
    }

    #[test]
    fn test_replaces_every_path_separator() {
        assert_eq!(normalize_metric_key("recall/B"), "recall_B");
        assert_eq!(normalize_metric_key("val/cls_loss"), "val_cls_loss");
        assert_eq!(normalize_metric_key("a/b/c"), "a_b_c");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_metric_key("metrics/precision(B)");
        assert_eq!(normalize_metric_key(&once), once);
    }

    #[test]
    fn test_plain_keys_pass_through() {
        assert_eq!(normalize_metric_key("fitness"), "fitness");
    }

    #[test]
    fn test_final_keys_carry_prefix_after_normalization() {
        assert_eq!(final_metric_key("metrics/mAP50(B)"), "final_metrics_mAP50");
        assert_eq!(final_metric_key("fitness"), "final_fitness");
    }
}

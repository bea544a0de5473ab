//! Integration Tests for the Feature Schema
//!
//! Builder, layout and bounds working together.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{
        layout::{self, FEATURE_LAYOUT},
        InputBounds, LayoutInfo, TransactionFeatures, TransactionFeaturesBuilder,
    };

    /// Every accessor agrees with the layout index of its name
    #[test]
    fn test_accessors_follow_layout() {
        let f = TransactionFeatures::build(1.0, 2.0, 3.0, 0.4, 5.0);

        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            assert_eq!(f.get_by_name(name), f.get(i), "{}", name);
        }
        assert_eq!(f.transaction_amount(), f.get(layout::IDX_AMOUNT).unwrap());
        assert_eq!(f.transaction_time(), f.get(layout::IDX_TIME).unwrap());
        assert_eq!(f.account_age_days(), f.get(layout::IDX_ACCOUNT_AGE).unwrap());
        assert_eq!(f.merchant_risk_score(), f.get(layout::IDX_MERCHANT_RISK).unwrap());
        assert_eq!(f.transaction_velocity(), f.get(layout::IDX_VELOCITY).unwrap());
    }

    /// Serialized vectors keep their stamp and still validate
    #[test]
    fn test_serde_keeps_layout_stamp() {
        let f = TransactionFeatures::build(100.0, 36000.0, 150.0, 0.5, 2.0);
        let json = serde_json::to_string(&f).unwrap();
        let back: TransactionFeatures = serde_json::from_str(&json).unwrap();

        assert_eq!(back, f);
        assert!(back.is_compatible());
        assert_eq!(back.layout_hash(), LayoutInfo::current().hash);
    }

    /// Builder by name and by setter produce the same vector
    #[test]
    fn test_named_and_typed_setters_agree() {
        let by_name = FEATURE_LAYOUT.iter()
            .zip([250.0, 7200.0, 30.0, 0.8, 12.0])
            .fold(TransactionFeaturesBuilder::new(), |b, (name, v)| b.set(name, v))
            .build();

        let typed = TransactionFeatures::build(250.0, 7200.0, 30.0, 0.8, 12.0);
        assert_eq!(by_name, typed);
    }

    /// The two observed velocity bounds
    #[test]
    fn test_deployment_velocity_bounds() {
        let f = TransactionFeatures::build(250.0, 7200.0, 30.0, 0.8, 35.0);
        assert!(!InputBounds::new(20.0).is_within(&f));
        assert!(InputBounds::new(50.0).is_within(&f));
    }
}

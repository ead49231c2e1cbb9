//! Property-based tests for verification invariants.
//!
//! Uses `proptest` to check outcome classification across many inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use dme_verify::application::services::host_verify::verify_host;
use dme_verify::domain::carrier::{is_valid_mcc, is_valid_mnc};
use dme_verify::domain::config::validate_config_value;
use dme_verify::domain::{
    CarrierContext, OsFailure, VerificationError, Verified, VerifyOptions, require_codes,
};

use crate::mocks::{
    ConnectBehavior, FixedCarrier, FixedPlatform, NoopReporter, ScriptedNetwork,
};

fn block_on_verify(
    platform: &FixedPlatform,
    carrier: &FixedCarrier,
    network: &ScriptedNetwork,
) -> Result<Verified, VerificationError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime");
    rt.block_on(verify_host(
        platform,
        carrier,
        network,
        &NoopReporter,
        "edge.example",
        &VerifyOptions::default(),
    ))
}

fn code() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[0-9 ]{0,3}")
}

proptest! {
    /// Any platform older than the minimum fails before any network I/O.
    #[test]
    fn prop_old_platform_never_touches_network(major in 0u64..4, minor in 0u64..100, patch in 0u64..100) {
        let network = ScriptedNetwork::resolving(&["10.0.0.1:38001"]);
        let result = block_on_verify(
            &FixedPlatform::version(major, minor, patch),
            &FixedCarrier::full(),
            &network,
        );
        let is_unsupported = matches!(result, Err(VerificationError::UnsupportedPlatformVersion { .. }));
        prop_assert!(is_unsupported);
        prop_assert_eq!(network.calls().len(), 0);
    }

    /// Missing subscriber info always wins, whatever codes were lying around.
    #[test]
    fn prop_no_subscriber_is_always_missing_carrier_info(_mcc in code(), _mnc in code()) {
        prop_assert_eq!(require_codes(None), Err(VerificationError::MissingCarrierInfo));
    }

    /// With a subscriber present, classification follows MCC-then-MNC order.
    #[test]
    fn prop_carrier_classification_order(mcc in code(), mnc in code()) {
        let ctx = CarrierContext { mcc: mcc.clone(), mnc: mnc.clone() };
        let present = |c: &Option<String>| c.as_deref().is_some_and(|s| !s.trim().is_empty());
        let result = require_codes(Some(&ctx));
        if !present(&mcc) {
            prop_assert_eq!(result, Err(VerificationError::MissingCountryCode));
        } else if !present(&mnc) {
            prop_assert_eq!(result, Err(VerificationError::MissingNetworkCode));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// The errno injected at connect is the errno reported.
    #[test]
    fn prop_connect_errno_round_trips(errno in 1i32..4096, sub in prop::option::of(1i32..4096)) {
        let failure = OsFailure { errno, sub_errno: sub };
        let network = ScriptedNetwork::resolving(&["10.0.0.1:38001"])
            .on_connect("10.0.0.1:38001", ConnectBehavior::Fail(failure));
        let result = block_on_verify(&FixedPlatform::version(6, 0, 0), &FixedCarrier::full(), &network);
        prop_assert_eq!(result, Err(VerificationError::ConnectFailed { errno, sub_errno: sub }));
        prop_assert_eq!(network.leaked().len(), 0);
    }

    /// The errno injected at resolution is the errno reported, with the host.
    #[test]
    fn prop_resolve_errno_round_trips(errno in 1i32..64) {
        let network = ScriptedNetwork::unresolvable(OsFailure::new(errno));
        let result = block_on_verify(&FixedPlatform::version(6, 0, 0), &FixedCarrier::full(), &network);
        prop_assert_eq!(
            result,
            Err(VerificationError::AddressResolutionFailed {
                host: "edge.example".to_string(),
                errno,
                sub_errno: None,
            })
        );
    }

    /// MCC validation accepts exactly three digits and agrees with the config validator.
    #[test]
    fn prop_mcc_validation(value in "[0-9a-z]{0,5}") {
        let expected = value.len() == 3 && value.chars().all(|c| c.is_ascii_digit());
        prop_assert_eq!(is_valid_mcc(&value), expected);
        prop_assert_eq!(validate_config_value("carrier.mcc", &value).is_ok(), expected);
    }

    /// MNC validation accepts two or three digits.
    #[test]
    fn prop_mnc_validation(value in "[0-9]{0,5}") {
        prop_assert_eq!(is_valid_mnc(&value), (2..=3).contains(&value.len()));
    }
}

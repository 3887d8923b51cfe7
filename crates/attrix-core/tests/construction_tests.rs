//! Integration tests for construction-time imports and the configuration
//! surface
//!
//! Tests cover:
//! - Constructing objects from attribute sources
//! - Configuration records folded from the source sequence
//! - Bare keys and the bare-key default
//! - Policy persistence across calls
//! - The custom-handler variant

use attrix_core::{
    AttrMap, DynObject, ImportError, ImportPolicy, InvalidKeyAction, PolicyUpdate, Source, Value,
};

#[test]
fn test_construct_empty() {
    let obj = DynObject::construct([]).unwrap();
    assert_eq!(obj.field_count(), 0);
    // construction resolves and stores a policy even with nothing to import
    assert_eq!(obj.policy(), Some(&ImportPolicy::default()));
}

#[test]
fn test_construct_with_pairs() {
    let obj = DynObject::construct([Source::from(
        AttrMap::new()
            .with("ivar1", 1)
            .with("ivar_1", "1")
            .with("ivar_one", "one"),
    )])
    .unwrap();
    assert_eq!(obj.field_count(), 3);
    assert_eq!(obj.field("ivar1"), Some(&Value::Int(1)));
    assert_eq!(obj.field("ivar_1").unwrap().as_str(), Some("1"));
    assert_eq!(obj.field("ivar_one").unwrap().as_str(), Some("one"));
}

#[test]
fn test_config_source_governs_the_whole_call() {
    // the policy is resolved once per call, so a configuration record
    // applies to pairs that precede it in the sequence as well
    let obj = DynObject::construct([
        Source::from(AttrMap::new().with("=bad=", 1).with("good", 2)),
        Source::from(PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Skip)),
    ])
    .unwrap();
    assert!(!obj.has_field("_bad_"));
    assert_eq!(obj.field("good"), Some(&Value::Int(2)));
}

#[test]
fn test_config_sources_fold_in_order() {
    let obj = DynObject::construct([
        Source::from(PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Skip)),
        Source::from(PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Sanitize)),
        Source::from(AttrMap::new().with("foo-bar!!baz", 9)),
    ])
    .unwrap();
    assert_eq!(obj.field("foo_bar_baz"), Some(&Value::Int(9)));
    assert_eq!(
        obj.policy().unwrap().on_invalid_key,
        InvalidKeyAction::Sanitize
    );
}

#[test]
fn test_construct_with_policy_overrides() {
    let err = DynObject::construct_with_policy(
        PolicyUpdate::new().allow_overwrite(false),
        [Source::from(AttrMap::new().with("a", 1).with("a", 2))],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ImportError::ForbiddenOverwrite {
            name: "a".to_string()
        }
    );
}

#[test]
fn test_config_source_outranks_explicit_update() {
    // records in the source sequence fold after the explicit update,
    // mirroring how later settings override earlier ones
    let obj = DynObject::construct_with_policy(
        PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Reject),
        [
            Source::from(PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Skip)),
            Source::from(AttrMap::new().with("bad key", 1).with("fine", 2)),
        ],
    )
    .unwrap();
    assert_eq!(obj.field("fine"), Some(&Value::Int(2)));
    assert_eq!(obj.field_count(), 1);
}

#[test]
fn test_bare_key_gets_configured_default() {
    let obj = DynObject::construct([
        Source::from(PolicyUpdate::new().bare_key_default("unset")),
        Source::bare("marker"),
        Source::bare("@other"),
    ])
    .unwrap();
    assert_eq!(obj.field("marker").unwrap().as_str(), Some("unset"));
    assert_eq!(obj.field("other").unwrap().as_str(), Some("unset"));
}

#[test]
fn test_bare_key_without_default_is_null() {
    let obj = DynObject::construct([Source::bare("marker")]).unwrap();
    assert_eq!(obj.field("marker"), Some(&Value::Null));
}

#[test]
fn test_bare_key_is_validated_like_any_other() {
    let err = DynObject::construct([Source::bare("not a name")]).unwrap_err();
    assert_eq!(
        err,
        ImportError::InvalidName {
            key: "not a name".to_string()
        }
    );
}

#[test]
fn test_policy_persists_across_calls() {
    let mut obj = DynObject::new();
    obj.import_with_policy(
        PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Skip),
        [],
    )
    .unwrap();

    // a later call with no overrides is still governed by the stored policy
    obj.import([Source::from(AttrMap::new().with("&&&", 1).with("kept", 2))])
        .unwrap();
    assert_eq!(obj.field_count(), 1);
    assert_eq!(obj.field("kept"), Some(&Value::Int(2)));
}

#[test]
fn test_policy_can_be_replaced_later() {
    let mut obj = DynObject::new();
    obj.import_with_policy(
        PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Skip),
        [],
    )
    .unwrap();
    obj.import_with_policy(
        PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Reject),
        [],
    )
    .unwrap();

    let err = obj
        .import([Source::from(AttrMap::new().with("&&&", 1))])
        .unwrap_err();
    assert!(matches!(err, ImportError::InvalidName { .. }));
}

#[test]
fn test_policy_set_directly_governs_imports() {
    let mut obj = DynObject::new();
    obj.set_field("a", 1);
    obj.set_policy(ImportPolicy {
        allow_overwrite: false,
        ..ImportPolicy::default()
    });

    let err = obj
        .import([Source::from(AttrMap::new().with("a", 2))])
        .unwrap_err();
    assert!(matches!(err, ImportError::ForbiddenOverwrite { .. }));
    assert_eq!(obj.field("a"), Some(&Value::Int(1)));
}

#[test]
fn test_sanitize_fixture_names() {
    // fixture keys and their repaired spellings
    let obj = DynObject::construct_with_policy(
        PolicyUpdate::new().on_invalid_key(InvalidKeyAction::Sanitize),
        [Source::from(
            AttrMap::new()
                .with("=bk1=", "_bk1_")
                .with("*@bk2", "_bk2")
                .with("really--+-long&bogus*one", "really_long_bogus_one")
                .with("ivar1", 1),
        )],
    )
    .unwrap();
    assert_eq!(obj.field("_bk1_").unwrap().as_str(), Some("_bk1_"));
    assert_eq!(obj.field("_bk2").unwrap().as_str(), Some("_bk2"));
    assert_eq!(
        obj.field("really_long_bogus_one").unwrap().as_str(),
        Some("really_long_bogus_one")
    );
    assert_eq!(obj.field("ivar1"), Some(&Value::Int(1)));
}

#[test]
fn test_custom_handler_receives_every_pair_verbatim() {
    let mut seen: Vec<(String, Value)> = Vec::new();
    let mut obj = DynObject::new();
    obj.import_with(
        [
            Source::from(AttrMap::new().with("@raw", 1).with("bad-key", 2)),
            Source::bare("loose"),
        ],
        |_, key, value| {
            seen.push((key.to_string(), value));
            Ok(())
        },
    )
    .unwrap();

    // no validation, no normalization, no assignment happened
    assert_eq!(obj.field_count(), 0);
    assert_eq!(
        seen,
        vec![
            ("@raw".to_string(), Value::Int(1)),
            ("bad-key".to_string(), Value::Int(2)),
            ("loose".to_string(), Value::Null),
        ]
    );
}

#[test]
fn test_custom_handler_performs_its_own_assignment() {
    let mut obj = DynObject::new();
    obj.import_with(
        [Source::from(AttrMap::new().with("a", 1).with("b", 2))],
        |target, key, value| {
            target.set_field(format!("copied_{}", key), value);
            Ok(())
        },
    )
    .unwrap();
    assert_eq!(obj.field("copied_a"), Some(&Value::Int(1)));
    assert_eq!(obj.field("copied_b"), Some(&Value::Int(2)));
}

#[test]
fn test_custom_handler_error_stops_the_call() {
    let mut obj = DynObject::new();
    let err = obj
        .import_with(
            [Source::from(
                AttrMap::new().with("a", 1).with("stop", 2).with("c", 3),
            )],
            |target, key, value| {
                if key == "stop" {
                    return Err(ImportError::InvalidName {
                        key: key.to_string(),
                    });
                }
                target.set_field(key, value);
                Ok(())
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        ImportError::InvalidName {
            key: "stop".to_string()
        }
    );
    assert_eq!(obj.field("a"), Some(&Value::Int(1)));
    assert!(!obj.has_field("c"));
}

#[test]
fn test_custom_handler_still_folds_config_sources() {
    let mut obj = DynObject::new();
    obj.import_with(
        [
            Source::from(PolicyUpdate::new().bare_key_default(7)),
            Source::bare("slots"),
        ],
        |target, key, value| {
            target.set_field(key, value);
            Ok(())
        },
    )
    .unwrap();
    assert_eq!(obj.field("slots"), Some(&Value::Int(7)));
    assert_eq!(
        obj.policy().unwrap().bare_key_default,
        Some(Value::Int(7))
    );
}

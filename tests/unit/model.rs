use serde_json::json;

use super::*;

#[test]
fn every_kind_round_trips_through_its_name() {
    for kind in EffectKind::ALL {
        assert_eq!(EffectKind::from_name(kind.name()), Some(kind));
        assert_eq!(EffectSpec::with_defaults(kind).kind(), kind);
    }
}

#[test]
fn names_match_exactly() {
    assert_eq!(EffectKind::from_name("sepia"), Some(EffectKind::Sepia));
    assert_eq!(EffectKind::from_name("Invert"), None);
    assert_eq!(EffectKind::from_name(" sepia "), None);
    assert_eq!(EffectKind::from_name("spin-cube"), None);
    assert_eq!(EffectKind::from_name("melt"), None);
    assert!(matches!(
        "melt".parse::<EffectKind>(),
        Err(RasterFxError::UnsupportedEffect(name)) if name == "melt"
    ));
}

#[test]
fn missing_params_use_defaults() {
    assert_eq!(
        parse_effect(&json!({ "type": "posterize" })).unwrap(),
        EffectSpec::Posterize { levels: 4 }
    );
    assert_eq!(
        parse_effect(&json!({ "type": "brightness" })).unwrap(),
        EffectSpec::Brightness { amount: 40 }
    );
    assert_eq!(
        parse_effect(&json!({ "type": "contrast" })).unwrap(),
        EffectSpec::Contrast { amount: 1.5 }
    );
    assert_eq!(
        parse_effect(&json!({ "type": "vhs" })).unwrap(),
        EffectSpec::Vhs { strength: 3 }
    );
    assert_eq!(
        parse_effect(&json!({ "type": "pixelate" })).unwrap(),
        EffectSpec::Pixelate { size: 10 }
    );
}

#[test]
fn explicit_params_are_read() {
    assert_eq!(
        parse_effect(&json!({ "type": "posterize", "levels": 2 })).unwrap(),
        EffectSpec::Posterize { levels: 2 }
    );
    assert_eq!(
        parse_effect(&json!({ "kind": "brightness", "amount": -30 })).unwrap(),
        EffectSpec::Brightness { amount: -30 }
    );
    assert_eq!(
        parse_effect(&json!({ "type": "contrast", "amount": 0.5 })).unwrap(),
        EffectSpec::Contrast { amount: 0.5 }
    );
    assert_eq!(
        parse_effect(&json!({ "type": "vhs", "strength": 7.9 })).unwrap(),
        EffectSpec::Vhs { strength: 7 }
    );
}

#[test]
fn angles_accept_radians_or_degrees() {
    assert_eq!(
        parse_effect(&json!({ "type": "rotate", "angle": 1.25 })).unwrap(),
        EffectSpec::Rotate { angle: 1.25 }
    );
    let EffectSpec::SpinCube { angle } =
        parse_effect(&json!({ "type": "spin_cube", "angle_deg": 90 })).unwrap()
    else {
        panic!("expected spin_cube");
    };
    assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert_eq!(
        parse_effect(&json!({ "type": "rotate" })).unwrap(),
        EffectSpec::Rotate { angle: 0.0 }
    );
}

#[test]
fn malformed_params_are_validation_errors() {
    for bad in [
        json!({ "type": "posterize", "levels": 0 }),
        json!({ "type": "posterize", "levels": 257 }),
        json!({ "type": "pixelate", "size": 0 }),
        json!({ "type": "pixelate", "size": -3 }),
        json!({ "type": "brightness", "amount": "lots" }),
        json!({ "type": "contrast", "amount": null }),
        json!({ "type": "vhs", "strength": 1e12 }),
    ] {
        let err = parse_effect(&bad).unwrap_err();
        assert!(matches!(err, RasterFxError::Validation(_)), "{bad}: {err}");
    }
}

#[test]
fn malformed_objects_are_rejected() {
    assert!(matches!(
        parse_effect(&json!("invert")),
        Err(RasterFxError::Validation(_))
    ));
    assert!(matches!(
        parse_effect(&json!({ "levels": 3 })),
        Err(RasterFxError::Validation(_))
    ));
    assert!(matches!(
        parse_effect(&json!({ "type": 5 })),
        Err(RasterFxError::Validation(_))
    ));
    assert!(matches!(
        parse_effect(&json!({ "type": "wobble" })),
        Err(RasterFxError::UnsupportedEffect(_))
    ));
}

#[test]
fn specs_serialize_to_wire_shape() {
    let v = serde_json::to_value(EffectSpec::Posterize { levels: 4 }).unwrap();
    assert_eq!(v, json!({ "type": "posterize", "levels": 4 }));
    let v = serde_json::to_value(EffectSpec::SpinCube { angle: 0.5 }).unwrap();
    assert_eq!(v, json!({ "type": "spin_cube", "angle": 0.5 }));

    let back = parse_effect(&v).unwrap();
    assert_eq!(back, EffectSpec::SpinCube { angle: 0.5 });
}

#[test]
fn miscased_wire_type_is_unsupported() {
    assert!(matches!(
        parse_effect(&json!({ "type": "Invert" })),
        Err(RasterFxError::UnsupportedEffect(name)) if name == "Invert"
    ));
}

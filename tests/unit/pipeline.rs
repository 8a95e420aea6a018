use serde_json::json;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn sample_image() -> PixelBuffer {
    PixelBuffer::from_fn(12, 12, |x, y| {
        [(x * 20) as u8, (y * 20) as u8, ((x ^ y) * 15) as u8, 255]
    })
    .unwrap()
}

#[test]
fn empty_list_returns_input_unchanged() {
    let img = sample_image();
    let out = apply(img.clone(), &[], &mut rng()).unwrap();
    assert_eq!(out.as_raw(), img.as_raw());
}

#[test]
fn steps_apply_in_order() {
    let img = sample_image();
    let a = apply(
        img.clone(),
        &[EffectSpec::Brightness { amount: 100 }, EffectSpec::Invert],
        &mut rng(),
    )
    .unwrap();
    let b = apply(
        img.clone(),
        &[EffectSpec::Invert, EffectSpec::Brightness { amount: 100 }],
        &mut rng(),
    )
    .unwrap();
    assert_ne!(a, b);
    assert_eq!(a, color::invert(&color::brightness(&img, 100)));
}

#[test]
fn every_effect_kind_dispatches() {
    let img = sample_image();
    for kind in crate::model::EffectKind::ALL {
        let spec = EffectSpec::with_defaults(kind);
        let out = apply_one(&img, &spec, &mut rng()).unwrap();
        assert_eq!(out.dimensions(), img.dimensions(), "{kind}");
    }
}

#[test]
fn skip_policy_drops_unknown_names() {
    let wire = json!([{ "type": "invert" }, { "type": "melt" }, { "type": "sepia" }]);
    let specs = parse_effect_list(&wire, UnknownEffectPolicy::Skip).unwrap();
    assert_eq!(specs, vec![EffectSpec::Invert, EffectSpec::Sepia]);
}

#[test]
fn reject_policy_fails_on_unknown_names() {
    let wire = json!([{ "type": "invert" }, { "type": "melt" }]);
    let err = parse_effect_list(&wire, UnknownEffectPolicy::Reject).unwrap_err();
    assert!(matches!(err, RasterFxError::UnsupportedEffect(name) if name == "melt"));
}

#[test]
fn bad_params_fail_regardless_of_policy() {
    let wire = json!([{ "type": "pixelate", "size": 0 }]);
    assert!(parse_effect_list(&wire, UnknownEffectPolicy::Skip).is_err());
    assert!(parse_effect_list(&json!({ "type": "invert" }), UnknownEffectPolicy::Skip).is_err());
}

#[test]
fn seeded_pipelines_are_reproducible() {
    let pipeline = EffectPipeline::new(PipelineOpts::default().with_seed(9)).unwrap();
    let specs = [EffectSpec::Noise, EffectSpec::Blur, EffectSpec::Noise];
    let a = pipeline.run(sample_image(), &specs).unwrap();
    let b = pipeline.run(sample_image(), &specs).unwrap();
    assert_eq!(a, b);
}

#[test]
fn thread_count_does_not_change_output() {
    let specs = [
        EffectSpec::Swirl,
        EffectSpec::Vhs { strength: 5 },
        EffectSpec::Emboss,
        EffectSpec::Noise,
        EffectSpec::Pixelate { size: 3 },
    ];
    let one = EffectPipeline::new(PipelineOpts::default().with_seed(3).with_threads(1))
        .unwrap()
        .run(sample_image(), &specs)
        .unwrap();
    let four = EffectPipeline::new(PipelineOpts::default().with_seed(3).with_threads(4))
        .unwrap()
        .run(sample_image(), &specs)
        .unwrap();
    assert_eq!(one, four);
}

#[test]
fn zero_threads_is_rejected() {
    let err = EffectPipeline::new(PipelineOpts::default().with_threads(0)).err();
    assert!(matches!(err, Some(RasterFxError::Validation(_))));
}

#[test]
fn pipeline_parse_uses_configured_policy() {
    let strict = EffectPipeline::new(
        PipelineOpts::default().with_unknown_effects(UnknownEffectPolicy::Reject),
    )
    .unwrap();
    assert!(strict.parse(&json!([{ "type": "nope" }])).is_err());

    let lenient = EffectPipeline::new(PipelineOpts::default()).unwrap();
    assert!(lenient.parse(&json!([{ "type": "nope" }])).unwrap().is_empty());
}

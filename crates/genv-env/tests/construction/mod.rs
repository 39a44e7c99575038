// tests/construction/mod.rs
use crate::*;

#[test]
fn test_bindings_are_reachable_by_canonical_key() {
    let fx = SequenceFixture::new();
    let env = fx.env();

    assert_eq!(env.map_param_into_context(&GenericTypeParamType::canonical_at(0, 0)), fx.arena.ty(fx.t));
    assert_eq!(env.map_param_into_context(&param("U", 0, 1)), fx.arena.ty(fx.u));
    assert!(env.contains_primary_archetype(fx.t));
    assert!(env.contains_primary_archetype(fx.u));
    assert!(!env.contains_primary_archetype(fx.t_element));
    assert!(!env.contains_primary_archetype(fx.stranger));
}

#[test]
fn test_empty_mapping_is_rejected() {
    let fx = SequenceFixture::new();
    let err = GenericEnvironment::try_new(&fx.signature, &fx.arena, Vec::new()).unwrap_err();
    assert_eq!(err, EnvironmentError::EmptyMapping);
}

#[test]
#[should_panic(expected = "Empty mapping")]
fn test_empty_mapping_aborts() {
    let fx = SequenceFixture::new();
    GenericEnvironment::new(&fx.signature, &fx.arena, Vec::new());
}

#[test]
fn test_mapping_must_cover_every_parameter() {
    let fx = SequenceFixture::new();
    let err = GenericEnvironment::try_new(&fx.signature, &fx.arena, vec![(param("T", 0, 0), fx.arena.ty(fx.t))])
        .unwrap_err();
    assert_eq!(
        err,
        EnvironmentError::ShapeMismatch { what: "generic parameter bindings", expected: 2, found: 1 }
    );
}

#[test]
fn test_sugared_and_canonical_keys_collide() {
    let fx = SequenceFixture::new();
    let err = GenericEnvironment::try_new(
        &fx.signature,
        &fx.arena,
        vec![
            (param("T", 0, 0), fx.arena.ty(fx.t)),
            (GenericTypeParamType::canonical_at(0, 0), fx.arena.ty(fx.u)),
        ],
    )
    .unwrap_err();
    assert_eq!(err, EnvironmentError::DuplicateKey { param: "τ_0_0".to_string() });
}

#[test]
fn test_aliased_parameters_are_all_kept() {
    let fx = SequenceFixture::new();
    let shared = fx.arena.ty(fx.t);
    let env = GenericEnvironment::new(
        &fx.signature,
        &fx.arena,
        vec![(param("U", 0, 1), shared.clone()), (param("T", 0, 0), shared.clone())],
    );

    assert_eq!(env.aliased_params(fx.t), &[param("T", 0, 0), param("U", 0, 1)]);
    assert_eq!(env.map_type_out_of_context(&fx.module, &shared), fx.t_ty());
}

#[test]
fn test_alias_policy_picks_the_reported_parameter() {
    let fx = SequenceFixture::new();
    let shared = fx.arena.ty(fx.t);
    let config = EnvironmentConfig::from_toml_str(r#"alias-policy = "highest-index""#).unwrap();
    let env = GenericEnvironment::try_with_config(
        &fx.signature,
        &fx.arena,
        vec![(param("T", 0, 0), shared.clone()), (param("U", 0, 1), shared.clone())],
        &config,
    )
    .unwrap();

    assert_eq!(env.map_type_out_of_context(&fx.module, &shared), fx.u_ty());
}

#[test]
fn test_round_trip_verification_accepts_complete_arena() {
    let fx = SequenceFixture::new();
    let config = EnvironmentConfig { verify_round_trip: true, ..EnvironmentConfig::default() };
    let env = GenericEnvironment::try_with_config(&fx.signature, &fx.arena, fx.bindings(), &config).unwrap();
    assert_eq!(env.generic_params().len(), 2);
}

#[test]
fn test_sugared_type_recovers_declared_name() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let sugared = env.sugared_type(&GenericTypeParamType::canonical_at(0, 1));
    assert_eq!(sugared.to_string(), "U");
    assert!(std::ptr::eq(sugared, &fx.signature.generic_params()[1]));
}

#[test]
#[should_panic(expected = "Missing parameter")]
fn test_sugared_type_of_undeclared_parameter_aborts() {
    let fx = SequenceFixture::new();
    fx.env().sugared_type(&GenericTypeParamType::canonical_at(1, 0));
}

#[test]
#[should_panic(expected = "Foreign parameter")]
fn test_foreign_parameter_aborts() {
    let fx = SequenceFixture::new();
    fx.env().map_param_into_context(&param("V", 1, 0));
}

#[test]
fn test_registry_applies_shared_config() {
    let fx = SequenceFixture::new();
    let shared = fx.arena.ty(fx.u);
    let mut envs = GenericEnvironments::new(EnvironmentConfig { alias_policy: AliasPolicy::HighestIndex, ..Default::default() });
    let id = envs.create(&fx.signature, &fx.arena, vec![(param("T", 0, 0), shared.clone()), (param("U", 0, 1), shared.clone())]);

    assert_eq!(envs[id].map_type_out_of_context(&fx.module, &shared), fx.u_ty());
}

#[test]
fn test_same_index_in_another_arena_is_not_primary() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let mut other = ArchetypeArena::new();
    let x = other.new_primary("X", vec![]);

    assert_eq!(x.index, fx.t.index);
    assert!(!env.contains_primary_archetype(x));
    assert!(env.aliased_params(x).is_empty());
}

#[test]
fn test_binding_to_another_arenas_archetype_is_rejected() {
    let fx = SequenceFixture::new();
    let mut other = ArchetypeArena::new();
    let x = other.new_primary("X", vec![]);

    let mut envs = GenericEnvironments::default();
    let err = envs
        .try_create(&fx.signature, &fx.arena, vec![(param("T", 0, 0), other.ty(x)), (param("U", 0, 1), fx.arena.ty(fx.u))])
        .unwrap_err();
    assert_eq!(err, EnvironmentError::ForeignType { ty: "$X".to_string() });
    assert!(envs.is_empty());
}

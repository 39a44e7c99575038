// tests/substitution_maps/mod.rs
use crate::*;
use expect_test::expect;

#[test]
fn test_positional_substitutions_bind_archetypes() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let map = env.substitution_map(&fx.module, &fx.bytes_substitutions());

    assert_eq!(map.len(), 3);
    assert_eq!(map.archetypes(), vec![fx.t, fx.u, fx.t_element]);
    assert_eq!(map.replacement(fx.t), Some(&Ty::named("Bytes", vec![])));
    assert_eq!(map.replacement(fx.u), Some(&bool_ty()));
    assert_eq!(map.replacement(fx.t_element), Some(&i32_ty()));
    assert!(matches!(map.lookup_conformance(fx.t, fx.sequence), Some(ProtocolConformanceRef::Concrete(_))));
    assert_eq!(map.lookup_conformance(fx.t_element, fx.hashable), Some(&ProtocolConformanceRef::Abstract(fx.hashable)));
    assert!(map.conformances(fx.u).is_empty());
}

#[test]
fn test_applying_map_to_contextual_type() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let map = env.substitution_map(&fx.module, &fx.bytes_substitutions());
    let contextual = env.map_type_into_context(&fx.module, &Ty::function(vec![fx.t_ty(), fx.t_element_ty()], fx.u_ty()));

    assert_eq!(map.apply(&fx.module, &fx.arena, &contextual).to_string(), "(Bytes, i32) -> bool");
}

#[test]
fn test_dump_lists_archetypes_in_order() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let map = env.substitution_map(&fx.module, &fx.bytes_substitutions());

    expect![[r#"
        $T := Bytes
          conforms Bytes: p0
        $U := bool
        $T.Element := i32
          conforms abstract p1
    "#]]
    .assert_eq(&map.dump(&fx.arena));
}

#[test]
fn test_substitution_count_must_match() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let mut subs = fx.bytes_substitutions();
    subs.pop();

    let err = env.try_substitution_map(&fx.module, &subs).unwrap_err();
    assert_eq!(err, EnvironmentError::ShapeMismatch { what: "substitutions", expected: 3, found: 2 });
}

#[test]
#[should_panic(expected = "Shape mismatch: expected 3 substitutions, found 4")]
fn test_extra_substitution_aborts() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let mut subs = fx.bytes_substitutions();
    subs.push(Substitution::plain(i32_ty()));
    env.substitution_map(&fx.module, &subs);
}

#[test]
fn test_dependent_type_bound_concretely_is_not_contextual() {
    let fx = SequenceFixture::new();
    let env = GenericEnvironment::new(
        &fx.signature,
        &fx.arena,
        vec![(param("T", 0, 0), fx.arena.ty(fx.t)), (param("U", 0, 1), Ty::primitive(PrimitiveType::I64))],
    );

    let err = env.try_substitution_map(&fx.module, &fx.bytes_substitutions()).unwrap_err();
    assert_eq!(err, EnvironmentError::NotContextual { ty: "τ_0_1".to_string() });
}

#[test]
fn test_same_type_projection_records_extra_parent() {
    let fx = SameTypeFixture::new();
    let env = fx.env();
    assert_eq!(fx.signature.dependent_type_count(), 3);

    let subs = vec![
        Substitution::plain(Ty::named("Box", vec![])),
        Substitution::plain(Ty::named("Crate", vec![])),
        Substitution::plain(i32_ty()),
    ];
    let map = env.substitution_map(&fx.module, &subs);

    assert_eq!(map.parents(fx.t_a), &[ParentEdge { parent: fx.u, assoc: fx.b.clone() }]);
    assert!(map.parents(fx.t).is_empty());
    assert!(map.parents(fx.u).is_empty());
    assert_eq!(map.replacement(fx.t_a), Some(&i32_ty()));
}

#[test]
fn test_same_type_dump_shows_parent_edge() {
    let fx = SameTypeFixture::new();
    let env = fx.env();
    let subs = vec![
        Substitution::plain(Ty::named("Box", vec![])),
        Substitution::plain(Ty::named("Crate", vec![])),
        Substitution::plain(i32_ty()),
    ];

    expect![[r#"
        $T := Box
        $U := Crate
        $T.A := i32
          parent $U.B
    "#]]
    .assert_eq(&env.substitution_map(&fx.module, &subs).dump(&fx.arena));
}

#[test]
fn test_both_sides_record_edges_when_canonical_parent_is_elsewhere() {
    let mut module = Module::new("main");
    let p = module.add_protocol("P", &["A"]);
    let q = module.add_protocol("Q", &["B"]);
    let s = module.add_protocol("S", &["C"]);
    let r = module.add_protocol("R", &[]);
    let a = module.associated_type(p, "A");
    let b = module.associated_type(q, "B");
    let c = module.associated_type(s, "C");

    let t = Ty::param(param("T", 0, 0));
    let u = Ty::param(param("U", 0, 1));
    let w = Ty::param(param("W", 0, 2));
    let signature = GenericSignature::new(
        vec![param("T", 0, 0), param("U", 0, 1), param("W", 0, 2)],
        vec![
            Requirement::Conformance { subject: t.clone(), protocol: p },
            Requirement::Conformance { subject: u.clone(), protocol: q },
            Requirement::Conformance { subject: w.clone(), protocol: s },
            Requirement::Conformance { subject: Ty::dependent_member(w, c.clone()), protocol: r },
            Requirement::SameType { first: Ty::dependent_member(t, a.clone()), second: Ty::dependent_member(u, b.clone()) },
        ],
    );

    let mut arena = ArchetypeArena::new();
    let t_arch = arena.new_primary("T", vec![p]);
    let u_arch = arena.new_primary("U", vec![q]);
    let w_arch = arena.new_primary("W", vec![s]);
    let w_c = arena.new_nested(w_arch, c, vec![r]);
    arena.alias_nested(t_arch, "A", w_c);
    arena.alias_nested(u_arch, "B", w_c);

    let env = GenericEnvironment::new(
        &signature,
        &arena,
        vec![
            (param("T", 0, 0), arena.ty(t_arch)),
            (param("U", 0, 1), arena.ty(u_arch)),
            (param("W", 0, 2), arena.ty(w_arch)),
        ],
    );
    let subs: Vec<Substitution> = ["Left", "Right", "Holder"]
        .iter()
        .map(|name| Substitution::plain(Ty::named(*name, vec![])))
        .chain(std::iter::once(Substitution::plain(i32_ty())))
        .collect();
    let map = env.substitution_map(&module, &subs);

    assert_eq!(
        map.parents(w_c),
        &[ParentEdge { parent: t_arch, assoc: a }, ParentEdge { parent: u_arch, assoc: b }]
    );
    assert!(map.parents(w_arch).is_empty());
    assert_eq!(map.replacement(w_c), Some(&i32_ty()));
}

#[test]
fn test_inner_bindings_extend_outer_map() {
    let mut fx = SequenceFixture::new();
    let v_arch = fx.arena.new_primary("V", vec![]);
    let inner_signature = GenericSignature::new(vec![param("V", 1, 0)], vec![]);
    let outer_env = fx.env();
    let inner_env = GenericEnvironment::new(&inner_signature, &fx.arena, vec![(param("V", 1, 0), fx.arena.ty(v_arch))]);

    let mut map = outer_env.substitution_map(&fx.module, &fx.bytes_substitutions());
    inner_env
        .substitution_map_into(&fx.module, &[Substitution::plain(Ty::primitive(PrimitiveType::String))], &mut map)
        .unwrap();

    assert_eq!(map.len(), 4);
    assert_eq!(map.replacement(fx.t_element), Some(&i32_ty()));
    assert_eq!(map.replacement(v_arch), Some(&Ty::primitive(PrimitiveType::String)));
    let mixed = Ty::tuple(vec![
        outer_env.map_type_into_context(&fx.module, &fx.t_element_ty()),
        inner_env.map_param_into_context(&param("V", 1, 0)),
        outer_env.map_type_into_context(&fx.module, &fx.u_ty()),
    ]);
    assert_eq!(map.apply(&fx.module, &fx.arena, &mixed).to_string(), "(i32, string, bool)");
}

#[test]
fn test_failed_extension_leaves_map_untouched() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let mut map = env.substitution_map(&fx.module, &fx.bytes_substitutions());
    let before = map.clone();

    let concrete_env = GenericEnvironment::new(
        &fx.signature,
        &fx.arena,
        vec![(param("T", 0, 0), fx.arena.ty(fx.t)), (param("U", 0, 1), Ty::primitive(PrimitiveType::I64))],
    );
    let err = concrete_env.substitution_map_into(&fx.module, &fx.bytes_substitutions(), &mut map).unwrap_err();

    assert_eq!(err, EnvironmentError::NotContextual { ty: "τ_0_1".to_string() });
    assert_eq!(map, before);
}

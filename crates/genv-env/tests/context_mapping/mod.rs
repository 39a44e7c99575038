// tests/context_mapping/mod.rs
use crate::*;

#[test]
fn test_into_context_rewrites_params_and_projections() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let interface = Ty::function(
        vec![fx.t_ty(), Ty::named("Array", vec![fx.t_element_ty()])],
        fx.u_ty(),
    );

    let contextual = env.map_type_into_context(&fx.module, &interface);
    assert_eq!(contextual.to_string(), "($T, Array<$T.Element>) -> $U");
    assert!(!contextual.has_type_parameter());
}

#[test]
fn test_out_of_context_restores_sugar() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let contextual = Ty::tuple(vec![fx.arena.ty(fx.t_element), fx.arena.ty(fx.u)]);

    let interface = env.map_type_out_of_context(&fx.module, &contextual);
    assert_eq!(interface.to_string(), "(T.Element, U)");
    assert!(!interface.has_archetype());
}

#[test]
fn test_round_trip_through_context() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let interface = Ty::named("Dict", vec![fx.t_element_ty(), Ty::function(vec![fx.u_ty()], bool_ty())]);

    let back = env.map_type_out_of_context(&fx.module, &env.map_type_into_context(&fx.module, &interface));
    assert_eq!(back, interface);
}

#[test]
fn test_lowered_types_are_reached() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let lowered = Ty::lowered(LoweredConvention::Thick, vec![fx.t_ty()], vec![Ty::primitive(PrimitiveType::Unit)]);

    let contextual = env.map_type_into_context(&fx.module, &lowered);
    assert_eq!(contextual.to_string(), "@Thick ($T) -> (())");
    assert_eq!(env.map_type_out_of_context(&fx.module, &contextual), lowered);
}

#[test]
fn test_concrete_projection_uses_module_witness() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let array_element = Ty::dependent_member(Ty::named("Array", vec![fx.t_ty()]), fx.element.clone());
    let bytes_element = Ty::dependent_member(Ty::named("Bytes", vec![]), fx.element.clone());

    assert_eq!(env.map_type_into_context(&fx.module, &array_element), fx.arena.ty(fx.t));
    assert_eq!(env.map_type_into_context(&fx.module, &bytes_element), i32_ty());
}

#[test]
fn test_error_types_suppress_unresolved_parameter_abort() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let broken = Ty::tuple(vec![Ty::error(), Ty::param(param("V", 1, 0))]);

    let contextual = env.map_type_into_context(&fx.module, &broken);
    assert!(contextual.has_error());
    assert!(contextual.has_type_parameter());
}

#[test]
fn test_missing_nested_archetype_yields_error_type() {
    let mut fx = SequenceFixture::new();
    let iterator = fx.module.add_protocol("Iterable", &["Iterator"]);
    let iterator_assoc = fx.module.associated_type(iterator, "Iterator");
    let env = fx.env();

    let contextual = env.map_type_into_context(&fx.module, &Ty::dependent_member(fx.t_ty(), iterator_assoc));
    assert!(contextual.is_error());
}

#[test]
#[should_panic(expected = "Unresolved type parameter")]
fn test_foreign_parameter_in_type_aborts() {
    let fx = SequenceFixture::new();
    fx.env().map_type_into_context(&fx.module, &Ty::named("Array", vec![Ty::param(param("V", 1, 0))]));
}

#[test]
#[should_panic(expected = "Foreign type")]
fn test_foreign_archetype_aborts() {
    let fx = SequenceFixture::new();
    fx.env().map_type_out_of_context(&fx.module, &Ty::tuple(vec![fx.arena.ty(fx.t), fx.arena.ty(fx.stranger)]));
}

#[test]
fn test_concrete_binding_maps_one_way() {
    let fx = SequenceFixture::new();
    let env = GenericEnvironment::new(
        &fx.signature,
        &fx.arena,
        vec![(param("T", 0, 0), fx.arena.ty(fx.t)), (param("U", 0, 1), Ty::primitive(PrimitiveType::I64))],
    );

    assert_eq!(env.map_type_into_context(&fx.module, &fx.u_ty()), Ty::primitive(PrimitiveType::I64));
    assert_eq!(
        env.map_type_out_of_context(&fx.module, &Ty::primitive(PrimitiveType::I64)),
        Ty::primitive(PrimitiveType::I64)
    );
}

#[test]
#[should_panic(expected = "Foreign type: `$X`")]
fn test_same_index_archetype_of_another_arena_aborts() {
    let fx = SequenceFixture::new();
    let mut other = ArchetypeArena::new();
    let x = other.new_primary("X", vec![]);
    assert_eq!(x.index, fx.t.index);
    fx.env().map_type_out_of_context(&fx.module, &other.ty(x));
}

// tests/concurrency/mod.rs
use crate::*;
use std::thread;

#[test]
fn test_environment_is_queried_from_many_threads() {
    let fx = SequenceFixture::new();
    let env = fx.env();
    let interface = Ty::named("Dict", vec![fx.t_element_ty(), fx.u_ty()]);
    let expected = env.map_type_into_context(&fx.module, &interface);

    let results: Vec<Ty> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| env.map_type_into_context(&fx.module, &interface)))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(results.iter().all(|ty| *ty == expected));
}

#[test]
fn test_registry_environments_are_shared_read_only() {
    let fx = SequenceFixture::new();
    let mut envs = GenericEnvironments::default();
    let id = envs.create(&fx.signature, &fx.arena, fx.bindings());
    let subs = fx.bytes_substitutions();

    let dumps: Vec<String> = thread::scope(|scope| {
        let envs = &envs;
        let handles: Vec<_> = (0..3)
            .map(|_| scope.spawn(|| envs[id].substitution_map(&fx.module, &subs).dump(&fx.arena)))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert!(dumps.windows(2).all(|pair| pair[0] == pair[1]));
}

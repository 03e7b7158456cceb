//! # Registry Property Tests
//!
//! Drives a registry through long seeded sequences of random operations and
//! checks it against a plain model after every step:
//! - sparse-set integrity of every pool
//! - component masks agree with pool membership
//! - views yield exactly the entities holding every type
//!
//! Also covers the 64-type capacity boundary.

use std::collections::BTreeSet;

use bismuth_core::{
    Component, ComponentPool, EntityId, Registry, RegistryError, INVALID_INDEX,
    MAX_COMPONENT_TYPES,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Alpha(u32);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Beta(u32);

#[derive(Debug, Clone, PartialEq)]
struct Gamma(String);

/// Expected contents of the registry.
#[derive(Default)]
struct Model {
    alpha: Vec<Option<u32>>,
    beta: Vec<Option<u32>>,
    gamma: Vec<Option<String>>,
}

impl Model {
    fn create(&mut self) {
        self.alpha.push(None);
        self.beta.push(None);
        self.gamma.push(None);
    }

    fn clear(&mut self, index: usize) {
        self.alpha[index] = None;
        self.beta[index] = None;
        self.gamma[index] = None;
    }
}

fn assert_pool_integrity<C: Component>(pool: &ComponentPool<C>) {
    assert_eq!(pool.entities().len(), pool.components().len());
    assert_eq!(pool.len(), pool.entities().len());
    for (dense, &entity) in pool.entities().iter().enumerate() {
        assert_eq!(
            pool.dense_index(entity),
            Some(dense),
            "entity {entity} points at the wrong dense slot"
        );
    }
}

fn assert_type_agrees<C, V, F>(registry: &Registry, expected: &[Option<V>], value_of: F)
where
    C: Component,
    V: PartialEq + std::fmt::Debug,
    F: Fn(&C) -> V,
{
    let slot = registry.slot_of::<C>();
    let pool = registry.pool::<C>();
    if let Some(pool) = pool {
        assert_pool_integrity(pool);
        assert_eq!(pool.len(), expected.iter().flatten().count());
    } else {
        assert!(expected.iter().all(Option::is_none));
    }

    for (index, want) in expected.iter().enumerate() {
        let entity = EntityId::new(u32::try_from(index).unwrap());
        let has = registry.has_component::<C>(entity);
        assert_eq!(has, want.is_some(), "membership of {entity}");

        let in_mask = match (slot, registry.component_mask(entity)) {
            (Some(slot), Some(mask)) => mask.contains(slot),
            _ => false,
        };
        assert_eq!(in_mask, has, "mask disagrees with pool for {entity}");

        match want {
            Some(want) => assert_eq!(&value_of(registry.get_component::<C>(entity).unwrap()), want),
            None => assert!(matches!(
                registry.get_component::<C>(entity),
                Err(RegistryError::ComponentNotFound { .. })
            )),
        }
    }
}

fn assert_matches_model(registry: &mut Registry, model: &Model) {
    assert_eq!(registry.entity_count(), model.alpha.len());
    assert_type_agrees::<Alpha, _, _>(registry, &model.alpha, |a| a.0);
    assert_type_agrees::<Beta, _, _>(registry, &model.beta, |b| b.0);
    assert_type_agrees::<Gamma, _, _>(registry, &model.gamma, |g| g.0.clone());

    let expected: BTreeSet<u32> = (0..model.alpha.len())
        .filter(|&i| model.alpha[i].is_some() && model.beta[i].is_some())
        .map(|i| u32::try_from(i).unwrap())
        .collect();
    let view = registry.view::<(Alpha, Beta)>().unwrap();
    let mut seen = BTreeSet::new();
    for (entity, (alpha, beta)) in &view {
        assert!(seen.insert(entity.raw()), "{entity} yielded twice");
        assert_eq!(Some(alpha.0), model.alpha[entity.index()]);
        assert_eq!(Some(beta.0), model.beta[entity.index()]);
    }
    assert_eq!(seen, expected);
}

fn run_interleaving(seed: u64, steps: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut registry = Registry::new();
    let mut model = Model::default();

    for step in 0..steps {
        if model.alpha.is_empty() || rng.gen_bool(0.05) {
            registry.create_entity();
            model.create();
            continue;
        }

        let index = rng.gen_range(0..model.alpha.len());
        let entity = EntityId::new(u32::try_from(index).unwrap());
        let value: u32 = rng.gen();

        match rng.gen_range(0..7) {
            0 => {
                registry.emplace_component(entity, Alpha(value)).unwrap();
                model.alpha[index] = Some(value);
            }
            1 => {
                registry.emplace_component(entity, Beta(value)).unwrap();
                model.beta[index] = Some(value);
            }
            2 => {
                registry.emplace_component(entity, Gamma(value.to_string())).unwrap();
                model.gamma[index] = Some(value.to_string());
            }
            3 => {
                let removed = registry.remove_component::<Alpha>(entity).map(|a| a.0);
                assert_eq!(removed, model.alpha[index].take());
            }
            4 => {
                let removed = registry.remove_component::<Beta>(entity).map(|b| b.0);
                assert_eq!(removed, model.beta[index].take());
            }
            5 => {
                let removed = registry.remove_component::<Gamma>(entity).map(|g| g.0);
                assert_eq!(removed, model.gamma[index].take());
            }
            _ => {
                registry.remove_entity(entity);
                model.clear(index);
            }
        }

        if step % 16 == 0 {
            assert_matches_model(&mut registry, &model);
        }
    }
    assert_matches_model(&mut registry, &model);
}

#[test]
fn test_random_interleavings_match_model() {
    for seed in [1, 42, 0xB15_0000, 7_777_777] {
        run_interleaving(seed, 2_000);
    }
}

#[test]
fn test_fresh_entity_is_empty() {
    let mut registry = Registry::new();
    let first = registry.create_entity();
    registry.emplace_component(first, Alpha(1)).unwrap();

    let second = registry.create_entity();
    assert_ne!(first, second);
    assert_eq!(second.raw(), first.raw() + 1);
    assert!(registry.component_mask(second).is_some_and(|mask| mask.is_empty()));
    assert!(!registry.has_component::<Alpha>(second));
}

#[test]
fn test_removal_is_idempotent() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.emplace_component(entity, Beta(3)).unwrap();

    assert_eq!(registry.remove_component::<Beta>(entity), Some(Beta(3)));
    assert_eq!(registry.remove_component::<Beta>(entity), None);
    registry.remove_entity(entity);
    registry.remove_entity(entity);

    assert!(registry.is_valid(entity));
    assert!(registry.pool::<Beta>().is_some_and(|pool| pool.is_empty()));
}

#[test]
fn test_teardown_keeps_other_entities() {
    let mut registry = Registry::new();
    let entities: Vec<EntityId> = (0..6).map(|_| registry.create_entity()).collect();
    for (i, &entity) in entities.iter().enumerate() {
        let value = u32::try_from(i).unwrap();
        registry.emplace_component(entity, Alpha(value)).unwrap();
        registry.emplace_component(entity, Gamma(format!("e{i}"))).unwrap();
    }

    registry.remove_entity(entities[0]);
    registry.remove_entity(entities[3]);

    for (i, &entity) in entities.iter().enumerate() {
        let alive = i != 0 && i != 3;
        assert_eq!(registry.has_component::<Alpha>(entity), alive);
        if alive {
            let gamma = registry.get_component::<Gamma>(entity).unwrap();
            assert_eq!(gamma.0, format!("e{i}"));
        }
    }
    assert_pool_integrity(registry.pool::<Alpha>().unwrap());
    assert_pool_integrity(registry.pool::<Gamma>().unwrap());
}

#[test]
fn test_dense_slot_of_absent_entity_is_invalid() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.reserve_components::<Alpha>(8).unwrap();

    let pool = registry.pool::<Alpha>().unwrap();
    assert_eq!(pool.dense_index(entity), None);
    assert_eq!(INVALID_INDEX, u32::MAX);
}

// =============================================================================
// Capacity boundary
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tag<const N: usize>;

macro_rules! emplace_tags {
    ($registry:expr, $entity:expr; $($n:literal)*) => {
        $( $registry.emplace_component($entity, Tag::<$n>).unwrap(); )*
    };
}

/// Registers `Tag<0>` to `Tag<61>` on `entity`.
fn register_62_types(registry: &mut Registry, entity: EntityId) {
    emplace_tags!(registry, entity;
        0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
        16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
        32 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47
        48 49 50 51 52 53 54 55 56 57 58 59 60 61
    );
}

#[test]
fn test_sixty_four_types_fit() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    register_62_types(&mut registry, entity);
    emplace_tags!(registry, entity; 62 63);

    assert_eq!(registry.component_type_count(), MAX_COMPONENT_TYPES);
    let mask = registry.component_mask(entity).unwrap();
    assert_eq!(mask.len(), 64);
    assert_eq!(mask.bits(), u64::MAX);
    assert!(registry.has_component::<Tag<63>>(entity));
}

#[test]
fn test_sixty_fifth_type_rejected_without_side_effects() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    register_62_types(&mut registry, entity);
    emplace_tags!(registry, entity; 62 63);

    let before = registry.component_mask(entity);
    let result = registry.emplace_component(entity, Tag::<64>).map(|_| ());
    assert!(matches!(
        result,
        Err(RegistryError::ComponentLimitExceeded { limit: 64, .. })
    ));
    assert_eq!(registry.component_type_count(), 64);
    assert_eq!(registry.component_mask(entity), before);
    assert!(registry.pool::<Tag<64>>().is_none());
    assert!(!registry.has_component::<Tag<64>>(entity));

    // Known types still work
    registry.remove_component::<Tag<5>>(entity);
    emplace_tags!(registry, entity; 5);
    assert!(registry.has_component::<Tag<5>>(entity));
}

#[test]
fn test_view_over_limit_creates_no_pools() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    register_62_types(&mut registry, entity);

    let result = registry
        .view::<(Tag<0>, Tag<62>, Tag<63>, Tag<64>)>()
        .map(|view| view.count());
    assert!(matches!(result, Err(RegistryError::ComponentLimitExceeded { .. })));
    assert_eq!(registry.component_type_count(), 62);
    assert!(registry.pool::<Tag<62>>().is_none());

    let count = registry
        .view::<(Tag<0>, Tag<62>, Tag<63>)>()
        .map(|view| view.count());
    assert_eq!(count, Ok(0));
    assert_eq!(registry.component_type_count(), 64);
}

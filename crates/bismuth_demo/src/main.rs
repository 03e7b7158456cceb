//! # Bismuth Demo
//!
//! Walks through the registry API: three entities, two components, a few
//! membership checks and a view that matches nothing.
//!
//! Usage: `bismuth_demo [registry.toml]`

use bismuth_core::{Registry, RegistryConfig, RegistryResult};
use bytemuck::{Pod, Zeroable};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
struct Position {
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, Debug)]
struct Foo {
    a: i32,
    b: i32,
}

/// Never stored on any entity.
type Flags = (bool, bool);
type Other = (i32, i32);
type Other2 = [i32; 2];

/// Frame counter kept as a registry singleton.
struct Frame(u64);

fn run(config: RegistryConfig) -> RegistryResult<()> {
    let mut registry = Registry::with_config(config);

    let entity = registry.create_entity();
    let entity2 = registry.create_entity();
    let entity3 = registry.create_entity();

    registry.emplace_component(entity, Position { x: 4, y: 2 })?;
    registry.emplace_component(entity2, Foo { a: 1, b: 2 })?;

    println!("{}", u8::from(registry.has_component::<Position>(entity)));
    println!("{}", u8::from(registry.has_component::<Flags>(entity)));
    println!("{}", u8::from(registry.has_component::<Foo>(entity3)));
    println!();

    for (matched, _) in &registry.view::<(Other, Other2, Position)>()? {
        println!("{matched}");
    }

    registry.emplace_singleton(Frame(0))?.0 += 1;

    println!("┌─ REGISTRY ───────────────────────────────────────────────┐");
    println!("│ Entities:        {}", registry.entity_count());
    println!("│ Component types: {}", registry.component_type_count());
    let position = registry.get_component::<Position>(entity)?;
    println!("│ {entity} Position: ({}, {})", position.x, position.y);
    let foo = registry.get_component::<Foo>(entity2)?;
    println!("│ {entity2} Foo:      ({}, {})", foo.a, foo.b);
    if let Some(pool) = registry.pool::<Position>() {
        println!("│ Position bytes:  {}", pool.as_bytes().len());
    }
    println!("│ Frame:           {}", registry.get_singleton::<Frame>()?.0);
    println!("└──────────────────────────────────────────────────────────┘");

    Ok(())
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match RegistryConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                println!("Error: {e}");
                return;
            }
        },
        None => RegistryConfig::default(),
    };

    if let Err(e) = run(config) {
        println!("Error: {e}");
    }
}

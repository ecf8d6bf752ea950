#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use illusion::{Container, InstantiateErrorKind, Injectable, Param, TypeCatalog, TypeDescriptor};
use std::sync::Arc;

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
struct CAAA;

impl Injectable for A {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<B>(), Param::of::<C>()], |mut args| {
            Ok(A(args.next()?, args.next()?))
        })
    }
}

impl Injectable for B {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::value().optional()], |mut args| {
            Ok(B(args.next_optional_value()?.unwrap_or(2)))
        })
    }
}

impl Injectable for C {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<CA>()], |mut args| Ok(C(args.next()?)))
    }
}

impl Injectable for CA {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<CAA>()], |mut args| Ok(CA(args.next()?)))
    }
}

impl Injectable for CAA {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([Param::of::<CAAA>()], |mut args| Ok(CAA(args.next()?)))
    }
}

impl Injectable for CAAA {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete::<Self, _, InstantiateErrorKind>([], |_| Ok(CAAA))
    }
}

#[inline]
fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with::<A>()
        .with::<B>()
        .with::<C>()
        .with::<CA>()
        .with::<CAA>()
        .with::<CAAA>()
}

#[inline]
fn container_resolve(container: &Container) {
    let _ = container.resolve_as::<A>("A").unwrap();
}

#[inline]
fn container_resolve_factory(container: &Container) {
    let _ = container.resolve_as::<A>("a").unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let container_1 = Container::with_catalog(catalog());

    let container_2 = Container::with_catalog(catalog());
    container_2.singleton_self("a");

    let container_3 = Container::with_catalog(catalog());
    container_3
        .singleton("CAAA", "CAAA")
        .singleton("CAA", "CAA")
        .singleton("CA", "CA")
        .singleton("C", "C")
        .singleton("B", "B");

    let container_4 = Container::new();
    container_4.register_factory("a", |_, container: &Container| {
        Ok::<_, InstantiateErrorKind>(A(
            Arc::new(B(2)),
            Arc::new(C(Arc::new(CA(container.resolve_as::<CAA>("caa")?)))),
        ))
    });
    container_4.singleton_factory("caa", |_, _: &Container| Ok::<_, InstantiateErrorKind>(CAA(Arc::new(CAAA))));

    c.bench_function("container_with_catalog", |b| b.iter(|| Container::with_catalog(catalog())))
        .bench_function("container_resolve_autowired", |b| b.iter(|| container_resolve(&container_1)))
        .bench_function("container_resolve_with_cache", |b| {
            b.iter(|| container_resolve_factory(&container_2))
        })
        .bench_function("container_resolve_shared_deps", |b| b.iter(|| container_resolve(&container_3)))
        .bench_function("container_resolve_factory", |b| {
            b.iter(|| container_resolve_factory(&container_4))
        })
        .bench_function("container_delete_instances", |b| {
            b.iter(|| {
                container_resolve_factory(&container_2);
                container_2.delete_instances();
            })
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

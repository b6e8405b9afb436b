//! Lookup and insert benchmarks for the prefix-trie router.
//!
//! Run with: cargo bench -p routebench-trie

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Method;

use routebench_trie::Router;

/// Generate a set of realistic API routes.
fn generate_routes(count: usize) -> Vec<(String, Method)> {
    let resources = ["users", "orders", "products", "customers", "invoices", "payments"];
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

    let mut routes = Vec::new();

    for resource in &resources {
        routes.push((format!("/{resource}"), Method::GET));
        routes.push((format!("/{resource}"), Method::POST));
        routes.push((format!("/{resource}/{{id}}"), Method::GET));
        routes.push((format!("/{resource}/{{id}}"), Method::PUT));
        routes.push((format!("/{resource}/{{id}}"), Method::DELETE));
    }

    routes.push(("/users/{userId}/orders".to_string(), Method::GET));
    routes.push(("/users/{userId}/orders/{orderId}".to_string(), Method::GET));
    routes.push(("/products/{productId}/reviews".to_string(), Method::GET));
    routes.push(("/products/{productId}/reviews/{reviewId}".to_string(), Method::GET));

    // Fill to desired count with variations
    while routes.len() < count {
        let i = routes.len();
        let resource = resources[i % resources.len()];
        let method = methods[i % methods.len()].clone();
        routes.push((format!("/api/v{}/{}", i / 10, resource), method));
    }

    routes.truncate(count);
    routes
}

fn build_router(routes: &[(String, Method)]) -> Router<usize> {
    let mut router = Router::new();
    for (i, (path, method)) in routes.iter().enumerate() {
        router
            .insert(path, method.clone(), i)
            .expect("generated routes are unique");
    }
    router
}

fn bench_router_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_lookup");

    for route_count in [10, 50, 100, 500, 1000] {
        let routes = generate_routes(route_count);
        let router = build_router(&routes);

        let cases = [
            ("static_path", "/users"),
            ("param_path", "/users/12345"),
            ("nested_param_path", "/users/12345/orders/67890"),
            ("unnormalized_path", "/users//12345/"),
            ("not_found", "/nonexistent/path/here"),
        ];

        for (name, path) in cases {
            group.bench_with_input(BenchmarkId::new(name, route_count), &router, |b, router| {
                b.iter(|| {
                    black_box(router.lookup(black_box(path), &Method::GET));
                });
            });
        }
    }

    group.finish();
}

fn bench_router_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_insert");

    for route_count in [10, 50, 100, 500] {
        let routes = generate_routes(route_count);

        group.bench_with_input(
            BenchmarkId::new("build_router", route_count),
            &routes,
            |b, routes| {
                b.iter(|| {
                    black_box(build_router(routes));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_router_lookup, bench_router_insert);
criterion_main!(benches);

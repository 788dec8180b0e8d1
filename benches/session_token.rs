//! 会话 token 签发与校验基准

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use imperial_portfolio::api::jwt::{ADMIN_ROLE, JwtService};

fn bench_issue(c: &mut Criterion) {
    let jwt = JwtService::new("bench-secret-0123456789abcdef0123", 120);
    c.bench_function("session_token/issue", |b| {
        b.iter(|| jwt.issue(black_box(ADMIN_ROLE)).expect("sign should succeed"));
    });
}

fn bench_verify(c: &mut Criterion) {
    let jwt = JwtService::new("bench-secret-0123456789abcdef0123", 120);
    let token = jwt.issue(ADMIN_ROLE).expect("sign should succeed");
    let forged = JwtService::new("another-secret", 120)
        .issue(ADMIN_ROLE)
        .expect("sign should succeed");

    let mut group = c.benchmark_group("session_token/verify");
    group.bench_function("valid", |b| {
        b.iter(|| jwt.verify_admin(black_box(&token)).expect("token should verify"));
    });
    group.bench_function("bad_signature", |b| {
        b.iter(|| assert!(jwt.verify_admin(black_box(&forged)).is_err()));
    });
    group.finish();
}

criterion_group!(benches, bench_issue, bench_verify);
criterion_main!(benches);

use std::sync::Arc;

use account_auth::{
    AccountAuthenticator, Argon2Hasher, MemoryUserStore, PasswordHasher, UserAccount,
};
use criterion::{Criterion, criterion_group, criterion_main};

/// Helper to create an authenticator with one registered account
fn setup_with_account(
    rt: &tokio::runtime::Runtime,
) -> (AccountAuthenticator<MemoryUserStore>, UserAccount) {
    let auth = AccountAuthenticator::new(Arc::new(MemoryUserStore::new()), Arc::new(Argon2Hasher))
        .expect("Failed to create authenticator");
    let account = rt
        .block_on(auth.register(UserAccount::new("benchuser", "bench@example.com"), "hunter22"))
        .expect("Failed to register benchmark account");
    (auth, account)
}

/// Benchmark Argon2 digest creation and verification
fn bench_password_hashing(c: &mut Criterion) {
    let hasher = Argon2Hasher;

    c.bench_function("argon2_hash", |b| {
        b.iter(|| hasher.hash("benchmark password").unwrap());
    });

    let digest = hasher.hash("benchmark password").unwrap();
    c.bench_function("argon2_verify", |b| {
        b.iter(|| hasher.verify("benchmark password", &digest));
    });
}

/// Benchmark session-token rotation against the in-memory store
fn bench_token_rotation(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (auth, mut account) = setup_with_account(&rt);

    c.bench_function("reset_session_token", |b| {
        b.iter(|| {
            rt.block_on(auth.reset_session_token(&mut account))
                .expect("Rotation should succeed")
        });
    });
}

/// Benchmark validation of an already-prepared candidate (no hashing cost)
fn bench_validate_prepared(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (auth, account) = setup_with_account(&rt);

    c.bench_function("validate_and_prepare_prepared", |b| {
        b.iter(|| {
            rt.block_on(auth.validate_and_prepare(account.clone(), None))
                .expect("Prepared account should validate")
        });
    });
}

criterion_group!(
    benches,
    bench_password_hashing,
    bench_token_rotation,
    bench_validate_prepared
);
criterion_main!(benches);

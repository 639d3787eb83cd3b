use criterion::{black_box, criterion_group, criterion_main, Criterion};
use srp_auth::client::SrpClientUser;
use srp_auth::server::SrpVerifier;
use srp_auth::username::Username;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("handshake", |b| {
        b.iter(|| {
            let username = Username::new(black_box("alice")).unwrap();
            let password_hash =
                black_box("$scrypt$ln=15,r=8,p=1$YWJjZGVmZ2g$bm9wcXJzdHV2");

            let verifier = SrpVerifier::from_username_and_password_hash(username, password_hash);
            let challenge = verifier.into_challenge();

            let client = SrpClientUser::new(Username::new("alice").unwrap(), password_hash)
                .into_challenge(
                    challenge.salt().clone(),
                    challenge.server_public_key().clone(),
                )
                .unwrap();

            let (_session, server_proof) = challenge
                .verify(
                    client.client_public_key().clone(),
                    client.client_proof().clone(),
                )
                .unwrap();

            let _client = client.verify_server_proof(server_proof).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

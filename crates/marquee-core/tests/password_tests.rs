use marquee_core::auth::{hash_password, verify_password};

#[test]
fn test_hash_and_verify() {
    let hash = hash_password("secret123").unwrap();

    assert_ne!(hash, "secret123");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("secret123", &hash).unwrap());
    assert!(!verify_password("secret124", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let a = hash_password("same-password").unwrap();
    let b = hash_password("same-password").unwrap();
    assert_ne!(a, b);
}

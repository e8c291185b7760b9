//! Integration tests for tollgate-jwt

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tollgate_jwt::*;

const SECRET: &str = "test_secret_key_32_bytes_long!!!";

fn codec() -> JwtService {
    JwtService::new(JwtConfig::new(SECRET)).unwrap()
}

fn codec_with_leeway(leeway: u64) -> JwtService {
    JwtService::new(JwtConfig::new(SECRET).with_leeway(leeway)).unwrap()
}

#[test]
fn test_round_trip_preserves_identity() {
    let codec = JwtService::new(
        JwtConfig::new(SECRET).with_expiration(Duration::from_secs(1800)),
    )
    .unwrap();

    for (subject, org) in [
        ("user-1", Some("org-1")),
        ("7f0c2a9e-1b44-4d0e-9a55-3c2f", Some("tenant/with/slashes")),
        ("ユーザー", None),
    ] {
        let token = codec.issue(subject, org).unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.subject_id, subject);
        assert_eq!(claims.organization_id.as_deref(), org);
        assert_eq!(claims.expires_at, claims.issued_at + 1800);
        assert!(claims.expires_at > claims.issued_at);
    }
}

#[test]
fn test_superadmin_round_trip() {
    let codec = codec();

    let token = codec.issue("admin-1", None).unwrap();
    let claims = codec.decode(&token).unwrap();

    assert_eq!(claims.subject_id, "admin-1");
    assert!(claims.organization_id.is_none());
    assert!(claims.is_superadmin());
}

#[test]
fn test_payload_never_carries_roles() {
    let codec = codec();
    let token = codec.issue("user-1", Some("org-1")).unwrap();

    let payload = token.split('.').nth(1).unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
    let object = json.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["exp", "iat", "org_id", "sub"]);
}

#[test]
fn test_header_is_standard_jwt() {
    let token = codec().issue("user-1", None).unwrap();

    let header = token.split('.').next().unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).unwrap()).unwrap();

    assert_eq!(json["alg"], "HS256");
    assert_eq!(json["typ"], "JWT");
}

#[test]
fn test_expired_two_hours_ago() {
    let codec = codec();
    let now = JwtService::now();
    let claims = IdentityClaims {
        subject_id: "user-1".to_string(),
        organization_id: Some("org-1".to_string()),
        issued_at: now - 3 * 3600,
        expires_at: now - 2 * 3600,
    };

    let token = codec.sign_claims(&claims).unwrap();

    assert!(matches!(codec.decode(&token), Err(JwtError::TokenExpired)));
}

#[test]
fn test_skew_tolerance_window() {
    let now = JwtService::now();
    let claims = IdentityClaims::new("user-1", None, now - 3600, 3590);
    assert_eq!(claims.expires_at, now - 10);

    let token = codec_with_leeway(60).sign_claims(&claims).unwrap();

    assert_eq!(codec_with_leeway(60).decode(&token).unwrap(), claims);
    assert!(matches!(
        codec_with_leeway(0).decode(&token),
        Err(JwtError::TokenExpired)
    ));
}

#[test]
fn test_skew_boundary_direction() {
    // exp is 10 s in the past; 1 s margin either side of the boundary
    let now = JwtService::now();
    let claims = IdentityClaims::new("user-1", None, now - 3600, 3590);
    let token = codec_with_leeway(0).sign_claims(&claims).unwrap();

    assert_eq!(codec_with_leeway(11).decode(&token).unwrap(), claims);
    assert!(matches!(
        codec_with_leeway(9).decode(&token),
        Err(JwtError::TokenExpired)
    ));
}

#[test]
fn test_out_of_range_config_is_rejected_before_use() {
    let huge_leeway = JwtConfig::new("secret").with_leeway(1 << 40);
    assert!(matches!(
        JwtService::new(huge_leeway),
        Err(JwtError::Config(_))
    ));

    let huge_lifetime =
        JwtConfig::new("secret").with_expiration(Duration::from_secs(i64::MAX as u64));
    assert!(matches!(
        JwtService::new(huge_lifetime),
        Err(JwtError::Config(_))
    ));

    let longest = JwtService::new(
        JwtConfig::new("secret")
            .with_expiration(MAX_EXPIRES_IN)
            .with_leeway(MAX_LEEWAY),
    )
    .unwrap();
    let token = longest.issue("user-1", None).unwrap();
    let claims = longest.decode(&token).unwrap();
    assert_eq!(claims.lifetime(), MAX_EXPIRES_IN.as_secs() as i64);
}

#[test]
fn test_future_issued_at_is_accepted() {
    let codec = codec();
    let now = JwtService::now();
    let claims = IdentityClaims::new("user-1", None, now + 600, 3600);

    let token = codec.sign_claims(&claims).unwrap();

    assert_eq!(codec.decode(&token).unwrap().issued_at, now + 600);
}

#[test]
fn test_tampered_and_expired_reports_invalid() {
    let codec = codec();
    let forger = JwtService::new(JwtConfig::new("attacker-secret")).unwrap();

    let token = codec.issue("user-1", Some("org-1")).unwrap();
    let mut claims = codec.decode(&token).unwrap();
    claims.organization_id = None;
    claims.expires_at = JwtService::now() - 3600;

    let forged = forger.sign_claims(&claims).unwrap();

    assert!(matches!(codec.decode(&forged), Err(JwtError::InvalidToken)));
}

#[test]
fn test_spliced_payload_is_invalid() {
    let codec = codec();
    let user = codec.issue("user-1", Some("org-1")).unwrap();
    let admin = codec.issue("admin-1", None).unwrap();

    let user_parts: Vec<&str> = user.split('.').collect();
    let admin_parts: Vec<&str> = admin.split('.').collect();
    let spliced = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

    assert!(matches!(codec.decode(&spliced), Err(JwtError::InvalidToken)));
}

#[test]
fn test_malformed_inputs_are_invalid() {
    let codec = codec();

    for input in ["", "not-a-token", "a.b.c", "a.b", "a.b.c.d", "....", "Bearer x.y.z"] {
        assert!(
            matches!(codec.decode(input), Err(JwtError::InvalidToken)),
            "expected InvalidToken for {:?}",
            input
        );
    }
}

#[test]
fn test_signed_token_missing_subject_is_invalid() {
    #[derive(serde::Serialize)]
    struct NoSubject {
        org_id: Option<String>,
        iat: i64,
        exp: i64,
    }

    let now = JwtService::now();
    let payload = NoSubject {
        org_id: Some("org-1".to_string()),
        iat: now,
        exp: now + 600,
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &payload,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(matches!(codec().decode(&token), Err(JwtError::InvalidToken)));
}

#[test]
fn test_signed_token_with_wrong_claim_type_is_invalid() {
    let now = JwtService::now();
    let payload = serde_json::json!({ "sub": 42, "iat": now, "exp": now + 600 });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &payload,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(matches!(codec().decode(&token), Err(JwtError::InvalidToken)));
}

#[test]
fn test_expiry_is_checked_before_claim_extraction() {
    let now = JwtService::now();
    let payload = serde_json::json!({ "iat": now - 7200, "exp": now - 3600 });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &payload,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(matches!(codec().decode(&token), Err(JwtError::TokenExpired)));
}

#[test]
fn test_role_claim_in_signed_payload_is_dropped() {
    let now = JwtService::now();
    let payload = serde_json::json!({
        "sub": "user-1",
        "org_id": "org-1",
        "iat": now,
        "exp": now + 600,
        "role": "owner",
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &payload,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let claims = codec().decode(&token).unwrap();
    let reencoded = serde_json::to_value(&claims).unwrap();

    assert!(reencoded.get("role").is_none());
}

#[test]
fn test_repeated_issuance_both_decode() {
    let codec = codec();

    let first = codec.issue("user-1", Some("org-1")).unwrap();
    let second = codec.issue("user-1", Some("org-1")).unwrap();

    assert_eq!(codec.decode(&first).unwrap().subject_id, "user-1");
    assert_eq!(codec.decode(&second).unwrap().subject_id, "user-1");
}

#[test]
fn test_concurrent_issuance_and_decode() {
    let codec = Arc::new(codec());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                let subject = format!("user-{}", i % 2);
                let token = codec.issue(&subject, Some("org-1")).unwrap();
                (subject, token)
            })
        })
        .collect();

    for handle in handles {
        let (subject, token) = handle.join().unwrap();
        assert_eq!(codec.decode(&token).unwrap().subject_id, subject);
    }
}

#[test]
fn test_secret_rotation_invalidates_tokens() {
    let old = codec();
    let rotated = JwtService::new(JwtConfig::new("rotated-secret")).unwrap();

    let token = old.issue("user-1", None).unwrap();

    assert!(matches!(rotated.decode(&token), Err(JwtError::InvalidToken)));
}

#[test]
fn test_algorithm_variants() {
    for algorithm in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
        let codec = JwtService::new(JwtConfig::new(SECRET).with_algorithm(algorithm)).unwrap();
        let token = codec.issue("user-1", None).unwrap();
        assert!(codec.decode(&token).is_ok(), "{:?} round trip failed", algorithm);
    }
}

#[test]
fn test_config_from_env() {
    // Unique names keep this isolated from other tests reading the environment.
    unsafe {
        std::env::set_var("TOLLGATE_ENVTEST_SECRET", "from-env-secret");
        std::env::set_var("TOLLGATE_ENVTEST_ALGORITHM", "HS384");
        std::env::set_var("TOLLGATE_ENVTEST_EXPIRES_IN", "900");
        std::env::set_var("TOLLGATE_ENVTEST_LEEWAY", "15");
    }

    let config = JwtConfig::from_env("TOLLGATE_ENVTEST").unwrap();

    assert_eq!(config.secret, "from-env-secret");
    assert_eq!(config.algorithm, Algorithm::HS384);
    assert_eq!(config.expires_in, Duration::from_secs(900));
    assert_eq!(config.leeway, 15);
}

#[test]
fn test_config_from_env_rejects_bad_number() {
    unsafe {
        std::env::set_var("TOLLGATE_BADENV_SECRET", "s");
        std::env::set_var("TOLLGATE_BADENV_EXPIRES_IN", "soon");
    }

    let result = JwtConfig::from_env("TOLLGATE_BADENV");

    assert!(matches!(result, Err(JwtError::Config(msg)) if msg.contains("TOLLGATE_BADENV_EXPIRES_IN")));
}

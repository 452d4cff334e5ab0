//! Command-level workflow tests: key files on disk, signed files, reports

use std::fs;
use std::sync::Arc;

use digisign::{
    DigisignError, DilithiumPrimitive, KeyRole, Kind, Orchestrator, SignaturePrimitive,
};
use digisign_cli::{commands, CliConfig, CliError};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    config: CliConfig,
    orchestrator: Orchestrator<DilithiumPrimitive>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config = CliConfig {
        key_dir: dir.path().join("keys"),
        ..CliConfig::default()
    };

    Fixture {
        dir,
        config,
        orchestrator: Orchestrator::new(DilithiumPrimitive::new()),
    }
}

#[test]
fn test_keygen_sign_verify_extract() {
    let f = fixture();
    let (_, keys) =
        commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false).unwrap();

    let document = f.dir.path().join("contract.txt");
    fs::write(&document, b"Both parties agree.").unwrap();

    let signed = commands::sign_file(
        &f.orchestrator,
        &document,
        &keys.private_path,
        Kind::Dilithium2,
        None,
    )
    .unwrap();
    assert_eq!(signed, f.dir.path().join("contract.txt.signed"));

    let out = f.dir.path().join("extracted");
    let report = commands::verify_file(
        &f.orchestrator,
        &signed,
        &keys.public_path,
        Kind::Dilithium2,
        Some(&out),
    )
    .unwrap();

    assert!(report.valid);
    assert_eq!(report.original_filename, "contract.txt");
    assert_eq!(report.payload_size, 19);
    assert_eq!(
        fs::read(out.join("contract.txt")).unwrap(),
        b"Both parties agree."
    );
}

#[test]
fn test_keygen_refuses_to_overwrite() {
    let f = fixture();
    commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false).unwrap();

    let again = commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false);
    assert!(matches!(again, Err(CliError::Keystore(_))));

    assert!(commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, true).is_ok());
}

#[test]
fn test_tampered_file_is_not_extracted() {
    let f = fixture();
    let (_, keys) =
        commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false).unwrap();

    let document = f.dir.path().join("data.bin");
    fs::write(&document, vec![7u8; 256]).unwrap();
    let signed = commands::sign_file(
        &f.orchestrator,
        &document,
        &keys.private_path,
        Kind::Dilithium2,
        None,
    )
    .unwrap();

    let mut bytes = fs::read(&signed).unwrap();
    // magic + filename field ("data.bin") + payload length prefix
    bytes[12 + 4 + 8 + 4] ^= 0xFF;
    fs::write(&signed, &bytes).unwrap();

    let out = f.dir.path().join("out");
    let report = commands::verify_file(
        &f.orchestrator,
        &signed,
        &keys.public_path,
        Kind::Dilithium2,
        Some(&out),
    )
    .unwrap();

    assert!(!report.valid);
    assert!(!out.join("data.bin").exists());
}

#[test]
fn test_sign_text_and_verify_detached() {
    let f = fixture();
    let (_, keys) =
        commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false).unwrap();

    let signature =
        commands::sign_text(&f.orchestrator, "hello world", &keys.private_path, Kind::Dilithium2)
            .unwrap();

    let message = f.dir.path().join("message.txt");
    fs::write(&message, "hello world").unwrap();
    assert!(commands::verify_detached_file(
        &f.orchestrator,
        &message,
        &signature,
        &keys.public_path,
        Kind::Dilithium2,
    )
    .unwrap());

    // Signature read from a file via `@path`
    let sig_file = f.dir.path().join("message.sig");
    fs::write(&sig_file, format!("{}\n", signature)).unwrap();
    let from_file = format!("@{}", sig_file.display());
    fs::write(&message, "hello world!").unwrap();
    assert!(!commands::verify_detached_file(
        &f.orchestrator,
        &message,
        &from_file,
        &keys.public_path,
        Kind::Dilithium2,
    )
    .unwrap());
}

#[test]
fn test_sign_text_container_uses_message_name() {
    let f = fixture();
    let (_, keys) =
        commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false).unwrap();

    let output = f.dir.path().join("note.signed");
    commands::sign_text_to_container(
        &f.orchestrator,
        "meet at noon",
        &keys.private_path,
        Kind::Dilithium2,
        &output,
    )
    .unwrap();

    let summary = commands::inspect_file(&output).unwrap();
    assert_eq!(summary.original_filename, commands::TEXT_MESSAGE_NAME);
    assert_eq!(summary.payload_size, 12);
}

#[test]
fn test_wrong_role_key_file() {
    let f = fixture();
    let (_, keys) =
        commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false).unwrap();

    let document = f.dir.path().join("doc.txt");
    fs::write(&document, b"text").unwrap();

    // Public key handed in where the private key belongs
    let result = commands::sign_file(
        &f.orchestrator,
        &document,
        &keys.public_path,
        Kind::Dilithium2,
        None,
    );
    assert!(matches!(
        result,
        Err(CliError::Digisign(digisign::DigisignError::MissingDelimiter { .. }))
    ));
}

#[test]
fn test_inspect_rejects_plain_file() {
    let f = fixture();
    let plain = f.dir.path().join("plain.txt");
    fs::write(&plain, b"just some text, no container").unwrap();

    assert!(matches!(
        commands::inspect_file(&plain),
        Err(CliError::Digisign(digisign::DigisignError::BadMagic))
    ));
}

#[test]
fn test_extract_payload_drops_directories() {
    let f = fixture();
    let path = commands::extract_payload(f.dir.path(), "../../etc/passwd", b"x").unwrap();
    assert_eq!(path, f.dir.path().join("passwd"));
}

#[tokio::test]
async fn test_verify_batch_reports_each_file() {
    let f = fixture();
    let (_, keys) =
        commands::keygen(&f.orchestrator, &f.config, Kind::Dilithium2, None, false).unwrap();

    let mut files = Vec::new();
    for i in 0..3 {
        let document = f.dir.path().join(format!("doc{}.txt", i));
        fs::write(&document, format!("document {}", i)).unwrap();
        files.push(
            commands::sign_file(
                &f.orchestrator,
                &document,
                &keys.private_path,
                Kind::Dilithium2,
                None,
            )
            .unwrap(),
        );
    }
    let garbage = f.dir.path().join("garbage.signed");
    fs::write(&garbage, b"DIGI_SIGN_v1\xff\xff").unwrap();
    files.push(garbage);

    let orchestrator = Arc::new(f.orchestrator);
    let results = commands::verify_batch(orchestrator, files, &keys.public_path, Kind::Dilithium2)
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    for result in &results[..3] {
        assert!(result.as_ref().unwrap().valid);
    }
    let failure = results[3].as_ref().unwrap_err();
    assert!(failure.error.contains("Truncated"));
}

/// Accepts every signature, except that it panics on one payload
struct FragilePrimitive;

const FRAGILE_PAYLOAD: &[u8] = b"crash here";

impl SignaturePrimitive for FragilePrimitive {
    fn generate_keys(&self, _kind: Kind) -> digisign::Result<(Vec<u8>, Vec<u8>)> {
        Err(DigisignError::KeyGenerationFailed("not needed".to_string()))
    }

    fn sign(&self, _: &[u8], _: &[u8], _: Kind) -> digisign::Result<Vec<u8>> {
        Err(DigisignError::SigningFailed("not needed".to_string()))
    }

    fn verify(&self, _: &[u8], message: &[u8], _: &[u8], _: Kind) -> digisign::Result<bool> {
        if message == FRAGILE_PAYLOAD {
            panic!("primitive blew up");
        }
        Ok(true)
    }

    fn algorithm_name(&self, _kind: Kind) -> String {
        "fragile".to_string()
    }
}

#[tokio::test]
async fn test_verify_batch_survives_panicking_task() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("any.pub");
    fs::write(&key_path, digisign::pem::encode(&[9u8; 64], KeyRole::Public)).unwrap();

    let good = dir.path().join("good.signed");
    fs::write(&good, digisign::pack("good.txt", b"fine", "abcd").unwrap()).unwrap();
    let bad = dir.path().join("bad.signed");
    fs::write(&bad, digisign::pack("bad.txt", FRAGILE_PAYLOAD, "abcd").unwrap()).unwrap();

    let orchestrator = Arc::new(Orchestrator::new(FragilePrimitive));
    let results = commands::verify_batch(
        orchestrator,
        vec![bad.clone(), good],
        &key_path,
        Kind::Dilithium2,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 2);
    let failure = results[0].as_ref().unwrap_err();
    assert_eq!(failure.file, bad.display().to_string());
    assert!(failure.error.contains("Task error"));
    assert!(results[1].as_ref().unwrap().valid);
}

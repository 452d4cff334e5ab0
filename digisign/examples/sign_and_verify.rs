//! Sign a short message into a container and verify it again

use digisign::{container, DilithiumPrimitive, Kind, Orchestrator};

fn main() -> anyhow::Result<()> {
    println!("=== DigiSign container round trip ===\n");

    let orchestrator = Orchestrator::new(DilithiumPrimitive::new());
    let kind = Kind::Dilithium3;
    let info = DilithiumPrimitive::algorithm_info(kind);

    let keys = orchestrator.generate_keys(kind)?;
    println!("✓ Generated {} keypair", info.name);
    println!("  Public key: {} bytes", keys.public.as_bytes().len());
    println!("  Fingerprint: {}", keys.public.fingerprint());
    println!();

    let signed = orchestrator.sign("message", b"hello world", &keys.private.to_pem(), kind)?;
    let unpacked = container::unpack(&signed)?;
    println!("✓ Container: {} bytes", signed.len());
    println!("  Filename: {}", unpacked.filename);
    println!("  Signature text: {} hex chars", unpacked.signature_text.len());
    println!();

    let valid = orchestrator.verify(&signed, &keys.public.to_pem(), kind)?;
    println!("{} Signature valid: {}", if valid { "✓" } else { "✗" }, valid);

    Ok(())
}

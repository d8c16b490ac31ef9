use rand::RngCore;

/// Opaque token for password-reset and e-mail-verification links.
pub fn generate_hex_token(num_bytes: usize) -> String {
    let mut buf = vec![0u8; num_bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

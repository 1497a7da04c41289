//! `spec.md` §4.4 "a derived master secret into the record-layer key
//! schedule" and §6.2 "GCM record layer". RFC 5246 §8.1 (master secret)
//! and RFC 5288 §3 (GCM key block layout: client/server write key
//! followed by the 4-byte client/server write IV "salt", no separate MAC
//! keys since GCM is an AEAD) — CBC suites remain selectable for
//! negotiation (`tls_types::cipher_suite::BulkCipher::Cbc`) but their
//! record-layer key block is out of scope here for the same reason
//! `handshake::record` only implements the GCM direction (`spec.md` §1
//! scopes the shipped AEAD to AES-GCM).

use primitives::HashAlgorithm;

use crate::prf;

pub const MASTER_SECRET_LEN: usize = 48;

/// RFC 5246 §8.1: `master_secret = PRF(pre_master_secret, "master
/// secret", ClientHello.random ‖ ServerHello.random)[0..48]`.
pub fn derive_master_secret(
    is_tls12: bool,
    hash: HashAlgorithm,
    premaster: &[u8],
    client_random: &[u8; 32],
    server_random: &[u8; 32],
) -> [u8; MASTER_SECRET_LEN] {
    let mut seed = Vec::with_capacity(64);
    seed.extend_from_slice(client_random);
    seed.extend_from_slice(server_random);
    let out = prf::prf(is_tls12, hash, premaster, b"master secret", &seed, MASTER_SECRET_LEN);
    let mut master_secret = [0u8; MASTER_SECRET_LEN];
    master_secret.copy_from_slice(&out);
    master_secret
}

/// One direction's share of the RFC 5288 GCM key block.
pub struct GcmKeyBlock {
    pub client_write_key: Vec<u8>,
    pub server_write_key: Vec<u8>,
    pub client_write_salt: [u8; 4],
    pub server_write_salt: [u8; 4],
}

/// RFC 5246 §6.3 `key_block = PRF(master_secret, "key expansion",
/// server_random ‖ client_random)`, RFC 5288 §3 layout for AEAD suites:
/// `client_write_key ‖ server_write_key ‖ client_write_IV ‖
/// server_write_IV` (the two 4-byte "fixed IV" / salt values; no MAC
/// keys). `key_len` is the negotiated suite's symmetric key length in
/// bytes (16 for AES-128-GCM, 32 for AES-256-GCM).
pub fn derive_gcm_key_block(
    is_tls12: bool,
    hash: HashAlgorithm,
    master_secret: &[u8; MASTER_SECRET_LEN],
    client_random: &[u8; 32],
    server_random: &[u8; 32],
    key_len: usize,
) -> GcmKeyBlock {
    let mut seed = Vec::with_capacity(64);
    seed.extend_from_slice(server_random);
    seed.extend_from_slice(client_random);

    let total_len = 2 * key_len + 2 * 4;
    let block = prf::prf(is_tls12, hash, master_secret, b"key expansion", &seed, total_len);

    let mut offset = 0;
    let client_write_key = block[offset..offset + key_len].to_vec();
    offset += key_len;
    let server_write_key = block[offset..offset + key_len].to_vec();
    offset += key_len;
    let mut client_write_salt = [0u8; 4];
    client_write_salt.copy_from_slice(&block[offset..offset + 4]);
    offset += 4;
    let mut server_write_salt = [0u8; 4];
    server_write_salt.copy_from_slice(&block[offset..offset + 4]);

    GcmKeyBlock { client_write_key, server_write_key, client_write_salt, server_write_salt }
}

//! AES-256-CTR encryption of item payloads.
//!
//! CTR mode turns the block cipher into a keystream generator: no padding,
//! and ciphertext length equals plaintext length byte for byte. It provides
//! no integrity on its own — callers must verify the envelope tag before
//! invoking [`decrypt`].

use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::envelope::IV_SIZE;
use crate::key_manager::MasterKey;

type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

/// Generates a fresh random IV.
///
/// `OsRng` is safe for concurrent use, so parallel `encrypt` calls can
/// never share an IV under the same key.
fn generate_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypts `plaintext` under `key` with a freshly generated random IV.
///
/// # Panics
///
/// This function will not panic — the `expect` covers a condition that
/// cannot fail (the key and IV lengths are fixed by construction).
pub(crate) fn encrypt(key: &MasterKey, plaintext: &[u8]) -> ([u8; IV_SIZE], Vec<u8>) {
    let iv = generate_iv();
    let mut cipher = Aes256Ctr::new_from_slices(key.as_bytes(), &iv)
        .expect("key and IV lengths are fixed by construction");
    let mut buffer = plaintext.to_vec();
    cipher.apply_keystream(&mut buffer);
    (iv, buffer)
}

/// Decrypts `ciphertext` produced by [`encrypt`] under the same key and IV.
///
/// Deterministic and side-effect-free. Performs no authentication — the
/// caller must have verified the envelope tag first.
///
/// # Panics
///
/// This function will not panic — the `expect` covers a condition that
/// cannot fail (the key and IV lengths are fixed by construction).
pub(crate) fn decrypt(key: &MasterKey, iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> Vec<u8> {
    let mut cipher = Aes256Ctr::new_from_slices(key.as_bytes(), iv)
        .expect("key and IV lengths are fixed by construction");
    let mut buffer = ciphertext.to_vec();
    cipher.apply_keystream(&mut buffer);
    buffer
}

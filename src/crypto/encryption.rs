//! AES-256-CBC blob encryption/decryption
//!
//! Every call to [`encrypt`] draws a fresh salt and IV, derives the cipher key
//! from the password and that salt, and emits a self-contained blob:
//!
//! ```text
//! salt (32 bytes) | iv (32 bytes) | ciphertext (PKCS#7 padded)
//! ```
//!
//! There is no authentication tag. A wrong password or a corrupted blob is
//! only caught when the padding check fails, which is likely but not
//! guaranteed.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;

use crate::error::{SaveError, SaveResult};

use super::key_derivation::{derive_key, SALT_SIZE};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Size of the IV field in the blob
pub const IV_SIZE: usize = 32;

/// Salt + IV
pub const HEADER_SIZE: usize = SALT_SIZE + IV_SIZE;

/// AES block size
const BLOCK_SIZE: usize = 16;

/// CBC chaining value: the two halves of the IV field XORed together
fn chaining_iv(iv: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut out = [0u8; BLOCK_SIZE];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = iv[i] ^ iv[i + BLOCK_SIZE];
    }
    out
}

/// An encrypted payload with its salt and IV framing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    bytes: Vec<u8>,
}

impl EncryptedBlob {
    /// Wrap raw bytes read from disk, validating the minimum length
    pub fn from_bytes(bytes: Vec<u8>) -> SaveResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(SaveError::MalformedBlob { len: bytes.len() });
        }
        Ok(Self { bytes })
    }

    fn from_parts(salt: &[u8], iv: &[u8], ciphertext: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
        bytes.extend_from_slice(salt);
        bytes.extend_from_slice(iv);
        bytes.extend_from_slice(ciphertext);
        Self { bytes }
    }

    /// The key derivation salt
    pub fn salt(&self) -> &[u8] {
        &self.bytes[..SALT_SIZE]
    }

    /// The full 32-byte IV field
    pub fn iv(&self) -> &[u8] {
        &self.bytes[SALT_SIZE..HEADER_SIZE]
    }

    /// The ciphertext following the header
    pub fn ciphertext(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// Borrow the whole blob
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True only for a zero-length blob
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take ownership of the bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encrypt plaintext under a password
pub fn encrypt(plaintext: &[u8], password: &str) -> SaveResult<EncryptedBlob> {
    let mut rng = rand::rng();

    let mut salt = [0u8; SALT_SIZE];
    rng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt);

    let mut iv = [0u8; IV_SIZE];
    rng.fill_bytes(&mut iv);

    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), &chaining_iv(&iv))
        .map_err(|e| SaveError::Encryption(format!("Failed to create cipher: {}", e)))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    Ok(EncryptedBlob::from_parts(&salt, &iv, &ciphertext))
}

/// Decrypt a blob with the password it was encrypted under
pub fn decrypt(blob: &EncryptedBlob, password: &str) -> SaveResult<Vec<u8>> {
    let ciphertext = blob.ciphertext();
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(SaveError::DecryptionFailed);
    }

    let key = derive_key(password, blob.salt());
    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), &chaining_iv(blob.iv()))
        .map_err(|e| SaveError::Encryption(format!("Failed to create cipher: {}", e)))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SaveError::DecryptionFailed)
}

/// Parse raw bytes and decrypt them in one step
pub fn decrypt_bytes(bytes: Vec<u8>, password: &str) -> SaveResult<Vec<u8>> {
    let blob = EncryptedBlob::from_bytes(bytes)?;
    decrypt(&blob, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "3f-2a9c01d4b7e6f5@";

    #[test]
    fn test_encrypt_decrypt() {
        let plaintext = b"Hello, World!";

        let blob = encrypt(plaintext, PASSWORD).unwrap();
        let decrypted = decrypt(&blob, PASSWORD).unwrap();

        assert_eq!(plaintext, decrypted.as_slice());
    }

    #[test]
    fn test_blob_layout() {
        let blob = encrypt(b"0123456789", PASSWORD).unwrap();

        assert_eq!(blob.salt().len(), SALT_SIZE);
        assert_eq!(blob.iv().len(), IV_SIZE);
        // 10 bytes pad to one block
        assert_eq!(blob.ciphertext().len(), 16);
        assert_eq!(blob.len(), HEADER_SIZE + 16);
    }

    #[test]
    fn test_full_block_gets_extra_padding_block() {
        let blob = encrypt(&[0xAB; 16], PASSWORD).unwrap();
        assert_eq!(blob.ciphertext().len(), 32);
    }

    #[test]
    fn test_fresh_salt_and_iv_per_call() {
        let plaintext = b"same payload";

        let blob1 = encrypt(plaintext, PASSWORD).unwrap();
        let blob2 = encrypt(plaintext, PASSWORD).unwrap();

        assert_ne!(blob1.salt(), blob2.salt());
        assert_ne!(blob1.iv(), blob2.iv());
        assert_ne!(blob1.ciphertext(), blob2.ciphertext());

        assert_eq!(decrypt(&blob1, PASSWORD).unwrap(), plaintext);
        assert_eq!(decrypt(&blob2, PASSWORD).unwrap(), plaintext);
    }

    #[test]
    fn test_short_input_is_malformed() {
        let result = EncryptedBlob::from_bytes(vec![0u8; HEADER_SIZE - 1]);
        assert!(matches!(result, Err(SaveError::MalformedBlob { len: 63 })));

        let result = decrypt_bytes(Vec::new(), PASSWORD);
        assert!(matches!(result, Err(SaveError::MalformedBlob { len: 0 })));
    }

    #[test]
    fn test_header_only_blob_fails_decryption() {
        let blob = EncryptedBlob::from_bytes(vec![0u8; HEADER_SIZE]).unwrap();
        assert!(matches!(
            decrypt(&blob, PASSWORD),
            Err(SaveError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let blob = encrypt(b"a longer payload spanning blocks", PASSWORD).unwrap();
        let mut bytes = blob.into_bytes();
        bytes.truncate(bytes.len() - 3);

        let result = decrypt_bytes(bytes, PASSWORD);
        assert!(matches!(result, Err(SaveError::DecryptionFailed)));
    }

    #[test]
    fn test_wrong_password_usually_fails() {
        // Padding happens to validate about 1 in 256 times, so try several blobs
        // and require that most of them are rejected.
        let mut rejected = 0;
        for _ in 0..8 {
            let blob = encrypt(b"{\"score\":42}", PASSWORD).unwrap();
            match decrypt(&blob, "00-0000000000000@") {
                Err(SaveError::DecryptionFailed) => rejected += 1,
                Ok(plain) => assert_ne!(plain, b"{\"score\":42}"),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert!(rejected >= 6);
    }

    #[test]
    fn test_tampered_last_block_usually_fails() {
        let mut rejected = 0;
        for _ in 0..8 {
            let blob = encrypt(b"Hello, World!", PASSWORD).unwrap();
            let mut bytes = blob.into_bytes();
            let last = bytes.len() - 1;
            bytes[last] ^= 0xFF;
            let tampered = EncryptedBlob::from_bytes(bytes).unwrap();
            if matches!(decrypt(&tampered, PASSWORD), Err(SaveError::DecryptionFailed)) {
                rejected += 1;
            }
        }
        assert!(rejected >= 6);
    }

    #[test]
    fn test_every_iv_byte_affects_output() {
        let plaintext = b"{\"score\":42}";
        for offset in [SALT_SIZE, SALT_SIZE + BLOCK_SIZE, HEADER_SIZE - 1] {
            let blob = encrypt(plaintext, PASSWORD).unwrap();
            let mut bytes = blob.into_bytes();
            bytes[offset] ^= 0x01;

            let tampered = EncryptedBlob::from_bytes(bytes).unwrap();
            match decrypt(&tampered, PASSWORD) {
                Ok(plain) => assert_ne!(plain, plaintext),
                Err(e) => assert!(matches!(e, SaveError::DecryptionFailed)),
            }
        }
    }

    #[test]
    fn test_empty_plaintext() {
        let blob = encrypt(b"", PASSWORD).unwrap();
        assert_eq!(blob.ciphertext().len(), 16);
        assert!(decrypt(&blob, PASSWORD).unwrap().is_empty());
    }

    #[test]
    fn test_large_plaintext() {
        let plaintext: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();

        let blob = encrypt(&plaintext, PASSWORD).unwrap();
        let decrypted = decrypt(&blob, PASSWORD).unwrap();

        assert_eq!(plaintext, decrypted);
    }
}

//! Streaming content hasher.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content digests
//! of files using memory-efficient streaming. Files are read through a fixed
//! size buffer, so memory use stays bounded regardless of file size.
//!
//! Three algorithms are supported, selected with [`DigestAlgorithm`]:
//! BLAKE3 (default), SHA-256 and SHA-512.
//!
//! # Example
//!
//! ```no_run
//! use dupehash::scanner::{DigestAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(DigestAlgorithm::Blake3);
//! let (digest, size) = hasher.hash_file(Path::new("Cargo.toml")).unwrap();
//! println!("{} ({} bytes)", digest, size);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use super::HashError;

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Hash function used to fingerprint file content.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// BLAKE3 (32-byte digest)
    #[default]
    Blake3,
    /// SHA-256 (32-byte digest)
    Sha256,
    /// SHA-512 (64-byte digest)
    Sha512,
}

impl DigestAlgorithm {
    /// Length in bytes of digests produced by this algorithm.
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Blake3 | Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Lowercase algorithm name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A content digest.
///
/// Stored as raw bytes; displayed as lowercase hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(Box<[u8]>);

impl Digest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether the digest holds no bytes.
    ///
    /// No algorithm produces an empty digest; an empty value only ever
    /// appears through a programming error and is rejected by the table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hexadecimal rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hash_to_hex(&self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_hash(s).map(|bytes| Self(bytes.into_boxed_slice()))
    }
}

/// Convert digest bytes to a lowercase hexadecimal string.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Parse a hexadecimal string back into digest bytes.
///
/// # Errors
///
/// Returns an error if the string has odd length or contains a non-hex
/// character.
pub fn hex_to_hash(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err(format!("Odd-length hex string ({} chars)", hex.len()));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("Invalid hex at offset {}", i))
        })
        .collect()
}

/// Incremental state for one of the supported algorithms.
enum State {
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
    Sha512(sha2::Sha512),
}

impl State {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            DigestAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            DigestAlgorithm::Sha512 => Self::Sha512(sha2::Sha512::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Blake3(h) => {
                h.update(chunk);
            }
            Self::Sha256(h) => h.update(chunk),
            Self::Sha512(h) => h.update(chunk),
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Blake3(h) => Digest::from_bytes(h.finalize().as_bytes()),
            Self::Sha256(h) => Digest::from_bytes(&h.finalize()),
            Self::Sha512(h) => Digest::from_bytes(&h.finalize()),
        }
    }
}

/// Streaming file hasher.
///
/// Cheap to clone and safe to share between worker threads; every call
/// allocates its own read buffer and hash state.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    algorithm: DigestAlgorithm,
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default())
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size (clamped to at least one byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Algorithm used by this hasher.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Read buffer size in bytes.
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Hash everything a reader yields until EOF.
    ///
    /// Returns the digest and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`, which is retried.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<(Digest, u64)> {
        let mut state = State::new(self.algorithm);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut total: u64 = 0;

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.update(&buffer[..n]);
            total += n as u64;
        }

        Ok((state.finalize(), total))
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(&self, bytes: &[u8]) -> Digest {
        let mut state = State::new(self.algorithm);
        state.update(bytes);
        state.finalize()
    }

    /// Open and hash a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn hash_file(&self, path: &Path) -> Result<(Digest, u64), HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_open_file(path, file)
    }

    /// Hash an already opened file, taking ownership of the handle.
    ///
    /// The handle is released before this function returns.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if reading fails part-way.
    pub fn hash_open_file(&self, path: &Path, file: File) -> Result<(Digest, u64), HashError> {
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }
}

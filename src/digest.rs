//! Digest primitive used by the hashing functions.
//!
//! A [`Digest`] owns the running state of one hasher. Every call to
//! [`Digest::hash`] feeds one complete input, appends the lowercase hex
//! rendering of the result to the caller's sink and leaves the hasher reset,
//! so nothing carries over from one row to the next.

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::digest::{FixedOutputReset, Output};
use sha2::{Sha224, Sha256, Sha384, Sha512};

use crate::error::FunctionError;

/// Supported digest algorithms.
///
/// Deserialises through [`FromStr`], so config files accept the same
/// spellings as the parser (`sha256`, `SHA-256`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Every algorithm, in registration order.
    pub const ALL: [DigestAlgorithm; 6] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ];

    /// SQL function name for this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha224 => "sha224",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }

    /// Length of the raw digest in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Length of the hex rendering (two characters per byte).
    pub fn hex_len(&self) -> usize {
        self.output_len() * 2
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = FunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "md5" => Ok(DigestAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            "sha224" | "sha-224" => Ok(DigestAlgorithm::Sha224),
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(DigestAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(FunctionError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = FunctionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

enum Hasher {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

/// Stateful digest primitive for one algorithm.
pub struct Digest {
    algorithm: DigestAlgorithm,
    hasher: Hasher,
}

impl Digest {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        let hasher = match algorithm {
            DigestAlgorithm::Md5 => Hasher::Md5(sha2::Digest::new()),
            DigestAlgorithm::Sha1 => Hasher::Sha1(sha2::Digest::new()),
            DigestAlgorithm::Sha224 => Hasher::Sha224(sha2::Digest::new()),
            DigestAlgorithm::Sha256 => Hasher::Sha256(sha2::Digest::new()),
            DigestAlgorithm::Sha384 => Hasher::Sha384(sha2::Digest::new()),
            DigestAlgorithm::Sha512 => Hasher::Sha512(sha2::Digest::new()),
        };
        Self { algorithm, hasher }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Hash `input` and append the hex digest to `sink`.
    ///
    /// The sink is appended to, never cleared; callers own clearing.
    pub fn hash(&mut self, input: &[u8], sink: &mut String) -> Result<(), FunctionError> {
        sink.reserve(self.algorithm.hex_len());
        match &mut self.hasher {
            Hasher::Md5(h) => digest_into(h, input, sink)?,
            Hasher::Sha1(h) => digest_into(h, input, sink)?,
            Hasher::Sha224(h) => digest_into(h, input, sink)?,
            Hasher::Sha256(h) => digest_into(h, input, sink)?,
            Hasher::Sha384(h) => digest_into(h, input, sink)?,
            Hasher::Sha512(h) => digest_into(h, input, sink)?,
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digest")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

fn digest_into<D>(hasher: &mut D, input: &[u8], sink: &mut String) -> fmt::Result
where
    D: sha2::Digest + FixedOutputReset,
    Output<D>: fmt::LowerHex,
{
    sha2::Digest::update(hasher, input);
    write!(sink, "{:x}", hasher.finalize_reset())
}

/// Hash `input` once and return the hex digest.
///
/// Allocates; meant for tests and one-off callers, not per-row evaluation.
pub fn hex_digest(algorithm: DigestAlgorithm, input: &[u8]) -> Result<String, FunctionError> {
    let mut sink = String::with_capacity(algorithm.hex_len());
    Digest::new(algorithm).hash(input, &mut sink)?;
    Ok(sink)
}

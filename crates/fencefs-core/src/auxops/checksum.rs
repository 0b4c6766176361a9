//! Streaming checksum computation and verification (§4.G).
//!
//! The file is re-stat'd after the hash finishes; if its mtime moved during
//! the read, the result is rejected rather than returned as if it were
//! consistent.

use std::fs::File;
use std::io::Read;
use std::str::FromStr;

use sha2::Digest;

use crate::error::{FsError, OperationError, Result, ValidationError};
use crate::types::path::VettedPath;

const CHUNK_SIZE: usize = 64 * 1024;

/// A supported streaming-hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl FromStr for ChecksumAlgorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(ValidationError::UnsupportedAlgorithm {
                algorithm: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        };
        write!(f, "{name}")
    }
}

/// Outcome of [`verify_checksum`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChecksumVerification {
    pub matches: bool,
    pub expected: String,
    pub actual: String,
}

/// Stream-hash the file at `path` with `algorithm`, returning the lowercase
/// hex digest. Rejects `FILE_MODIFIED` if the file's mtime advanced between
/// the initial stat and the post-read stat.
pub fn compute_checksum(path: &VettedPath, algorithm: ChecksumAlgorithm) -> Result<String> {
    let p = path.as_path();
    let initial = std::fs::metadata(p).map_err(|e| FsError::from_io(&e, p.display().to_string()))?;
    let initial_mtime = filetime::FileTime::from_last_modification_time(&initial);

    let mut file = File::open(p).map_err(|e| FsError::from_io(&e, p.display().to_string()))?;
    let digest = match algorithm {
        ChecksumAlgorithm::Md5 => hash_stream::<md5::Md5>(&mut file, p)?,
        ChecksumAlgorithm::Sha1 => hash_stream::<sha1::Sha1>(&mut file, p)?,
        ChecksumAlgorithm::Sha256 => hash_stream::<sha2::Sha256>(&mut file, p)?,
        ChecksumAlgorithm::Sha512 => hash_stream::<sha2::Sha512>(&mut file, p)?,
    };

    let after = std::fs::metadata(p).map_err(|e| FsError::from_io(&e, p.display().to_string()))?;
    let after_mtime = filetime::FileTime::from_last_modification_time(&after);
    if after_mtime != initial_mtime {
        return Err(OperationError::FileModified {
            path: p.display().to_string(),
        }
        .into());
    }

    Ok(digest)
}

fn hash_stream<D: Digest>(file: &mut File, path: &std::path::Path) -> Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| FsError::from_io(&e, path.display().to_string()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Compute, then case-insensitively compare against `expected_hex`.
pub fn verify_checksum(
    path: &VettedPath,
    expected_hex: &str,
    algorithm: ChecksumAlgorithm,
) -> Result<ChecksumVerification> {
    let actual = compute_checksum(path, algorithm)?;
    Ok(ChecksumVerification {
        matches: actual.eq_ignore_ascii_case(expected_hex),
        expected: expected_hex.to_string(),
        actual,
    })
}

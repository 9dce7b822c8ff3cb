//! Verified dataset file download
//!
//! Streams a remote file to a temporary location while computing a rolling
//! SHA-1 digest, verifies the digest against the manifest hash, transparently
//! decompresses gzip payloads, and atomically publishes the result. The
//! destination path either does not exist or holds a complete, verified file.

use crate::error::{GeoError, Result};
use flate2::read::GzDecoder;
use futures::StreamExt;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Magic number opening a gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Download `url` into `destination`, verifying the SHA-1 digest.
///
/// The body is streamed into a temporary file in the destination's directory
/// (same filesystem, so the final rename is atomic) and only moved into place
/// after the digest checks out. Gzip payloads are detected by magic number
/// and decompressed through a second temporary file before publishing.
/// Every failure path removes the temporaries.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    expected_sha1: &str,
) -> Result<()> {
    let dir = destination.parent().unwrap_or_else(|| Path::new("."));

    // Dropping a NamedTempFile removes it, which covers every early return
    // below as well as panics.
    let mut tmp = NamedTempFile::new_in(dir)?;

    let mut hasher = Sha1::new();
    let response = client.get(url).send().await?.error_for_status()?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        hasher.update(&chunk);
        tmp.write_all(&chunk)?;
    }
    tmp.flush()?;

    let actual = hex::encode(hasher.finalize());
    if actual != expected_sha1 {
        return Err(GeoError::integrity(
            destination.display().to_string(),
            expected_sha1,
            actual,
        ));
    }

    let tmp = if is_gzip(tmp.path())? {
        debug!(url = %url, "Payload is gzip-compressed, decompressing");
        decompress(&tmp, dir).map_err(|source| GeoError::Decode {
            file: destination.display().to_string(),
            source,
        })?
    } else {
        tmp
    };

    tmp.persist(destination).map_err(|e| GeoError::Io(e.error))?;
    debug!(url = %url, destination = %destination.display(), "Fetched and verified file");
    Ok(())
}

/// Check the first two bytes of `path` for the gzip magic number.
fn is_gzip(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    Ok(n == 2 && magic == GZIP_MAGIC)
}

/// Stream-decompress `src` into a fresh temporary file in `dir`.
fn decompress(src: &NamedTempFile, dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut out = NamedTempFile::new_in(dir)?;
    let mut decoder = GzDecoder::new(BufReader::new(File::open(src.path())?));
    std::io::copy(&mut decoder, &mut out)?;
    out.flush()?;
    Ok(out)
}

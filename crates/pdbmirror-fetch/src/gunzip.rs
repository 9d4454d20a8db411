//! Gzip decompression collaborator.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

/// Decompress the gzip artifact at `src` into `dest`.
pub fn gunzip_file(src: &Path, dest: &Path) -> io::Result<()> {
    let mut decoder = GzDecoder::new(BufReader::new(File::open(src)?));
    let mut out = File::create(dest)?;
    io::copy(&mut decoder, &mut out)?;
    Ok(())
}

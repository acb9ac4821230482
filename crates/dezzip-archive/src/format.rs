use std::io::Read;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar(TarCompress),
}

/// Compression codec for tar archives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TarCompress {
    None,
    Gzip,
}

impl ArchiveFormat {
    /// Recognize an archive format from a file name.
    ///
    /// Double extensions are handled: `foo.tar.gz` and `foo.tgz` are
    /// gzip-compressed tar, not gzip.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::Tar(TarCompress::Gzip))
        } else if name.ends_with(".tar") {
            Some(Self::Tar(TarCompress::None))
        } else {
            None
        }
    }

    fn extension_len(self, name: &str) -> usize {
        match self {
            Self::Zip => ".zip".len(),
            Self::Tar(TarCompress::None) => ".tar".len(),
            Self::Tar(TarCompress::Gzip) => {
                if name.ends_with(".tar.gz") {
                    ".tar.gz".len()
                } else {
                    ".tgz".len()
                }
            }
        }
    }
}

/// Base name of an archive with its recognized extension stripped.
///
/// This is the name of the directory the archive extracts into. Returns
/// `None` for unrecognized formats and for names that are nothing but an
/// extension (a file literally named `.zip` has no usable stem).
pub fn archive_stem(path: &Path) -> Option<String> {
    let format = ArchiveFormat::from_path(path)?;
    let name = path.file_name()?.to_str()?;
    let stem = &name[..name.len() - format.extension_len(&name.to_ascii_lowercase())];
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

impl TarCompress {
    /// Wrap a reader in the decoder for this codec.
    pub fn decoder<R: Read>(self, reader: R) -> Decoder<R> {
        match self {
            Self::None => Decoder::Passthrough(reader),
            Self::Gzip => Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(reader))),
        }
    }
}

/// Decoder wrapper for tar decompression.
pub enum Decoder<R> {
    Passthrough(R),
    Gzip(Box<flate2::read::GzDecoder<R>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
        }
    }
}

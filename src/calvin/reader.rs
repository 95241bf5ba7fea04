use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use log::info;

use super::codec::byte_reader::ByteReader;
use super::format;
use super::iter::GroupIterator;
use super::types::error::{Diagnostic, Result};
use super::types::models::*;

/// A decode session over one Calvin generic data file.
///
/// The file header, the descriptive data header, the parent headers and the
/// extra block are decoded when the reader is created. Data groups are only
/// decoded when asked for, through [`iter_groups`](Self::iter_groups),
/// [`read_data_groups`](Self::read_data_groups) or [`into_file`](Self::into_file).
///
/// A session owns a single cursor and must not be shared between threads.
/// Independent sessions over separate handles can run in parallel.
#[derive(Debug)]
pub struct CalvinReader<R> {
    source: ByteReader<R>,
    pub file_header: FileHeader,
    pub header: DataHeader,
    pub parents: Vec<DataHeader>,
    pub extra: Vec<DataHeader>,
    diagnostics: Vec<Diagnostic>,
    /// Number of diagnostics recorded while decoding the eager headers.
    eager_diagnostics: usize,
}

impl CalvinReader<BufReader<File>> {
    /// Opens and reads a Calvin file from the given path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - File cannot be opened
    /// - Magic number or version is not recognized
    /// - Any header field is truncated or carries a malformed count
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening Calvin file: {}", path.display());
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> CalvinReader<R> {
    /// Reads the eagerly decoded parts of a Calvin file from any seekable source.
    pub fn new(source: R) -> Result<Self> {
        let mut source = ByteReader::new(source)?;
        let mut diagnostics = Vec::new();

        let file_header = format::file_header::parse(&mut source)?;
        let header = format::header::parse(&mut source, &mut diagnostics)?;
        let parents = format::header::parse_list(&mut source, "parent header", &mut diagnostics)?;
        let extra = format::header::parse_list(&mut source, "extra header", &mut diagnostics)?;

        info!(
            "Calvin file opened: type={}, {} parent headers, {} extra headers, {} data groups declared",
            header.uid.as_deref().unwrap_or("<none>"),
            parents.len(),
            extra.len(),
            file_header.group_count
        );

        Ok(Self {
            source,
            file_header,
            header,
            parents,
            extra,
            eager_diagnostics: diagnostics.len(),
            diagnostics,
        })
    }

    /// Array identifier from the first extra-block entry.
    pub fn array_id(&self) -> Option<&str> {
        extra_parameter(&self.extra, ARRAY_ID_PARAMETER)
    }

    /// Array barcode from the first extra-block entry.
    pub fn barcode(&self) -> Option<&str> {
        extra_parameter(&self.extra, ARRAY_BARCODE_PARAMETER)
    }

    /// Non-fatal findings recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns an iterator that decodes one data group per step, following
    /// the offset chain from the file header.
    ///
    /// Every call starts a fresh traversal from the first group and replaces
    /// the diagnostics of any earlier traversal.
    pub fn iter_groups(&mut self) -> GroupIterator<'_, R> {
        self.diagnostics.truncate(self.eager_diagnostics);
        GroupIterator::new(
            &mut self.source,
            &mut self.diagnostics,
            self.file_header.first_group_offset,
            self.file_header.group_count,
        )
    }

    /// Decodes every reachable data group.
    ///
    /// The first fatal error aborts the traversal and is returned.
    pub fn read_data_groups(&mut self) -> Result<Vec<DataGroup>> {
        let groups = self.iter_groups().collect::<Result<Vec<_>>>()?;
        info!("Decoded {} data groups", groups.len());
        Ok(groups)
    }

    /// Materializes all data groups and releases the byte source.
    pub fn into_file(mut self) -> Result<CalvinFile> {
        let groups = self.read_data_groups()?;
        Ok(CalvinFile {
            file_header: self.file_header,
            header: self.header,
            parents: self.parents,
            extra: self.extra,
            groups,
            diagnostics: self.diagnostics,
        })
    }

    /// Releases the byte source without decoding any data groups.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

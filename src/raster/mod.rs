//! Paginated document to per-page image conversion.

pub mod canvas;
pub mod encoder;

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use lopdf::{content::Content, Document, Object, ObjectId};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::errors::{ConversionError, PageError};
use crate::export::PageSize;

pub use canvas::Canvas;
pub use encoder::{JpegPageEncoder, PageEncoder, DEFAULT_JPEG_QUALITY};

pub const DEFAULT_SCALE: f32 = 1.0;
const MAX_PARENT_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// JPEG quality, 1..=100.
    pub quality: u8,
    /// Pixels per PDF point; 1.0 renders at 72 dpi.
    pub scale: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            scale: DEFAULT_SCALE,
        }
    }
}

#[derive(Debug)]
pub struct PageFailure {
    /// 1-based page number.
    pub page: usize,
    pub path: PathBuf,
    pub error: PageError,
}

#[derive(Debug, Default)]
pub struct ConversionReport {
    pub page_count: usize,
    pub written: Vec<PathBuf>,
    pub failures: Vec<PageFailure>,
}

impl ConversionReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.written.len() == self.page_count
    }
}

/// Name of the image for 1-based page `number`.
pub fn page_file_name(number: usize, extension: &str) -> String {
    format!("page_{number}.{extension}")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RasterConverter {
    options: RasterOptions,
}

impl RasterConverter {
    pub fn new(options: RasterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RasterOptions {
        self.options
    }

    /// Converts every page of `source` into a JPEG inside `output_dir`.
    pub fn convert(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> Result<ConversionReport, ConversionError> {
        let encoder = JpegPageEncoder::new(self.options.quality);
        self.convert_with(&encoder, source, output_dir)
    }

    /// Converts with a caller-supplied encoder. A page that fails is
    /// recorded in the report and the remaining pages are still attempted.
    pub fn convert_with(
        &self,
        encoder: &dyn PageEncoder,
        source: &Path,
        output_dir: &Path,
    ) -> Result<ConversionReport, ConversionError> {
        check_output_dir(output_dir)?;
        let document =
            Document::load(source).map_err(|err| ConversionError::SourceUnreadable {
                path: source.to_path_buf(),
                reason: err.to_string(),
            })?;

        let pages = document.get_pages();
        let mut report = ConversionReport {
            page_count: pages.len(),
            ..ConversionReport::default()
        };

        for (idx, page_id) in pages.values().copied().enumerate() {
            let number = idx + 1;
            let path = output_dir.join(page_file_name(number, encoder.extension()));
            match self.convert_page(&document, page_id, encoder, &path) {
                Ok(()) => report.written.push(path),
                Err(error) => {
                    warn!(page = number, path = %path.display(), %error, "page conversion failed");
                    report.failures.push(PageFailure {
                        page: number,
                        path,
                        error,
                    });
                }
            }
        }

        info!(
            source = %source.display(),
            pages = report.page_count,
            written = report.written.len(),
            failed = report.failures.len(),
            "document rasterized"
        );
        Ok(report)
    }

    fn convert_page(
        &self,
        document: &Document,
        page_id: ObjectId,
        encoder: &dyn PageEncoder,
        path: &Path,
    ) -> Result<(), PageError> {
        let bytes = document
            .get_page_content(page_id)
            .map_err(|err| PageError::Content(err.to_string()))?;
        let content = Content::decode(&bytes).map_err(|err| PageError::Content(err.to_string()))?;
        let size = media_box(document, page_id);

        let mut canvas = Canvas::new(size.width, size.height, self.options.scale)?;
        canvas.paint(&content.operations);
        let image = canvas.into_image();

        let mut writer = BufWriter::new(File::create(path)?);
        encoder.encode(&image, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn check_output_dir(dir: &Path) -> Result<(), ConversionError> {
    let unusable = |source| ConversionError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(dir).map_err(unusable)?;
    if !metadata.is_dir() {
        return Err(unusable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }
    NamedTempFile::new_in(dir).map_err(unusable)?;
    Ok(())
}

/// Page size from the nearest `MediaBox`, walking up `Parent` links.
/// Falls back to US Letter.
fn media_box(document: &Document, page_id: ObjectId) -> PageSize {
    let mut node = document.get_dictionary(page_id).ok();
    for _ in 0..MAX_PARENT_DEPTH {
        let Some(dict) = node else {
            break;
        };
        if let Some(size) = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|object| object.as_array().ok())
            .and_then(|values| size_of_box(values))
        {
            return size;
        }
        node = dict
            .get(b"Parent")
            .ok()
            .and_then(|parent| parent.as_reference().ok())
            .and_then(|parent_id| document.get_dictionary(parent_id).ok());
    }
    PageSize::LETTER
}

fn size_of_box(values: &[Object]) -> Option<PageSize> {
    let corners: Vec<f32> = values.iter().filter_map(canvas::number).collect();
    match corners[..] {
        [x0, y0, x1, y1] if x1 > x0 && y1 > y0 => Some(PageSize {
            width: x1 - x0,
            height: y1 - y0,
        }),
        _ => None,
    }
}

use crate::models::{Module, StudentInfo};
use crate::paths;
use camino::{Utf8Path, Utf8PathBuf};
use docx_rs::{AlignmentType, Docx, PageMargin, Paragraph, Pic, Run, RunFonts};
use std::fs;
use thiserror::Error;

/// The single font used throughout a generated sheet.
const SHEET_FONT: &str = "Times New Roman";

/// Logo dimensions in EMUs (1.1in x 1.05in, 914400 EMU per inch).
const LOGO_WIDTH_EMU: u32 = 1_005_840;
const LOGO_HEIGHT_EMU: u32 = 960_120;

/// Page margins in twips (1440 per inch). The header area sits flush with
/// the top of the page; the other margins are a narrow half inch.
const MARGIN_TOP: i32 = 0;
const MARGIN_SIDE: i32 = 720;
const MARGIN_BOTTOM: i32 = 720;

/// Errors that can occur during sheet generation
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Sheet number {0} is out of range (1-99)")]
    OutOfRange(u32),

    #[error("Failed to write {path}: {source}")]
    Filesystem {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory {0}")]
    OutputDirectory(#[from] crate::paths::PathError),

    #[error("Failed to build document: {0}")]
    Document(String),

    #[error("Could not find a free filename for {0}")]
    Collision(String),

    #[error("A sheet is already being generated")]
    Busy,
}

/// Everything needed to generate one sheet.
///
/// The request is immutable once submitted; the output directory is
/// resolved by the caller (module-dedicated or global) before building it.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub student: StudentInfo,
    pub module: Module,
    pub sheet_number: u32,
    pub output_dir: Utf8PathBuf,
    pub logo_path: Option<Utf8PathBuf>,
}

/// Service that builds and writes lab sheet documents.
///
/// A single synchronous, non-retrying pass: validate the sheet number,
/// pick a collision-free filename, build the docx body, write the file.
/// Callers that must stay responsive run this through
/// [`GenerationDispatcher`](crate::services::dispatch::GenerationDispatcher).
///
/// # Collision policy
///
/// An existing file of the same name is never overwritten. A numeric
/// suffix is appended instead (`Practical_SE2052_01.docx`,
/// `Practical_SE2052_01_2.docx`, `Practical_SE2052_01_3.docx`, ...), so
/// regenerating a sheet keeps the earlier copy.
pub struct SheetGenerator;

impl SheetGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a sheet and return the path of the written file.
    pub fn generate(&self, request: &GenerationRequest) -> Result<Utf8PathBuf, GenerationError> {
        if !(1..=99).contains(&request.sheet_number) {
            return Err(GenerationError::OutOfRange(request.sheet_number));
        }

        paths::ensure_dir(&request.output_dir)?;

        let stem = Self::file_stem(&request.module, request.sheet_number);
        let target = Self::next_free_path(&request.output_dir, &stem)?;

        let label = Self::sheet_label(&request.module, request.sheet_number);
        let docx = Self::build_document(request, &label)?;

        let mut file = fs::File::create(&target).map_err(|source| GenerationError::Filesystem {
            path: target.clone(),
            source,
        })?;

        docx.build()
            .pack(&mut file)
            .map_err(|e| GenerationError::Document(e.to_string()))?;

        tracing::info!("Generated sheet: {}", target);
        Ok(target)
    }

    /// Display label, e.g. "Practical 01".
    pub fn sheet_label(module: &Module, sheet_number: u32) -> String {
        format!("{} {:02}", module.term(), sheet_number)
    }

    /// Filename stem, e.g. "Practical_SE2052_01". Whitespace in custom
    /// terms becomes underscores.
    pub fn file_stem(module: &Module, sheet_number: u32) -> String {
        let term: String = module
            .term()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!("{}_{}_{:02}", term, module.code, sheet_number)
    }

    /// First path under `dir` matching the stem that does not yet exist.
    fn next_free_path(dir: &Utf8Path, stem: &str) -> Result<Utf8PathBuf, GenerationError> {
        let direct = dir.join(format!("{stem}.docx"));
        if !direct.exists() {
            return Ok(direct);
        }

        for suffix in 2..=99u32 {
            let candidate = dir.join(format!("{stem}_{suffix}.docx"));
            if !candidate.exists() {
                tracing::debug!("Filename collision, using {}", candidate);
                return Ok(candidate);
            }
        }

        Err(GenerationError::Collision(format!("{stem}.docx")))
    }

    /// Build the document body: optional logo, centered module title,
    /// sheet label, student line, separator rule, then a blank body.
    fn build_document(request: &GenerationRequest, label: &str) -> Result<Docx, GenerationError> {
        let mut docx = Docx::new().page_margin(
            PageMargin::new()
                .top(MARGIN_TOP)
                .bottom(MARGIN_BOTTOM)
                .left(MARGIN_SIDE)
                .right(MARGIN_SIDE),
        );

        if let Some(logo) = Self::load_logo(request.logo_path.as_deref()) {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .align(AlignmentType::Center)
                    .add_run(Run::new().add_image(logo)),
            );
        }

        let title = format!("{} -- {}", request.module.name, request.module.code);
        docx = docx
            .add_paragraph(
                Paragraph::new()
                    .align(AlignmentType::Center)
                    .add_run(Self::styled_run(&title, 40, true)),
            )
            .add_paragraph(Paragraph::new().add_run(Self::styled_run(label, 24, true)))
            .add_paragraph(Paragraph::new().add_run(Self::styled_run(
                &format!("{} - {}", request.student.name, request.student.id),
                24,
                true,
            )))
            .add_paragraph(
                Paragraph::new().add_run(Self::styled_run(&"_".repeat(95), 24, false)),
            )
            // Blank body area for content
            .add_paragraph(Paragraph::new());

        Ok(docx)
    }

    /// A run in the uniform sheet font. `size` is in half-points.
    fn styled_run(text: &str, size: usize, bold: bool) -> Run {
        let mut run = Run::new()
            .add_text(text)
            .size(size)
            .fonts(RunFonts::new().ascii(SHEET_FONT).hi_ansi(SHEET_FONT));
        if bold {
            run = run.bold();
        }
        run
    }

    /// Read the logo image if a path was configured and the file exists.
    /// A missing or unreadable logo is not fatal; the sheet is generated
    /// without it.
    fn load_logo(logo_path: Option<&Utf8Path>) -> Option<Pic> {
        let path = logo_path?;
        if !path.exists() {
            tracing::warn!("Logo not found at {}, generating without it", path);
            return None;
        }

        match fs::read(path) {
            Ok(bytes) => Some(Pic::new_with_dimensions(
                bytes,
                LOGO_WIDTH_EMU,
                LOGO_HEIGHT_EMU,
            )),
            Err(e) => {
                tracing::warn!("Failed to read logo {}: {}", path, e);
                None
            }
        }
    }
}

impl Default for SheetGenerator {
    fn default() -> Self {
        Self::new()
    }
}

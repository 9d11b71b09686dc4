//! Rendering: lay the audit report out as an A4 PDF.
//!
//! Layout is deliberately simple and fully deterministic: a title header
//! (with optional logo), then one section per rubric category in rubric
//! order — bold heading, colour-coded grade letter on the right, wrapped
//! rationale paragraph, and a bulleted quick-win list. Page breaks are
//! inserted whenever the cursor would run past the bottom margin.
//!
//! The built-in Helvetica fonts cover the WinAnsi repertoire only, so all
//! text passes through [`sanitize_text`], which maps typographic punctuation
//! (curly quotes, en dashes, ellipses) to ASCII and drops anything else the
//! font cannot encode.

use crate::error::AuditError;
use crate::report::{AuditReport, Grade};
use printpdf::image_crate::{self, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

// A4 geometry in millimetres.
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 18.0;

const BODY_LINE_H: f32 = 5.0;
const BODY_WRAP_CHARS: usize = 95;
const BULLET_WRAP_CHARS: usize = 90;
const LOGO_HEIGHT_MM: f32 = 16.0;

/// Default image resolution printpdf assumes when no DPI is given.
const IMAGE_DPI: f32 = 300.0;

/// Write the report as a PDF at `out_path`, overwriting any existing file.
///
/// A missing or unreadable logo is silently omitted; only an unwritable
/// output path or a document-level failure is an error.
pub fn write_pdf(
    report: &AuditReport,
    logo: Option<&Path>,
    out_path: &Path,
) -> Result<(), AuditError> {
    let (doc, page, layer) = PdfDocument::new(
        "Growth Marketing Audit",
        Mm(PAGE_W),
        Mm(PAGE_H),
        "content",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AuditError::PdfBuildFailed {
            detail: e.to_string(),
        })?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AuditError::PdfBuildFailed {
            detail: e.to_string(),
        })?;

    let mut cursor = Cursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_H - MARGIN_TOP,
        regular,
        bold,
    };

    if let Some(path) = logo {
        if let Some(logo_img) = load_logo(path) {
            place_logo(&cursor, &logo_img);
            cursor.y -= LOGO_HEIGHT_MM + 6.0;
        }
    }

    // ── Header ───────────────────────────────────────────────────────────
    cursor.set_color(INK);
    cursor.text_bold("Growth Marketing Audit", 19.0, MARGIN_LEFT);
    cursor.y -= 8.0;
    cursor.set_color(GRAY);
    cursor.text(&sanitize_text(&report.url), 10.0, MARGIN_LEFT);
    cursor.y -= 12.0;

    // ── Sections ─────────────────────────────────────────────────────────
    for result in &report.results {
        cursor.ensure_room(34.0);

        cursor.set_color(INK);
        cursor.text_bold(&sanitize_text(&result.category), 15.0, MARGIN_LEFT);
        cursor.set_color(grade_color(result.grade));
        cursor.text_bold(result.grade.letter(), 15.0, PAGE_W - MARGIN_RIGHT - 8.0);
        cursor.y -= 9.0;

        cursor.set_color(INK);
        for line in wrap_text(&sanitize_text(&result.rationale), BODY_WRAP_CHARS) {
            cursor.ensure_room(BODY_LINE_H + 1.0);
            cursor.text(&line, 10.5, MARGIN_LEFT);
            cursor.y -= BODY_LINE_H;
        }
        cursor.y -= 3.0;

        cursor.ensure_room(12.0);
        cursor.text_bold("Quick wins", 11.5, MARGIN_LEFT);
        cursor.y -= 6.5;

        for win in &result.quick_wins {
            let lines = wrap_text(&sanitize_text(win), BULLET_WRAP_CHARS);
            for (i, line) in lines.iter().enumerate() {
                cursor.ensure_room(BODY_LINE_H + 1.0);
                if i == 0 {
                    cursor.text(&format!("-  {line}"), 10.0, MARGIN_LEFT);
                } else {
                    cursor.text(line, 10.0, MARGIN_LEFT + 4.0);
                }
                cursor.y -= BODY_LINE_H;
            }
            cursor.y -= 1.0;
        }
        cursor.y -= 9.0;
    }

    // ── Write out ────────────────────────────────────────────────────────
    let file = File::create(out_path).map_err(|e| AuditError::OutputWriteFailed {
        path: out_path.to_path_buf(),
        source: e,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| AuditError::PdfBuildFailed {
            detail: e.to_string(),
        })?;

    info!("report written to {}", out_path.display());
    Ok(())
}

// ── Layout cursor ────────────────────────────────────────────────────────

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Cursor<'_> {
    /// Start a new page if fewer than `needed` millimetres remain.
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_H - MARGIN_TOP;
        }
    }

    fn text(&self, s: &str, size: f32, x: f32) {
        self.layer.use_text(s, size, Mm(x), Mm(self.y), &self.regular);
    }

    fn text_bold(&self, s: &str, size: f32, x: f32) {
        self.layer.use_text(s, size, Mm(x), Mm(self.y), &self.bold);
    }

    fn set_color(&self, (r, g, b): (f32, f32, f32)) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }
}

// ── Colours ──────────────────────────────────────────────────────────────

const INK: (f32, f32, f32) = (0.11, 0.11, 0.11);
const GRAY: (f32, f32, f32) = (0.45, 0.45, 0.45);

/// Colour for a grade letter, green through red.
fn grade_color(grade: Grade) -> (f32, f32, f32) {
    match grade {
        Grade::A => (0.27, 0.81, 0.11),
        Grade::B => (0.73, 0.86, 0.27),
        Grade::C => (0.95, 0.79, 0.20),
        Grade::D => (0.95, 0.63, 0.20),
        Grade::F => (0.90, 0.12, 0.12),
    }
}

// ── Logo ─────────────────────────────────────────────────────────────────

/// Decode the logo, flattening any alpha channel. Returns None on any
/// failure — an optional logo never fails the run.
fn load_logo(path: &Path) -> Option<image_crate::DynamicImage> {
    match image_crate::open(path) {
        Ok(img) => Some(image_crate::DynamicImage::ImageRgb8(img.to_rgb8())),
        Err(e) => {
            debug!("logo '{}' skipped: {}", path.display(), e);
            None
        }
    }
}

/// Place the logo at the top-left, scaled to [`LOGO_HEIGHT_MM`].
fn place_logo(cursor: &Cursor<'_>, img: &image_crate::DynamicImage) {
    let (px_w, px_h) = img.dimensions();
    if px_w == 0 || px_h == 0 {
        return;
    }
    let natural_h_mm = px_h as f32 / IMAGE_DPI * 25.4;
    let scale = LOGO_HEIGHT_MM / natural_h_mm;

    let pdf_image = Image::from_dynamic_image(img);
    pdf_image.add_to_layer(
        cursor.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_LEFT)),
            translate_y: Some(Mm(cursor.y - LOGO_HEIGHT_MM)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            ..Default::default()
        },
    );
}

// ── Text helpers ─────────────────────────────────────────────────────────

/// Map typographic punctuation to ASCII and drop anything outside the
/// Latin-1 repertoire of the built-in fonts.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{201C}' | '\u{201D}' | '\u{201E}' => out.push('"'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('-'),
            '\u{00A0}' => out.push(' '),
            '\n' | '\r' | '\t' => out.push(' '),
            c if (c as u32) < 0x100 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Greedy word wrap at `width` characters. Words longer than the width are
/// hard-split so no line ever exceeds it.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > width {
                lines.push(chars.drain(..width).collect());
            }
            current = chars.into_iter().collect();
            continue;
        }
        let current_len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let text = "one two three four five six seven eight nine ten";
        for line in wrap_text(text, 12) {
            assert!(line.chars().count() <= 12, "line too long: '{line}'");
        }
    }

    #[test]
    fn wrap_keeps_all_words() {
        let text = "alpha beta gamma delta";
        let joined = wrap_text(text, 10).join(" ");
        assert_eq!(joined, text);
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        let lines = wrap_text("supercalifragilistic", 6);
        assert!(lines.iter().all(|l| l.chars().count() <= 6));
        assert_eq!(lines.concat(), "supercalifragilistic");
    }

    #[test]
    fn wrap_empty_is_empty() {
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn sanitize_maps_typographic_punctuation() {
        assert_eq!(
            sanitize_text("\u{201C}great\u{201D} \u{2013} really\u{2026}"),
            "\"great\" - really..."
        );
    }

    #[test]
    fn sanitize_drops_non_latin1() {
        assert_eq!(sanitize_text("ok \u{4F60}\u{597D} done"), "ok  done");
    }

    #[test]
    fn sanitize_flattens_newlines() {
        assert_eq!(sanitize_text("a\nb\r\nc"), "a b  c");
    }

    #[test]
    fn grade_colors_are_distinct() {
        let all = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(grade_color(*a), grade_color(*b));
            }
        }
    }
}

use crate::domain::model::{Element, Page, PageSetup, ReportDocument, Rgb};
use crate::domain::ports::DocumentRenderer;
use crate::utils::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

const PT_PER_MM: f32 = 72.0 / 25.4;
const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const BODY_SIZE: f32 = 12.0;
const LABEL_WIDTH_MM: f32 = 45.0;
const BAR_BACKGROUND: Rgb = Rgb(230, 230, 230);
const BLACK: Rgb = Rgb(0, 0, 0);
/// Helvetica 平均字寬約為字級的一半
const AVG_GLYPH_EM: f32 = 0.5;

/// 以 lopdf 輸出 PDF；內容超出頁面時加高該頁，不截斷也不分頁
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    creator: String,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self {
            creator: format!("goal-report {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>> {
        let setup = document.setup();
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => regular_id,
                FONT_BOLD => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(document.page_count());
        for page in document.pages() {
            let laid_out = layout_page(page, setup);
            let content = Content {
                operations: laid_out.operations(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    mm(setup.width_mm).into(),
                    mm(laid_out.height_mm).into(),
                ],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => pdf_text(document.title()),
            "Creator" => pdf_text(&self.creator),
            "Subject" => pdf_text(&format!("Template: {}", document.template())),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        tracing::debug!(
            "Rendered {} pages into {} bytes",
            document.page_count(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// 版面座標以 mm 表示，原點在左上角
#[derive(Debug, Clone, PartialEq)]
enum Mark {
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        bold: bool,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
}

#[derive(Debug, Clone)]
struct LaidOutPage {
    height_mm: f32,
    marks: Vec<Mark>,
}

impl LaidOutPage {
    fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        for mark in &self.marks {
            match mark {
                Mark::Rect {
                    x,
                    y,
                    width,
                    height,
                    fill,
                } => {
                    ops.push(fill_color(*fill));
                    ops.push(Operation::new(
                        "re",
                        vec![
                            mm(*x).into(),
                            mm(self.height_mm - y - height).into(),
                            mm(*width).into(),
                            mm(*height).into(),
                        ],
                    ));
                    ops.push(Operation::new("f", vec![]));
                }
                Mark::Text {
                    x,
                    baseline,
                    size,
                    bold,
                    text,
                } => {
                    let font = if *bold { FONT_BOLD } else { FONT_REGULAR };
                    ops.push(fill_color(BLACK));
                    ops.push(Operation::new("BT", vec![]));
                    ops.push(Operation::new("Tf", vec![font.into(), (*size).into()]));
                    ops.push(Operation::new(
                        "Td",
                        vec![mm(*x).into(), mm(self.height_mm - baseline).into()],
                    ));
                    ops.push(Operation::new("Tj", vec![pdf_text(text)]));
                    ops.push(Operation::new("ET", vec![]));
                }
            }
        }
        ops
    }
}

fn layout_page(page: &Page, setup: PageSetup) -> LaidOutPage {
    let x = setup.margin_mm;
    let width = setup.width_mm - 2.0 * setup.margin_mm;
    let mut cursor = setup.margin_mm;
    let mut marks = Vec::new();

    for block in &page.blocks {
        match &block.element {
            Element::Title { text, size } => {
                let line = line_height(*size);
                marks.push(text_mark(x, cursor + line * 0.75, *size, true, text));
                cursor += line;
            }
            Element::Text { text, size } => {
                let line = line_height(*size);
                marks.push(text_mark(x, cursor + line * 0.75, *size, false, text));
                cursor += line;
            }
            Element::HeaderCell { text, height, fill } => {
                marks.push(Mark::Rect {
                    x,
                    y: cursor,
                    width,
                    height: *height,
                    fill: *fill,
                });
                let baseline = cursor + height / 2.0 + pt_to_mm(BODY_SIZE) / 3.0;
                marks.push(text_mark(x + 2.0, baseline, BODY_SIZE, true, text));
                cursor += height;
            }
            Element::Paragraph {
                text,
                size,
                line_height,
            } => {
                for line in wrap_text(text, width, *size) {
                    marks.push(text_mark(x, cursor + line_height * 0.7, *size, false, &line));
                    cursor += line_height;
                }
            }
            Element::LabelValue {
                label,
                value,
                height,
            } => {
                let baseline = cursor + height * 0.7;
                marks.push(text_mark(x, baseline, BODY_SIZE, true, label));
                marks.push(text_mark(x + LABEL_WIDTH_MM, baseline, BODY_SIZE, false, value));
                cursor += height;
            }
            Element::ProgressBar {
                fraction,
                label,
                height,
                fill,
            } => {
                marks.push(Mark::Rect {
                    x,
                    y: cursor,
                    width,
                    height: *height,
                    fill: BAR_BACKGROUND,
                });
                let filled = width * (*fraction as f32);
                if filled > 0.0 {
                    marks.push(Mark::Rect {
                        x,
                        y: cursor,
                        width: filled,
                        height: *height,
                        fill: *fill,
                    });
                }
                let label_x = x + (width - text_width(label, BODY_SIZE)) / 2.0;
                let baseline = cursor + height / 2.0 + pt_to_mm(BODY_SIZE) / 3.0;
                marks.push(text_mark(label_x, baseline, BODY_SIZE, true, label));
                cursor += height;
            }
        }
        cursor += block.spacing_after;
    }

    // 內容超過下邊界時加高頁面
    let height_mm = setup.height_mm.max(cursor + setup.margin_mm);
    LaidOutPage { height_mm, marks }
}

fn text_mark(x: f32, baseline: f32, size: f32, bold: bool, text: &str) -> Mark {
    Mark::Text {
        x,
        baseline,
        size,
        bold,
        text: text.to_string(),
    }
}

fn wrap_text(text: &str, width_mm: f32, size: f32) -> Vec<String> {
    let max_chars = ((width_mm / text_width("x", size) + 1e-3).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        // 過長的單字強制斷開
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * pt_to_mm(size) * AVG_GLYPH_EM
}

fn line_height(size: f32) -> f32 {
    pt_to_mm(size) * 1.5
}

fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

fn mm(value: f32) -> f32 {
    value * PT_PER_MM
}

fn fill_color(Rgb(r, g, b): Rgb) -> Operation {
    Operation::new(
        "rg",
        vec![
            (r as f32 / 255.0).into(),
            (g as f32 / 255.0).into(),
            (b as f32 / 255.0).into(),
        ],
    )
}

/// 標準字型使用 WinAnsi 編碼，超出 Latin-1 的字元以 '?' 取代
fn pdf_text(text: &str) -> Object {
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::string_literal(bytes)
}

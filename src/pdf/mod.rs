// Certificate rendering: overlays computed text fields onto a fixed
// single-page PDF template. The template bytes are loaded once at startup
// and held immutably; every render parses its own document from the cached
// bytes so concurrent requests never share a mutable page object.

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;
use thiserror::Error;

use crate::certification::CertificationTier;

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("office record not found")]
    NotFound,
    #[error("the {0} tier does not qualify for a certificate")]
    Ineligible(String),
    #[error("certificate template unavailable: {0}")]
    TemplateUnavailable(String),
    #[error("certificate rendering failed: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(e: E) -> CertificateError {
    CertificateError::Render(e.to_string())
}

/// Everything the renderer needs from an office record, as plain values.
#[derive(Debug, Clone)]
pub struct CertificateData {
    pub office_name: String,
    pub department: Option<String>,
    pub tier: CertificationTier,
    pub percent: u8,
    pub issue_date: Option<String>,
}

#[derive(Debug)]
pub struct RenderedCertificate {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl RenderedCertificate {
    pub const CONTENT_TYPE: &'static str = "application/pdf";
}

const FONT_NAME: &str = "FGm1";

struct TextField {
    x: f32,
    y_from_top: f32,
    size: f32,
    color: (f32, f32, f32),
}

// Coordinates are authored against the shipped A4 landscape template and
// must be re-tuned if the template artwork changes.
const NAME_FIELD: TextField = TextField { x: 120.0, y_from_top: 215.0, size: 30.0, color: (0.07, 0.33, 0.21) };
const DEPARTMENT_FIELD: TextField = TextField { x: 120.0, y_from_top: 252.0, size: 15.0, color: (0.35, 0.35, 0.35) };
const TIER_FIELD: TextField = TextField { x: 120.0, y_from_top: 316.0, size: 24.0, color: (0.72, 0.53, 0.11) };
const PERCENT_FIELD: TextField = TextField { x: 120.0, y_from_top: 352.0, size: 15.0, color: (0.2, 0.2, 0.2) };
const MESSAGE_FIELD: TextField = TextField { x: 120.0, y_from_top: 398.0, size: 13.0, color: (0.07, 0.33, 0.21) };
const DATE_FIELD: TextField = TextField { x: 120.0, y_from_top: 470.0, size: 12.0, color: (0.35, 0.35, 0.35) };

/// One fixed line of encouragement per medal tier.
fn tier_message(tier: CertificationTier) -> &'static str {
    match tier {
        CertificationTier::Bronze => "A strong first step towards a sustainable workplace.",
        CertificationTier::Silver => "Sustainable habits are taking hold across this space.",
        CertificationTier::Gold => "An exemplary commitment to sustainable operations.",
        CertificationTier::Platinum => "Leading the way in workplace sustainability.",
        _ => "",
    }
}

/// Immutable, process-wide template resource. Validated once at load; renders
/// work on a fresh parse of the cached bytes.
#[derive(Clone, Debug)]
pub struct CertificateTemplate {
    bytes: Vec<u8>,
}

impl CertificateTemplate {
    pub fn load(path: &Path) -> Result<Self, CertificateError> {
        let bytes = std::fs::read(path).map_err(|e| {
            CertificateError::TemplateUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CertificateError> {
        let doc = Document::load_mem(&bytes)
            .map_err(|e| CertificateError::TemplateUnavailable(e.to_string()))?;
        let page_id = first_page(&doc).ok_or_else(|| {
            CertificateError::TemplateUnavailable("template has no pages".to_string())
        })?;
        page_height(&doc, page_id)
            .map_err(|e| CertificateError::TemplateUnavailable(e.to_string()))?;
        Ok(Self { bytes })
    }

    pub fn render(&self, data: &CertificateData) -> Result<RenderedCertificate, CertificateError> {
        if !data.tier.qualifies_for_certificate() {
            return Err(CertificateError::Ineligible(data.tier.label().to_string()));
        }

        let mut doc = Document::load_mem(&self.bytes).map_err(render_err)?;
        let page_id = first_page(&doc)
            .ok_or_else(|| CertificateError::Render("template has no pages".to_string()))?;
        let height = page_height(&doc, page_id)?;

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding"
        });
        register_font(&mut doc, page_id, font_id)?;

        let mut operations = vec![Operation::new("q", vec![])];
        draw_field(&mut operations, &NAME_FIELD, &data.office_name, height);
        if let Some(department) = &data.department {
            draw_field(&mut operations, &DEPARTMENT_FIELD, department, height);
        }
        draw_field(&mut operations, &TIER_FIELD, data.tier.label(), height);
        draw_field(
            &mut operations,
            &PERCENT_FIELD,
            &format!("{}% of the sustainability checklist completed", data.percent),
            height,
        );
        draw_field(&mut operations, &MESSAGE_FIELD, tier_message(data.tier), height);
        draw_field(&mut operations, &DATE_FIELD, &issue_date(data), height);
        operations.push(Operation::new("Q", vec![]));

        let encoded = Content { operations }.encode().map_err(render_err)?;
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        append_page_content(&mut doc, page_id, overlay_id)?;

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(render_err)?;

        Ok(RenderedCertificate {
            bytes,
            filename: format!("certificate_{}.pdf", filename_part(&data.office_name)),
        })
    }
}

fn issue_date(data: &CertificateData) -> String {
    match &data.issue_date {
        Some(date) if !date.trim().is_empty() => date.trim().to_string(),
        _ => Utc::now().format("%B %d, %Y").to_string(),
    }
}

fn filename_part(office_name: &str) -> String {
    let cleaned: String = office_name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/'))
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "office".to_string()
    } else {
        cleaned
    }
}

fn draw_field(operations: &mut Vec<Operation>, field: &TextField, text: &str, page_height: f32) {
    if text.is_empty() {
        return;
    }
    let (r, g, b) = field.color;
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![FONT_NAME.into(), field.size.into()]));
    operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    operations.push(Operation::new(
        "Td",
        vec![field.x.into(), (page_height - field.y_from_top).into()],
    ));
    operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    operations.push(Operation::new("ET", vec![]));
}

fn first_page(doc: &Document) -> Option<ObjectId> {
    doc.get_pages().into_values().next()
}

fn as_pt(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

/// Page height from the MediaBox, honoring boxes inherited from ancestor
/// Pages nodes.
fn page_height(doc: &Document, page_id: ObjectId) -> Result<f32, CertificateError> {
    let mut current = page_id;
    for _ in 0..16 {
        let dict = doc.get_dictionary(current).map_err(render_err)?;
        if let Ok(media_box) = dict.get(b"MediaBox") {
            let media_box = match media_box {
                Object::Reference(id) => doc.get_object(*id).map_err(render_err)?,
                direct => direct,
            };
            let coords = media_box.as_array().map_err(render_err)?;
            if coords.len() == 4 {
                if let (Some(y0), Some(y1)) = (as_pt(&coords[1]), as_pt(&coords[3])) {
                    return Ok(y1 - y0);
                }
            }
            return Err(CertificateError::Render("malformed MediaBox".to_string()));
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => current = *id,
            _ => break,
        }
    }
    Err(CertificateError::Render("page has no MediaBox".to_string()))
}

#[derive(Clone, Copy)]
enum ResourcesSlot {
    Inline,
    Indirect(ObjectId),
    Missing,
}

/// Registers the overlay font in the first page's resources. Resources and
/// the Font subdictionary may each be direct or indirect; a page with no
/// Resources entry gets a copy of its inherited resources so the overlay
/// font does not shadow fonts the template's own content relies on.
fn register_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<(), CertificateError> {
    let slot = {
        let page = doc.get_dictionary(page_id).map_err(render_err)?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => ResourcesSlot::Indirect(*id),
            Ok(Object::Dictionary(_)) => ResourcesSlot::Inline,
            _ => ResourcesSlot::Missing,
        }
    };

    if let ResourcesSlot::Missing = slot {
        let inherited = inherited_resources(doc, page_id);
        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(render_err)?;
        page.set("Resources", Object::Dictionary(inherited));
    }

    let font_slot = {
        let resources = match slot {
            ResourcesSlot::Indirect(id) => doc.get_dictionary(id).map_err(render_err)?,
            _ => {
                let page = doc.get_dictionary(page_id).map_err(render_err)?;
                page.get(b"Resources")
                    .and_then(Object::as_dict)
                    .map_err(render_err)?
            }
        };
        match resources.get(b"Font") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        }
    };

    if let Some(fonts_id) = font_slot {
        let fonts = doc
            .get_object_mut(fonts_id)
            .and_then(Object::as_dict_mut)
            .map_err(render_err)?;
        fonts.set(FONT_NAME, Object::Reference(font_id));
        return Ok(());
    }

    let resources = match slot {
        ResourcesSlot::Indirect(id) => doc
            .get_object_mut(id)
            .and_then(Object::as_dict_mut)
            .map_err(render_err)?,
        _ => {
            let page = doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(render_err)?;
            match page.get_mut(b"Resources") {
                Ok(Object::Dictionary(resources)) => resources,
                _ => {
                    return Err(CertificateError::Render(
                        "page resources unavailable".to_string(),
                    ))
                }
            }
        }
    };
    if !resources.has(b"Font") {
        resources.set("Font", Object::Dictionary(Dictionary::new()));
    }
    match resources.get_mut(b"Font") {
        Ok(Object::Dictionary(fonts)) => {
            fonts.set(FONT_NAME, Object::Reference(font_id));
            Ok(())
        }
        _ => Err(CertificateError::Render(
            "page font table unavailable".to_string(),
        )),
    }
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = page_id;
    for _ in 0..16 {
        let dict = match doc.get_dictionary(current) {
            Ok(dict) => dict,
            Err(_) => break,
        };
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return resources.clone(),
            Ok(Object::Reference(id)) => {
                if let Ok(resources) = doc.get_dictionary(*id) {
                    return resources.clone();
                }
            }
            _ => {}
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => current = *id,
            _ => break,
        }
    }
    Dictionary::new()
}

/// Appends the overlay stream after the existing page content so the text
/// draws on top of the template artwork.
fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    overlay_id: ObjectId,
) -> Result<(), CertificateError> {
    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(render_err)?;
    let merged = match page.get(b"Contents").ok().cloned() {
        Some(Object::Array(mut streams)) => {
            streams.push(Object::Reference(overlay_id));
            Object::Array(streams)
        }
        Some(existing @ Object::Reference(_)) => {
            Object::Array(vec![existing, Object::Reference(overlay_id)])
        }
        _ => Object::Reference(overlay_id),
    };
    page.set("Contents", merged);
    Ok(())
}

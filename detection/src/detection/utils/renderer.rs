use crate::utils::config::Config;
use ab_glyph::{FontArc, PxScale};
use common::detection::record::DetectionRecord;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use lazy_static::lazy_static;

lazy_static! {
    static ref FONT: FontArc = FontArc::try_from_slice(include_bytes!("../../../assets/DejaVuSans.ttf"))
        .expect("Embedded font data is valid");
}

#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub border_width: u32,
    pub border_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    pub font_size: f32,
}

impl RenderStyle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            border_width: config.border_width,
            border_color: Rgb(config.border_color),
            text_color: Rgb(config.text_color),
            font_size: config.font_size,
        }
    }
}

/// Draws one hollow rectangle and one text label per record onto a copy of
/// the source image, in record order. Corners are integer-truncated; the
/// label sits 10 pixels above the top-left corner and may be clipped at the
/// image edge. Boxes whose truncated extent is not positive cannot be
/// represented as a rectangle and keep only their label.
pub fn render(image: &RgbImage, detections: &[DetectionRecord], style: &RenderStyle) -> RgbImage {
    let mut canvas = image.clone();
    for record in detections {
        let left = record.bbox.x1 as i32;
        let top = record.bbox.y1 as i32;
        let width = record.bbox.x2 as i32 - left;
        let height = record.bbox.y2 as i32 - top;
        if width > 0 && height > 0 {
            let base_rectangle = Rect::at(left, top).of_size(width as u32, height as u32);
            for i in 0..style.border_width {
                let offset_rect = Rect::at(base_rectangle.left() - i as i32, base_rectangle.top() - i as i32)
                    .of_size(base_rectangle.width() + 2 * i, base_rectangle.height() + 2 * i);
                draw_hollow_rect_mut(&mut canvas, offset_rect, style.border_color);
            }
        }
        let label = format!("{name}: {confidence:.2}", name = record.label, confidence = record.confidence);
        let scale = PxScale::from(style.font_size);
        draw_text_mut(&mut canvas, style.text_color, left, top - 10, scale, &*FONT, &label);
    }
    canvas
}

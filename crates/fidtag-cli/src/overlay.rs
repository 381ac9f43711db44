//! Draws detection outlines and id labels onto the color image.

use fidtag_detect::TagDetection;
use image::{Rgb, RgbImage};
use nalgebra::Point2;

const OUTLINE: Rgb<u8> = Rgb([0, 255, 0]);
const FIRST_EDGE: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL: Rgb<u8> = Rgb([255, 0, 255]);

const GLYPH_SCALE: u32 = 2;

/// Draw each detection in sequence order: the closed quad outline (first
/// edge in a distinct color, marking the tag orientation) and the id near
/// the center. Mutates the buffer in place; later detections may overpaint
/// earlier ones.
pub fn draw_detections(img: &mut RgbImage, detections: &[TagDetection]) {
    for det in detections {
        for i in 0..4 {
            let color = if i == 0 { FIRST_EDGE } else { OUTLINE };
            draw_line(img, det.corners[i], det.corners[(i + 1) % 4], color);
        }
        draw_label(
            img,
            &det.id.to_string(),
            det.center.x.round() as i32 + 3,
            det.center.y.round() as i32 - 5,
        );
    }
}

/// Bresenham segment, clipped per pixel.
fn draw_line(img: &mut RgbImage, from: Point2<f32>, to: Point2<f32>, color: Rgb<u8>) {
    let (mut x, mut y) = (from.x.round() as i32, from.y.round() as i32);
    let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// 3x5 digit bitmaps, one row per byte, MSB-side bit is the left pixel.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

fn draw_label(img: &mut RgbImage, text: &str, x0: i32, y0: i32) {
    let advance = (3 * GLYPH_SCALE + GLYPH_SCALE) as i32;
    for (i, ch) in text.chars().enumerate() {
        let Some(digit) = ch.to_digit(10) else {
            continue;
        };
        draw_glyph(img, &DIGITS[digit as usize], x0 + i as i32 * advance, y0);
    }
}

fn draw_glyph(img: &mut RgbImage, rows: &[u8; 5], x0: i32, y0: i32) {
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..3u32 {
            if bits >> (2 - col) & 1 == 0 {
                continue;
            }
            for sy in 0..GLYPH_SCALE {
                for sx in 0..GLYPH_SCALE {
                    put(
                        img,
                        x0 + (col * GLYPH_SCALE + sx) as i32,
                        y0 + (row as u32 * GLYPH_SCALE + sy) as i32,
                        LABEL,
                    );
                }
            }
        }
    }
}

#[inline]
fn put(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

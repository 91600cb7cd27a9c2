//! Frame annotation: translucent zone overlay and per-track trails.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as RasterPoint;
use imageproc::rect::Rect;

use crate::frame::Frame;
use crate::track::Track;
use crate::zone::{Point, Zone, ZoneSet};

pub const ZONE_COLOR: [u8; 3] = [255, 0, 255];
pub const ZONE_ALPHA: f32 = 0.2;
pub const TRAIL_COLOR: [u8; 3] = [230, 230, 230];
pub const TRAIL_THICKNESS: u32 = 2;

/// Render the display image for a frame.
///
/// Trails are drawn for tracks currently on screen; off-road zones are blended
/// on top of everything.
pub fn annotate<'a>(
    frame: &Frame,
    zones: &ZoneSet,
    tracks: impl IntoIterator<Item = &'a Track>,
) -> RgbImage {
    let mut img = frame.to_image();
    for track in tracks {
        if !track.state.on_screen {
            continue;
        }
        let points: Vec<Point> = track
            .history
            .iter()
            .map(|&(x, y)| Point::from_center(x, y))
            .collect();
        draw_polyline(&mut img, &points, TRAIL_COLOR, TRAIL_THICKNESS);
    }
    blend_zones(&mut img, zones, ZONE_COLOR, ZONE_ALPHA);
    img
}

/// Fill every zone on a copy of the image, then mix the copy back in with
/// weight `alpha`.
pub fn blend_zones(img: &mut RgbImage, zones: &ZoneSet, color: [u8; 3], alpha: f32) {
    if zones.is_empty() {
        return;
    }
    let mut overlay = img.clone();
    for zone in zones.zones() {
        let poly = raster_polygon(zone);
        if poly.len() >= 3 {
            draw_polygon_mut(&mut overlay, &poly, Rgb(color));
        }
    }
    add_weighted(img, &overlay, alpha);
}

/// `dst = alpha * overlay + (1 - alpha) * dst`, per channel.
fn add_weighted(dst: &mut RgbImage, overlay: &RgbImage, alpha: f32) {
    for (px, over) in dst.pixels_mut().zip(overlay.pixels()) {
        if px == over {
            continue;
        }
        for c in 0..3 {
            let mixed = alpha * over.0[c] as f32 + (1.0 - alpha) * px.0[c] as f32;
            px.0[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Zone outline as an open vertex list; the rasterizer rejects a repeated
/// closing vertex.
fn raster_polygon(zone: &Zone) -> Vec<RasterPoint<i32>> {
    let mut poly: Vec<RasterPoint<i32>> = zone
        .vertices()
        .iter()
        .map(|v| RasterPoint::new(v.x, v.y))
        .collect();
    poly.dedup();
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    poly
}

/// Open polyline through `points`, `thickness` pixels wide.
pub fn draw_polyline(img: &mut RgbImage, points: &[Point], color: [u8; 3], thickness: u32) {
    let thickness = thickness.max(1);
    match points {
        [] => {}
        [only] => {
            let offset = (thickness as i32 - 1) / 2;
            draw_filled_rect_mut(
                img,
                Rect::at(only.x - offset, only.y - offset).of_size(thickness, thickness),
                Rgb(color),
            );
        }
        _ => {
            for pair in points.windows(2) {
                draw_thick_segment(img, pair[0], pair[1], color, thickness);
            }
        }
    }
}

/// Parallel one-pixel segments stacked across the dominant direction.
fn draw_thick_segment(img: &mut RgbImage, a: Point, b: Point, color: [u8; 3], thickness: u32) {
    let mostly_horizontal = (b.x - a.x).abs() >= (b.y - a.y).abs();
    let first = -((thickness as i32 - 1) / 2);
    for k in first..first + thickness as i32 {
        let (dx, dy) = if mostly_horizontal { (0, k) } else { (k, 0) };
        draw_line_segment_mut(
            img,
            ((a.x + dx) as f32, (a.y + dy) as f32),
            ((b.x + dx) as f32, (b.y + dy) as f32),
            Rgb(color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_half_zone() -> ZoneSet {
        ZoneSet::new(vec![Zone::new(
            "zone:left",
            vec![
                Point::new(0, 0),
                Point::new(4, 0),
                Point::new(4, 9),
                Point::new(0, 9),
            ],
        )
        .unwrap()])
        .unwrap()
    }

    #[test]
    fn zone_pixels_are_tinted_and_others_untouched() {
        let frame = Frame::filled(0, 10, 10, [0, 0, 0]);
        let img = annotate(&frame, &left_half_zone(), Vec::<&Track>::new());
        assert_eq!(img.get_pixel(2, 2).0, [51, 0, 51]);
        assert_eq!(img.get_pixel(3, 8).0, [51, 0, 51]);
        assert_eq!(img.get_pixel(7, 2).0, [0, 0, 0]);
    }

    #[test]
    fn closed_outline_is_accepted() {
        let closed = ZoneSet::new(vec![Zone::new(
            "zone:closed",
            vec![
                Point::new(1, 1),
                Point::new(6, 1),
                Point::new(6, 1),
                Point::new(6, 6),
                Point::new(1, 6),
                Point::new(1, 1),
            ],
        )
        .unwrap()])
        .unwrap();
        let mut img = RgbImage::new(10, 10);
        blend_zones(&mut img, &closed, [100, 100, 100], 0.5);
        assert_eq!(img.get_pixel(3, 3).0, [50, 50, 50]);
        assert_eq!(img.get_pixel(8, 8).0, [0, 0, 0]);
    }

    #[test]
    fn default_verges_tint_roadside_not_road() {
        let frame = Frame::filled(0, 640, 360, [0, 0, 0]);
        let img = annotate(&frame, &ZoneSet::default_verges(), Vec::<&Track>::new());
        assert_eq!(img.get_pixel(10, 10).0, [51, 0, 51]);
        assert_eq!(img.get_pixel(600, 300).0, [51, 0, 51]);
        assert_eq!(img.get_pixel(152, 40).0, [0, 0, 0]);
    }

    #[test]
    fn single_point_trail_is_a_square() {
        let mut img = RgbImage::new(6, 6);
        draw_polyline(&mut img, &[Point::new(2, 2)], [9, 9, 9], 2);
        assert_eq!(img.get_pixel(2, 2).0, [9, 9, 9]);
        assert_eq!(img.get_pixel(3, 3).0, [9, 9, 9]);
        assert_eq!(img.get_pixel(4, 4).0, [0, 0, 0]);
    }

    #[test]
    fn trails_drawn_only_for_on_screen_tracks() {
        let frame = Frame::filled(0, 20, 20, [0, 0, 0]);
        let mut visible = Track::new(1, 2, 10);
        visible.state.on_screen = true;
        visible.history.push((10.0, 10.0));
        visible.history.push((15.0, 10.0));
        let mut gone = Track::new(2, 2, 10);
        gone.history.push((10.0, 2.0));
        gone.history.push((15.0, 2.0));

        let img = annotate(&frame, &ZoneSet::default(), [&visible, &gone]);
        assert_eq!(img.get_pixel(12, 10).0, TRAIL_COLOR);
        assert_eq!(img.get_pixel(12, 2).0, [0, 0, 0]);
    }

    #[test]
    fn lines_are_clipped_at_image_edges() {
        let mut img = RgbImage::new(5, 5);
        draw_polyline(
            &mut img,
            &[Point::new(-10, 2), Point::new(10, 2)],
            [1, 1, 1],
            1,
        );
        for x in 0..5 {
            assert_eq!(img.get_pixel(x, 2).0, [1, 1, 1]);
        }
        assert_eq!(img.get_pixel(0, 3).0, [0, 0, 0]);
    }
}

use super::settings::LayoutSettings;
use crate::types::layout::{AlignmentMarker, MarkerShape};

/// Four squares, one per page corner, inset by half the margin.
pub fn build_alignment_markers(
    width: f64,
    height: f64,
    settings: &LayoutSettings,
) -> Vec<AlignmentMarker> {
    let size = settings.marker_size;
    let offset = settings.margin / 2.0;
    let square = |x: f64, y: f64| AlignmentMarker {
        shape: MarkerShape::Square,
        x,
        y,
        size,
    };
    vec![
        square(offset, offset),
        square(width - offset - size, offset),
        square(offset, height - offset - size),
        square(width - offset - size, height - offset - size),
    ]
}

/// Horizontal band between the left and right markers' clearance zones.
///
/// Returns `None` when the markers leave no usable width.
pub fn horizontal_safe_area(
    markers: &[AlignmentMarker],
    page_width: f64,
    margin: f64,
    clearance: f64,
) -> Option<(f64, f64)> {
    let mut left = margin;
    let mut right = page_width - margin;
    let halfway = page_width / 2.0;
    for marker in markers {
        if marker.center().x <= halfway {
            left = left.max(marker.x + marker.size + clearance);
        } else {
            right = right.min(marker.x - clearance);
        }
    }
    (right > left).then_some((left, right))
}

/// Lowest clearance edge below the upper markers, if any marker sits in the top half.
pub fn top_clearance_limit(
    markers: &[AlignmentMarker],
    page_height: f64,
    clearance: f64,
) -> Option<f64> {
    let halfway = page_height / 2.0;
    markers
        .iter()
        .filter(|marker| marker.center().y >= halfway)
        .map(|marker| marker.y - clearance)
        .reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_sit_in_page_corners() {
        let settings = LayoutSettings::default();
        let markers = build_alignment_markers(595.0, 842.0, &settings);
        assert_eq!(markers.len(), 4);
        assert_eq!(markers[0].x, 18.0);
        assert_eq!(markers[0].y, 18.0);
        assert!((markers[3].x + markers[3].size - (595.0 - 18.0)).abs() < 1e-9);
        assert!((markers[3].y + markers[3].size - (842.0 - 18.0)).abs() < 1e-9);
    }

    #[test]
    fn safe_area_excludes_marker_clearance() {
        let settings = LayoutSettings::default();
        let markers = build_alignment_markers(595.0, 842.0, &settings);
        let (left, right) =
            horizontal_safe_area(&markers, 595.0, settings.margin, settings.alignment_clearance)
                .expect("A4 should leave usable width");
        assert!((left - (18.0 + settings.marker_size + settings.alignment_clearance)).abs() < 1e-9);
        assert!((right - (595.0 - 18.0 - settings.marker_size - settings.alignment_clearance)).abs() < 1e-9);
    }

    #[test]
    fn safe_area_is_none_when_markers_overlap() {
        let settings = LayoutSettings::default();
        let markers = build_alignment_markers(120.0, 842.0, &settings);
        assert!(horizontal_safe_area(&markers, 120.0, settings.margin, 40.0).is_none());
    }

    #[test]
    fn clearance_limit_uses_upper_markers_only() {
        let settings = LayoutSettings::default();
        let markers = build_alignment_markers(612.0, 792.0, &settings);
        let limit = top_clearance_limit(&markers, 792.0, 10.0).expect("upper markers exist");
        assert!((limit - (792.0 - 18.0 - settings.marker_size - 10.0)).abs() < 1e-9);
        assert!(top_clearance_limit(&markers[..2], 792.0, 10.0).is_none());
    }
}

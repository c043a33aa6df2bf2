use crate::error::FeederError;

/// One captured image, tightly packed RGB24.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FeederError> {
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(FeederError::FrameSize {
                found: data.len(),
                expected,
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(3)
            .map(|chunk| [chunk[0], chunk[1], chunk[2]])
    }
}

/// RGB to HSV in OpenCV scale (H 0..=179, S and V 0..=255), so threshold
/// constants tuned against OpenCV carry over unchanged.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let r_f = r as f64 / 255.0;
    let g_f = g as f64 / 255.0;
    let b_f = b as f64 / 255.0;

    let max = r_f.max(g_f).max(b_f);
    let min = r_f.min(g_f).min(b_f);
    let delta = max - min;

    let hue_deg = if delta == 0.0 {
        0.0
    } else if max == r_f {
        60.0 * ((g_f - b_f) / delta).rem_euclid(6.0)
    } else if max == g_f {
        60.0 * ((b_f - r_f) / delta + 2.0)
    } else {
        60.0 * ((r_f - g_f) / delta + 4.0)
    };

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    [
        (hue_deg / 2.0).round() as u8,
        (saturation * 255.0).round() as u8,
        (max * 255.0).round() as u8,
    ]
}

/// Inclusive HSV threshold window.
#[derive(Debug, Clone, Copy)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

/// Percentage of frame pixels whose HSV value falls inside the window.
pub fn coverage(frame: &Frame, range: &HsvRange) -> f64 {
    let total = frame.width * frame.height;
    if total == 0 {
        return 0.0;
    }

    let hits = frame
        .pixels()
        .filter(|&pixel| range.contains(rgb_to_hsv(pixel)))
        .count();

    hits as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn algae_range() -> HsvRange {
        HsvRange {
            lower: [30, 50, 50],
            upper: [90, 255, 255],
        }
    }

    #[test]
    fn hsv_of_primary_colors() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        // Gray has no hue and no saturation.
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
    }

    #[test]
    fn algae_window_selects_green() {
        let range = algae_range();

        assert!(range.contains(rgb_to_hsv([0, 200, 0])));
        assert!(range.contains(rgb_to_hsv([50, 180, 60])));
        assert!(!range.contains(rgb_to_hsv([255, 0, 0])));
        assert!(!range.contains(rgb_to_hsv([0, 0, 255])));
        // Too dark to count even if the hue is right.
        assert!(!range.contains(rgb_to_hsv([0, 30, 0])));
    }

    #[test]
    fn coverage_counts_in_range_fraction() {
        // 2x2 frame: two green pixels, one red, one black.
        let data = vec![
            0, 200, 0, //
            0, 200, 0, //
            255, 0, 0, //
            0, 0, 0,
        ];
        let frame = Frame::new(2, 2, data).unwrap();

        assert_eq!(coverage(&frame, &algae_range()), 50.0);
    }

    #[test]
    fn frame_rejects_short_buffer() {
        match Frame::new(2, 2, vec![0; 11]) {
            Err(FeederError::FrameSize { found, expected }) => {
                assert_eq!(found, 11);
                assert_eq!(expected, 12);
            }
            other => panic!("expected frame-size error, got {other:?}"),
        }
    }
}

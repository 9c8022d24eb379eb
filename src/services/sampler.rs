// src/services/sampler.rs
use crate::errors::ToneError;
use crate::models::{ColorSample, FaceCandidate};
use image::RgbaImage;
use log::debug;
use std::cmp::Ordering;

/// Cheek offset inside the face box, as a fraction of width and height.
const CHEEK_OFFSET_X: f32 = 0.7;
const CHEEK_OFFSET_Y: f32 = 0.3;

pub struct SkinToneSampler {
    radius: u32,
}

impl SkinToneSampler {
    /// `radius` is the half-size of the averaged neighborhood; 0 reads one pixel.
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    pub fn sample(
        &self,
        image: &RgbaImage,
        faces: &[FaceCandidate],
    ) -> Result<ColorSample, ToneError> {
        let face = select_face(faces).ok_or(ToneError::NoFaceDetected)?;
        let (x, y) = cheek_point(face);
        debug!(
            "Sampling face p={:.3} box=({:?}, {:?}) at ({:.1}, {:.1})",
            face.probability, face.top_left, face.bottom_right, x, y
        );
        self.read_point(image, x, y)
    }

    fn read_point(&self, image: &RgbaImage, x: f32, y: f32) -> Result<ColorSample, ToneError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ToneError::SampleOutOfBounds {
                x: x as i64,
                y: y as i64,
                width,
                height,
            });
        }

        let cx = clamp_coord(x, width);
        let cy = clamp_coord(y, height);

        let x0 = cx.saturating_sub(self.radius);
        let y0 = cy.saturating_sub(self.radius);
        let x1 = cx.saturating_add(self.radius).min(width - 1);
        let y1 = cy.saturating_add(self.radius).min(height - 1);

        let mut sums = [0u64; 3];
        let mut count = 0u64;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let pixel = image.get_pixel(px, py).0;
                sums[0] += u64::from(pixel[0]);
                sums[1] += u64::from(pixel[1]);
                sums[2] += u64::from(pixel[2]);
                count += 1;
            }
        }

        let mean = |sum: u64| ((sum + count / 2) / count) as u8;
        Ok(ColorSample::new(mean(sums[0]), mean(sums[1]), mean(sums[2])))
    }
}

impl Default for SkinToneSampler {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Picks the most probable face; ties go to the larger box, then the leftmost one.
pub fn select_face(faces: &[FaceCandidate]) -> Option<&FaceCandidate> {
    faces.iter().min_by(|a, b| rank(a, b))
}

fn rank(a: &FaceCandidate, b: &FaceCandidate) -> Ordering {
    b.probability
        .total_cmp(&a.probability)
        .then_with(|| b.area().total_cmp(&a.area()))
        .then_with(|| a.top_left[0].total_cmp(&b.top_left[0]))
}

pub fn cheek_point(face: &FaceCandidate) -> (f32, f32) {
    (
        face.top_left[0] + CHEEK_OFFSET_X * face.width(),
        face.top_left[1] + CHEEK_OFFSET_Y * face.height(),
    )
}

fn clamp_coord(value: f32, extent: u32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value.floor() as u32).min(extent - 1)
}

//! Face landmark frames as delivered by the landmark collaborator.

use crate::{
    constants::{
        LEFT_EYE_INNER, LEFT_EYE_OUTER, MOUTH_BOTTOM, MOUTH_LEFT, MOUTH_RIGHT, MOUTH_TOP, RIGHT_EYE_INNER,
        RIGHT_EYE_OUTER,
    },
    types::{FaceLandmarksData, MouthBox, Point2},
    Error, Result,
};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Ordered landmark set for one face.
///
/// `x` and `y` are normalized to [0, 1] of the image, `z` is unitless depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Point3<f64>>,
}

impl LandmarkFrame {
    /// Wrap a landmark list
    #[must_use]
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    /// Number of points in the frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the frame has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Borrow all points
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Look up a landmark by index
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if the frame is shorter than `index + 1`
    pub fn point(&self, index: usize) -> Result<&Point3<f64>> {
        self.points.get(index).ok_or(Error::MissingLandmark {
            index,
            len: self.points.len(),
        })
    }

    /// Apply a uniform scale to every coordinate
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| Point3::from(p.coords * factor)).collect(),
        }
    }
}

impl From<Vec<Point3<f64>>> for LandmarkFrame {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self::new(points)
    }
}

fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point2 {
    Point2 {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

impl FaceLandmarksData {
    /// Extract eye centers and the mouth box for the overlay
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if any overlay landmark is absent
    pub fn extract(frame: &LandmarkFrame) -> Result<Self> {
        let left_eye = midpoint(frame.point(LEFT_EYE_OUTER)?, frame.point(LEFT_EYE_INNER)?);
        let right_eye = midpoint(frame.point(RIGHT_EYE_INNER)?, frame.point(RIGHT_EYE_OUTER)?);

        let mouth_left = frame.point(MOUTH_LEFT)?;
        let mouth_right = frame.point(MOUTH_RIGHT)?;
        let mouth_top = frame.point(MOUTH_TOP)?;
        let mouth_bottom = frame.point(MOUTH_BOTTOM)?;

        Ok(Self {
            left_eye,
            right_eye,
            mouth: MouthBox {
                x: (mouth_left.x + mouth_right.x) / 2.0,
                y: (mouth_top.y + mouth_bottom.y) / 2.0,
                width: (mouth_right.x - mouth_left.x).abs(),
                height: (mouth_bottom.y - mouth_top.y).abs(),
            },
        })
    }
}

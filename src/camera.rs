//! Webcam pose source based on an `OpenCV` Haar cascade.
//!
//! The cascade only yields a face bounding box; yaw and pitch are derived
//! from where that box sits in the frame (see [`pose_from_face_box`]).

use crate::{
    pose::{pose_from_face_box, PoseSample, PoseSource},
    Error, Result,
};
use log::{info, warn};
use opencv::{
    core::{Mat, Rect, Size, Vector},
    imgproc,
    objdetect::CascadeClassifier,
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::path::Path;

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// Pose source reading frames from a camera or video file
pub struct CascadePoseSource {
    capture: VideoCapture,
    cascade: CascadeClassifier,
    from_file: bool,
    frame: Mat,
    gray: Mat,
}

impl CascadePoseSource {
    /// Open the video source and load the cascade model
    ///
    /// # Errors
    ///
    /// Returns an error if the video source cannot be opened or the cascade
    /// file cannot be loaded
    pub fn open<P: AsRef<Path>>(source: &VideoSource, cascade_path: P) -> Result<Self> {
        let capture = match source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
                // Reduce buffer size for lower latency
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path);
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };
        if !capture.is_opened()? {
            return Err(Error::PoseSource(format!("Could not open {source:?}")));
        }

        let cascade_path = cascade_path.as_ref();
        let path_str = cascade_path
            .to_str()
            .ok_or_else(|| Error::PoseSource(format!("Invalid cascade path: {}", cascade_path.display())))?;
        let cascade = CascadeClassifier::new(path_str)?;
        if cascade.empty()? {
            return Err(Error::PoseSource(format!("Failed to load cascade from {path_str}")));
        }

        Ok(Self {
            capture,
            cascade,
            from_file: matches!(source, VideoSource::File(_)),
            frame: Mat::default(),
            gray: Mat::default(),
        })
    }

    /// Read one frame and locate the first face.
    ///
    /// `Ok(None)` means the video file has ended.
    fn read_pose(&mut self) -> Result<Option<PoseSample>> {
        if !self.capture.read(&mut self.frame)? || self.frame.empty() {
            if self.from_file {
                return Ok(None);
            }
            warn!("Failed to capture frame");
            return Ok(Some(PoseSample::no_face()));
        }

        imgproc::cvt_color(&self.frame, &mut self.gray, imgproc::COLOR_BGR2GRAY, 0)?;

        let mut faces = Vector::<Rect>::new();
        self.cascade.detect_multi_scale(
            &self.gray,
            &mut faces,
            1.1,
            5,
            0,
            Size::new(30, 30),
            Size::new(0, 0),
        )?;

        let Some(face) = faces.iter().next() else {
            return Ok(Some(PoseSample::no_face()));
        };

        let center = (
            f64::from(face.x) + f64::from(face.width) / 2.0,
            f64::from(face.y) + f64::from(face.height) / 2.0,
        );
        let frame_size = (f64::from(self.frame.cols()), f64::from(self.frame.rows()));
        Ok(Some(pose_from_face_box(center, frame_size)))
    }
}

impl PoseSource for CascadePoseSource {
    fn next_sample(&mut self) -> Option<PoseSample> {
        match self.read_pose() {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Face detection failed: {}", e);
                Some(PoseSample::no_face())
            }
        }
    }

    fn name(&self) -> &str {
        "camera"
    }
}

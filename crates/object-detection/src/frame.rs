//! Video frame handed to the detector

use traffic_objects::FrameSize;

/// Frame as seen by the decision layer.
///
/// Pixels stay with the external accelerator; only the geometry the
/// proximity checks need and the sequence number travel through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFrame {
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Frame without pixel data, used when detections are replayed
    pub fn placeholder(size: FrameSize, sequence: u32) -> Self {
        Self {
            width: size.width,
            height: size.height,
            sequence,
        }
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_frame() {
        let frame = VideoFrame::placeholder(FrameSize::default(), 7);
        assert_eq!(frame.size(), FrameSize::new(640, 480));
        assert_eq!(frame.sequence, 7);
    }
}

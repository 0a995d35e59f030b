// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::driver::RenderSink;
use crate::error::Result;
use crate::trail::TrailPoint;

/// Sink that draws nothing and never waits. Logs one line per caption so a
/// run over a whole series can be checked without a terminal.
#[derive(Debug, Default)]
pub struct HeadlessSink {
    caption: String,
    frames_in_caption: u64,
    peak_points: usize,
}

impl HeadlessSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_caption(&mut self) {
        if self.frames_in_caption > 0 {
            log::info!(
                "{}: {} frames, up to {} points",
                self.caption,
                self.frames_in_caption,
                self.peak_points
            );
        }
        self.frames_in_caption = 0;
        self.peak_points = 0;
    }
}

impl RenderSink for HeadlessSink {
    fn present_frame(&mut self, points: &[TrailPoint], caption: &str) -> Result<()> {
        if caption != self.caption {
            self.flush_caption();
            self.caption.clear();
            self.caption.push_str(caption);
        }
        self.frames_in_caption += 1;
        self.peak_points = self.peak_points.max(points.len());
        Ok(())
    }

    fn pause(&mut self, _interval: Duration) -> Result<()> {
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.flush_caption();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_frames_per_caption() {
        let mut sink = HeadlessSink::new();
        let pts = [TrailPoint {
            x: 0.0,
            y: 0.0,
            size: 1.0,
            rgba: [1.0; 4],
        }; 3];
        sink.present_frame(&pts[..1], "2024-1  Rain: 1.0 mm").unwrap();
        sink.present_frame(&pts, "2024-1  Rain: 1.0 mm").unwrap();
        assert_eq!(sink.frames_in_caption, 2);
        assert_eq!(sink.peak_points, 3);

        sink.present_frame(&pts[..2], "2024-2  Rain: 9.0 mm").unwrap();
        assert_eq!(sink.frames_in_caption, 1);
        assert_eq!(sink.peak_points, 2);

        sink.shutdown().unwrap();
        assert_eq!(sink.frames_in_caption, 0);
    }
}

//! Video decode/encode glue around a spawned ffmpeg.
//!
//! The denoising core works on grayscale `Frame` sequences; this module is
//! the external collaborator that produces and consumes them. Decoding asks
//! ffmpeg for rawvideo `gray` on a pipe, encoding feeds the same format back
//! at the requested frame rate.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::frame::{Frame, Sequence};

/// Locates and drives the ffmpeg binary.
pub struct FrameCodec {
    ffmpeg: PathBuf,
}

impl FrameCodec {
    /// Find ffmpeg on PATH.
    pub fn locate() -> Result<Self> {
        let ffmpeg = which::which("ffmpeg").context("ffmpeg not found on PATH")?;
        Ok(Self { ffmpeg })
    }

    /// Use an explicit ffmpeg binary.
    pub fn with_binary(ffmpeg: PathBuf) -> Self {
        Self { ffmpeg }
    }

    /// Probe the input's video dimensions from ffmpeg's stream banner.
    pub fn probe_dimensions(&self, input: &Path) -> Result<(usize, usize)> {
        let output = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-i"])
            .arg(input)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to run ffmpeg: {:?}", self.ffmpeg))?;

        // ffmpeg exits nonzero without an output file; the stream info on
        // stderr is all we need.
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_dimensions(&stderr)
            .with_context(|| format!("No video stream dimensions found for {:?}", input))
    }

    /// Decode the input into a grayscale frame sequence.
    pub fn decode(&self, input: &Path) -> Result<Sequence> {
        let (width, height) = self.probe_dimensions(input)?;
        let frame_bytes = width * height;

        let mut child = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-vf", "format=gray", "-f", "rawvideo", "-pix_fmt", "gray", "-"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start ffmpeg: {:?}", self.ffmpeg))?;

        let mut stdout = child.stdout.take().context("Failed to get ffmpeg stdout")?;

        let mut frames = Sequence::new();
        loop {
            let mut buffer = vec![0u8; frame_bytes];
            if !read_frame(&mut stdout, &mut buffer)? {
                break;
            }
            frames.push(Frame::from_raw(height, width, buffer)?);
        }

        let status = child.wait().context("Failed to wait for ffmpeg")?;
        if !status.success() {
            bail!("ffmpeg decode exited with code {}", status.code().unwrap_or(-1));
        }

        Ok(frames)
    }

    /// Encode a frame sequence into a playable container.
    pub fn encode(&self, frames: &[Frame], output: &Path, fps: f64) -> Result<()> {
        let Some(first) = frames.first() else {
            bail!("No frames to encode");
        };
        let size = format!("{}x{}", first.cols(), first.rows());
        let rate = format!("{}", fps);

        let mut child = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "gray", "-s", &size, "-r", &rate, "-i", "-"])
            .args(["-pix_fmt", "yuv420p", "-y"])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start ffmpeg: {:?}", self.ffmpeg))?;

        {
            let mut stdin = child.stdin.take().context("Failed to get ffmpeg stdin")?;
            for frame in frames {
                stdin
                    .write_all(frame.as_bytes())
                    .context("Failed to feed frame to ffmpeg")?;
            }
            // stdin drops here so ffmpeg sees EOF and finalizes the file.
        }

        let output_result = child.wait_with_output().context("Failed to wait for ffmpeg")?;
        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            bail!(
                "ffmpeg encode exited with code {}: {}",
                output_result.status.code().unwrap_or(-1),
                stderr.trim()
            );
        }

        Ok(())
    }
}

/// Fill `buffer` with exactly one frame. Returns false on clean EOF before
/// any byte, fails on a torn frame.
fn read_frame(reader: &mut impl Read, buffer: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buffer.len() {
        let n = reader
            .read(&mut buffer[filled..])
            .context("Failed to read frame data from ffmpeg")?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            bail!(
                "Truncated frame from ffmpeg: got {} of {} bytes",
                filled,
                buffer.len()
            );
        }
        filled += n;
    }
    Ok(true)
}

/// Pull `WIDTHxHEIGHT` out of an ffmpeg `Video:` stream line.
fn parse_dimensions(stderr: &str) -> Option<(usize, usize)> {
    for line in stderr.lines() {
        let Some(pos) = line.find("Video:") else {
            continue;
        };
        for token in line[pos..].split([',', ' ']) {
            if let Some((w, h)) = token.trim().split_once('x') {
                if let (Ok(width), Ok(height)) = (w.parse::<usize>(), h.parse::<usize>()) {
                    if width > 0 && height > 0 {
                        return Some((width, height));
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions_typical_banner() {
        let stderr = "Input #0, mov,mp4, from 'video.mp4':\n  Duration: 00:00:10.00\n    Stream #0:0[0x1](und): Video: h264 (High), yuv420p(progressive), 640x480 [SAR 1:1 DAR 4:3], 24 fps, 24 tbr\n";
        assert_eq!(parse_dimensions(stderr), Some((640, 480)));
    }

    #[test]
    fn test_parse_dimensions_ignores_audio_and_hex_ids() {
        let stderr = "    Stream #0:1[0x2](und): Audio: aac, 44100 Hz, stereo\n    Stream #0:0[0x1]: Video: mpeg4, yuv420p, 320x240, 1094 kb/s, 30 fps\n";
        assert_eq!(parse_dimensions(stderr), Some((320, 240)));
    }

    #[test]
    fn test_parse_dimensions_missing_video() {
        assert_eq!(parse_dimensions("Stream #0:0: Audio: aac\n"), None);
    }

    #[test]
    fn test_read_frame_clean_eof() {
        let data: Vec<u8> = vec![1, 2, 3, 4];
        let mut cursor = std::io::Cursor::new(data);
        let mut buffer = vec![0u8; 4];
        assert!(read_frame(&mut cursor, &mut buffer).unwrap());
        assert_eq!(buffer, vec![1, 2, 3, 4]);
        assert!(!read_frame(&mut cursor, &mut buffer).unwrap());
    }

    #[test]
    fn test_with_binary_missing_ffmpeg() {
        let codec = FrameCodec::with_binary(PathBuf::from("/nonexistent/ffmpeg"));
        assert!(codec.probe_dimensions(Path::new("input.mp4")).is_err());
    }

    #[test]
    fn test_read_frame_truncated() {
        let data: Vec<u8> = vec![1, 2];
        let mut cursor = std::io::Cursor::new(data);
        let mut buffer = vec![0u8; 4];
        assert!(read_frame(&mut cursor, &mut buffer).is_err());
    }
}

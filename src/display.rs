//! Display surface for decoded video
//!
//! [OpenCvWindow] shows frames in an OpenCV `highgui` window. Received buffers are wrapped into a
//! [Mat] with the channel count of their FourCC and converted to BGR(A), the order `imshow` expects.

use std::{borrow::Cow, time::Duration};

use opencv::{core::Mat, highgui, imgproc, prelude::*};
use thiserror::Error;
use tracing::debug;

use crate::{
    four_cc::{FourCC, FourCCVideo},
    frame::VideoView,
    resolution::{Resolution, ResolutionError},
    util::duration_to_ms,
};

/// `q`, `Q` and `Esc` close the window
pub const QUIT_KEYS: [i32; 3] = ['q' as i32, 'Q' as i32, 27];

/// Where decoded frames go
pub trait DisplaySurface {
    type Image;

    /// Turns a received buffer into something [DisplaySurface::show] accepts
    fn decode(&mut self, view: &VideoView<'_>) -> Result<Self::Image, DisplayError>;

    fn show(&mut self, image: &Self::Image) -> Result<(), DisplayError>;

    /// Processes window events, waiting up to `wait`. Returns the pressed key, if any
    fn pump_events(&mut self, wait: Duration) -> Result<Option<i32>, DisplayError>;
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to decode video frame")]
    Decode(#[from] DecodeError),
    #[error("display failed")]
    OpenCv(#[from] opencv::Error),
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported pixel format {0}")]
    UnsupportedFourCC(FourCC),
    #[error("frame has no pixels ({0})")]
    EmptyFrame(Resolution),
    #[error("line stride {stride} is shorter than a line ({line} bytes)")]
    StrideTooSmall { stride: usize, line: usize },
    #[error("frame buffer holds {actual} bytes, {expected} needed")]
    BufferTooSmall { expected: usize, actual: usize },
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("failed to build image")]
    OpenCv(#[from] opencv::Error),
}

/// Color conversion needed to get from the frame's FourCC to what `imshow` expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    None,
    RgbaToBgra,
    UyvyToBgr,
}

impl Conversion {
    fn code(self) -> Option<i32> {
        match self {
            Conversion::None => None,
            Conversion::RgbaToBgra => Some(imgproc::COLOR_RGBA2BGRA),
            Conversion::UyvyToBgr => Some(imgproc::COLOR_YUV2BGR_UYVY),
        }
    }
}

/// Memory layout of one of the packed formats this display understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLayout {
    pub channels: i32,
    pub bytes_per_pixel: usize,
    pub conversion: Conversion,
}

impl PixelLayout {
    pub fn for_four_cc(four_cc: FourCC) -> Result<Self, DecodeError> {
        use FourCCVideo::*;

        let video = four_cc
            .as_video()
            .ok_or(DecodeError::UnsupportedFourCC(four_cc))?;
        let conversion = match video {
            BGRA | BGRX => Conversion::None,
            RGBA | RGBX => Conversion::RgbaToBgra,
            UYVY => Conversion::UyvyToBgr,
            _ => return Err(DecodeError::UnsupportedFourCC(four_cc)),
        };
        let bytes_per_pixel = video
            .pixel_stride()
            .ok_or(DecodeError::UnsupportedFourCC(four_cc))?;

        Ok(PixelLayout {
            // 8 bit per channel
            channels: bytes_per_pixel as i32,
            bytes_per_pixel,
            conversion,
        })
    }
}

/// Returns the visible part of every line back to back, dropping stride padding
pub fn pack_rows<'a>(
    view: &VideoView<'a>,
    bytes_per_pixel: usize,
) -> Result<Cow<'a, [u8]>, DecodeError> {
    let Resolution { x: width, y: lines } = view.resolution;
    if view.resolution.is_empty() {
        return Err(DecodeError::EmptyFrame(view.resolution));
    }

    let line = width * bytes_per_pixel;
    if view.line_stride < line {
        return Err(DecodeError::StrideTooSmall {
            stride: view.line_stride,
            line,
        });
    }

    let expected = view.line_stride * (lines - 1) + line;
    if view.data.len() < expected {
        return Err(DecodeError::BufferTooSmall {
            expected,
            actual: view.data.len(),
        });
    }

    if view.line_stride == line {
        return Ok(Cow::Borrowed(&view.data[..line * lines]));
    }

    let mut packed = Vec::with_capacity(line * lines);
    for row in view.data.chunks(view.line_stride).take(lines) {
        packed.extend_from_slice(&row[..line]);
    }
    Ok(Cow::Owned(packed))
}

/// Copies a received buffer into an owned BGR(A) [Mat]
pub fn decode_to_mat(view: &VideoView<'_>) -> Result<Mat, DecodeError> {
    let layout = PixelLayout::for_four_cc(view.four_cc)?;
    let packed = pack_rows(view, layout.bytes_per_pixel)?;
    let (_, rows) = view.resolution.to_i32()?;

    let flat = Mat::from_slice(&packed[..])?;
    let shaped = flat.reshape(layout.channels, rows)?;

    match layout.conversion.code() {
        None => Ok(shaped.try_clone()?),
        Some(code) => {
            let mut converted = Mat::default();
            imgproc::cvt_color_def(&*shaped, &mut converted, code)?;
            Ok(converted)
        }
    }
}

/// A single resizable OpenCV window
#[derive(Debug)]
pub struct OpenCvWindow {
    title: String,
}

impl OpenCvWindow {
    pub fn open(title: &str, size: Resolution) -> Result<Self, DisplayError> {
        let (width, height) = size.to_i32().map_err(DecodeError::from)?;
        highgui::named_window(title, highgui::WINDOW_NORMAL)?;
        highgui::resize_window(title, width, height)?;
        debug!(title, %size, "window opened");
        Ok(OpenCvWindow {
            title: title.to_owned(),
        })
    }
}

impl DisplaySurface for OpenCvWindow {
    type Image = Mat;

    fn decode(&mut self, view: &VideoView<'_>) -> Result<Mat, DisplayError> {
        Ok(decode_to_mat(view)?)
    }

    fn show(&mut self, image: &Mat) -> Result<(), DisplayError> {
        highgui::imshow(&self.title, image)?;
        Ok(())
    }

    fn pump_events(&mut self, wait: Duration) -> Result<Option<i32>, DisplayError> {
        // wait_key(0) would block forever
        let delay = duration_to_ms(wait).clamp(1, i32::MAX as u32) as i32;
        let key = highgui::wait_key(delay)?;
        Ok((key >= 0).then_some(key))
    }
}

impl Drop for OpenCvWindow {
    fn drop(&mut self) {
        if let Err(err) = highgui::destroy_window(&self.title) {
            debug!(%err, "failed to close window");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(
        width: usize,
        lines: usize,
        four_cc: FourCCVideo,
        stride: usize,
        data: &[u8],
    ) -> VideoView<'_> {
        VideoView {
            resolution: Resolution::new(width, lines),
            four_cc: four_cc.into(),
            line_stride: stride,
            data,
        }
    }

    #[test]
    fn test_layouts() {
        let bgra = PixelLayout::for_four_cc(FourCCVideo::BGRA.into()).unwrap();
        assert_eq!(bgra.channels, 4);
        assert_eq!(bgra.conversion, Conversion::None);

        let rgbx = PixelLayout::for_four_cc(FourCCVideo::RGBX.into()).unwrap();
        assert_eq!(rgbx.conversion, Conversion::RgbaToBgra);

        let uyvy = PixelLayout::for_four_cc(FourCCVideo::UYVY.into()).unwrap();
        assert_eq!((uyvy.channels, uyvy.bytes_per_pixel), (2, 2));
        assert_eq!(uyvy.conversion, Conversion::UyvyToBgr);

        assert!(matches!(
            PixelLayout::for_four_cc(FourCCVideo::NV12.into()),
            Err(DecodeError::UnsupportedFourCC(_))
        ));
        assert!(matches!(
            PixelLayout::for_four_cc(FourCC::from_ffi(0x3031_3233)),
            Err(DecodeError::UnsupportedFourCC(_))
        ));
    }

    #[test]
    fn test_pack_tight_rows_borrows() {
        let data = vec![7u8; 4 * 2 * 2];
        let packed = pack_rows(&view(2, 2, FourCCVideo::BGRA, 8, &data), 4).unwrap();
        assert!(matches!(packed, Cow::Borrowed(_)));
        assert_eq!(packed.len(), 16);
    }

    #[test]
    fn test_pack_strips_padding() {
        // 2 pixels of UYVY per line, padded to 6 bytes
        let data = [1, 2, 3, 4, 0, 0, 5, 6, 7, 8, 0, 0];
        let packed = pack_rows(&view(2, 2, FourCCVideo::UYVY, 6, &data), 2).unwrap();
        assert_eq!(&*packed, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pack_accepts_missing_padding_after_last_line() {
        let data = [1, 2, 3, 4, 0, 0, 5, 6, 7, 8];
        let packed = pack_rows(&view(2, 2, FourCCVideo::UYVY, 6, &data), 2).unwrap();
        assert_eq!(&*packed, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pack_rejects_bad_buffers() {
        let data = [0u8; 8];
        assert!(matches!(
            pack_rows(&view(2, 2, FourCCVideo::BGRA, 8, &data), 4),
            Err(DecodeError::BufferTooSmall { expected: 16, actual: 8 })
        ));
        assert!(matches!(
            pack_rows(&view(4, 1, FourCCVideo::BGRA, 8, &data), 4),
            Err(DecodeError::StrideTooSmall { stride: 8, line: 16 })
        ));
        assert!(matches!(
            pack_rows(&view(0, 1, FourCCVideo::BGRA, 0, &data), 4),
            Err(DecodeError::EmptyFrame(_))
        ));
    }
}

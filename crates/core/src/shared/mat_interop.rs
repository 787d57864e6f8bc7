//! Conversions between [`Frame`] and OpenCV `Mat`.
//!
//! Frames are RGB inside the crate while capture and display devices speak
//! BGR, so the `*_bgr` helpers swap channel order on the way through.
//! Intensity frames for detection are also produced here.

use opencv::core::{self, Mat, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::shared::frame::Frame;

fn mat_type(channels: u8) -> opencv::Result<i32> {
    match channels {
        1 => Ok(core::CV_8UC1),
        3 => Ok(core::CV_8UC3),
        n => Err(opencv::Error::new(
            core::StsBadArg,
            format!("unsupported channel count: {n}"),
        )),
    }
}

/// Copies a frame into a freshly allocated `Mat` with the same layout.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        mat_type(frame.channels())?,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

/// Copies an 8-bit 1- or 3-channel `Mat` into a frame.
pub fn mat_to_frame(mat: &Mat, index: usize) -> opencv::Result<Frame> {
    if mat.depth() != core::CV_8U {
        return Err(opencv::Error::new(
            core::StsUnsupportedFormat,
            format!("expected 8-bit samples, got depth {}", mat.depth()),
        ));
    }
    let channels = mat.channels();
    mat_type(channels as u8)?;

    // `try_clone` yields a continuous buffer even for ROI views.
    let owned = mat.try_clone()?;
    let data = owned.data_bytes()?.to_vec();
    Ok(Frame::new(
        data,
        mat.cols() as u32,
        mat.rows() as u32,
        channels as u8,
        index,
    ))
}

/// Converts a BGR device frame into an RGB [`Frame`].
pub fn bgr_mat_to_frame(mat: &Mat, index: usize) -> opencv::Result<Frame> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(mat, &mut rgb, imgproc::COLOR_BGR2RGB)?;
    mat_to_frame(&rgb, index)
}

/// Converts an RGB [`Frame`] into a BGR `Mat` ready for display.
pub fn frame_to_bgr_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mat = frame_to_mat(frame)?;
    if frame.channels() == 1 {
        return Ok(mat);
    }
    let mut bgr = Mat::default();
    imgproc::cvt_color_def(&mat, &mut bgr, imgproc::COLOR_RGB2BGR)?;
    Ok(bgr)
}

/// Converts an RGB frame to a single-channel intensity `Mat`. A frame that
/// is already single-channel is copied as is.
pub fn frame_to_gray_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mat = frame_to_mat(frame)?;
    if frame.channels() == 1 {
        return Ok(mat);
    }
    let mut gray = Mat::default();
    imgproc::cvt_color_def(&mat, &mut gray, imgproc::COLOR_RGB2GRAY)?;
    Ok(gray)
}

/// Detection input for a colour frame; keeps the frame index.
pub fn intensity_frame(frame: &Frame) -> opencv::Result<Frame> {
    mat_to_frame(&frame_to_gray_mat(frame)?, frame.index())
}

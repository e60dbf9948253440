use thiserror::Error;

#[derive(Error, Debug)]
pub enum LightFieldError {
    #[error("Frame id {frame_id} out of range (loaded frames: {frame_count})")]
    FrameOutOfRange { frame_id: usize, frame_count: usize },

    #[error("View id {view_id} out of range (views per frame: {view_count})")]
    ViewOutOfRange { view_id: usize, view_count: usize },

    #[error("Aperture {0} outside [0, 1]")]
    InvalidAperture(f32),

    #[error("Focus offset {0} is not finite")]
    InvalidAlpha(f32),

    #[error("Normalized view coordinate ({0}, {1}) outside [0, 1]")]
    InvalidNormalizedCoord(f32, f32),

    #[error("Pixel ({x}, {y}) outside {width}x{height} disparity map")]
    PixelOutOfBounds { x: f32, y: f32, width: u32, height: u32 },

    #[error("Invalid view grid: {0}")]
    InvalidGrid(String),

    #[error("Expected {expected} views per frame, got {got}")]
    ViewCountMismatch { expected: usize, got: usize },

    #[error("View {view_id} is {got:?}, expected {expected:?}")]
    ViewSizeMismatch {
        view_id: usize,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Rendered frame {index} is {got:?}, sequence size is {expected:?}")]
    FrameSizeMismatch {
        index: usize,
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Empty sequence: {0}")]
    EmptySequence(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(u32, u32),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LightFieldError>;

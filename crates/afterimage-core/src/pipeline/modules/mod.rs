mod contrast;
mod gaussian_blur;
mod threshold;

pub use contrast::Contrast;
pub use gaussian_blur::GaussianBlur;
pub use threshold::Threshold;

mod upload;

pub use upload::{CreateUpload, Signal, Upload};

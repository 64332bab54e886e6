pub mod file;
pub mod frame;

pub use file::RecordingFile;
pub use frame::{split_frames, AudioFrame};

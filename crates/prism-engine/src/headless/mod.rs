//! GPU-less implementation of the device platform.
//!
//! Every call is appended to a shared [`Journal`], and submitted command
//! buffers are kept there with their passes and attachments, so the frame
//! pipeline can be inspected without hardware.

mod backend;
mod journal;

pub use backend::{
    HeadlessAdapter, HeadlessCommandBuffer, HeadlessConfig, HeadlessDevice, HeadlessPass,
    HeadlessPlatform, HeadlessRecording, HeadlessSurface, HeadlessTarget, HeadlessTexture,
    HeadlessView,
};
pub use journal::{
    Call, Journal, PassCommand, RecordedAttachment, RecordedBuffer, RecordedPass, SubmittedBatch,
};

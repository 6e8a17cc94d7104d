// Fbswap Output Layer
// Framebuffer device access

pub mod framebuffer;

pub use framebuffer::{Framebuffer, FramebufferError, FramebufferInfo, FB_MAX};

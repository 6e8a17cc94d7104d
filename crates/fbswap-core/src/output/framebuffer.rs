// Fbswap Framebuffer Device
// Switches views by panning /dev/fbN across its virtual screen

use std::fmt;
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::view::{ViewIndex, ViewSwitcher};

/// Highest number of framebuffer devices the kernel registers (FB_MAX)
pub const FB_MAX: u32 = 32;

// ioctl requests from linux/fb.h
const FBIOGET_VSCREENINFO: u32 = 0x4600;
const FBIOGET_FSCREENINFO: u32 = 0x4602;
const FBIOPAN_DISPLAY: u32 = 0x4606;

const FB_VISUAL_TRUECOLOR: u32 = 2;

#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// struct fb_var_screeninfo
#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// struct fb_fix_screeninfo
#[allow(dead_code)]
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    type_: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

/// Errors from the framebuffer device
#[derive(Debug, thiserror::Error)]
pub enum FramebufferError {
    #[error("unable to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{request} failed: {source}")]
    Ioctl {
        request: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("view {target} not available, the virtual screen holds {available} view(s)")]
    ViewOutOfRange { target: ViewIndex, available: u32 },

    #[error("framebuffer index {0} out of range (max {max})", max = FB_MAX - 1)]
    NotAvailable(u32),
}

/// Screen statistics read from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferInfo {
    pub id: String,
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub bits_per_pixel: u32,
    pub truecolor: bool,
    pub yoffset: u32,
}

impl FramebufferInfo {
    fn from_raw(var: &FbVarScreeninfo, fix: &FbFixScreeninfo) -> Self {
        let id_len = fix.id.iter().position(|&b| b == 0).unwrap_or(fix.id.len());
        Self {
            id: String::from_utf8_lossy(&fix.id[..id_len]).into_owned(),
            xres: var.xres,
            yres: var.yres,
            xres_virtual: var.xres_virtual,
            yres_virtual: var.yres_virtual,
            bits_per_pixel: var.bits_per_pixel,
            truecolor: fix.visual == FB_VISUAL_TRUECOLOR,
            yoffset: var.yoffset,
        }
    }

    /// Number of full screens stacked in the virtual screen
    pub fn view_count(&self) -> u32 {
        if self.yres == 0 {
            0
        } else {
            self.yres_virtual / self.yres
        }
    }

    /// View currently on display
    pub fn current_view(&self) -> Option<u32> {
        (self.yres != 0 && self.yoffset % self.yres == 0).then(|| self.yoffset / self.yres)
    }

    fn log_stats(&self) {
        log::info!("x resolution: {}", self.xres);
        log::info!("y resolution: {}", self.yres);
        log::info!("bits per pixel: {}", self.bits_per_pixel);
        log::info!("truecolor: {}", if self.truecolor { "yes" } else { "no" });
    }
}

impl fmt::Display for FramebufferInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} (virtual {}x{}), {} bpp, {} view(s)",
            self.id,
            self.xres,
            self.yres,
            self.xres_virtual,
            self.yres_virtual,
            self.bits_per_pixel,
            self.view_count()
        )
    }
}

struct FbDevice {
    file: File,
    var: FbVarScreeninfo,
    fix: FbFixScreeninfo,
}

impl FbDevice {
    fn ioctl<T>(
        &self,
        request: u32,
        name: &'static str,
        arg: &mut T,
    ) -> Result<(), FramebufferError> {
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg as *mut T) };
        if ret < 0 {
            return Err(FramebufferError::Ioctl {
                request: name,
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), FramebufferError> {
        let mut var = FbVarScreeninfo::default();
        self.ioctl(FBIOGET_VSCREENINFO, "FBIOGET_VSCREENINFO", &mut var)?;
        let mut fix = FbFixScreeninfo::default();
        self.ioctl(FBIOGET_FSCREENINFO, "FBIOGET_FSCREENINFO", &mut fix)?;
        self.var = var;
        self.fix = fix;
        Ok(())
    }
}

/// An open framebuffer device.
///
/// Device access is serialized internally, so a shared reference is enough
/// to switch views.
pub struct Framebuffer {
    path: PathBuf,
    device: Mutex<FbDevice>,
}

impl Framebuffer {
    /// Device path of framebuffer `index`
    pub fn path_for_index(index: u32) -> Result<PathBuf, FramebufferError> {
        if index >= FB_MAX {
            return Err(FramebufferError::NotAvailable(index));
        }
        Ok(PathBuf::from(format!("/dev/fb{}", index)))
    }

    /// Open the device read/write and read its screen info
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramebufferError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| FramebufferError::Open {
                path: path.clone(),
                source,
            })?;

        let mut device = FbDevice {
            file,
            var: FbVarScreeninfo::default(),
            fix: FbFixScreeninfo::default(),
        };
        device.refresh()?;

        let framebuffer = Self {
            path,
            device: Mutex::new(device),
        };
        log::info!(
            "opened {}: {}",
            framebuffer.path.display(),
            framebuffer.info()
        );
        Ok(framebuffer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Screen info as of the last refresh
    pub fn info(&self) -> FramebufferInfo {
        let device = self.device.lock();
        FramebufferInfo::from_raw(&device.var, &device.fix)
    }

    /// Pan the display to page `target` of the virtual screen
    pub fn pan_to(&self, target: ViewIndex) -> Result<(), FramebufferError> {
        let mut device = self.device.lock();
        device.refresh()?;

        let info = FramebufferInfo::from_raw(&device.var, &device.fix);
        info.log_stats();

        let available = info.view_count();
        if u32::from(target.get()) >= available {
            return Err(FramebufferError::ViewOutOfRange { target, available });
        }
        match info.current_view() {
            Some(current) => log::debug!("panning from view {} to view {}", current, target),
            None => log::debug!("panning from y offset {} to view {}", info.yoffset, target),
        }

        let mut var = device.var;
        var.xoffset = 0;
        var.yoffset = u32::from(target.get()) * var.yres;
        device.ioctl(FBIOPAN_DISPLAY, "FBIOPAN_DISPLAY", &mut var)?;
        device.var.xoffset = var.xoffset;
        device.var.yoffset = var.yoffset;
        Ok(())
    }
}

impl ViewSwitcher for Framebuffer {
    type Error = FramebufferError;

    fn switch_view(&self, target: ViewIndex) -> Result<(), Self::Error> {
        self.pan_to(target)
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framebuffer")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

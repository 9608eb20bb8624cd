//! GDI device gamma ramps.
//!
//! Outputs come from `EnumDisplayMonitors` + `GetMonitorInfoW`; ramps are
//! read and written through a display device context opened per call with
//! `CreateDCW("DISPLAY", device)`.

use crate::{DisplayId, DisplayOutput, DriverError, DriverResult, GammaDriver, MonitorEnumerator};
use lumen_core::GammaRamp;
use std::ffi::c_void;
use std::mem;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    CreateDCW, DeleteDC, EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
    MONITORINFOF_PRIMARY,
};
use windows::Win32::UI::ColorSystem::{GetDeviceGammaRamp, SetDeviceGammaRamp};

/// Native Windows backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Backend;

impl Win32Backend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

/// Display device context, deleted on drop.
struct DeviceContext(HDC);

impl DeviceContext {
    fn open(id: &DisplayId) -> DriverResult<Self> {
        // SAFETY: `wide_name` is NUL-terminated and outlives the call.
        let hdc = unsafe {
            CreateDCW(
                w!("DISPLAY"),
                PCWSTR(id.wide_name().as_ptr()),
                PCWSTR::null(),
                None,
            )
        };
        if hdc.0.is_null() {
            return Err(DriverError::DeviceContext {
                device: id.name().to_string(),
            });
        }
        Ok(Self(hdc))
    }
}

impl Drop for DeviceContext {
    fn drop(&mut self) {
        // SAFETY: created by CreateDCW and not shared.
        let _ = unsafe { DeleteDC(self.0) };
    }
}

impl GammaDriver for Win32Backend {
    fn read_ramp(&self, id: &DisplayId) -> DriverResult<GammaRamp> {
        let dc = DeviceContext::open(id)?;
        let mut ramp = GammaRamp::zeroed();
        // SAFETY: GammaRamp is #[repr(C)] 3x256 u16, the layout the call expects.
        let ok = unsafe { GetDeviceGammaRamp(dc.0, &mut ramp as *mut GammaRamp as *mut c_void) };
        if !ok.as_bool() {
            return Err(DriverError::ReadFailed {
                device: id.name().to_string(),
            });
        }
        Ok(ramp)
    }

    fn write_ramp(&self, id: &DisplayId, ramp: &GammaRamp) -> DriverResult<()> {
        let dc = DeviceContext::open(id)?;
        // SAFETY: see read_ramp.
        let ok = unsafe { SetDeviceGammaRamp(dc.0, ramp as *const GammaRamp as *const c_void) };
        if !ok.as_bool() {
            return Err(DriverError::WriteFailed {
                device: id.name().to_string(),
            });
        }
        Ok(())
    }
}

impl MonitorEnumerator for Win32Backend {
    fn enumerate(&self) -> DriverResult<Vec<DisplayOutput>> {
        unsafe extern "system" fn enum_proc(monitor: HMONITOR, _hdc: HDC, _rect: *mut RECT, data: LPARAM) -> BOOL {
            // SAFETY: `data` is the Vec passed below, alive for the whole enumeration.
            let outputs = unsafe { &mut *(data.0 as *mut Vec<DisplayOutput>) };
            let mut info = MONITORINFOEXW::default();
            info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;

            if unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _) }.as_bool() {
                let len = info.szDevice.iter().position(|&c| c == 0).unwrap_or(info.szDevice.len());
                let name = String::from_utf16_lossy(&info.szDevice[..len]);
                outputs.push(DisplayOutput {
                    id: DisplayId::new(monitor.0 as isize, name),
                    is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
                });
            }
            BOOL(1)
        }

        let mut outputs: Vec<DisplayOutput> = Vec::new();
        // SAFETY: the callback only runs during this call.
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(enum_proc),
                LPARAM(&mut outputs as *mut Vec<DisplayOutput> as isize),
            )
        };
        if !ok.as_bool() && outputs.is_empty() {
            return Err(DriverError::Enumeration("EnumDisplayMonitors failed".into()));
        }
        Ok(outputs)
    }
}

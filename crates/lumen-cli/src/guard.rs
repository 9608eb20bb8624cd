//! Last-chance restoration of original ramps.
//!
//! A panic hook, and on Windows a console control handler, write the captured
//! originals back if the process dies with a curve applied. Both reach the
//! engine's [`RestorePoint`] through a `Weak`, so the guard never keeps the
//! driver alive and does nothing once the engine has shut down cleanly.

use lumen_display::RestorePoint;
use std::panic;
use std::sync::{Arc, Mutex, Once, Weak};

static ARMED: Mutex<Option<Weak<RestorePoint>>> = Mutex::new(None);
static INSTALL: Once = Once::new();

/// Installs the panic hook and console handler. Idempotent.
pub fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if restore_armed() {
                eprintln!("lumen: original gamma restored after panic");
            }
            previous(info);
        }));

        #[cfg(windows)]
        console::install();
    });
}

/// Points the guard at `point`.
pub fn arm(point: &Arc<RestorePoint>) {
    if let Ok(mut slot) = ARMED.lock() {
        *slot = Some(Arc::downgrade(point));
    }
}

/// Clears the guard after a clean shutdown.
pub fn disarm() {
    if let Ok(mut slot) = ARMED.lock() {
        *slot = None;
    }
}

/// Restores through the armed point, if any. Never blocks.
fn restore_armed() -> bool {
    let Ok(slot) = ARMED.try_lock() else {
        return false;
    };
    slot.as_ref()
        .and_then(Weak::upgrade)
        .is_some_and(|point| point.restore())
}

#[cfg(windows)]
mod console {
    use windows::Win32::Foundation::BOOL;
    use windows::Win32::System::Console::SetConsoleCtrlHandler;

    unsafe extern "system" fn handler(_ctrl_type: u32) -> BOOL {
        super::restore_armed();
        // let the default handler terminate the process
        BOOL(0)
    }

    pub(super) fn install() {
        // SAFETY: `handler` is a plain function valid for the process lifetime.
        if let Err(e) = unsafe { SetConsoleCtrlHandler(Some(handler), BOOL::from(true)) } {
            tracing::warn!(error = %e, "console control handler not installed");
        }
    }
}

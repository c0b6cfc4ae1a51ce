use std::sync::Once;

static INIT: Once = Once::new();

// Routes the `log` macros to the browser console. Safe to call repeatedly.
pub fn init(level: log::Level) {
    INIT.call_once(|| {
        // Set the panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        if let Err(e) = console_log::init_with_level(level) {
            web_sys::console::warn_1(&format!("Logger already installed: {}", e).into());
        }
    });
}

pub fn set_level(level: log::Level) {
    log::set_max_level(level.to_level_filter());
}

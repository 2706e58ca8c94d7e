//! `log` records forwarded to the browser console.

use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&msg),
            Level::Warn => console::warn_1(&msg),
            Level::Info => console::info_1(&msg),
            Level::Debug => console::debug_1(&msg),
            Level::Trace => console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Route core logging to the console. `level` is one of `off`, `error`,
/// `warn`, `info`, `debug`, `trace`; defaults to `warn`. Safe to call again
/// to change the level.
#[wasm_bindgen(js_name = init_logging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsError> {
    let filter = match level.as_deref() {
        None => LevelFilter::Warn,
        Some(s) => LevelFilter::from_str(s)
            .map_err(|_| JsError::new(&format!("init_logging: unknown level '{s}'")))?,
    };
    // A second call finds the logger already installed; only the level changes.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}

use std::io::Write;

use flexi_logger::{DeferredNow, style};
use log::{Level, Record};

/// `LEVEL message` for warnings and errors, bare message otherwise.
/// Debug and trace lines also carry the emitting module.
pub fn cli_format(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    match level {
        Level::Error | Level::Warn => write!(
            w,
            "{} {}",
            style(level).paint(level.to_string()),
            record.args()
        ),
        Level::Info => write!(w, "{}", record.args()),
        Level::Debug | Level::Trace => write!(
            w,
            "{} [{}] {}",
            style(level).paint(level.to_string()),
            record.module_path().unwrap_or("<unnamed>"),
            record.args()
        ),
    }
}

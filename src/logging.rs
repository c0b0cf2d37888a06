pub use log::LevelFilter::*;

/// Installs the global logger. Safe to call more than once; later calls are
/// ignored by the `log` facade.
pub fn setup_logging(verbosity: log::LevelFilter) {
    let dispatch = fern::Dispatch::new()
        .level(verbosity)
        .format(|out, message, record| out.finish(format_args!("[{}] {}: {}", record.level(), record.target(), message)));

    #[cfg(target_arch = "wasm32")]
    let dispatch = dispatch.chain(fern::Output::call(|record| {
        let message = format!("{}", record.args());

        web_sys::console::log_1(&message.into());
    }));

    #[cfg(not(target_arch = "wasm32"))]
    let dispatch = dispatch.chain(std::io::stdout());

    let _ = dispatch.apply();
}

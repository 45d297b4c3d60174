use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the global logger once. `RUST_LOG` overrides the chosen level.
pub fn init_logger(verbose: bool) {
    INIT.call_once_force(|_| {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        let mut builder = Builder::new();
        builder
            .filter_level(level)
            .format_timestamp_millis()
            .parse_default_env();

        let _ = builder.try_init();
    });
}

#[cfg(test)]
mod tests {
    use log::{debug, info};

    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logger(true);
        init_logger(false);
        debug!("debug message in test");
        info!("info message in test");
    }
}

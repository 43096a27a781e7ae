use tracing_subscriber::EnvFilter;

/// Directives for the binary and the core library at the level chosen by `-v`.
///
/// No flag logs warnings only; `-v` adds run summaries, `-vv` every
/// transition, `-vvv` everything.
fn directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{}={level},fledgling_core={level}", env!("CARGO_CRATE_NAME"))
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `-v`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_selects_level_for_both_crates() {
        assert_eq!(directives(0), "fledgling=warn,fledgling_core=warn");
        assert_eq!(directives(2), "fledgling=debug,fledgling_core=debug");
        assert_eq!(directives(7), "fledgling=trace,fledgling_core=trace");
    }
}

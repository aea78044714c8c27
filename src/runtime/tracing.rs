/// Initializes structured logging.
///
/// Verbosity is read from `RUST_LOG`:
/// - `RUST_LOG=info` reports one line per loaded document and bound record
/// - `RUST_LOG=jsonapi_graph=debug` adds per-relationship binding detail
/// - `RUST_LOG=trace` shows everything, including `reqwest` internals
///
/// Calling this twice panics, as with any global subscriber.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

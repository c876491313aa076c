/// Result alias used across the application and adapter layers.
///
/// Domain services return their own typed errors; everything that crosses
/// a port boundary is carried as `anyhow::Error` so that context can be
/// attached at each hop.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Structural report command.
pub mod analyze;
/// Ranked candidate listing command.
pub mod candidates;
/// STL conversion command.
pub mod convert;
/// File-level information command.
pub mod info;
/// Raw byte-window inspection command.
pub mod probe;

#[cfg(test)]
mod test_support;
mod util;

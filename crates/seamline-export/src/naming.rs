//! File naming for exported segments.

use crate::format::OutputFormat;

/// How exported segments are named.
///
/// Names follow `{prefix}_{stamp}_{index}.{ext}`, or `{prefix}_{index}.{ext}`
/// without a stamp. The stamp is supplied by the caller (typically the
/// export time) so this crate stays free of clocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    /// Leading part of every file name.
    pub prefix: String,
    /// Optional batch stamp shared by every segment of one export.
    pub stamp: Option<String>,
}

impl NamingPolicy {
    /// Prefix used by [`NamingPolicy::default`].
    pub const DEFAULT_PREFIX: &'static str = "seamline";

    /// Policy with the given prefix and stamp.
    #[must_use]
    pub fn new(prefix: impl Into<String>, stamp: Option<String>) -> Self {
        Self {
            prefix: prefix.into(),
            stamp,
        }
    }

    /// File name of the segment at 1-based position `index`.
    #[must_use]
    pub fn file_name(&self, index: usize, format: OutputFormat) -> String {
        let ext = format.extension();
        match &self.stamp {
            Some(stamp) => format!("{}_{stamp}_{index}.{ext}", self.prefix),
            None => format!("{}_{index}.{ext}", self.prefix),
        }
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX, None)
    }
}

use thiserror::Error;

/// Faults raised by the loader, the executor, and configuration parsing.
///
/// Every fault is fatal to the current run: a subleq machine has no notion
/// of a resumable exception. The run loop never catches these; the caller
/// decides whether to report and exit or start over with a fresh image.
#[derive(Debug, Error)]
pub enum VmError {
    /// The program image is structurally invalid (e.g. empty `.text`
    /// section, or a document that does not parse as an image at all).
    #[error("program format invalid: {0}")]
    Format(String),

    /// The image does not fit in memory. Checked before any write, so
    /// memory is untouched when this is raised.
    #[error("not enough memory to load this program (at least {required} words required)")]
    Capacity { required: usize },

    /// An operand address fell outside the valid signed range `(-N, N)`.
    #[error("segmentation fault (address {addr})")]
    SegFault { addr: i64 },

    /// Invalid construction parameters (memory size, pacing delay, or a
    /// malformed dump selector). Caught at configuration time, never
    /// inside the run loop.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The output stream or an image file failed underneath us.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message_names_required_words() {
        let err = VmError::Capacity { required: 19 };
        assert_eq!(
            err.to_string(),
            "not enough memory to load this program (at least 19 words required)"
        );
    }

    #[test]
    fn test_segfault_message_names_address() {
        let err = VmError::SegFault { addr: -40 };
        assert!(err.to_string().contains("-40"));
    }
}

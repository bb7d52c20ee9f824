//! Exit code constants for the tplsync CLI.
//!
//! - 0: Success (check: everything in sync; write: all artifacts written)
//! - 1: Check mode found at least one out-of-sync artifact
//! - 2: Configuration or usage error
//! - 3: I/O failure
//! - 4: Environment file syntax error
//! - 5: Template references an undefined variable

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// A generated artifact differs from its tracked copy.
pub const OUT_OF_SYNC: i32 = 1;

/// Invalid config file, bad arguments, or unusable diff tool command.
pub const CONFIG_ERROR: i32 = 2;

/// A file could not be read, written or created.
pub const IO_FAILURE: i32 = 3;

/// The environment file is malformed.
pub const SYNTAX_ERROR: i32 = 4;

/// Rendering failed on an unresolved placeholder.
pub const RENDER_ERROR: i32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            OUT_OF_SYNC,
            CONFIG_ERROR,
            IO_FAILURE,
            SYNTAX_ERROR,
            RENDER_ERROR,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn only_success_is_zero() {
        assert_eq!(SUCCESS, 0);
        assert_ne!(OUT_OF_SYNC, 0);
    }
}

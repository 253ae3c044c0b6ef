//! Terminal output for pipeline commands.
//!
//! Status lines go to stderr through [`success`], [`info`], [`warning`] and
//! [`error`]; [`print_build_summary`] renders the per-step table at the end of
//! a build. Colours follow `NO_COLOR` / `FORCE_COLOR` and TTY detection.

mod format;
mod messages;

pub use format::{format_duration, format_size, print_build_summary};
pub use messages::{error, info, step, success, warning};

/// Check if color output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colours are used when stderr
/// is attended by a user.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Apply the colour decision globally for owo-colors output.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    owo_colors::set_override(enabled);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn unset(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    #[test]
    #[serial]
    fn test_should_use_color_no_color() {
        set("NO_COLOR", "1");
        unset("FORCE_COLOR");
        assert!(!should_use_color());
        unset("NO_COLOR");
    }

    #[test]
    #[serial]
    fn test_should_use_color_force_color() {
        unset("NO_COLOR");
        set("FORCE_COLOR", "1");
        assert!(should_use_color());
        unset("FORCE_COLOR");
    }

    #[test]
    #[serial]
    fn test_should_use_color_no_color_overrides_force() {
        set("NO_COLOR", "1");
        set("FORCE_COLOR", "1");
        assert!(!should_use_color());
        unset("NO_COLOR");
        unset("FORCE_COLOR");
    }
}

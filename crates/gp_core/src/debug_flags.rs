use std::sync::OnceLock;

fn env_flag_enabled(name: &str) -> bool {
    std::env::var(name).map(|value| flag_value_enabled(&value)).unwrap_or(false)
}

fn flag_value_enabled(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// `GP_TRACE_INPUTS`: log every actuator call (debug builds only).
pub fn trace_inputs_enabled() -> bool {
    if !cfg!(debug_assertions) {
        return false;
    }
    static FLAG: OnceLock<bool> = OnceLock::new();
    *FLAG.get_or_init(|| env_flag_enabled("GP_TRACE_INPUTS"))
}

/// `GP_TRACE_PHASES`: log phase transitions at info instead of debug.
pub fn trace_phases_enabled() -> bool {
    if !cfg!(debug_assertions) {
        return false;
    }
    static FLAG: OnceLock<bool> = OnceLock::new();
    *FLAG.get_or_init(|| env_flag_enabled("GP_TRACE_PHASES"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        for on in ["1", "true", " YES ", "On"] {
            assert!(flag_value_enabled(on), "{on}");
        }
        for off in ["0", "false", "", "maybe"] {
            assert!(!flag_value_enabled(off), "{off}");
        }
    }
}

//! Titles of the tabs; the sidebar reads the same strings.

pub const KEY_AMBIT_WIP: &str = "p100_ambit_wip";
pub const KEY_USERS: &str = "sys_users";

/// Readable tab title for a key; unknown keys are shown as-is.
pub fn tab_label_for_key(key: &str) -> &str {
    match key {
        KEY_AMBIT_WIP => "Ambit WIP",
        KEY_USERS => "Users",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_keys() {
        assert_eq!(tab_label_for_key(KEY_AMBIT_WIP), "Ambit WIP");
        assert_eq!(tab_label_for_key(KEY_USERS), "Users");
        assert_eq!(tab_label_for_key("x_unknown"), "x_unknown");
    }
}

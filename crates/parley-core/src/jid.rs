/// Utilities for classifying and splitting WhatsApp JIDs

/// Suffix carried by every group chat JID.
pub const GROUP_SUFFIX: &str = "@g.us";

/// A chat is a group when its JID ends with the group suffix; everything
/// else is a direct chat.
pub fn is_group_jid(jid: &str) -> bool {
    jid.ends_with(GROUP_SUFFIX)
}

/// Local part of a JID: the text before the first `@`, or the whole string
/// when there is no `@`.
/// Example: "5511999999999@s.whatsapp.net" -> "5511999999999"
pub fn local_part(jid: &str) -> &str {
    jid.split('@').next().unwrap_or(jid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_jid() {
        assert!(is_group_jid("120363025246125888@g.us"));
        assert!(!is_group_jid("5511999999999@s.whatsapp.net"));
        assert!(!is_group_jid("g.us"));
    }

    #[test]
    fn test_local_part_with_server() {
        assert_eq!(local_part("5511999999999@s.whatsapp.net"), "5511999999999");
    }

    #[test]
    fn test_local_part_without_server() {
        assert_eq!(local_part("5511999999999"), "5511999999999");
        assert_eq!(local_part(""), "");
    }
}

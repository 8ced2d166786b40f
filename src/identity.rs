// src/identity.rs
use crate::source::Entry;

/// Derive the stable identifier for a feed entry.
///
/// Basis selection, first non-empty wins: native id, then link, then the
/// concatenation of title + published + updated (absent fields as "").
/// The basis is hashed with SHA-256 and rendered as lowercase hex, so the
/// same entry maps to the same identifier across runs and platforms.
pub fn identify(entry: &Entry) -> String {
    let basis: String = if let Some(id) = non_empty(&entry.id) {
        id.to_string()
    } else if let Some(link) = non_empty(&entry.link) {
        link.to_string()
    } else {
        let mut s = String::new();
        s.push_str(entry.title.as_deref().unwrap_or_default());
        s.push_str(entry.published.as_deref().unwrap_or_default());
        s.push_str(entry.updated.as_deref().unwrap_or_default());
        s
    };
    digest_hex(&basis)
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

pub(crate) fn digest_hex(basis: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(basis.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest.iter() {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        id: Option<&str>,
        link: Option<&str>,
        title: Option<&str>,
        published: Option<&str>,
        updated: Option<&str>,
    ) -> Entry {
        Entry {
            id: id.map(str::to_string),
            link: link.map(str::to_string),
            title: title.map(str::to_string),
            published: published.map(str::to_string),
            updated: updated.map(str::to_string),
        }
    }

    #[test]
    fn id_wins_over_link_and_title() {
        let a = entry(Some("guid-1"), Some("http://e/1"), Some("T"), None, None);
        let b = entry(Some("guid-1"), Some("http://e/other"), Some("U"), None, None);
        assert_eq!(identify(&a), identify(&b));
        assert_eq!(identify(&a), digest_hex("guid-1"));
    }

    #[test]
    fn link_wins_when_id_absent_or_empty() {
        let a = entry(None, Some("http://e/1"), Some("T"), None, None);
        let b = entry(Some(""), Some("http://e/1"), Some("U"), None, None);
        assert_eq!(identify(&a), digest_hex("http://e/1"));
        assert_eq!(identify(&b), digest_hex("http://e/1"));
    }

    #[test]
    fn title_date_fallback_concatenates_in_order() {
        let e = entry(
            None,
            None,
            Some("Title"),
            Some("Mon, 01 Jan 2024 00:00:00 GMT"),
            Some("2024-01-02"),
        );
        assert_eq!(
            identify(&e),
            digest_hex("TitleMon, 01 Jan 2024 00:00:00 GMT2024-01-02")
        );
    }

    #[test]
    fn deterministic_across_calls() {
        let e = entry(None, Some("http://e/x"), None, None, None);
        assert_eq!(identify(&e), identify(&e));
    }

    // Fully empty entries collapse onto one shared identifier. Known edge
    // case inherited from the identity scheme, not a bug.
    #[test]
    fn empty_basis_yields_fixed_identifier() {
        let a = entry(None, None, None, None, None);
        let b = entry(None, None, Some(""), None, None);
        assert_eq!(identify(&a), identify(&b));
        assert_eq!(identify(&a), digest_hex(""));
    }
}

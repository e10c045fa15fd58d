use std::collections::{BTreeMap, HashSet};

pub const NATIONAL_ID: &str = "national_id";
pub const LICENSE_NUMBER: &str = "license_number";

/// Values already handed out in one table generation, keyed by domain.
///
/// Domains are independent: the same string may appear once in each.
#[derive(Debug, Default)]
pub struct UniquenessEnforcer {
    domains: BTreeMap<String, HashSet<String>>,
}

impl UniquenessEnforcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `domain`, returning `false` if it was taken.
    pub fn claim(&mut self, domain: &str, value: &str) -> bool {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .insert(value.to_string())
    }

    /// Claim every pair or none of them.
    pub fn claim_all(&mut self, values: &[(&str, String)]) -> bool {
        if self.first_conflict(values).is_some() {
            return false;
        }
        let mut local: HashSet<(&str, &str)> = HashSet::new();
        if !values
            .iter()
            .all(|(domain, value)| local.insert((*domain, value.as_str())))
        {
            return false;
        }
        for (domain, value) in values {
            self.claim(domain, value);
        }
        true
    }

    /// The first domain whose value is already taken.
    pub fn first_conflict<'a>(&self, values: &'a [(&'a str, String)]) -> Option<&'a str> {
        values
            .iter()
            .find(|(domain, value)| !self.is_available(domain, value))
            .map(|(domain, _)| *domain)
    }

    pub fn is_available(&self, domain: &str, value: &str) -> bool {
        self.domains
            .get(domain)
            .is_none_or(|seen| !seen.contains(value))
    }

    pub fn len(&self, domain: &str) -> usize {
        self.domains.get(domain).map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.domains.values().all(HashSet::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_repeat_within_domain_only() {
        let mut enforcer = UniquenessEnforcer::new();
        assert!(enforcer.claim(NATIONAL_ID, "29001010112345"));
        assert!(!enforcer.claim(NATIONAL_ID, "29001010112345"));
        assert!(enforcer.claim(LICENSE_NUMBER, "29001010112345"));
        assert_eq!(enforcer.len(NATIONAL_ID), 1);
        assert_eq!(enforcer.len(LICENSE_NUMBER), 1);
    }

    #[test]
    fn claim_all_is_atomic() {
        let mut enforcer = UniquenessEnforcer::new();
        assert!(enforcer.claim(LICENSE_NUMBER, "MOH-CAR-123456"));

        let pairs = [
            (NATIONAL_ID, "29001010112345".to_string()),
            (LICENSE_NUMBER, "MOH-CAR-123456".to_string()),
        ];
        assert_eq!(enforcer.first_conflict(&pairs), Some(LICENSE_NUMBER));
        assert!(!enforcer.claim_all(&pairs));
        assert!(enforcer.is_available(NATIONAL_ID, "29001010112345"));
        assert_eq!(enforcer.len(NATIONAL_ID), 0);

        let fresh = [
            (NATIONAL_ID, "29001010112345".to_string()),
            (LICENSE_NUMBER, "MOH-CAR-654321".to_string()),
        ];
        assert!(enforcer.claim_all(&fresh));
        assert!(!enforcer.is_available(NATIONAL_ID, "29001010112345"));
        assert_eq!(enforcer.len(LICENSE_NUMBER), 2);
    }

    #[test]
    fn claim_all_rejects_duplicates_inside_one_batch() {
        let mut enforcer = UniquenessEnforcer::new();
        let pairs = [
            (NATIONAL_ID, "1".to_string()),
            (NATIONAL_ID, "1".to_string()),
        ];
        assert!(!enforcer.claim_all(&pairs));
        assert!(enforcer.is_empty());
    }
}

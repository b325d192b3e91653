//! Permission checks against a user's granted permissions.

use std::collections::HashSet;

/// Set of permission keys granted to a user, e.g. `view:users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    granted: HashSet<String>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, permission: impl Into<String>) {
        self.granted.insert(permission.into());
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.granted.contains(permission)
    }

    /// True when the user holds neither the scoped `base` permission nor the
    /// broad `elevated` one.
    ///
    /// ```
    /// use querykit_api::PermissionSet;
    ///
    /// let perms = PermissionSet::from_iter(["view:article"]);
    /// assert!(!perms.is_access_restricted("view:article", "viewAll:articles"));
    /// assert!(perms.is_access_restricted("edit:article", "editAll:articles"));
    /// ```
    pub fn is_access_restricted(&self, base: &str, elevated: &str) -> bool {
        !self.has_permission(base) && !self.has_permission(elevated)
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_permission() {
        let perms = PermissionSet::from_iter(["view:users", "edit:posts"]);
        assert!(perms.has_permission("view:users"));
        assert!(!perms.has_permission("delete:users"));
        assert!(!perms.has_permission("VIEW:USERS"));
    }

    #[test]
    fn test_is_access_restricted() {
        let scoped = PermissionSet::from_iter(["view:article"]);
        let broad = PermissionSet::from_iter(["viewAll:articles"]);
        let none = PermissionSet::new();

        assert!(!scoped.is_access_restricted("view:article", "viewAll:articles"));
        assert!(!broad.is_access_restricted("view:article", "viewAll:articles"));
        assert!(none.is_access_restricted("view:article", "viewAll:articles"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut perms = PermissionSet::from_iter(vec!["a".to_string(), "a".to_string()]);
        perms.grant("b");
        assert_eq!(perms.len(), 2);
        assert!(!perms.is_empty());
    }
}

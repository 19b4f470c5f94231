//! Permission set resolution for the role editor.
//!
//! Every operation is a pure function from the current set to a new set.
//! Results always go through [`PermissionResolver::apply_invariants`].

use std::collections::VecDeque;

use super::catalog::PermissionCatalog;
use crate::models::{Permission, PermissionSet};

/// When all four contract permissions are held, `GCON` is kept even if the
/// permission that pulled it in goes away. Deliberately limited to this group.
const FULL_CONTRACT_GROUP: [&str; 4] = ["CCON", "UCON", "DCON", "GCON"];
const CONTRACT_READ: &str = "GCON";

/// Holding any of these implies reading the organization.
const ROLE_MANAGEMENT: [&str; 3] = ["CRORG", "URORG", "DRORG"];
const ORGANIZATION_READ: &str = "RORG";

/// True iff `codes` (placeholders skipped) is non-empty and fully contained in `set`.
pub fn is_subsection_full_access<'a>(
    set: &PermissionSet,
    codes: impl IntoIterator<Item = &'a str>,
) -> bool {
    let mut any = false;
    for code in codes.into_iter().filter(|code| !code.is_empty()) {
        if !set.contains(code) {
            return false;
        }
        any = true;
    }
    any
}

#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver<'a> {
    catalog: &'a PermissionCatalog,
}

impl<'a> PermissionResolver<'a> {
    pub fn new(catalog: &'a PermissionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a PermissionCatalog {
        self.catalog
    }

    /// Flip one permission.
    ///
    /// Granting also grants what the permission requires. Revoking drops the
    /// requirements that nothing else still needs. Unknown codes and attempts
    /// to revoke a default permission leave the set as it is.
    pub fn toggle_single(&self, current: &PermissionSet, code: &str) -> PermissionSet {
        if !self.catalog.is_known(code) {
            tracing::debug!(code, "Ignoring toggle of unknown permission");
            return self.apply_invariants(current.clone());
        }

        let mut next = current.clone();
        if current.contains(code) {
            if self.catalog.is_default(code) {
                tracing::debug!(code, "Refusing to revoke default permission");
                return self.apply_invariants(next);
            }
            next.remove(code);
            self.release_dependencies(&mut next, [code]);
        } else {
            self.grant_with_dependencies(&mut next, [code]);
        }

        self.apply_invariants(next)
    }

    /// Grant or revoke a whole group of codes at once.
    ///
    /// Unknown and placeholder codes are skipped; default permissions survive
    /// a revoke.
    pub fn toggle_group<'c>(
        &self,
        current: &PermissionSet,
        enabling: bool,
        codes: impl IntoIterator<Item = &'c str>,
    ) -> PermissionSet {
        let codes: Vec<&str> = codes
            .into_iter()
            .filter(|code| self.catalog.is_known(code))
            .collect();

        let mut next = current.clone();
        if enabling {
            self.grant_with_dependencies(&mut next, codes.iter().copied());
        } else {
            let revoked: Vec<&str> = codes
                .iter()
                .copied()
                .filter(|code| !self.catalog.is_default(code))
                .collect();
            for code in &revoked {
                next.remove(code);
            }
            self.release_dependencies(&mut next, revoked);
        }

        self.apply_invariants(next)
    }

    /// [`toggle_group`](Self::toggle_group) over a subsection looked up by name.
    /// An unknown module name changes nothing.
    pub fn toggle_subsection(
        &self,
        current: &PermissionSet,
        enabling: bool,
        module_name: &str,
    ) -> PermissionSet {
        match self.catalog.subsection(module_name) {
            Some(subsection) => self.toggle_group(current, enabling, subsection.codes()),
            None => {
                tracing::debug!(module_name, "Ignoring toggle of unknown subsection");
                self.apply_invariants(current.clone())
            }
        }
    }

    /// Replace `current` with a whole requested set, as if every requested
    /// code were granted one by one.
    ///
    /// Unknown codes are dropped, requirements are filled in and defaults
    /// held by `current` are kept.
    pub fn replace_with<'c>(
        &self,
        current: &PermissionSet,
        requested: impl IntoIterator<Item = &'c str>,
    ) -> PermissionSet {
        let mut next: PermissionSet = current
            .iter()
            .filter(|held| self.catalog.is_default(held.as_str()))
            .cloned()
            .collect();

        let granted: Vec<&str> = requested
            .into_iter()
            .filter(|code| {
                let known = self.catalog.is_known(code);
                if !known {
                    tracing::debug!(code = *code, "Dropping unknown permission");
                }
                known
            })
            .collect();
        self.grant_with_dependencies(&mut next, granted);

        self.apply_invariants(next)
    }

    pub fn is_full_access(&self, set: &PermissionSet, module_name: &str) -> bool {
        self.catalog
            .subsection(module_name)
            .map(|s| is_subsection_full_access(set, s.codes()))
            .unwrap_or(false)
    }

    /// Post-processing run after every operation.
    pub fn apply_invariants(&self, mut set: PermissionSet) -> PermissionSet {
        let manages_roles = ROLE_MANAGEMENT.iter().any(|code| set.contains(code));
        if manages_roles && !set.contains(ORGANIZATION_READ) {
            set.insert(ORGANIZATION_READ);
        }
        set
    }

    fn grant_with_dependencies<'c>(
        &self,
        set: &mut PermissionSet,
        codes: impl IntoIterator<Item = &'c str>,
    ) {
        let dependencies = self.catalog.dependencies();
        let mut pending: VecDeque<Permission> = codes.into_iter().map(Permission::from).collect();

        while let Some(code) = pending.pop_front() {
            pending.extend(dependencies.requires(code.as_str()).iter().cloned());
            set.insert(code);
            pending.retain(|p| !set.contains(p.as_str()));
        }
    }

    /// Drop requirements of `revoked` codes that are no longer needed.
    ///
    /// A candidate is kept while another held permission requires it, while it
    /// is a default, or while the full contract group protects it. Removing a
    /// candidate makes its own requirements candidates, and the pass repeats
    /// until nothing changes, so the result does not depend on ordering.
    fn release_dependencies<'c>(
        &self,
        set: &mut PermissionSet,
        revoked: impl IntoIterator<Item = &'c str>,
    ) {
        let dependencies = self.catalog.dependencies();
        let mut candidates: Vec<Permission> = revoked
            .into_iter()
            .flat_map(|code| dependencies.requires(code).iter().cloned())
            .collect();

        loop {
            let removable: Vec<Permission> = candidates
                .iter()
                .filter(|dep| set.contains(dep.as_str()))
                .filter(|dep| !self.is_retained(set, dep.as_str()))
                .cloned()
                .collect();

            if removable.is_empty() {
                break;
            }

            candidates.clear();
            for dep in &removable {
                set.remove(dep.as_str());
            }
            for dep in &removable {
                candidates.extend(dependencies.requires(dep.as_str()).iter().cloned());
            }
        }
    }

    fn is_retained(&self, set: &PermissionSet, dep: &str) -> bool {
        if self.catalog.is_default(dep) {
            return true;
        }

        let still_required = set
            .iter()
            .filter(|held| held.as_str() != dep)
            .any(|held| self.catalog.dependencies().depends_on(held.as_str(), dep));
        if still_required {
            return true;
        }

        dep == CONTRACT_READ && set.contains_all(FULL_CONTRACT_GROUP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::catalog::{DependencyTable, PermissionEntry, PermissionSubsection};

    fn subsection(name: &str, entries: &[(&str, bool)]) -> PermissionSubsection {
        PermissionSubsection {
            module_name: name.to_string(),
            permissions: entries
                .iter()
                .map(|(code, is_default)| PermissionEntry {
                    code: Permission::from(*code),
                    label: code.to_string(),
                    is_default: *is_default,
                })
                .collect(),
        }
    }

    fn chained_catalog() -> PermissionCatalog {
        PermissionCatalog::new(
            vec![subsection("Chain", &[("A", false), ("B", false), ("C", false)])],
            DependencyTable::new().with("A", &["B"]).with("B", &["C"]),
        )
    }

    fn set(codes: &[&str]) -> PermissionSet {
        codes.iter().copied().collect()
    }

    #[test]
    fn test_grant_follows_chains() {
        let catalog = chained_catalog();
        let resolver = PermissionResolver::new(&catalog);
        assert_eq!(resolver.toggle_single(&set(&[]), "A"), set(&["A", "B", "C"]));
    }

    #[test]
    fn test_release_follows_chains() {
        let catalog = chained_catalog();
        let resolver = PermissionResolver::new(&catalog);
        assert_eq!(resolver.toggle_single(&set(&["A", "B", "C"]), "A"), set(&[]));
    }

    #[test]
    fn test_release_keeps_shared_requirement() {
        let catalog = PermissionCatalog::new(
            vec![subsection("S", &[("X", false), ("Y", false), ("Z", false)])],
            DependencyTable::new().with("X", &["Z"]).with("Y", &["Z"]),
        );
        let resolver = PermissionResolver::new(&catalog);
        assert_eq!(
            resolver.toggle_single(&set(&["X", "Y", "Z"]), "X"),
            set(&["Y", "Z"])
        );
    }

    #[test]
    fn test_release_never_drops_default_requirement() {
        let catalog = PermissionCatalog::new(
            vec![subsection("S", &[("READ", true), ("WRITE", false)])],
            DependencyTable::new().with("WRITE", &["READ"]),
        );
        let resolver = PermissionResolver::new(&catalog);
        assert_eq!(
            resolver.toggle_single(&set(&["READ", "WRITE"]), "WRITE"),
            set(&["READ"])
        );
    }

    #[test]
    fn test_replace_with_fills_requirements_and_drops_unknown() {
        let catalog = chained_catalog();
        let resolver = PermissionResolver::new(&catalog);
        assert_eq!(
            resolver.replace_with(&set(&["C"]), ["A", "NOPE"]),
            set(&["A", "B", "C"])
        );
        assert_eq!(
            resolver.replace_with(&set(&["A", "B", "C"]), std::iter::empty()),
            set(&[])
        );
    }

    #[test]
    fn test_replace_with_keeps_held_defaults() {
        let catalog = PermissionCatalog::new(
            vec![subsection("S", &[("READ", true), ("WRITE", false)])],
            DependencyTable::new(),
        );
        let resolver = PermissionResolver::new(&catalog);
        assert_eq!(
            resolver.replace_with(&set(&["READ", "WRITE"]), ["WRITE"]),
            set(&["READ", "WRITE"])
        );
        assert_eq!(
            resolver.replace_with(&set(&["READ"]), std::iter::empty()),
            set(&["READ"])
        );
        assert_eq!(resolver.replace_with(&set(&[]), ["WRITE"]), set(&["WRITE"]));
    }

    #[test]
    fn test_full_access_ignores_placeholders() {
        let held = set(&["RREV"]);
        assert!(is_subsection_full_access(&held, ["RREV", ""]));
        assert!(!is_subsection_full_access(&held, [""]));
        assert!(!is_subsection_full_access(&held, std::iter::empty()));
    }

    #[test]
    fn test_unknown_subsection_is_noop() {
        let catalog = chained_catalog();
        let resolver = PermissionResolver::new(&catalog);
        assert_eq!(
            resolver.toggle_subsection(&set(&["C"]), true, "Missing"),
            set(&["C"])
        );
        assert!(!resolver.is_full_access(&set(&["C"]), "Missing"));
    }
}

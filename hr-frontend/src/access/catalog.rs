//! Static permission catalog: subsections with their entries, plus the
//! dependency table declaring which permissions a permission requires.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::models::{Permission, PermissionSet};

/// One checkbox in the role editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    pub code: Permission,
    pub label: String,
    pub is_default: bool,
}

/// A named group of permissions with a derived "full access" toggle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSubsection {
    pub module_name: String,
    pub permissions: Vec<PermissionEntry>,
}

impl PermissionSubsection {
    /// Codes that take part in full-access evaluation (placeholders excluded).
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.permissions
            .iter()
            .map(|entry| entry.code.as_str())
            .filter(|code| !code.is_empty())
    }
}

/// `code -> codes it requires`.
#[derive(Debug, Clone, Default)]
pub struct DependencyTable(HashMap<Permission, Vec<Permission>>);

impl DependencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: &str, requires: &[&str]) -> Self {
        self.0.insert(
            Permission::from(code),
            requires.iter().copied().map(Permission::from).collect(),
        );
        self
    }

    /// Direct requirements of `code`; empty for codes without edges.
    pub fn requires(&self, code: &str) -> &[Permission] {
        self.0.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `code` directly requires `dependency`.
    pub fn depends_on(&self, code: &str, dependency: &str) -> bool {
        self.requires(code).iter().any(|d| d.as_str() == dependency)
    }
}

#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    subsections: Vec<PermissionSubsection>,
    dependencies: DependencyTable,
    known: HashSet<Permission>,
    defaults: PermissionSet,
}

impl PermissionCatalog {
    pub fn new(subsections: Vec<PermissionSubsection>, dependencies: DependencyTable) -> Self {
        let entries = subsections
            .iter()
            .flat_map(|s| s.permissions.iter())
            .filter(|entry| !entry.code.is_placeholder());

        let mut known = HashSet::new();
        let mut defaults = PermissionSet::new();
        for entry in entries {
            known.insert(entry.code.clone());
            if entry.is_default {
                defaults.insert(entry.code.clone());
            }
        }

        Self {
            subsections,
            dependencies,
            known,
            defaults,
        }
    }

    pub fn subsections(&self) -> &[PermissionSubsection] {
        &self.subsections
    }

    pub fn subsection(&self, module_name: &str) -> Option<&PermissionSubsection> {
        self.subsections
            .iter()
            .find(|s| s.module_name == module_name)
    }

    pub fn dependencies(&self) -> &DependencyTable {
        &self.dependencies
    }

    /// Every `isDefault` entry across all subsections.
    pub fn defaults(&self) -> &PermissionSet {
        &self.defaults
    }

    pub fn is_known(&self, code: &str) -> bool {
        self.known.contains(code)
    }

    pub fn is_default(&self, code: &str) -> bool {
        self.defaults.contains(code)
    }
}

type EntryRow = (&'static str, &'static str, bool);

const SUBSECTIONS: &[(&str, &[EntryRow])] = &[
    (
        "Employees",
        &[
            ("REMP", "View Employees", false),
            ("CEMP", "Add Employees", false),
            ("UEMP", "Edit Employees", false),
            ("DEMP", "Delete Employees", false),
        ],
    ),
    (
        "Clients",
        &[
            ("RCLI", "View Clients", false),
            ("CCLI", "Add Clients", false),
            ("UCLI", "Edit Clients", false),
            ("DCLI", "Delete Clients", false),
        ],
    ),
    (
        "Projects",
        &[
            ("RPRO", "View Projects", false),
            ("CPRO", "Add Projects", false),
            ("UPRO", "Edit Projects", false),
            ("DPRO", "Delete Projects", false),
        ],
    ),
    (
        "Contracts",
        &[
            ("GCON", "View Contracts", false),
            ("CCON", "Add Contracts", false),
            ("UCON", "Edit Contracts", false),
            ("DCON", "Delete Contracts", false),
        ],
    ),
    (
        "Contract Invoices",
        &[
            ("RIN", "View Invoices", false),
            ("CIN", "Create Invoices", false),
        ],
    ),
    (
        "Loans",
        &[
            ("RLN", "View Loans", false),
            ("CLN", "Add Loans", false),
            ("ULN", "Edit Loans", false),
            ("ALN", "Approve Loans", false),
        ],
    ),
    (
        "Recruitment",
        &[
            ("RAPP", "View Applicants", false),
            ("CAPP", "Add Applicants", false),
            ("UAPP", "Edit Applicants", false),
            ("DAPP", "Delete Applicants", false),
        ],
    ),
    (
        "Performance Reviews",
        &[
            ("RREV", "View Reviews", false),
            ("CREV", "Start Reviews", false),
            ("UREV", "Edit Reviews", false),
            ("", "Export Reviews", false),
        ],
    ),
    (
        "Organization",
        &[
            ("RORG", "View Organization", false),
            ("UORG", "Edit Organization Settings", false),
            ("CRORG", "Create Roles", false),
            ("URORG", "Edit Roles", false),
            ("DRORG", "Delete Roles", false),
        ],
    ),
    (
        "Manage Own Documents",
        &[
            ("RDM", "View Own Documents", true),
            ("CDM", "Upload Own Documents", false),
            ("DDM", "Delete Own Documents", false),
            ("UDM", "Edit Own Documents", false),
        ],
    ),
];

fn builtin_dependencies() -> DependencyTable {
    DependencyTable::new()
        .with("CEMP", &["REMP"])
        .with("UEMP", &["REMP"])
        .with("DEMP", &["REMP"])
        .with("CCLI", &["RCLI"])
        .with("UCLI", &["RCLI"])
        .with("DCLI", &["RCLI"])
        .with("RPRO", &["RCLI"])
        .with("CPRO", &["RPRO", "RCLI"])
        .with("UPRO", &["RPRO", "RCLI"])
        .with("DPRO", &["RPRO", "RCLI"])
        .with("CCON", &["RCLI"])
        .with("RIN", &["GCON"])
        .with("CIN", &["GCON"])
        .with("CLN", &["RLN"])
        .with("ULN", &["RLN"])
        .with("ALN", &["RLN", "REMP"])
        .with("CAPP", &["RAPP"])
        .with("UAPP", &["RAPP"])
        .with("DAPP", &["RAPP"])
        .with("RREV", &["REMP"])
        .with("CREV", &["RREV", "REMP"])
        .with("UREV", &["RREV", "REMP"])
        .with("UORG", &["RORG"])
        .with("CDM", &["RDM"])
        .with("DDM", &["RDM"])
        .with("UDM", &["RDM"])
}

fn builtin_subsections() -> Vec<PermissionSubsection> {
    SUBSECTIONS
        .iter()
        .map(|(module_name, entries)| PermissionSubsection {
            module_name: module_name.to_string(),
            permissions: entries
                .iter()
                .map(|(code, label, is_default)| PermissionEntry {
                    code: Permission::from(*code),
                    label: label.to_string(),
                    is_default: *is_default,
                })
                .collect(),
        })
        .collect()
}

/// The HR suite's permission catalog, built once per process.
pub static HR_CATALOG: Lazy<PermissionCatalog> =
    Lazy::new(|| PermissionCatalog::new(builtin_subsections(), builtin_dependencies()));

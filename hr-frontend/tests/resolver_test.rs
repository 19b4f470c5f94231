use hr_frontend::access::{
    has_feature, has_permission, is_subsection_full_access, PermissionResolver, HR_CATALOG,
};
use hr_frontend::models::{FeatureToggles, PermissionSet, User};

fn set(codes: &[&str]) -> PermissionSet {
    codes.iter().copied().collect()
}

fn resolver() -> PermissionResolver<'static> {
    PermissionResolver::new(&HR_CATALOG)
}

fn group(module_name: &str) -> Vec<&'static str> {
    HR_CATALOG
        .subsection(module_name)
        .expect("subsection exists")
        .codes()
        .collect()
}

#[test]
fn enabling_a_group_twice_equals_once() {
    let resolver = resolver();
    for subsection in HR_CATALOG.subsections() {
        let codes: Vec<&str> = subsection.codes().collect();
        for start in [set(&[]), set(&["RDM"]), set(&["GCON", "CIN"])] {
            let once = resolver.toggle_group(&start, true, codes.iter().copied());
            let twice = resolver.toggle_group(&once, true, codes.iter().copied());
            assert_eq!(once, twice, "group {}", subsection.module_name);
        }
    }
}

#[test]
fn group_toggle_drives_full_access_predicate() {
    let resolver = resolver();
    for subsection in HR_CATALOG.subsections() {
        let codes: Vec<&str> = subsection.codes().collect();

        let enabled = resolver.toggle_group(&set(&[]), true, codes.iter().copied());
        assert!(is_subsection_full_access(&enabled, codes.iter().copied()));

        let disabled = resolver.toggle_group(&enabled, false, codes.iter().copied());
        assert!(
            !is_subsection_full_access(&disabled, codes.iter().copied()),
            "group {} still full after disable",
            subsection.module_name
        );
    }
}

#[test]
fn removing_dependent_drops_unused_requirement() {
    let result = resolver().toggle_single(&set(&["CIN", "GCON"]), "CIN");
    assert_eq!(result, set(&[]));
}

#[test]
fn full_contract_group_keeps_contract_read() {
    let resolver = resolver();

    let start = set(&["CIN", "CCON", "UCON", "DCON", "GCON", "RCLI"]);
    let result = resolver.toggle_single(&start, "CIN");
    assert_eq!(result, set(&["CCON", "UCON", "DCON", "GCON", "RCLI"]));

    let partial = set(&["CIN", "CCON", "GCON", "RCLI"]);
    let result = resolver.toggle_single(&partial, "CIN");
    assert_eq!(result, set(&["CCON", "RCLI"]));
}

#[test]
fn contract_read_survives_invoice_group_disable_under_full_contract_group() {
    let resolver = resolver();
    let contracts = resolver.toggle_group(&set(&[]), true, group("Contracts"));
    let with_invoices = resolver.toggle_group(&contracts, true, group("Contract Invoices"));

    let result = resolver.toggle_group(&with_invoices, false, group("Contract Invoices"));
    assert!(result.contains("GCON"));
    assert!(resolver.is_full_access(&result, "Contracts"));
}

#[test]
fn granting_pulls_in_direct_requirements() {
    let result = resolver().toggle_single(&set(&[]), "CPRO");
    assert_eq!(result, set(&["CPRO", "RPRO", "RCLI"]));
}

#[test]
fn role_management_implies_organization_read() {
    let resolver = resolver();
    let start = set(&["CRORG"]);

    assert!(resolver.toggle_single(&start, "CEMP").contains("RORG"));
    assert!(resolver.toggle_single(&start, "NOPE").contains("RORG"));
    assert!(resolver.toggle_group(&start, true, group("Loans")).contains("RORG"));
    assert!(resolver.toggle_group(&start, false, group("Loans")).contains("RORG"));

    // Revoking the read permission directly is undone by the same pass
    let with_read = set(&["URORG", "RORG"]);
    assert!(resolver.toggle_single(&with_read, "RORG").contains("RORG"));
}

#[test]
fn access_gate_fails_closed() {
    assert!(!has_permission(None, "ANYTHING"));

    let no_roles = User {
        employee_id: "E-0".to_string(),
        roles: vec![],
    };
    assert!(!has_permission(Some(&no_roles), "ANYTHING"));
    assert!(!has_feature(&FeatureToggles::default(), "MISSING_KEY"));
}

#[test]
fn default_permission_cannot_be_revoked() {
    let resolver = resolver();
    let start = set(&["RDM", "CDM"]);

    assert_eq!(resolver.toggle_single(&start, "RDM"), start);

    let disabled = resolver.toggle_group(&start, false, group("Manage Own Documents"));
    assert!(disabled.contains("RDM"));
}

#[test]
fn unknown_code_is_ignored() {
    let start = set(&["REMP"]);
    assert_eq!(resolver().toggle_single(&start, "XYZ"), start);
    assert_eq!(resolver().toggle_single(&start, ""), start);
}

#[test]
fn own_documents_group_round_trip_from_defaults() {
    let resolver = resolver();
    let defaults = HR_CATALOG.defaults().clone();
    assert_eq!(defaults, set(&["RDM"]));

    let documents = group("Manage Own Documents");
    let enabled = resolver.toggle_group(&defaults, true, documents.iter().copied());
    assert_eq!(enabled, set(&["RDM", "CDM", "DDM", "UDM"]));
    assert!(resolver.is_full_access(&enabled, "Manage Own Documents"));

    let disabled = resolver.toggle_group(&enabled, false, documents.iter().copied());
    assert_eq!(disabled, set(&["RDM"]));
    assert!(!resolver.is_full_access(&disabled, "Manage Own Documents"));
}

#[test]
fn single_toggle_round_trips() {
    let resolver = resolver();
    let start = set(&["RDM"]);
    for code in ["CEMP", "ALN", "CPRO", "UREV", "CAPP"] {
        let granted = resolver.toggle_single(&start, code);
        assert!(granted.contains(code));
        assert_eq!(resolver.toggle_single(&granted, code), start, "code {}", code);
    }
}

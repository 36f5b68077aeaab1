//! Static menu definition and the visibility filter applied to it per
//! principal.
//!
//! The filtered tree only affects discoverability - the route guard in the
//! client core is the actual enforcement point.

use crate::uac::{AccessMode, Permission, Permissions};

/// One node of the static menu configuration. A node without a `path` is a
/// pure grouping node and is visible only while at least one child is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: Option<&'static str>,
    /// For a leaf this gates visibility (any-of). For a group it is a label
    /// level pre-filter only; group visibility is driven by the children.
    pub required_permissions: Vec<Permission>,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn leaf(
        label: &'static str,
        path: &'static str,
        required_permissions: Vec<Permission>,
    ) -> Self {
        Self {
            label,
            path: Some(path),
            required_permissions,
            children: Vec::new(),
        }
    }

    pub fn group(
        label: &'static str,
        required_permissions: Vec<Permission>,
        children: Vec<MenuItem>,
    ) -> Self {
        Self {
            label,
            path: None,
            required_permissions,
            children,
        }
    }

    pub fn is_group(&self) -> bool {
        self.path.is_none()
    }
}

/// Returns the subtree of `items` visible to a principal with `granted`
/// permissions, preserving the configured order.
///
/// Depth first: a leaf is kept iff its required list authorizes (any-of), a
/// group is kept iff it still has visible children after filtering.
#[tracing::instrument(skip(items))]
pub fn filter_menu(items: &[MenuItem], granted: &Permissions) -> Vec<MenuItem> {
    items
        .iter()
        .filter_map(|item| {
            if item.is_group() {
                let children = filter_menu(&item.children, granted);
                if children.is_empty() {
                    None
                } else {
                    Some(MenuItem {
                        children,
                        ..item.clone()
                    })
                }
            } else if granted.is_authorized(&item.required_permissions, AccessMode::Any) {
                Some(item.clone())
            } else {
                None
            }
        })
        .collect()
}

/// The console's menu tree. Unrestricted entries carry an empty required
/// list.
pub fn default_menu() -> Vec<MenuItem> {
    use Permission as perm;
    vec![
        MenuItem::leaf("Dashboard", "/", vec![]),
        MenuItem::group(
            "Organization",
            vec![],
            vec![
                MenuItem::leaf("Units", "/units", vec![perm::ManageUnits]),
                MenuItem::leaf("Departments", "/departments", vec![perm::ManageDepartments]),
                MenuItem::leaf("Positions", "/positions", vec![perm::ManagePositions]),
                MenuItem::leaf("Employees", "/employees", vec![perm::ManageEmployees]),
            ],
        ),
        MenuItem::group(
            "Assets",
            vec![],
            vec![
                MenuItem::leaf("Categories", "/categories", vec![perm::ManageCategories]),
                MenuItem::leaf(
                    "Tools",
                    "/tools",
                    vec![
                        perm::ViewAllTools,
                        perm::ViewDepartmentTools,
                        perm::ViewAssignedTools,
                    ],
                ),
                MenuItem::leaf("Sub-Tools", "/sub-tools", vec![perm::ManageSubTools]),
                MenuItem::leaf("Accessories", "/accessories", vec![perm::ManageAccessories]),
            ],
        ),
        MenuItem::group(
            "Custody",
            vec![],
            vec![
                MenuItem::leaf("Assign", "/custody/assign", vec![perm::AssignCustody]),
                MenuItem::leaf("Revoke", "/custody/revoke", vec![perm::RevokeCustody]),
                MenuItem::leaf(
                    "History",
                    "/custody/history",
                    vec![perm::ViewCustodyHistory],
                ),
            ],
        ),
        MenuItem::group(
            "Administration",
            vec![perm::ManageSystem],
            vec![
                MenuItem::leaf("Import", "/admin/import", vec![perm::ImportData]),
                MenuItem::leaf("System", "/admin/system", vec![perm::ManageSystem]),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use Permission as p;

    fn labels(items: &[MenuItem]) -> Vec<&'static str> {
        items.iter().map(|x| x.label).collect()
    }

    #[test]
    fn unrestricted_leaves_are_always_visible() {
        let visible = filter_menu(&default_menu(), &Permissions::default());

        assert_eq!(labels(&visible), vec!["Dashboard"]);
    }

    #[test]
    fn group_with_no_visible_children_is_dropped() {
        let granted: Permissions = vec![p::ViewAssignedTools].into();

        let visible = filter_menu(&default_menu(), &granted);

        assert_eq!(labels(&visible), vec!["Dashboard", "Assets"]);
        let assets = &visible[1];
        assert_eq!(labels(&assets.children), vec!["Tools"]);
    }

    /// The group level required list is a label only, a group whose own check
    /// fails still shows when a child is visible
    #[test]
    fn group_visibility_is_driven_by_children_not_group_permissions() {
        let granted: Permissions = vec![p::ImportData].into();

        let visible = filter_menu(&default_menu(), &granted);

        assert_eq!(labels(&visible), vec!["Dashboard", "Administration"]);
        assert_eq!(labels(&visible[1].children), vec!["Import"]);
    }

    #[test]
    fn order_of_children_is_preserved() {
        let granted: Permissions = vec![
            p::ManageEmployees,
            p::ManageUnits,
            p::ManagePositions,
            p::ManageDepartments,
        ]
        .into();

        let visible = filter_menu(&default_menu(), &granted);

        let organization = visible
            .iter()
            .find(|x| x.label == "Organization")
            .expect("organization group should be visible");
        assert_eq!(
            labels(&organization.children),
            vec!["Units", "Departments", "Positions", "Employees"]
        );
    }

    #[test]
    fn full_grant_sees_the_whole_tree() {
        let granted: Permissions = default_menu()
            .iter()
            .flat_map(|x| x.children.iter().chain(std::iter::once(x)))
            .flat_map(|x| x.required_permissions.clone())
            .collect::<Vec<_>>()
            .into();

        let visible = filter_menu(&default_menu(), &granted);

        assert_eq!(
            labels(&visible),
            vec![
                "Dashboard",
                "Organization",
                "Assets",
                "Custody",
                "Administration"
            ]
        );
    }
}

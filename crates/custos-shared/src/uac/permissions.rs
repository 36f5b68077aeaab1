use anyhow::bail;
use std::{
    collections::BTreeSet,
    fmt::{Debug, Display},
};
use strum::{EnumCount, IntoEnumIterator};

/// The closed vocabulary of grantable capabilities.
///
/// Serialized over the wire as the snake_case token the identity provider
/// uses (e.g. `view_all_tools`). [`Display`] is the human readable label
/// shown on denial screens and management pages.
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    strum::EnumCount,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Asset visibility
    ViewAllTools,
    ViewDepartmentTools,
    ViewAssignedTools,

    // Asset management
    ManageCategories,
    ManageTools,
    ManageSubTools,
    ManageAccessories,

    // Custody
    AssignCustody,
    RevokeCustody,
    ViewCustodyHistory,

    // Organization management
    ManageUnits,
    ManageDepartments,
    ManagePositions,
    ManageEmployees,

    // Misc
    ImportData,
    ManageSystem,
}

/// Whether a required-permission list grants entry on any match or only on a
/// full match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// At least one required permission must be granted (the common case -
    /// most pages accept several alternative roles)
    #[default]
    Any,
    /// Every required permission must be granted
    All,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Permissions(pub BTreeSet<Permission>);

impl Permissions {
    pub fn includes_all(&self, perms: &[Permission]) -> bool {
        perms.iter().all(|x| self.0.contains(x))
    }

    pub fn includes_any(&self, perms: &[Permission]) -> bool {
        perms.iter().any(|x| self.0.contains(x))
    }

    /// The access decision used by every gate in the console.
    ///
    /// An empty `required` list means the resource is unrestricted and always
    /// grants. Never errors - a malformed or missing input on the granted
    /// side has already degraded to an empty set by construction.
    pub fn is_authorized(&self, required: &[Permission], mode: AccessMode) -> bool {
        if required.is_empty() {
            return true;
        }
        match mode {
            AccessMode::Any => self.includes_any(required),
            AccessMode::All => self.includes_all(required),
        }
    }

    /// The subset of `required` not present in this granted set (in the order
    /// given), used to label denial screens
    pub fn missing_from(&self, required: &[Permission]) -> Vec<Permission> {
        required
            .iter()
            .filter(|x| !self.0.contains(x))
            .copied()
            .collect()
    }
}

impl From<Vec<Permission>> for Permissions {
    fn from(value: Vec<Permission>) -> Self {
        let mut result: Self = Default::default();
        for permission in value.into_iter() {
            result.0.insert(permission);
        }
        result
    }
}

impl TryFrom<String> for Permissions {
    type Error = anyhow::Error;

    /// Parses the compact flag-string the identity provider stores for a
    /// position, one `0`/`1` per vocabulary entry in declaration order
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self::default());
        }

        if Permission::COUNT != value.len() {
            bail!("Only valid strings are those of length {} but found string of length {}. Value: {value:?}", Permission::COUNT , value.len());
        }
        let mut result = Permissions::default();
        for (c, p) in value.chars().zip(Permission::iter()) {
            match c {
                '0' => (), // Do nothing this one is not included
                '1' => {
                    let did_not_exist = result.0.insert(p);
                    debug_assert!(did_not_exist, "Since we should always get a new Permission we should never already have the value inserted");
                }
                _ => bail!(
                    "found an unexpected character for {p:?}. Only 0 or 1 expected but found {c}"
                ),
            }
        }
        Ok(result)
    }
}

impl From<&Permissions> for String {
    fn from(value: &Permissions) -> Self {
        let mut iter = value.0.iter();
        let mut next = iter.next();
        let mut result = String::with_capacity(Permission::COUNT);
        for permission in Permission::iter() {
            let ch = match next {
                Some(&x) if x == permission => {
                    next = iter.next();
                    debug_assert!(
                        next.is_none() || next.is_some_and(|&x| x > permission),
                        "Implementation assumes sorted values from iterator but assumption violated. Next: {next:?} Current: {permission}"
                    );
                    '1'
                }
                _ => '0',
            };
            result.push(ch);
        }
        debug_assert_eq!(result.len(), Permission::COUNT);
        debug_assert!(next.is_none());
        result
    }
}

impl From<Permissions> for String {
    fn from(value: Permissions) -> Self {
        (&value).into()
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let display_text = match self {
            Permission::ViewAllTools => "View All Tools",
            Permission::ViewDepartmentTools => "View Department Tools",
            Permission::ViewAssignedTools => "View Assigned Tools",
            Permission::ManageCategories => "Manage Categories",
            Permission::ManageTools => "Manage Tools",
            Permission::ManageSubTools => "Manage Sub-Tools",
            Permission::ManageAccessories => "Manage Accessories",
            Permission::AssignCustody => "Assign Custody",
            Permission::RevokeCustody => "Revoke Custody",
            Permission::ViewCustodyHistory => "View Custody History",
            Permission::ManageUnits => "Manage Units",
            Permission::ManageDepartments => "Manage Departments",
            Permission::ManagePositions => "Manage Positions",
            Permission::ManageEmployees => "Manage Employees",
            Permission::ImportData => "Import Data",
            Permission::ManageSystem => "Manage System",
        };
        write!(f, "{display_text}")
    }
}

impl Debug for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text: String = self.into();
        f.debug_tuple("Permissions").field(&text).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use Permission as p;

    #[rstest]
    #[case::no_granted(vec![])]
    #[case::some_granted(vec![p::ViewAllTools, p::ManageSystem])]
    fn empty_required_always_grants(#[case] granted: Vec<Permission>) {
        let granted: Permissions = granted.into();

        assert!(granted.is_authorized(&[], AccessMode::Any));
        assert!(granted.is_authorized(&[], AccessMode::All));
    }

    #[rstest]
    #[case::single_overlap(vec![p::ViewAllTools], vec![p::ViewAllTools, p::ViewAssignedTools], true)]
    #[case::other_alternative(vec![p::ViewAssignedTools], vec![p::ViewAllTools, p::ViewAssignedTools], true)]
    #[case::no_overlap(vec![p::ViewAssignedTools], vec![p::ManageSystem], false)]
    #[case::nothing_granted(vec![], vec![p::ViewAllTools], false)]
    fn any_mode_is_intersection_non_empty(
        #[case] granted: Vec<Permission>,
        #[case] required: Vec<Permission>,
        #[case] expected: bool,
    ) {
        let granted: Permissions = granted.into();

        assert_eq!(granted.is_authorized(&required, AccessMode::Any), expected);
    }

    #[rstest]
    #[case::exact(vec![p::AssignCustody, p::RevokeCustody], vec![p::AssignCustody, p::RevokeCustody], true)]
    #[case::superset(vec![p::AssignCustody, p::RevokeCustody, p::ViewCustodyHistory], vec![p::AssignCustody], true)]
    #[case::partial(vec![p::AssignCustody], vec![p::AssignCustody, p::RevokeCustody], false)]
    #[case::nothing_granted(vec![], vec![p::AssignCustody], false)]
    fn all_mode_is_subset(
        #[case] granted: Vec<Permission>,
        #[case] required: Vec<Permission>,
        #[case] expected: bool,
    ) {
        let granted: Permissions = granted.into();

        assert_eq!(granted.is_authorized(&required, AccessMode::All), expected);
    }

    #[test]
    fn missing_from_preserves_required_order() {
        let granted: Permissions = vec![p::ViewAssignedTools].into();
        let required = [p::ManageSystem, p::ViewAssignedTools, p::ManageUnits];

        let actual = granted.missing_from(&required);

        assert_eq!(actual, vec![p::ManageSystem, p::ManageUnits]);
    }

    #[rstest]
    #[case::empty("0000000000000000", vec![])]
    #[case::administrator("1111111111111111", vec![p::ViewAllTools, p::ViewDepartmentTools, p::ViewAssignedTools, p::ManageCategories, p::ManageTools, p::ManageSubTools, p::ManageAccessories, p::AssignCustody, p::RevokeCustody, p::ViewCustodyHistory, p::ManageUnits, p::ManageDepartments, p::ManagePositions, p::ManageEmployees, p::ImportData, p::ManageSystem])]
    #[case::view_only("0010000001000000", vec![p::ViewAssignedTools, p::ViewCustodyHistory])]
    #[case::custodian("1000000111000000", vec![p::ViewAllTools, p::AssignCustody, p::RevokeCustody, p::ViewCustodyHistory])]
    #[case::org_admin("0000000000111100", vec![p::ManageUnits, p::ManageDepartments, p::ManagePositions, p::ManageEmployees])]
    fn string_to_permissions(#[case] s: String, #[case] permission_list: Vec<Permission>) {
        // Arrange
        let expected: Permissions = permission_list.into();

        // Act
        let actual: Permissions = s.clone().try_into().unwrap();

        // Assert
        assert_eq!(actual, expected);

        // Arrange - Test reverse
        let expected = s;
        let input = actual;

        // Act
        let actual: String = input.into();

        // Assert
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::too_short("111")]
    #[case::invalid_char("a000000000000000")]
    fn invalid_inputs(#[case] s: String) {
        let actual: anyhow::Result<Permissions> = s.try_into();
        match actual {
            Ok(val) => panic!("Expected an error but got {val:?}"),
            Err(e) => println!("Expected and error and got one: {e}"),
        }
    }

    #[test]
    fn wire_tokens_are_snake_case() {
        let actual = serde_json::to_string(&p::ViewAllTools).unwrap();
        assert_eq!(actual, "\"view_all_tools\"");
        let actual = serde_json::to_string(&p::ManageSystem).unwrap();
        assert_eq!(actual, "\"manage_system\"");
    }
}

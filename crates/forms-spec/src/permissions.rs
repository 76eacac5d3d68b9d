use std::collections::{BTreeMap, BTreeSet};

use crate::spec::form::FormSchema;
use crate::spec::permission::{AccessMode, FieldPermissions, UserPermissions};

/// At least one required role must be held. No requirement passes.
pub fn has_required_roles(user_roles: &BTreeSet<String>, required: Option<&[String]>) -> bool {
    match required {
        None | Some([]) => true,
        Some(roles) => roles.iter().any(|role| user_roles.contains(role)),
    }
}

/// Every required permission must be granted. No requirement passes.
pub fn has_required_permissions(
    granted: &BTreeMap<String, bool>,
    required: Option<&[String]>,
) -> bool {
    match required {
        None | Some([]) => true,
        Some(permissions) => permissions
            .iter()
            .all(|permission| granted.get(permission).copied() == Some(true)),
    }
}

pub fn get_field_access_mode(
    field: Option<&FieldPermissions>,
    user: &UserPermissions,
) -> AccessMode {
    let Some(field) = field else {
        return AccessMode::Edit;
    };

    let has_roles = has_required_roles(&user.roles, field.roles.as_deref());
    let has_permissions = has_required_permissions(&user.permissions, field.permissions.as_deref());

    if has_roles && has_permissions {
        field.mode.unwrap_or(AccessMode::Edit)
    } else {
        field.mode.unwrap_or(AccessMode::Hidden)
    }
}

pub fn is_field_accessible(field: Option<&FieldPermissions>, user: &UserPermissions) -> bool {
    get_field_access_mode(field, user) != AccessMode::Hidden
}

pub fn is_field_read_only(field: Option<&FieldPermissions>, user: &UserPermissions) -> bool {
    get_field_access_mode(field, user) == AccessMode::View
}

/// Form-wide gate: roles and permissions declared on the schema itself.
pub fn can_edit_form(schema: &FormSchema, user: &UserPermissions) -> bool {
    has_required_roles(&user.roles, schema.required_roles.as_deref())
        && has_required_permissions(&user.permissions, schema.required_permissions.as_deref())
}

//! Role assignment rules: uniqueness, requiredness, and list regeneration.

use charter_types::{EntityType, Participant, Role, recompute_shares};
use thiserror::Error;

use crate::catalog::{self, EntityTypeConfig};

/// A role change refused by the catalog rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RoleRejection {
    /// Entity- and role-specific reason code, e.g. `SAS.president.taken`.
    pub code: String,
    pub message: String,
    /// Participant already holding the role, if that is the reason.
    pub holder: Option<usize>,
}

/// A required role nobody holds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} is required")]
pub struct MissingRequiredRole {
    pub role: Role,
    pub label: &'static str,
}

/// Check whether participant `index` may take `role`.
///
/// Non-unique roles are always accepted. A unique role is rejected when any
/// other participant already holds it. Roles the entity type does not offer
/// are rejected as unavailable.
pub fn check_assignment(
    entity_type: EntityType,
    participants: &[Participant],
    index: usize,
    role: Role,
) -> Result<(), RoleRejection> {
    let config = catalog::config(entity_type);
    let Some(spec) = config.role(role) else {
        return Err(RoleRejection {
            code: format!("{entity_type}.{role}.unavailable"),
            message: format!("{} does not offer the {role} role.", config.label),
            holder: None,
        });
    };

    if !spec.unique {
        return Ok(());
    }

    let holder = participants
        .iter()
        .enumerate()
        .find(|(other, participant)| *other != index && participant.role == role)
        .map(|(other, _)| other);

    match holder {
        Some(holder) => Err(RoleRejection {
            code: format!("{entity_type}.{role}.taken"),
            message: spec.taken_message.to_string(),
            holder: Some(holder),
        }),
        None => Ok(()),
    }
}

/// One error per required role that no participant holds, in catalog order.
#[must_use]
pub fn missing_required_roles(
    entity_type: EntityType,
    participants: &[Participant],
) -> Vec<MissingRequiredRole> {
    catalog::config(entity_type)
        .required_roles()
        .filter(|spec| !participants.iter().any(|p| p.role == spec.role))
        .map(|spec| MissingRequiredRole {
            role: spec.role,
            label: spec.label,
        })
        .collect()
}

#[must_use]
pub fn is_role_set_complete(entity_type: EntityType, participants: &[Participant]) -> bool {
    missing_required_roles(entity_type, participants).is_empty()
}

/// One rejection per unique role held by more than one participant.
///
/// The first holder keeps the role; the rejection names them as `holder`.
#[must_use]
pub fn duplicated_unique_roles(
    entity_type: EntityType,
    participants: &[Participant],
) -> Vec<RoleRejection> {
    let config = catalog::config(entity_type);
    config
        .roles
        .iter()
        .filter(|spec| spec.unique)
        .filter_map(|spec| {
            let mut holders = participants
                .iter()
                .enumerate()
                .filter(|(_, participant)| participant.role == spec.role)
                .map(|(index, _)| index);
            let first = holders.next()?;
            holders.next()?;
            Some(RoleRejection {
                code: format!("{entity_type}.{}.taken", spec.role),
                message: spec.taken_message.to_string(),
                holder: Some(first),
            })
        })
        .collect()
}

/// Bring a participant list in line with the entity type and partner count.
///
/// - Length differs from `target`: a fresh list is generated. The first
///   participant gets the primary role, the others the generic role.
/// - Same length, not yet populated by the user: entered fields are kept and
///   roles are reset to the generated defaults.
/// - Same length, populated by the user: everything is kept except roles the
///   entity type does not offer and second holders of a unique role; those
///   slots get their default role.
///
/// Shares are recomputed on the result.
#[must_use]
pub fn reconcile_participants(
    entity_type: EntityType,
    target: usize,
    current: &[Participant],
    user_populated: bool,
) -> Vec<Participant> {
    let config = catalog::config(entity_type);

    let mut participants: Vec<Participant> = if current.len() == target {
        let roles = settled_roles(config, current, user_populated);
        current
            .iter()
            .zip(roles)
            .map(|(participant, role)| {
                let mut participant = participant.clone();
                participant.role = role;
                participant
            })
            .collect()
    } else {
        (0..target)
            .map(|index| Participant::with_role(config.default_role(index)))
            .collect()
    };

    recompute_shares(&mut participants);
    participants
}

fn is_unique(config: &EntityTypeConfig, role: Role) -> bool {
    config.role(role).is_some_and(|spec| spec.unique)
}

/// Kept roles are settled first so a kept unique role is never handed out
/// again as a slot default.
fn settled_roles(config: &EntityTypeConfig, current: &[Participant], keep: bool) -> Vec<Role> {
    let mut settled: Vec<Option<Role>> = Vec::with_capacity(current.len());
    for participant in current {
        let role = participant.role;
        let kept = keep
            && config.allows(role)
            && !(is_unique(config, role) && settled.contains(&Some(role)));
        settled.push(kept.then_some(role));
    }

    while let Some(index) = settled.iter().position(Option::is_none) {
        let role = config.default_role(index);
        let role = if is_unique(config, role) && settled.contains(&Some(role)) {
            config.generic_role()
        } else {
            role
        };
        settled[index] = Some(role);
    }

    settled.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_roles(roles: &[Role]) -> Vec<Participant> {
        roles.iter().map(|role| Participant::with_role(*role)).collect()
    }

    #[test]
    fn second_holder_of_unique_role_is_rejected() {
        for config in catalog::all() {
            for spec in config.roles.iter().filter(|spec| spec.unique) {
                let participants = with_roles(&[spec.role, config.generic_role()]);
                let err = check_assignment(config.entity_type, &participants, 1, spec.role)
                    .expect_err("second holder must be rejected");
                assert_eq!(
                    err.code,
                    format!("{}.{}.taken", config.entity_type, spec.role)
                );
                assert_eq!(err.message, spec.taken_message);
                assert_eq!(err.holder, Some(0));
            }
        }
    }

    #[test]
    fn reassigning_the_current_holder_is_accepted() {
        let participants = with_roles(&[Role::President, Role::Partner]);
        assert!(check_assignment(EntityType::Sas, &participants, 0, Role::President).is_ok());
    }

    #[test]
    fn non_unique_roles_are_always_accepted() {
        let participants = with_roles(&[Role::Manager, Role::Manager]);
        assert!(check_assignment(EntityType::Sarl, &participants, 1, Role::Manager).is_ok());
    }

    #[test]
    fn role_outside_catalog_is_unavailable() {
        let participants = with_roles(&[Role::Manager]);
        let err = check_assignment(EntityType::Eurl, &participants, 0, Role::Director)
            .expect_err("EURL has no board");
        assert_eq!(err.code, "EURL.director.unavailable");
        assert_eq!(err.holder, None);
    }

    #[test]
    fn completeness_iff_required_roles_are_held() {
        for config in catalog::all() {
            let required: Vec<Role> = config.required_roles().map(|spec| spec.role).collect();
            assert!(is_role_set_complete(config.entity_type, &with_roles(&required)));

            let generic = with_roles(&[config.generic_role()]);
            assert_eq!(
                missing_required_roles(config.entity_type, &generic).len(),
                required.len()
            );
        }
    }

    #[test]
    fn switching_to_two_required_roles_reports_the_unfilled_one() {
        let participants = with_roles(&[Role::President]);
        assert!(is_role_set_complete(EntityType::Sasu, &participants));

        let missing = missing_required_roles(EntityType::Sca, &participants);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].role, Role::Manager);
        assert_eq!(missing[0].to_string(), "Managing partner is required");
    }

    #[test]
    fn regeneration_to_new_length_uses_defaults() {
        let list = reconcile_participants(EntityType::Sas, 3, &[], false);
        let roles: Vec<Role> = list.iter().map(|p| p.role).collect();
        assert_eq!(roles, vec![Role::President, Role::Partner, Role::Partner]);
    }

    #[test]
    fn regeneration_with_new_length_discards_entered_data() {
        let mut current = with_roles(&[Role::President, Role::Partner]);
        current[0].first_name = "Ada".to_string();
        let list = reconcile_participants(EntityType::Sas, 3, &current, true);
        assert_eq!(list.len(), 3);
        assert!(list[0].first_name.is_empty());
    }

    #[test]
    fn populated_list_of_same_length_keeps_valid_roles_and_data() {
        let mut current = with_roles(&[Role::Partner, Role::President]);
        current[1].last_name = "Lovelace".to_string();
        current[1].contribution_amount = 500.0;

        let list = reconcile_participants(EntityType::Sa, 2, &current, true);
        assert_eq!(list[1].role, Role::President);
        assert_eq!(list[1].last_name, "Lovelace");
        assert_eq!(list[1].share_percentage().to_string(), "100.00");
    }

    #[test]
    fn populated_list_drops_roles_the_new_type_lacks() {
        let current = with_roles(&[Role::Manager, Role::Director]);
        let list = reconcile_participants(EntityType::Sas, 2, &current, true);
        assert_eq!(list[0].role, Role::President);
        assert_eq!(list[1].role, Role::Partner);
    }

    #[test]
    fn role_turning_unique_keeps_only_its_first_holder() {
        let mut current = with_roles(&[Role::Manager, Role::Manager]);
        current[1].first_name = "Bruno".to_string();

        let list = reconcile_participants(EntityType::Sca, 2, &current, true);
        let roles: Vec<Role> = list.iter().map(|p| p.role).collect();
        assert_eq!(roles, vec![Role::Manager, Role::Partner]);
        assert_eq!(list[1].first_name, "Bruno");
        assert!(duplicated_unique_roles(EntityType::Sca, &list).is_empty());
    }

    #[test]
    fn replaced_slot_does_not_take_a_kept_unique_role() {
        let current = with_roles(&[Role::Manager, Role::President]);
        let list = reconcile_participants(EntityType::Sas, 2, &current, true);
        let roles: Vec<Role> = list.iter().map(|p| p.role).collect();
        assert_eq!(roles, vec![Role::Partner, Role::President]);
    }

    #[test]
    fn duplicated_unique_roles_are_reported_once_each() {
        let participants = with_roles(&[Role::Manager, Role::Manager, Role::Manager]);
        assert!(duplicated_unique_roles(EntityType::Sarl, &participants).is_empty());

        let rejections = duplicated_unique_roles(EntityType::Sca, &participants);
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].code, "SCA.manager.taken");
        assert_eq!(rejections[0].message, "An SCA can only have one managing partner.");
        assert_eq!(rejections[0].holder, Some(0));
    }

    #[test]
    fn unpopulated_list_of_same_length_gets_default_roles() {
        let mut current = with_roles(&[Role::Partner, Role::President]);
        current[0].nationality = "FR".to_string();
        let list = reconcile_participants(EntityType::Sas, 2, &current, false);
        assert_eq!(list[0].role, Role::President);
        assert_eq!(list[0].nationality, "FR");
        assert_eq!(list[1].role, Role::Partner);
    }
}

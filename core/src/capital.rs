//! Capital allocation: ownership shares, declared capital, step validation.

use charter_types::{
    EntityType, FULL_SHARE_POINTS, Participant, SharePercentage, recompute_shares,
};
use thiserror::Error;

use crate::catalog;
use crate::roles::{MissingRequiredRole, missing_required_roles};

/// Allowed distance between the share sum and 100%, in percent.
pub const SHARE_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapitalError {
    #[error("distribution must total 100% (currently {sum}%)")]
    DistributionIncomplete { sum: SharePercentage },
    #[error("minimum capital for an {entity_type} is {minimum} €")]
    BelowMinimum {
        entity_type: EntityType,
        minimum: u32,
        total: f64,
    },
    #[error(transparent)]
    MissingRole(#[from] MissingRequiredRole),
}

/// Totals derived from a participant list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub total: f64,
    pub share_sum: SharePercentage,
}

/// Recompute shares in place and report the totals.
pub fn allocate(participants: &mut [Participant]) -> Allocation {
    let total = recompute_shares(participants);
    let points: u32 = participants
        .iter()
        .map(|p| p.share_percentage().points())
        .sum();
    Allocation {
        total,
        share_sum: SharePercentage::from_points(points),
    }
}

/// Capital shown in the editable field.
///
/// Follows the contribution total until the user confirms an amount; from
/// then on the confirmed value is kept.
#[must_use]
pub fn declared_capital(total: f64, declared: Option<f64>, confirmed: bool) -> f64 {
    match declared {
        Some(amount) if confirmed => amount,
        _ => total,
    }
}

/// Validate the partners step: share sum, minimum capital, required roles.
///
/// Shares are recomputed from the contributions first, so stale stored
/// percentages never affect the outcome. Errors are returned in that order.
#[must_use]
pub fn validate_allocation(
    entity_type: EntityType,
    participants: &[Participant],
) -> Vec<CapitalError> {
    let mut participants = participants.to_vec();
    let allocation = allocate(&mut participants);
    let mut errors = Vec::new();

    let deviation = (allocation.share_sum.as_f64() - f64::from(FULL_SHARE_POINTS) / 100.0).abs();
    if deviation > SHARE_SUM_TOLERANCE + f64::EPSILON * 100.0 {
        errors.push(CapitalError::DistributionIncomplete {
            sum: allocation.share_sum,
        });
    }

    let minimum = catalog::config(entity_type).minimum_capital;
    if allocation.total < f64::from(minimum) {
        errors.push(CapitalError::BelowMinimum {
            entity_type,
            minimum,
            total: allocation.total,
        });
    }

    errors.extend(
        missing_required_roles(entity_type, &participants)
            .into_iter()
            .map(CapitalError::from),
    );

    errors
}

#[cfg(test)]
mod tests {
    use charter_types::Role;

    use super::*;

    fn participant(role: Role, amount: f64) -> Participant {
        let mut participant = Participant::with_role(role);
        participant.contribution_amount = amount;
        participant
    }

    #[test]
    fn sa_with_one_funded_chairman_advances() {
        let participants = vec![
            participant(Role::President, 40_000.0),
            participant(Role::Partner, 0.0),
        ];
        assert!(validate_allocation(EntityType::Sa, &participants).is_empty());

        let mut shares = participants.clone();
        allocate(&mut shares);
        assert_eq!(shares[0].share_percentage().to_string(), "100.00");
        assert_eq!(shares[1].share_percentage().to_string(), "0.00");
    }

    #[test]
    fn sa_with_no_capital_is_blocked_by_minimum() {
        let participants = vec![
            participant(Role::President, 0.0),
            participant(Role::Partner, 0.0),
        ];
        let errors = validate_allocation(EntityType::Sa, &participants);
        assert!(errors.contains(&CapitalError::BelowMinimum {
            entity_type: EntityType::Sa,
            minimum: 37_000,
            total: 0.0,
        }));
        assert!(
            errors
                .iter()
                .any(|e| e.to_string() == "minimum capital for an SA is 37000 €")
        );
    }

    #[test]
    fn zero_total_fails_the_distribution_check() {
        let participants = vec![participant(Role::President, 0.0)];
        let errors = validate_allocation(EntityType::Sasu, &participants);
        assert!(matches!(
            errors[0],
            CapitalError::DistributionIncomplete { .. }
        ));
        assert_eq!(errors[0].to_string(), "distribution must total 100% (currently 0.00%)");
    }

    #[test]
    fn below_minimum_only() {
        let participants = vec![
            participant(Role::President, 20_000.0),
            participant(Role::Partner, 10_000.0),
        ];
        let errors = validate_allocation(EntityType::Sa, &participants);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CapitalError::BelowMinimum { .. }));
    }

    #[test]
    fn missing_role_is_reported_last() {
        let participants = vec![participant(Role::Partner, 0.0)];
        let errors = validate_allocation(EntityType::Sas, &participants);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[2], CapitalError::MissingRole(_)));
        assert_eq!(errors[2].to_string(), "President is required");
    }

    #[test]
    fn many_equal_contributors_stay_within_tolerance() {
        for count in 1..=12 {
            let mut participants = vec![participant(Role::Partner, 1.0); count];
            participants[0].role = Role::President;
            assert!(
                validate_allocation(EntityType::Sas, &participants).is_empty(),
                "{count} contributors"
            );
        }
    }

    #[test]
    fn declared_capital_follows_total_until_confirmed() {
        assert!((declared_capital(1500.0, Some(900.0), false) - 1500.0).abs() < f64::EPSILON);
        assert!((declared_capital(1500.0, Some(900.0), true) - 900.0).abs() < f64::EPSILON);
        assert!((declared_capital(1500.0, None, true) - 1500.0).abs() < f64::EPSILON);
    }
}

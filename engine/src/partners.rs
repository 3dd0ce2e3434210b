//! Partners step editing.
//!
//! Every helper reads the partners form from the record, edits it, and writes
//! it back with a single `update_step` on the partners step.

use charter_core::capital::{Allocation, allocate, declared_capital};
use charter_core::form::{EntitySelection, PARTNERS_STEP, PartnersForm};
use charter_core::roles::{RoleRejection, check_assignment, reconcile_participants};
use charter_types::{ContributionType, Role};
use thiserror::Error;

use crate::store::KeyValueStore;
use crate::wizard::Wizard;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartnerEditError {
    #[error("no participant at position {0}")]
    NoParticipant(usize),
    #[error("unknown identity field: {0}")]
    UnknownField(String),
    #[error(transparent)]
    Role(#[from] RoleRejection),
}

impl<S: KeyValueStore> Wizard<S> {
    #[must_use]
    pub fn partners_form(&self) -> PartnersForm {
        PartnersForm::read(&self.record)
    }

    fn write_partners(&mut self, form: &PartnersForm) {
        self.update_step(PARTNERS_STEP, form.to_payload());
    }

    /// Bring the participant list in line with the entity step.
    ///
    /// Returns true when the list changed and was written back. An unusable
    /// declared count leaves the list alone until it is corrected.
    pub fn sync_participants(&mut self) -> bool {
        let selection = EntitySelection::read(&self.record);
        if selection.count_rejected() {
            tracing::debug!("Partner count rejected; participant list left as is");
            return false;
        }
        let target = selection.partner_count() as usize;
        let mut form = self.partners_form();
        let user_populated = form.touched || form.participants.iter().any(|p| p.has_user_data());

        let participants = reconcile_participants(
            selection.entity_type,
            target,
            &form.participants,
            user_populated,
        );
        if participants == form.participants {
            return false;
        }

        if participants.len() != form.participants.len() {
            tracing::debug!(
                from = form.participants.len(),
                to = participants.len(),
                entity_type = %selection.entity_type,
                "Regenerated participant list"
            );
            form.touched = false;
        }
        form.participants = participants;
        let total = allocate(&mut form.participants).total;
        form.declared_capital = Some(declared_capital(
            total,
            form.declared_capital,
            form.capital_confirmed,
        ));
        self.write_partners(&form);
        true
    }

    /// Give participant `index` the role `role`, if the entity type allows it.
    pub fn assign_role(&mut self, index: usize, role: Role) -> Result<(), PartnerEditError> {
        let entity_type = EntitySelection::read(&self.record).entity_type;
        let mut form = self.partners_form();
        if index >= form.participants.len() {
            return Err(PartnerEditError::NoParticipant(index));
        }
        check_assignment(entity_type, &form.participants, index, role)?;

        form.participants[index].role = role;
        form.touched = true;
        self.write_partners(&form);
        Ok(())
    }

    /// Set a contribution and recompute every share.
    ///
    /// Negative or non-finite amounts count as zero. Declared capital follows
    /// the new total unless it was confirmed.
    pub fn set_contribution(
        &mut self,
        index: usize,
        amount: f64,
        kind: Option<ContributionType>,
    ) -> Result<Allocation, PartnerEditError> {
        let mut form = self.partners_form();
        let Some(participant) = form.participants.get_mut(index) else {
            return Err(PartnerEditError::NoParticipant(index));
        };
        participant.contribution_amount = if amount.is_finite() && amount > 0.0 {
            amount
        } else {
            0.0
        };
        if let Some(kind) = kind {
            participant.contribution_type = kind;
        }

        let allocation = allocate(&mut form.participants);
        form.declared_capital = Some(declared_capital(
            allocation.total,
            form.declared_capital,
            form.capital_confirmed,
        ));
        form.touched = true;
        self.write_partners(&form);
        Ok(allocation)
    }

    /// The "validate this amount" action: copy the contribution total into
    /// the declared capital and stop auto-syncing it.
    pub fn confirm_capital(&mut self) -> f64 {
        let mut form = self.partners_form();
        let total = allocate(&mut form.participants).total;
        form.declared_capital = Some(total);
        form.capital_confirmed = true;
        self.write_partners(&form);
        total
    }

    /// Set an identity field by wire name (`firstName`, `address`, ...).
    pub fn set_identity_field(
        &mut self,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), PartnerEditError> {
        let mut form = self.partners_form();
        let Some(participant) = form.participants.get_mut(index) else {
            return Err(PartnerEditError::NoParticipant(index));
        };
        if !participant.set_identity_field(field, value.trim()) {
            return Err(PartnerEditError::UnknownField(field.to_string()));
        }
        form.touched = true;
        self.write_partners(&form);
        Ok(())
    }
}

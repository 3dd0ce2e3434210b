//! Static per-entity-type rules: roles, minimum capital, partner policy.
//!
//! The catalog is data, not behavior. Lookups by [`EntityType`] always
//! succeed; lookups by raw identifier fall back to [`BASELINE`].

use charter_types::{EntityType, Role};

/// Entity type used when a stored identifier is not in the catalog.
pub const BASELINE: EntityType = EntityType::Sas;

/// Upper bound on a declared partner count (the SARL statutory cap).
pub const MAX_PARTNERS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub role: Role,
    pub label: &'static str,
    /// At most one participant may hold the role.
    pub unique: bool,
    /// At least one participant must hold the role.
    pub required: bool,
    /// Shown when a second participant is given a unique role.
    pub taken_message: &'static str,
}

/// How many participants an entity type has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerPolicy {
    /// Single-member company: always exactly one participant.
    Single,
    /// Count declared by the user, with a default before they choose.
    Declared { default: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTypeConfig {
    pub entity_type: EntityType,
    pub label: &'static str,
    /// Ordered as presented to the user.
    pub roles: &'static [RoleSpec],
    /// Statutory minimum share capital, in euros.
    pub minimum_capital: u32,
    pub partners: PartnerPolicy,
    /// Officers are appointed mandataries that warrant liability cover.
    pub director_liability: bool,
    /// HR/social-coverage tasks apply even without employees.
    pub hr_required: bool,
}

const fn role(
    role: Role,
    label: &'static str,
    unique: bool,
    required: bool,
    taken_message: &'static str,
) -> RoleSpec {
    RoleSpec {
        role,
        label,
        unique,
        required,
        taken_message,
    }
}

const SAS_ROLES: &[RoleSpec] = &[
    role(Role::President, "President", true, true, "An SAS can only have one president."),
    role(
        Role::DirectorGeneral,
        "Director general",
        true,
        false,
        "An SAS can only have one director general.",
    ),
    role(Role::Partner, "Shareholder", false, false, ""),
];

const SASU_ROLES: &[RoleSpec] = &[
    role(Role::President, "President", true, true, "An SASU can only have one president."),
    role(Role::Partner, "Sole shareholder", false, false, ""),
];

const SARL_ROLES: &[RoleSpec] = &[
    role(Role::Manager, "Manager", false, true, ""),
    role(Role::Partner, "Partner", false, false, ""),
];

const EURL_ROLES: &[RoleSpec] = &[
    role(Role::Manager, "Manager", true, true, "An EURL can only have one manager."),
    role(Role::Partner, "Sole partner", false, false, ""),
];

const SA_ROLES: &[RoleSpec] = &[
    role(
        Role::President,
        "Chairman of the board",
        true,
        true,
        "An SA can only have one chairman of the board.",
    ),
    role(
        Role::DirectorGeneral,
        "Chief executive",
        true,
        false,
        "An SA can only have one chief executive.",
    ),
    role(Role::Director, "Board member", false, false, ""),
    role(Role::Partner, "Shareholder", false, false, ""),
];

const SCA_ROLES: &[RoleSpec] = &[
    role(
        Role::Manager,
        "Managing partner",
        true,
        true,
        "An SCA can only have one managing partner.",
    ),
    role(
        Role::President,
        "Supervisory board chair",
        true,
        true,
        "An SCA can only have one supervisory board chair.",
    ),
    role(Role::Partner, "Limited partner", false, false, ""),
];

static CATALOG: [EntityTypeConfig; 6] = [
    EntityTypeConfig {
        entity_type: EntityType::Sas,
        label: "Simplified joint-stock company (SAS)",
        roles: SAS_ROLES,
        minimum_capital: 1,
        partners: PartnerPolicy::Declared { default: 2 },
        director_liability: true,
        hr_required: true,
    },
    EntityTypeConfig {
        entity_type: EntityType::Sasu,
        label: "Single-shareholder SAS (SASU)",
        roles: SASU_ROLES,
        minimum_capital: 1,
        partners: PartnerPolicy::Single,
        director_liability: true,
        hr_required: true,
    },
    EntityTypeConfig {
        entity_type: EntityType::Sarl,
        label: "Limited liability company (SARL)",
        roles: SARL_ROLES,
        minimum_capital: 1,
        partners: PartnerPolicy::Declared { default: 2 },
        director_liability: false,
        hr_required: true,
    },
    EntityTypeConfig {
        entity_type: EntityType::Eurl,
        label: "Single-member SARL (EURL)",
        roles: EURL_ROLES,
        minimum_capital: 1,
        partners: PartnerPolicy::Single,
        director_liability: false,
        hr_required: true,
    },
    EntityTypeConfig {
        entity_type: EntityType::Sa,
        label: "Public limited company (SA)",
        roles: SA_ROLES,
        minimum_capital: 37_000,
        partners: PartnerPolicy::Declared { default: 2 },
        director_liability: true,
        hr_required: true,
    },
    EntityTypeConfig {
        entity_type: EntityType::Sca,
        label: "Partnership limited by shares (SCA)",
        roles: SCA_ROLES,
        minimum_capital: 37_000,
        partners: PartnerPolicy::Declared { default: 4 },
        director_liability: true,
        hr_required: true,
    },
];

/// Rules for an entity type.
#[must_use]
pub fn config(entity_type: EntityType) -> &'static EntityTypeConfig {
    CATALOG
        .iter()
        .find(|config| config.entity_type == entity_type)
        .unwrap_or(&CATALOG[0])
}

/// Rules for a stored identifier, degrading to [`BASELINE`] when unknown.
#[must_use]
pub fn resolve(raw: &str) -> &'static EntityTypeConfig {
    match EntityType::parse(raw) {
        Ok(entity_type) => config(entity_type),
        Err(err) => {
            tracing::warn!("{err}; falling back to {BASELINE}");
            config(BASELINE)
        }
    }
}

#[must_use]
pub fn all() -> &'static [EntityTypeConfig] {
    &CATALOG
}

impl EntityTypeConfig {
    #[must_use]
    pub fn role(&self, role: Role) -> Option<&'static RoleSpec> {
        self.roles.iter().find(|spec| spec.role == role)
    }

    #[must_use]
    pub fn allows(&self, role: Role) -> bool {
        self.role(role).is_some()
    }

    pub fn required_roles(&self) -> impl Iterator<Item = &'static RoleSpec> {
        self.roles.iter().filter(|spec| spec.required)
    }

    /// Role given to the first participant of a freshly generated list: the
    /// first role that is both required and unique, else the first required.
    #[must_use]
    pub fn primary_role(&self) -> Role {
        self.roles
            .iter()
            .find(|spec| spec.required && spec.unique)
            .or_else(|| self.roles.iter().find(|spec| spec.required))
            .map_or(self.generic_role(), |spec| spec.role)
    }

    /// Role given to every other participant: plain partner when offered,
    /// else the first role with no constraint.
    #[must_use]
    pub fn generic_role(&self) -> Role {
        if self.allows(Role::Partner) {
            return Role::Partner;
        }
        self.roles
            .iter()
            .find(|spec| !spec.required && !spec.unique)
            .map_or(Role::Partner, |spec| spec.role)
    }

    /// Default role for the participant at `index` in a generated list.
    #[must_use]
    pub fn default_role(&self, index: usize) -> Role {
        if index == 0 {
            self.primary_role()
        } else {
            self.generic_role()
        }
    }

    /// Effective participant count given the user's declaration, if any.
    #[must_use]
    pub fn partner_count(&self, declared: Option<u32>) -> u32 {
        match self.partners {
            PartnerPolicy::Single => 1,
            PartnerPolicy::Declared { default } => declared.filter(|n| *n > 0).unwrap_or(default),
        }
    }

    #[must_use]
    pub fn label_for(&self, role: Role) -> &'static str {
        self.role(role).map_or("Partner", |spec| spec.label)
    }
}

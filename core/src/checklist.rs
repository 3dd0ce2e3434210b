//! Post-registration checklist generation.
//!
//! [`generate`] is a pure function of the [`CompanyProfile`]: same profile,
//! same categories, same items, same order. Item ids are stable so a
//! [`CompletionSet`] stays meaningful across regenerations.

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, MatchKind};
use charter_types::{
    CategoryId, ChecklistCategory, ChecklistItem, CompanyProfile, CompletionSet, Timeframe,
};

use crate::catalog::{self, EntityTypeConfig};

const fn item(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    timeframe: Timeframe,
    link: Option<&'static str>,
) -> ChecklistItem {
    ChecklistItem {
        id,
        title,
        description,
        timeframe,
        link,
    }
}

// ── Item sets ────────────────────────────────────────────────

const ADMINISTRATIVE: &[ChecklistItem] = &[
    item(
        "admin-kbis",
        "Download your Kbis extract",
        "The Kbis is the official proof of registration requested by banks, suppliers and landlords.",
        Timeframe::Immediate,
        Some("https://www.infogreffe.fr"),
    ),
    item(
        "admin-capital-release",
        "Release the deposited share capital",
        "Send the Kbis to the bank holding the capital deposit so the funds move to the company account.",
        Timeframe::FirstWeek,
        None,
    ),
    item(
        "admin-registers",
        "Open the legal registers",
        "Keep the register of decisions and the share movement register from the first meeting on.",
        Timeframe::FirstMonth,
        None,
    ),
    item(
        "admin-beneficial-owners",
        "Check the beneficial owners declaration",
        "Make sure every person holding more than 25% of shares or votes is declared.",
        Timeframe::FirstMonth,
        None,
    ),
];

const TAX: &[ChecklistItem] = &[
    item(
        "tax-professional-account",
        "Activate your professional tax account",
        "All business tax returns and payments go through the professional space.",
        Timeframe::FirstWeek,
        Some("https://www.impots.gouv.fr/professionnel"),
    ),
    item(
        "tax-vat-regime",
        "Confirm your VAT regime",
        "Check the regime chosen at registration and the filing calendar that comes with it.",
        Timeframe::FirstMonth,
        None,
    ),
    item(
        "tax-accountant",
        "Appoint an accountant",
        "Annual accounts must be filed every year; arrange bookkeeping before the first invoices.",
        Timeframe::FirstMonth,
        None,
    ),
    item(
        "tax-cfe",
        "Prepare the business property tax return",
        "The first-year CFE return is due before the end of the year following creation.",
        Timeframe::ThreeMonths,
        None,
    ),
];

const INSURANCE_BASE: &[ChecklistItem] = &[
    item(
        "insurance-professional-liability",
        "Take out professional liability insurance",
        "Covers damage caused to clients and third parties in the course of business.",
        Timeframe::Immediate,
        None,
    ),
    item(
        "insurance-legal-protection",
        "Consider legal protection insurance",
        "Covers legal fees in disputes with clients, suppliers or the administration.",
        Timeframe::ThreeMonths,
        None,
    ),
];

const INSURANCE_PREMISES: ChecklistItem = item(
    "insurance-premises",
    "Insure your business premises",
    "Multi-risk cover for the premises, equipment and stock is usually required by the lease.",
    Timeframe::Immediate,
    None,
);

const INSURANCE_DIRECTORS: ChecklistItem = item(
    "insurance-directors-liability",
    "Take out directors' liability insurance",
    "Protects officers personally against claims for management errors.",
    Timeframe::FirstMonth,
    None,
);

const HR_EMPLOYER: &[ChecklistItem] = &[
    item(
        "hr-employer-registration",
        "Register as an employer",
        "Registration with URSSAF is required before the first hire.",
        Timeframe::Immediate,
        Some("https://www.urssaf.fr"),
    ),
    item(
        "hr-pre-hiring-declaration",
        "File pre-hiring declarations",
        "Each hire must be declared in the eight days before starting work.",
        Timeframe::Immediate,
        None,
    ),
    item(
        "hr-collective-agreement",
        "Identify the applicable collective agreement",
        "The agreement sets minimum wages, notice periods and leave rules for your sector.",
        Timeframe::FirstWeek,
        None,
    ),
    item(
        "hr-payroll",
        "Set up payroll",
        "Choose payroll software or a provider to issue payslips and monthly declarations.",
        Timeframe::FirstMonth,
        None,
    ),
    item(
        "hr-occupational-health",
        "Join an occupational health service",
        "Membership is mandatory for every employer.",
        Timeframe::FirstMonth,
        None,
    ),
];

const HR_SELF_EMPLOYED: &[ChecklistItem] = &[
    item(
        "hr-officer-coverage",
        "Check the officers' social security coverage",
        "Coverage depends on the entity type and on whether officers are paid.",
        Timeframe::FirstWeek,
        None,
    ),
    item(
        "hr-complementary-cover",
        "Set up complementary health and pension cover",
        "Basic coverage for officers is limited; a complementary plan closes the gap.",
        Timeframe::ThreeMonths,
        None,
    ),
    item(
        "hr-unemployment-cover",
        "Consider private unemployment cover",
        "Company officers are not covered by unemployment insurance.",
        Timeframe::Later,
        None,
    ),
];

const BUSINESS: &[ChecklistItem] = &[
    item(
        "business-invoicing",
        "Set up compliant invoicing",
        "Invoices must carry the registration number, VAT number and legal mentions.",
        Timeframe::FirstWeek,
        None,
    ),
    item(
        "business-online-presence",
        "Secure your domain name and website",
        "Reserve the domain matching your company name before someone else does.",
        Timeframe::FirstMonth,
        None,
    ),
    item(
        "business-trademark",
        "Register your trademark",
        "Protect the company name and logo with the industrial property office.",
        Timeframe::ThreeMonths,
        Some("https://www.inpi.fr"),
    ),
    item(
        "business-network",
        "Join a local business network",
        "Chambers of commerce and founder networks help with first clients and funding.",
        Timeframe::Later,
        None,
    ),
];

// ── Activity keywords ────────────────────────────────────────

struct ActivityGroup {
    keywords: &'static [&'static str],
    items: &'static [ChecklistItem],
}

const ACTIVITY_GROUPS: &[ActivityGroup] = &[
    ActivityGroup {
        keywords: &[
            "commerce", "vente", "retail", "shop", "boutique", "magasin", "store",
        ],
        items: &[
            item(
                "specific-retail-price-display",
                "Comply with price display rules",
                "Prices must be displayed including tax, in store and online.",
                Timeframe::Immediate,
                None,
            ),
            item(
                "specific-retail-terms",
                "Publish terms of sale and withdrawal rights",
                "Distance selling requires general terms and a 14-day withdrawal procedure.",
                Timeframe::FirstWeek,
                None,
            ),
        ],
    },
    ActivityGroup {
        keywords: &[
            "conseil",
            "consult",
            "avocat",
            "lawyer",
            "expert-comptable",
            "accountan",
            "audit",
            "financial advi",
        ],
        items: &[
            item(
                "specific-consulting-order",
                "Register with your professional order",
                "Regulated professions must be listed by their order before practising.",
                Timeframe::Immediate,
                None,
            ),
            item(
                "specific-consulting-indemnity",
                "Check indemnity cover against your order's minimum",
                "Orders set minimum professional indemnity amounts for their members.",
                Timeframe::FirstWeek,
                None,
            ),
        ],
    },
    ActivityGroup {
        keywords: &[
            "construction",
            "bâtiment",
            "batiment",
            "btp",
            "travaux",
            "renovation",
            "rénovation",
            "plomb",
            "plumb",
            "électric",
            "electric",
            "menuis",
            "carpent",
        ],
        items: &[
            item(
                "specific-construction-decennial",
                "Take out ten-year builder's liability",
                "Mandatory before opening any construction site; quotes must mention the insurer.",
                Timeframe::Immediate,
                None,
            ),
            item(
                "specific-construction-qualification",
                "Obtain trade qualification certificates",
                "Certificates are often required by clients and for energy-renovation subsidies.",
                Timeframe::FirstMonth,
                None,
            ),
        ],
    },
];

/// Automaton over every activity keyword, with the owning group per pattern.
static ACTIVITY_MATCHER: LazyLock<Option<(AhoCorasick, Vec<usize>)>> = LazyLock::new(|| {
    let (patterns, owners): (Vec<&str>, Vec<usize>) = ACTIVITY_GROUPS
        .iter()
        .enumerate()
        .flat_map(|(group, spec)| spec.keywords.iter().map(move |keyword| (*keyword, group)))
        .unzip();
    match AhoCorasick::builder()
        .match_kind(MatchKind::Standard)
        .build(patterns)
    {
        Ok(matcher) => Some((matcher, owners)),
        Err(e) => {
            tracing::warn!("Failed to build activity keyword matcher: {e}");
            None
        }
    }
});

/// Indices into [`ACTIVITY_GROUPS`] whose keywords occur in `activity`, ascending.
fn matched_groups(activity: &str) -> Vec<usize> {
    let Some((matcher, owners)) = ACTIVITY_MATCHER.as_ref() else {
        return Vec::new();
    };
    let haystack = activity.to_lowercase();
    let mut matched = vec![false; ACTIVITY_GROUPS.len()];
    for found in matcher.find_overlapping_iter(&haystack) {
        matched[owners[found.pattern().as_usize()]] = true;
    }
    matched
        .iter()
        .enumerate()
        .filter(|(_, hit)| **hit)
        .map(|(group, _)| group)
        .collect()
}

// ── Generation ───────────────────────────────────────────────

/// Build the checklist for a profile.
#[must_use]
pub fn generate(profile: &CompanyProfile) -> Vec<ChecklistCategory> {
    generate_with(profile, catalog::config(profile.entity_type))
}

/// Build the checklist using explicit entity rules.
#[must_use]
pub fn generate_with(profile: &CompanyProfile, rules: &EntityTypeConfig) -> Vec<ChecklistCategory> {
    let mut categories = vec![
        category(CategoryId::Administrative, "Administrative", ADMINISTRATIVE.to_vec()),
        category(CategoryId::Tax, "Tax and accounting", TAX.to_vec()),
    ];

    let mut insurance = INSURANCE_BASE.to_vec();
    if profile.premises.is_business_premises() {
        insurance.push(INSURANCE_PREMISES);
    }
    if rules.director_liability {
        insurance.push(INSURANCE_DIRECTORS);
    }
    categories.push(category(CategoryId::Insurance, "Insurance", insurance));

    if profile.has_employees || rules.hr_required {
        let items = if profile.has_employees {
            HR_EMPLOYER
        } else {
            HR_SELF_EMPLOYED
        };
        categories.push(category(
            CategoryId::HumanResources,
            "Human resources and social coverage",
            items.to_vec(),
        ));
    }

    categories.push(category(CategoryId::Business, "Business development", BUSINESS.to_vec()));

    let specific: Vec<ChecklistItem> = matched_groups(&profile.activity)
        .into_iter()
        .flat_map(|group| ACTIVITY_GROUPS[group].items.iter().copied())
        .collect();
    if !specific.is_empty() {
        categories.push(category(CategoryId::Specific, "Your activity", specific));
    }

    categories
}

fn category(id: CategoryId, title: &'static str, items: Vec<ChecklistItem>) -> ChecklistCategory {
    ChecklistCategory { id, title, items }
}

// ── Progress ─────────────────────────────────────────────────

#[must_use]
pub fn total_items(categories: &[ChecklistCategory]) -> usize {
    categories.iter().map(|c| c.items.len()).sum()
}

/// Items of this checklist marked complete. Ids outside the checklist are ignored.
#[must_use]
pub fn completed_items(categories: &[ChecklistCategory], completion: &CompletionSet) -> usize {
    categories
        .iter()
        .flat_map(|c| c.items.iter())
        .filter(|item| completion.is_complete(item.id))
        .count()
}

/// Completion percentage, rounded to the nearest integer. Empty checklist is 0.
#[must_use]
pub fn progress(categories: &[ChecklistCategory], completion: &CompletionSet) -> u8 {
    let total = total_items(categories);
    if total == 0 {
        return 0;
    }
    let done = completed_items(categories, completion);
    ((done as f64 * 100.0) / total as f64).round() as u8
}

/// Look up an item by id in a generated checklist.
#[must_use]
pub fn find_item<'a>(categories: &'a [ChecklistCategory], id: &str) -> Option<&'a ChecklistItem> {
    categories
        .iter()
        .flat_map(|c| c.items.iter())
        .find(|item| item.id == id)
}

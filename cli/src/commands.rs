//! Subcommands and their execution against a bootstrapped wizard.

use anyhow::{Context, Result, anyhow, bail};
use clap::Subcommand;
use serde_json::Value;

use charter_core::form::{ENTITY_STEP, PARTNERS_STEP};
use charter_engine::{KeyValueStore, Wizard};
use charter_types::{ContributionType, Role, StepIndex, StepPayload, UserPreferences};

use crate::render;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current step, progress and what still blocks it
    Status,
    /// Jump to a step without validation
    Goto {
        /// Step index (0 is the landing step)
        step: u32,
    },
    /// Validate the current step and move to the next one
    Next,
    /// Go back one step
    Back,
    /// Merge fields into a step payload
    Set {
        /// Step index
        step: u32,
        /// Fields to merge; values are parsed as JSON when possible
        #[arg(value_name = "KEY=VALUE", required = true)]
        fields: Vec<String>,
    },
    /// Toggle named user preferences
    Prefs {
        #[arg(value_name = "KEY=BOOL", required = true)]
        toggles: Vec<String>,
    },
    /// List participants, shares and capital
    Partners,
    /// Assign a role to a participant
    Role {
        /// Participant position, starting at 1
        index: usize,
        /// Role name (president, director-general, manager, director, partner)
        role: String,
    },
    /// Record a participant's contribution
    Contribute {
        /// Participant position, starting at 1
        index: usize,
        /// Amount in euros; a decimal comma is accepted
        amount: String,
        /// cash, in-kind or sweat-equity
        kind: Option<String>,
    },
    /// Fill in identity fields of a participant
    Identity {
        /// Participant position, starting at 1
        index: usize,
        #[arg(value_name = "FIELD=VALUE", required = true)]
        fields: Vec<String>,
    },
    /// Accept the contribution total as the declared capital
    ConfirmCapital,
    /// Show the post-registration checklist
    Checklist {
        /// Print the checklist as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a checklist item as done
    Complete { id: String },
    /// Mark a checklist item as not done
    Uncomplete { id: String },
    /// Discard the registration in progress
    Reset,
}

pub fn run<S: KeyValueStore>(wizard: &mut Wizard<S>, command: Command) -> Result<String> {
    match command {
        Command::Status => Ok(render::status(wizard)),
        Command::Goto { step } => {
            wizard.set_current_step(StepIndex::new(step));
            Ok(render::status(wizard))
        }
        Command::Next => {
            if let Err(errors) = wizard.advance() {
                bail!(
                    "cannot leave \"{}\":\n{}",
                    wizard.current_step().title,
                    render::error_list(&errors)
                );
            }
            Ok(render::status(wizard))
        }
        Command::Back => {
            wizard.back();
            Ok(render::status(wizard))
        }
        Command::Set { step, fields } => {
            let step = StepIndex::new(step);
            wizard.update_step(step, parse_payload(&fields)?);
            if step == ENTITY_STEP || step == PARTNERS_STEP {
                wizard.sync_participants();
            }
            Ok(render::status(wizard))
        }
        Command::Prefs { toggles } => {
            wizard.update_user_preferences(parse_preferences(&toggles)?);
            Ok(render::preferences(wizard.record().user_preferences()))
        }
        Command::Partners => {
            wizard.sync_participants();
            Ok(render::partners(wizard))
        }
        Command::Role { index, role } => {
            let role = Role::parse(&role)?;
            wizard.sync_participants();
            wizard.assign_role(position(index)?, role)?;
            Ok(render::partners(wizard))
        }
        Command::Contribute {
            index,
            amount,
            kind,
        } => {
            let amount = parse_amount(&amount)?;
            let kind = kind
                .map(|raw| {
                    ContributionType::parse(&raw)
                        .ok_or_else(|| anyhow!("unknown contribution type: {raw}"))
                })
                .transpose()?;
            wizard.sync_participants();
            wizard.set_contribution(position(index)?, amount, kind)?;
            Ok(render::partners(wizard))
        }
        Command::Identity { index, fields } => {
            let index = position(index)?;
            wizard.sync_participants();
            for field in &fields {
                let (name, value) = split_pair(field)?;
                wizard.set_identity_field(index, name, value)?;
            }
            Ok(render::partners(wizard))
        }
        Command::ConfirmCapital => {
            wizard.sync_participants();
            let total = wizard.confirm_capital();
            Ok(format!("Declared capital confirmed at {total:.2} €\n"))
        }
        Command::Checklist { json } => {
            let checklist = wizard.checklist();
            if json {
                let mut out = serde_json::to_string_pretty(&checklist.categories)
                    .context("failed to encode checklist")?;
                out.push('\n');
                Ok(out)
            } else {
                Ok(render::checklist(&checklist))
            }
        }
        Command::Complete { id } => {
            wizard.set_item_complete(&id, true)?;
            Ok(render::checklist(&wizard.checklist()))
        }
        Command::Uncomplete { id } => {
            wizard.set_item_complete(&id, false)?;
            Ok(render::checklist(&wizard.checklist()))
        }
        Command::Reset => {
            wizard.reset_wizard();
            Ok("Registration discarded.\n".to_string())
        }
    }
}

/// 1-based position from the command line to a list index.
fn position(index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| anyhow!("participant positions start at 1"))
}

fn split_pair(raw: &str) -> Result<(&str, &str)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("empty key in {raw:?}");
    }
    Ok((key, value))
}

fn parse_payload(fields: &[String]) -> Result<StepPayload> {
    let mut payload = StepPayload::new();
    for field in fields {
        let (key, value) = split_pair(field)?;
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        payload.insert(key.to_string(), value);
    }
    Ok(payload)
}

fn parse_preferences(toggles: &[String]) -> Result<UserPreferences> {
    toggles
        .iter()
        .map(|toggle| {
            let (key, value) = split_pair(toggle)?;
            let enabled = match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" => false,
                other => bail!("expected a boolean for {key}, got {other:?}"),
            };
            Ok((key.to_string(), enabled))
        })
        .collect()
}

fn parse_amount(raw: &str) -> Result<f64> {
    let normalized = raw.trim().replace(' ', "").replace(',', ".");
    let amount: f64 = normalized
        .parse()
        .with_context(|| format!("invalid amount: {raw}"))?;
    if !amount.is_finite() || amount < 0.0 {
        bail!("amount must be a non-negative number, got {raw}");
    }
    Ok(amount)
}

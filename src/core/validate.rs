//! Pre-flight validation of the declared intent
//!
//! [`validate`] is a pure function: it performs no I/O and either rejects the
//! intent with the first rule it breaks or hands back a [`ValidatedIntent`]
//! carrying the setter targets the coordinator must converge.

use crate::core::keys;
use crate::domain::errors::ValidationError;
use crate::domain::ids::{ConfigKey, ResourceKind};
use crate::domain::intent::Intent;

/// Where the value for a setter-owned key comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Display name to resolve through the inventory
    Name(String),
    /// Identifier given directly; written without any lookup
    Id(String),
}

/// One setter-owned key and how to fill it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetterTarget {
    pub key: ConfigKey,
    pub kind: ResourceKind,
    pub source: TargetSource,
}

/// An intent that passed every rule
#[derive(Debug, Clone)]
pub struct ValidatedIntent {
    intent: Intent,
    targets: Vec<SetterTarget>,
}

impl ValidatedIntent {
    /// The intent as declared
    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// Setter targets in key order
    pub fn targets(&self) -> &[SetterTarget] {
        &self.targets
    }

    /// Targets that need an inventory lookup
    pub fn resolution_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| matches!(t.source, TargetSource::Name(_)))
            .count()
    }
}

/// Validate `intent`
///
/// Rules are checked in a fixed order and the first failure is returned:
///
/// 1. With `configure_images`, exactly one of `image_name` / `image_ref`,
///    then exactly one of `image_name_alt` / `image_ref_alt`.
/// 2. With `neutron_available` and `configure_networks`, exactly one of
///    `public_network_name` / `public_network_id`.
///
/// Blank strings count as unset. When a gating flag is off its pair is not
/// checked; a literal id in that pair is still written, a name is ignored.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first rule broken.
pub fn validate(intent: Intent) -> Result<ValidatedIntent, ValidationError> {
    let mut targets = Vec::with_capacity(3);

    let image = pick(
        intent.configure_images,
        &intent.image_name,
        &intent.image_ref,
        ValidationError::ImageMissing,
        ValidationError::ImageConflict,
    )?;
    let image_alt = pick(
        intent.configure_images,
        &intent.image_name_alt,
        &intent.image_ref_alt,
        ValidationError::ImageAltMissing,
        ValidationError::ImageAltConflict,
    )?;
    let network = pick(
        intent.neutron_available && intent.configure_networks,
        &intent.public_network_name,
        &intent.public_network_id,
        ValidationError::PublicNetworkMissing,
        ValidationError::PublicNetworkConflict,
    )?;

    for (source, key, kind) in [
        (image, keys::image_ref_key(), ResourceKind::Image),
        (image_alt, keys::image_ref_alt_key(), ResourceKind::Image),
        (network, keys::public_network_id_key(), ResourceKind::Network),
    ] {
        if let Some(source) = source {
            targets.push(SetterTarget { key, kind, source });
        }
    }

    tracing::debug!(targets = targets.len(), "Intent validated");

    Ok(ValidatedIntent { intent, targets })
}

/// Applies the exactly-one rule to a name/id pair
fn pick(
    enforced: bool,
    name: &Option<String>,
    id: &Option<String>,
    missing: ValidationError,
    conflict: ValidationError,
) -> Result<Option<TargetSource>, ValidationError> {
    let name = non_blank(name);
    let id = non_blank(id);

    if !enforced {
        return Ok(id.map(|id| TargetSource::Id(id.to_string())));
    }

    match (name, id) {
        (None, None) => Err(missing),
        (Some(_), Some(_)) => Err(conflict),
        (Some(name), None) => Ok(Some(TargetSource::Name(name.to_string()))),
        (None, Some(id)) => Ok(Some(TargetSource::Id(id.to_string()))),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

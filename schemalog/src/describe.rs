use crate::host::SyncTarget;

pub const NO_SPECIFIC_MODELS: &str = "No specific models found, general AutoMigrate performed";
pub const UNKNOWN_MODELS: &str = "Unable to determine migrated models";

/// Human readable summary of a synchronization target. Never fails: unresolved
/// entity names degrade to [`UNKNOWN_MODELS`].
pub fn describe(target: &SyncTarget) -> String {
    match target {
        SyncTarget::Entity(entity) => match entity.entity_name() {
            Some(name) => format!("AutoMigrated {name}"),
            _ => UNKNOWN_MODELS.to_owned(),
        },
        SyncTarget::Batch(entities) if entities.is_empty() => NO_SPECIFIC_MODELS.to_owned(),
        SyncTarget::Batch(entities) => {
            let mut changes = String::new();

            for entity in entities {
                let Some(name) = entity.entity_name() else {
                    return UNKNOWN_MODELS.to_owned();
                };

                changes.push_str(&format!("AutoMigrated {name}\n"));
            }

            changes
        }
        SyncTarget::Unknown => NO_SPECIFIC_MODELS.to_owned(),
    }
}

use serde::Serialize;

use crate::locale::Phrase;

use super::Composer;

/// System intent asking the assistant platform for a permission.
pub const PERMISSION_INTENT: &str = "actions.intent.PERMISSION";

/// Permission for the device's precise coordinates.
pub const DEVICE_PRECISE_LOCATION: &str = "DEVICE_PRECISE_LOCATION";

/// Directive asking the platform to request location access from the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRequest {
    pub intent: String,
    pub permissions: Vec<String>,
    /// Spoken before the platform's own permission question
    pub context: String,
}

/// Sentence plus directive for when no location is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPrompt {
    pub speech: String,
    pub permission: PermissionRequest,
}

impl Composer<'_> {
    pub fn need_location(&self) -> LocationPrompt {
        LocationPrompt {
            speech: self.table.render(Phrase::NeedLocation, &[]),
            permission: PermissionRequest {
                intent: PERMISSION_INTENT.to_string(),
                permissions: vec![DEVICE_PRECISE_LOCATION.to_string()],
                context: self.table.render(Phrase::PermissionContext, &[]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;

    #[test]
    fn english_prompt() {
        let catalog = catalog();
        let prompt = catalog.composer(&locale("en")).need_location();
        assert_eq!(prompt.speech, "I need your location.");
        assert_eq!(prompt.permission.intent, "actions.intent.PERMISSION");
        assert_eq!(prompt.permission.permissions, vec!["DEVICE_PRECISE_LOCATION"]);
        assert_eq!(prompt.permission.context, "To look for stations");
    }

    #[test]
    fn localized_prompt() {
        let catalog = catalog();
        let prompt = catalog.composer(&locale("de-CH")).need_location();
        assert_eq!(prompt.speech, "Ich brauche Ihren Standort.");
        assert_eq!(prompt.permission.context, "Um Haltestellen zu suchen");
    }

    #[test]
    fn serializes_for_the_platform() {
        let catalog = catalog();
        let prompt = catalog.composer(&locale("en")).need_location();
        let json = serde_json::to_value(&prompt.permission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "intent": "actions.intent.PERMISSION",
                "permissions": ["DEVICE_PRECISE_LOCATION"],
                "context": "To look for stations"
            })
        );
    }
}

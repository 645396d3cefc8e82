use std::fmt;
use std::str::FromStr;

use crate::errors::WebhookError;

/// Fulfillment tags this webhook knows how to answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntentTag {
    Confirm,
    List,
    Find,
    Cheapest,
}

impl IntentTag {
    pub const ALL: [Self; 4] = [Self::Confirm, Self::List, Self::Find, Self::Cheapest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::List => "list",
            Self::Find => "find",
            Self::Cheapest => "cheapest",
        }
    }

    pub fn needs_catalog(&self) -> bool {
        !matches!(self, Self::Confirm)
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentTag {
    type Err = WebhookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "confirm" => Ok(Self::Confirm),
            "list" => Ok(Self::List),
            "find" => Ok(Self::Find),
            "cheapest" => Ok(Self::Cheapest),
            other => Err(WebhookError::UnknownTag(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IntentTag;
    use crate::errors::WebhookError;

    #[test]
    fn known_tags_round_trip_through_their_names() {
        for tag in IntentTag::ALL {
            assert_eq!(tag.as_str().parse::<IntentTag>(), Ok(tag));
        }
    }

    #[test]
    fn tags_are_matched_exactly() {
        assert_eq!(
            "Confirm".parse::<IntentTag>(),
            Err(WebhookError::UnknownTag("Confirm".to_owned()))
        );
        assert_eq!(" list".parse::<IntentTag>(), Err(WebhookError::UnknownTag(" list".to_owned())));
        assert_eq!("".parse::<IntentTag>(), Err(WebhookError::UnknownTag(String::new())));
    }

    #[test]
    fn only_confirm_skips_the_catalog() {
        let skipping: Vec<IntentTag> =
            IntentTag::ALL.into_iter().filter(|tag| !tag.needs_catalog()).collect();
        assert_eq!(skipping, vec![IntentTag::Confirm]);
    }
}

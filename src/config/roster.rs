use std::num::ParseIntError;
use std::sync::Arc;

use crate::config::env::{get_env_value_or_default, get_optional_env_value};
use crate::domain::RecipientId;

const DEFAULT_ROSTER_SIZE: i64 = 1000;

/// The fixed, ordered set of recipients every announcement is broadcast to.
///
/// Membership comes from `ROSTER_MEMBERS` (comma-separated ids) or, when that
/// variable is absent, from `ROSTER_SIZE` as the range `1..=size`.
#[derive(Clone, Debug)]
pub struct Roster {
    recipients: Arc<Vec<RecipientId>>,
}

impl Roster {
    pub(super) fn from_env() -> Self {
        let members: String = get_optional_env_value("ROSTER_MEMBERS");
        if !members.is_empty() {
            match parse_members(&members) {
                Ok(recipients) => return Self::new(recipients),
                Err(e) => log::warn!("ROSTER_MEMBERS is ignored due to an invalid value: {e}"),
            }
        }
        let size = get_env_value_or_default("ROSTER_SIZE", DEFAULT_ROSTER_SIZE);
        Self::new((1..=size).map(RecipientId).collect())
    }

    pub fn new(recipients: Vec<RecipientId>) -> Self {
        Self { recipients: Arc::new(recipients) }
    }

    pub fn recipients(&self) -> &[RecipientId] {
        &self.recipients
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }
}

fn parse_members(raw: &str) -> Result<Vec<RecipientId>, ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_members;
    use crate::domain::RecipientId;

    #[test]
    fn members_are_parsed_in_the_given_order() {
        let members = parse_members("42, 7,1000")
            .expect("parse_members failed");
        assert_eq!(members, [RecipientId(42), RecipientId(7), RecipientId(1000)]);
    }

    #[test]
    fn trailing_separators_produce_no_phantom_members() {
        let members = parse_members("1,2,")
            .expect("parse_members failed");
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn garbage_is_rejected_entirely() {
        assert!(parse_members("1,oops,3").is_err());
    }
}

//! Survey roster record types and group handling

pub mod csv;

use crate::error::AnalysisError;
use itertools::Itertools;
use std::collections::HashMap;

/// Number of close-friend slots on the survey form
pub const FRIEND_SLOTS: usize = 3;

/// One close-friend slot exactly as it appeared in the roster.
/// The closeness field is validated later, per group.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNomination {
    /// Identifier of the nominated friend
    pub friend: String,

    /// Closeness strength as read, not yet checked to be numeric
    pub strength: String,
}

/// One roster row with fields read but not yet validated.
///
/// Validation is deferred until rows are split by group, so a malformed
/// row aborts only the group it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSurveyRow {
    /// Survey group this row belongs to
    pub group: String,

    /// Respondent's self-reported number
    pub subject: String,

    /// 1-based data row number, for error messages
    pub line: usize,

    /// Close-friend slots; `None` means the slot was left empty
    pub nominations: [Option<RawNomination>; FRIEND_SLOTS],
}

impl RawSurveyRow {
    /// Validate this row into a typed survey row.
    ///
    /// A missing respondent number, or a present friend with a missing
    /// or non-numeric closeness, surfaces a `Data` error naming the row.
    pub fn validate(&self) -> Result<SurveyRow, AnalysisError> {
        if self.subject.is_empty() {
            return Err(AnalysisError::data(format!(
                "row {}: missing respondent number",
                self.line
            )));
        }

        let mut nominations: [Option<Nomination>; FRIEND_SLOTS] = [None, None, None];
        for (slot, raw) in self.nominations.iter().enumerate() {
            let Some(raw) = raw else { continue };
            let strength: f64 = raw.strength.parse().map_err(|_| {
                AnalysisError::data(format!(
                    "row {}: respondent {}, friend slot {}: closeness '{}' is not numeric",
                    self.line,
                    self.subject,
                    slot + 1,
                    raw.strength,
                ))
            })?;
            nominations[slot] = Some(Nomination {
                friend: raw.friend.clone(),
                strength,
            });
        }

        Ok(SurveyRow {
            group: self.group.clone(),
            subject: self.subject.clone(),
            nominations,
        })
    }
}

/// One nominated close friend with the reported closeness strength
#[derive(Debug, Clone, PartialEq)]
pub struct Nomination {
    /// Identifier of the nominated friend
    pub friend: String,

    /// Closeness strength (observed range 1-3)
    pub strength: f64,
}

/// One validated roster row: a respondent and up to three nominations
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRow {
    /// Survey group this row belongs to
    pub group: String,

    /// Respondent's self-reported number
    pub subject: String,

    /// Close-friend slots; `None` means the slot was left empty
    pub nominations: [Option<Nomination>; FRIEND_SLOTS],
}

impl SurveyRow {
    /// Nominations actually filled in on this row
    pub fn filled_nominations(&self) -> impl Iterator<Item = &Nomination> {
        self.nominations.iter().flatten()
    }
}

/// Validate a group's rows, failing on the first malformed one
pub fn validate_rows(rows: &[RawSurveyRow]) -> Result<Vec<SurveyRow>, AnalysisError> {
    rows.iter().map(RawSurveyRow::validate).collect()
}

/// Split roster rows by group, preserving first-seen group order.
///
/// Rows keep their file order within each group.
pub fn split_groups(rows: &[RawSurveyRow]) -> Vec<(String, Vec<RawSurveyRow>)> {
    let order: Vec<&str> = rows.iter().map(|row| row.group.as_str()).unique().collect();

    let mut by_group: HashMap<&str, Vec<RawSurveyRow>> = HashMap::new();
    for row in rows {
        by_group
            .entry(row.group.as_str())
            .or_default()
            .push(row.clone());
    }

    order
        .into_iter()
        .map(|group| (group.to_string(), by_group.remove(group).unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(group: &str, subject: &str, friends: &[(&str, &str)]) -> RawSurveyRow {
        let mut nominations: [Option<RawNomination>; FRIEND_SLOTS] = [None, None, None];
        for (slot, &(friend, strength)) in friends.iter().enumerate() {
            nominations[slot] = Some(RawNomination {
                friend: friend.to_string(),
                strength: strength.to_string(),
            });
        }
        RawSurveyRow {
            group: group.to_string(),
            subject: subject.to_string(),
            line: 1,
            nominations,
        }
    }

    #[test]
    fn groups_preserve_first_seen_order() {
        let rows = vec![
            raw_row("B", "1", &[]),
            raw_row("A", "2", &[]),
            raw_row("B", "3", &[]),
            raw_row("A", "4", &[]),
        ];
        let groups = split_groups(&rows);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "B");
        assert_eq!(groups[1].0, "A");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[0].subject, "1");
        assert_eq!(groups[0].1[1].subject, "3");
    }

    #[test]
    fn empty_roster_yields_no_groups() {
        assert!(split_groups(&[]).is_empty());
    }

    #[test]
    fn valid_rows_convert_with_numeric_strengths() {
        let rows = validate_rows(&[raw_row("G1", "1", &[("2", "3"), ("4", "1.5")])]).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].filled_nominations().count(), 2);
        assert_eq!(rows[0].nominations[0].as_ref().unwrap().strength, 3.0);
        assert_eq!(rows[0].nominations[1].as_ref().unwrap().strength, 1.5);
        assert!(rows[0].nominations[2].is_none());
    }

    #[test]
    fn non_numeric_strength_is_a_data_error() {
        let err = validate_rows(&[raw_row("G1", "1", &[("2", "close")])]).unwrap_err();
        assert!(matches!(err, AnalysisError::Data { .. }));
    }

    #[test]
    fn present_friend_with_empty_strength_is_a_data_error() {
        let err = validate_rows(&[raw_row("G1", "1", &[("2", "")])]).unwrap_err();
        assert!(matches!(err, AnalysisError::Data { .. }));
    }

    #[test]
    fn missing_subject_is_a_data_error() {
        let err = validate_rows(&[raw_row("G1", "", &[("2", "3")])]).unwrap_err();
        assert!(matches!(err, AnalysisError::Data { .. }));
    }
}

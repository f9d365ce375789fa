//! The `scorecard draft` commands.

use std::path::Path;

use anyhow::{bail, Result};

use scorecard_core::model::FieldId;
use scorecard_core::rubric::{ItemId, Rubric};
use scorecard_core::traits::FormView;

use super::{open, reported};
use crate::view::total_line;

/// Field values given on the command line.
#[derive(Debug, Default)]
pub struct FieldUpdates {
    pub name: Option<String>,
    pub date: Option<String>,
    pub position: Option<String>,
    pub interviewer: Option<String>,
    pub notes: Option<String>,
}

impl FieldUpdates {
    fn into_pairs(self) -> Vec<(FieldId, String)> {
        [
            (FieldId::CandidateName, self.name),
            (FieldId::InterviewDate, self.date),
            (FieldId::Position, self.position),
            (FieldId::Interviewer, self.interviewer),
            (FieldId::Notes, self.notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| Some((field, value?)))
        .collect()
    }
}

pub fn show(config: Option<&Path>) -> Result<()> {
    let ctx = open(config)?;
    ctx.session.view().print_form();
    Ok(())
}

pub fn set(config: Option<&Path>, updates: FieldUpdates) -> Result<()> {
    let pairs = updates.into_pairs();
    if pairs.is_empty() {
        bail!("nothing to set; pass at least one of --name, --date, --position, --interviewer, --notes");
    }

    let mut ctx = open(config)?;
    for (field, value) in &pairs {
        ctx.session.view_mut().set_field(*field, value);
    }
    ctx.session.save_draft().map_err(reported)?;
    println!("Draft updated ({} field(s))", pairs.len());
    Ok(())
}

/// Parse item ids, rejecting ids the rubric does not know.
pub fn parse_items(items: &[String]) -> Result<Vec<ItemId>> {
    let rubric = Rubric::reference();
    items
        .iter()
        .map(|s| -> Result<ItemId> {
            let id: ItemId = s.parse().map_err(anyhow::Error::msg)?;
            if rubric.item(id).is_none() {
                bail!("unknown rubric item '{id}'; run `scorecard rubric` to list items");
            }
            Ok(id)
        })
        .collect()
}

pub fn check(config: Option<&Path>, items: &[String], checked: bool) -> Result<()> {
    let ids = parse_items(items)?;

    let mut ctx = open(config)?;
    for id in ids {
        ctx.session.view_mut().set_checked(id, checked);
    }
    let stats = ctx.session.handle_score_change().map_err(reported)?;
    println!("{}", total_line(&stats));
    Ok(())
}

pub fn clear(config: Option<&Path>) -> Result<()> {
    let mut ctx = open(config)?;
    ctx.session.clear_form().map_err(reported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_given_fields_are_set() {
        let updates = FieldUpdates {
            name: Some("Ana".into()),
            notes: Some(String::new()),
            ..Default::default()
        };
        let pairs = updates.into_pairs();
        assert_eq!(
            pairs,
            vec![
                (FieldId::CandidateName, "Ana".to_string()),
                (FieldId::Notes, String::new())
            ]
        );
    }

    #[test]
    fn item_ids_are_checked_against_the_rubric() {
        assert_eq!(parse_items(&["technical:2".into()]).unwrap().len(), 1);
        assert!(parse_items(&["technical:99".into()]).is_err());
        assert!(parse_items(&["design:1".into()]).is_err());
        assert!(parse_items(&["technical".into()]).is_err());
    }
}

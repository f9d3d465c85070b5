//! Grouping commands

use shared::{Compound, ObjectId, ObjectKind, Shape};

use crate::error::HistoryError;
use crate::state::history::{ActionKind, Target};
use crate::state::EditorSession;

impl EditorSession {
    /// Gather top-level objects into a new compound. Returns its handle.
    pub fn glue(&mut self, ids: &[ObjectId]) -> Result<ObjectId, HistoryError> {
        if ids.is_empty() {
            return Err(HistoryError::InvalidEdit("nothing to glue".into()));
        }
        let mut members = Compound::default();
        for &id in ids {
            let kind = self.figure.kind_of(id)?;
            if !members.contains(kind, id) {
                members.list_mut(kind).push(id);
            }
        }
        let region = self.figure.compound_bounds(&members);
        let member_slots = self.figure.delete_objects(&members)?;
        if let Some(b) = region {
            members.nw_corner = b.min;
            members.se_corner = b.max;
        }
        self.figure.mark_members(&members, false);
        let group = self.figure.alloc(Shape::Compound(members));
        let slot = self.figure.insert(ObjectKind::Compound, group)?;

        self.set_action_object(ActionKind::Glue, Target::Object(ObjectKind::Compound));
        self.set_latest_compound(group);
        self.set_list_slots(member_slots);
        self.set_list_slot(slot);
        self.undo_update_history()?;

        if let Some(region) = region {
            self.redisplay.region(region);
        }
        Ok(group)
    }

    /// Scatter a compound's members back into the figure
    pub fn break_compound(&mut self, id: ObjectId) -> Result<(), HistoryError> {
        let members = self.figure.compound(id)?.clone();
        if !self.figure.contains(ObjectKind::Compound, id) {
            return Err(HistoryError::NotInFigure(id));
        }
        let slot = self.figure.remove(ObjectKind::Compound, id)?;
        self.figure.append_objects(&members)?;
        self.figure.set_marked(id, false);
        self.figure.mark_members(&members, true);

        self.set_action_object(ActionKind::Break, Target::Object(ObjectKind::Compound));
        self.set_latest_compound(id);
        self.set_list_slot(slot);
        self.undo_update_history()?;

        if let Some(region) = self.figure.compound_bounds(&members) {
            self.redisplay.region(region);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_glue_then_break_keeps_depths() {
        let mut session = EditorSession::new();
        let a = session.add_object(fixtures::ellipse_at(0, 0, 30)).unwrap();
        let b = session
            .add_object(fixtures::polyline(&[(0, 0), (9, 9)], 40))
            .unwrap();
        let group = session.glue(&[a, b]).unwrap();

        assert_eq!(session.figure.objects().compounds, vec![group]);
        assert!(session.figure.objects().ellipses.is_empty());
        assert_eq!(session.figure.depths().count(ObjectKind::Ellipse, 30), 1);

        session.break_compound(group).unwrap();
        assert_eq!(session.figure.objects().ellipses, vec![a]);
        assert!(session.figure.is_marked(a));
        assert_eq!(session.figure.depths().count(ObjectKind::Polyline, 40), 1);
    }

    #[test]
    fn test_glue_requires_top_level_members() {
        let mut session = EditorSession::new();
        let stray = session.figure.alloc(fixtures::ellipse_at(0, 0, 30));
        assert_eq!(
            session.glue(&[stray]),
            Err(HistoryError::NotInFigure(stray))
        );
    }
}
